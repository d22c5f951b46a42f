//! Capability registries for a deployment console.
//!
//! Provider crates (one per cloud platform, notification channel, or
//! deployment strategy) plug descriptors into shared extension points without
//! the console or each other knowing about them at build time. Each extension
//! point is a [`Registry`] keyed by `(key, scope)`; the process-wide
//! [`RegistryDb`] groups one registry per [`Domain`].
//!
//! # Registering
//!
//! Contributions are collected with `inventory` and run once when the facade
//! is created:
//!
//! ```ignore
//! use deckhand_registry::{CapabilityHandle, Descriptor};
//!
//! deckhand_registry::contribution!("titus", |db| {
//!     db.pipeline.stages.register(
//!         Descriptor::builder("destroyService")
//!             .provider("titus")
//!             .label("Destroy Job")
//!             .uses_base_provider()
//!             .build(),
//!     )?;
//!     Ok(())
//! });
//! ```
//!
//! # Resolving
//!
//! ```ignore
//! let stage = deckhand_registry::STAGES.resolve("destroyService", &Scope::provider("titus"))?;
//! ```
//!
//! A scope-specific descriptor overrides the [`Scope::Global`] one for the same
//! key; with `uses_base_provider` it only overrides the fields it sets. See
//! [`core::index`] for the full algorithm.

pub mod config;
pub mod core;
pub mod db;

pub use inventory;

pub use crate::config::{ConfigError, RegistryConfig};
pub use crate::core::{
	CapabilityHandle, ConflictKind, Descriptor, DescriptorBuilder, DescriptorFlags,
	DescriptorSource, Domain, DuplicateCapabilityError, InvalidDescriptor, InvalidReason,
	Lifecycle, Listing, Phase, RegisterError, Registered, Registry, RegistryError, Scope,
	Snapshot, UnknownDomain, UnresolvedCapabilityError,
};
pub use crate::db::{
	CLOUD_PROVIDERS, Contribution, NOTIFICATIONS, PRECONDITIONS, PipelineRegistries,
	RegistryDb, STAGES, STRATEGIES, TRIGGERS, get_db, init, init_from_path, init_with_config,
	reset_for_testing,
};
