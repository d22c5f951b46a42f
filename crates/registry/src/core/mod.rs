//! Shared registry infrastructure.

pub mod descriptor;
pub mod domain;
pub mod error;
pub mod index;
pub mod lifecycle;
pub mod scope;

pub use descriptor::{
	CapabilityHandle, Descriptor, DescriptorBuilder, DescriptorFlags, DescriptorSource,
};
pub use domain::Domain;
pub use error::{
	ConflictKind, DuplicateCapabilityError, InvalidDescriptor, InvalidReason, RegisterError,
	RegistryError, UnknownDomain, UnresolvedCapabilityError,
};
pub use index::{Listing, Registered, Registry, Snapshot};
pub use lifecycle::{Lifecycle, Phase};
pub use scope::Scope;
