//! Runtime registry container with atomic publication.
//!
//! # Role
//!
//! This module provides the thread-safe entrypoint for registering and
//! resolving descriptors of one domain.
//!
//! # Invariants
//!
//! - A `(key, scope)` pair is inserted at most once; the first registration
//!   stays intact when a duplicate is rejected.
//! - Concurrent registrations are linearizable: the conflict check and the
//!   publish happen under one writer lock, so no update is lost.

use std::sync::Arc;

use arc_swap::ArcSwap;
use parking_lot::Mutex;
use rustc_hash::FxHashSet;

use super::listing::Listing;
use super::snapshot::Snapshot;
use crate::config::RegistryConfig;
use crate::core::{
	Descriptor, DescriptorSource, Domain, Lifecycle, Phase, RegisterError, Scope,
	UnresolvedCapabilityError,
};

/// Result of a successful [`Registry::register`] call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Registered {
	/// The descriptor was inserted; this is the stored copy.
	Inserted(Arc<Descriptor>),
	/// The key is hidden by configuration and was skipped.
	Hidden,
}

impl Registered {
	pub fn descriptor(&self) -> Option<&Arc<Descriptor>> {
		match self {
			Self::Inserted(descriptor) => Some(descriptor),
			Self::Hidden => None,
		}
	}
}

/// Catalog of descriptors for one [`Domain`].
pub struct Registry {
	domain: Domain,
	snap: ArcSwap<Snapshot>,
	write: Mutex<()>,
	lifecycle: Arc<Lifecycle>,
	hidden: FxHashSet<Box<str>>,
	strict_freeze: bool,
}

impl Registry {
	/// Creates a standalone registry with its own lifecycle, already loading.
	pub fn new(domain: Domain) -> Self {
		Self::with_config(domain, Arc::new(Lifecycle::loading()), &RegistryConfig::default())
	}

	/// Creates a registry sharing `lifecycle` with the rest of a facade.
	pub fn with_config(domain: Domain, lifecycle: Arc<Lifecycle>, config: &RegistryConfig) -> Self {
		Self {
			domain,
			snap: ArcSwap::from_pointee(Snapshot::default()),
			write: Mutex::new(()),
			lifecycle,
			hidden: config.hidden_keys(domain).map(Box::from).collect(),
			strict_freeze: config.strict_freeze,
		}
	}

	pub fn domain(&self) -> Domain {
		self.domain
	}

	pub fn phase(&self) -> Phase {
		self.lifecycle.phase()
	}

	/// Registers a descriptor, taking ownership of it.
	///
	/// Fails with [`RegisterError::Duplicate`] when `(key, scope)` or one of the
	/// aliases is already taken in that scope, and with
	/// [`RegisterError::Invalid`] when the descriptor is malformed. In both cases
	/// the registry is unchanged.
	///
	/// Descriptors registered from inside a running contribution without an
	/// explicit source are recorded as [`DescriptorSource::Crate`] of that
	/// contribution.
	pub fn register(&self, mut descriptor: Descriptor) -> Result<Registered, RegisterError> {
		let domain = self.domain;
		descriptor.validate(domain)?;
		if descriptor.source() == DescriptorSource::Builtin
			&& let Some(name) = crate::db::active_contribution()
		{
			descriptor.set_source(DescriptorSource::Crate(name));
		}

		if self.hidden.contains(descriptor.key()) {
			tracing::debug!(%domain, key = descriptor.key(), "skipping hidden capability");
			return Ok(Registered::Hidden);
		}

		if self.lifecycle.phase() == Phase::Ready {
			if self.strict_freeze {
				return Err(RegisterError::Frozen {
					domain,
					key: descriptor.key().to_string(),
				});
			}
			tracing::warn!(
				%domain,
				key = descriptor.key(),
				scope = %descriptor.scope(),
				"capability registered after the catalog was frozen"
			);
		}

		let _guard = self.write.lock();
		let current = self.snap.load_full();
		current.check_conflicts(domain, &descriptor)?;

		let entry = Arc::new(descriptor);
		let mut next = Snapshot::clone(&current);
		next.insert(entry.clone());
		self.snap.store(Arc::new(next));

		tracing::debug!(
			%domain,
			key = entry.key(),
			scope = %entry.scope(),
			source = %entry.source(),
			"registered capability"
		);
		Ok(Registered::Inserted(entry))
	}

	/// Resolves the descriptor that applies to `key` in `scope`.
	///
	/// Repeated calls without an intervening registration return equal
	/// descriptors.
	pub fn resolve(
		&self,
		key: &str,
		scope: &Scope,
	) -> Result<Arc<Descriptor>, UnresolvedCapabilityError> {
		self.lifecycle.mark_ready(self.domain);
		self.snap.load().resolve(key, scope).ok_or_else(|| {
			tracing::trace!(domain = %self.domain, key, %scope, "unresolved capability");
			UnresolvedCapabilityError {
				domain: self.domain,
				key: key.to_string(),
				scope: scope.clone(),
			}
		})
	}

	/// Resolves `key`, falling back to `fallback` in the same scope when `key`
	/// is unknown.
	///
	/// Used for catch-all descriptors such as an `unmatched` stage. When the
	/// fallback does not resolve either, the error names `key`.
	pub fn resolve_or(
		&self,
		key: &str,
		scope: &Scope,
		fallback: &str,
	) -> Result<Arc<Descriptor>, UnresolvedCapabilityError> {
		self.resolve(key, scope)
			.or_else(|err| self.snap.load().resolve(fallback, scope).ok_or(err))
	}

	/// Like [`Self::resolve`], collapsing the error to `None`.
	pub fn get(&self, key: &str, scope: &Scope) -> Option<Arc<Descriptor>> {
		self.resolve(key, scope).ok()
	}

	/// Lists descriptors applicable to `scope`, ordered by label.
	///
	/// The returned [`Listing`] reads the registry each time it is iterated.
	pub fn list(&self, scope: Option<&Scope>) -> Listing<'_> {
		self.lifecycle.mark_ready(self.domain);
		Listing::new(self, scope.cloned())
	}

	/// Resolved provider-specific implementations of `key`, ordered by scope.
	pub fn providers_for(&self, key: &str) -> Vec<Arc<Descriptor>> {
		self.snap.load().providers_for(key)
	}

	/// Returns the candidate scopes in which `key` is offered.
	pub fn scopes_for(&self, key: &str, candidates: &[Scope]) -> Vec<Scope> {
		self.snap.load().scopes_for(key, candidates)
	}

	/// Every registration for `key`, in insertion order.
	pub fn history(&self, key: &str) -> Vec<Arc<Descriptor>> {
		self.snap.load().history(key)
	}

	pub fn contains(&self, key: &str, scope: &Scope) -> bool {
		self.snap.load().entry(key, scope).is_some()
	}

	/// Number of `(key, scope)` entries.
	pub fn len(&self) -> usize {
		self.snap.load().len()
	}

	pub fn is_empty(&self) -> bool {
		self.snap.load().is_empty()
	}

	/// Returns the current snapshot.
	pub fn snapshot(&self) -> Arc<Snapshot> {
		self.snap.load_full()
	}

	/// Drops every descriptor.
	pub(crate) fn clear(&self) {
		let _guard = self.write.lock();
		self.snap.store(Arc::new(Snapshot::default()));
	}
}

impl std::fmt::Debug for Registry {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Registry")
			.field("domain", &self.domain)
			.field("len", &self.len())
			.field("phase", &self.phase())
			.finish()
	}
}
