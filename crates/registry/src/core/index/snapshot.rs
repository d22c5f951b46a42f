//! Immutable registry state.
//!
//! # Role
//!
//! A [`Snapshot`] is published atomically by [`super::Registry`] and never
//! mutated afterwards. Writers clone the current snapshot, extend the copy, and
//! swap it in. It contains no locking.

use std::sync::Arc;

use indexmap::IndexMap;
use rustc_hash::{FxBuildHasher, FxHashMap};

use crate::core::{ConflictKind, Descriptor, DuplicateCapabilityError, Domain, Scope};

pub(super) type Map<K, V> = IndexMap<K, V, FxBuildHasher>;

/// Per-key slot. Scope order is registration order.
pub(super) type KeySlot = Map<Scope, Arc<Descriptor>>;

#[derive(Clone, Default)]
pub struct Snapshot {
	/// Canonical key lookup; key order is first-registration order.
	pub(super) keys: Map<Arc<str>, KeySlot>,
	/// Alias -> scope -> canonical key.
	pub(super) aliases: FxHashMap<Arc<str>, FxHashMap<Scope, Arc<str>>>,
}

impl Snapshot {
	/// Number of registered `(key, scope)` entries.
	pub fn len(&self) -> usize {
		self.keys.values().map(|slot| slot.len()).sum()
	}

	pub fn is_empty(&self) -> bool {
		self.keys.is_empty()
	}

	pub(super) fn entry(&self, key: &str, scope: &Scope) -> Option<&Arc<Descriptor>> {
		self.keys.get(key)?.get(scope)
	}

	/// Canonical key an alias points to within `scope`, falling back to the
	/// global alias table.
	pub(super) fn alias_target(&self, alias: &str, scope: &Scope) -> Option<&str> {
		let by_scope = self.aliases.get(alias)?;
		by_scope
			.get(scope)
			.or_else(|| by_scope.get(&Scope::Global))
			.map(|key| &**key)
	}

	/// Canonical key for `key`, following aliases in any scope when `key` is
	/// not itself registered.
	pub(super) fn canonical<'a>(&'a self, key: &'a str) -> Option<&'a str> {
		if self.keys.contains_key(key) {
			return Some(key);
		}
		let by_scope = self.aliases.get(key)?;
		by_scope
			.get(&Scope::Global)
			.or_else(|| by_scope.iter().min_by(|a, b| a.0.cmp(b.0)).map(|(_, k)| k))
			.map(|key| &**key)
	}

	/// Rejects a descriptor whose key or aliases collide within its scope.
	pub(super) fn check_conflicts(
		&self,
		domain: Domain,
		descriptor: &Descriptor,
	) -> Result<(), DuplicateCapabilityError> {
		let scope = descriptor.scope();
		let conflict = |key: &str, kind| DuplicateCapabilityError {
			domain,
			key: key.to_string(),
			scope: scope.clone(),
			kind,
		};

		if self.entry(descriptor.key(), scope).is_some() {
			return Err(conflict(descriptor.key(), ConflictKind::Key));
		}
		if self.alias_in_scope(descriptor.key(), scope) {
			return Err(conflict(descriptor.key(), ConflictKind::Alias));
		}
		for alias in descriptor.aliases() {
			if self.entry(alias, scope).is_some() || self.alias_in_scope(alias, scope) {
				return Err(conflict(alias, ConflictKind::Alias));
			}
		}
		Ok(())
	}

	fn alias_in_scope(&self, alias: &str, scope: &Scope) -> bool {
		self.aliases
			.get(alias)
			.is_some_and(|by_scope| by_scope.contains_key(scope))
	}

	/// Inserts a descriptor that already passed [`Self::check_conflicts`].
	pub(super) fn insert(&mut self, descriptor: Arc<Descriptor>) {
		let key = descriptor.key_arc().clone();
		let scope = descriptor.scope().clone();
		for alias in descriptor.alias_arcs() {
			self.aliases
				.entry(alias.clone())
				.or_default()
				.insert(scope.clone(), key.clone());
		}
		self.keys.entry(key).or_default().insert(scope, descriptor);
	}
}
