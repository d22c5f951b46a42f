//! Scope specificity and base-provider fallback.
//!
//! # Mental Model
//!
//! Every key has at most two candidates for a given scope: the **specific**
//! entry registered for that scope and the **base** entry registered for
//! [`Scope::Global`]. There is no deeper inheritance chain, so resolution is
//! two hash lookups and, at most, one merge.
//!
//! | specific | base | result |
//! |----------|------|--------|
//! | -        | -    | unresolved (after alias fallback) |
//! | yes      | -    | specific, unless it inherits and is incomplete |
//! | -        | yes  | base |
//! | yes      | yes  | specific, merged over base when it uses the base provider |
//!
//! `STRATEGY_ELIGIBLE`, `PROVIDER_RESTRICTED` and `SYNTHETIC` never change
//! what `resolve` returns; they only filter listings.

use std::sync::Arc;

use super::snapshot::Snapshot;
use crate::core::{Descriptor, Scope};

impl Snapshot {
	/// Resolves `key` for `scope`, following aliases when the key is unknown.
	pub(crate) fn resolve(&self, key: &str, scope: &Scope) -> Option<Arc<Descriptor>> {
		self.resolve_key(key, scope).or_else(|| {
			let canonical = self.alias_target(key, scope)?;
			self.resolve_key(canonical, scope)
		})
	}

	pub(super) fn resolve_key(&self, key: &str, scope: &Scope) -> Option<Arc<Descriptor>> {
		let slot = self.keys.get(key)?;
		let specific = slot.get(scope);
		let base = if scope.is_global() {
			None
		} else {
			slot.get(&Scope::Global)
		};

		match (specific, base) {
			(None, None) => None,
			(Some(specific), None) if specific.uses_base_provider() && !specific.is_complete() => {
				None
			}
			(Some(only), None) | (None, Some(only)) => Some(only.clone()),
			(Some(specific), Some(base)) if specific.uses_base_provider() => {
				Some(Arc::new(specific.merged_over(base)))
			}
			(Some(specific), Some(_)) => Some(specific.clone()),
		}
	}

	/// Descriptors applicable to `scope`, unsorted.
	///
	/// `None` yields every registered entry resolved in its own scope.
	/// `Some(scope)` yields one resolved descriptor per key that has an entry
	/// for `scope`, plus global entries not shadowed by one; restricted global
	/// entries only appear when `scope` is itself global. Entries that do not
	/// resolve are skipped in both cases.
	pub(super) fn applicable(&self, scope: Option<&Scope>) -> Vec<Arc<Descriptor>> {
		let Some(scope) = scope else {
			return self
				.keys
				.iter()
				.flat_map(|(key, slot)| slot.keys().filter_map(move |scope| self.resolve_key(key, scope)))
				.collect();
		};

		self.keys
			.iter()
			.filter_map(|(key, slot)| {
				if slot.contains_key(scope) {
					return self.resolve_key(key, scope);
				}
				slot.get(&Scope::Global)
					.filter(|base| !base.is_provider_restricted())
					.cloned()
			})
			.collect()
	}

	/// Resolved scope-specific implementations of `key`, ordered by scope.
	pub(super) fn providers_for(&self, key: &str) -> Vec<Arc<Descriptor>> {
		let Some(key) = self.canonical(key) else {
			return Vec::new();
		};
		let Some(slot) = self.keys.get(key) else {
			return Vec::new();
		};

		let mut scopes: Vec<&Scope> = slot.keys().filter(|scope| !scope.is_global()).collect();
		scopes.sort();
		scopes
			.into_iter()
			.filter_map(|scope| self.resolve_key(key, scope))
			.collect()
	}

	/// Subset of `candidates` that offer `key`. Synthetic descriptors are never
	/// offered.
	pub(super) fn scopes_for(&self, key: &str, candidates: &[Scope]) -> Vec<Scope> {
		let Some((key, slot)) = self
			.canonical(key)
			.and_then(|key| self.keys.get_key_value(key))
		else {
			return Vec::new();
		};
		let base_offered = slot
			.get(&Scope::Global)
			.is_some_and(|base| !base.is_provider_restricted() && !base.is_synthetic());

		candidates
			.iter()
			.filter(|scope| {
				if slot.contains_key(*scope) {
					self.resolve_key(key, scope).is_some_and(|resolved| !resolved.is_synthetic())
				} else {
					base_offered
				}
			})
			.cloned()
			.collect()
	}

	/// Every entry for `key` in registration order.
	pub(super) fn history(&self, key: &str) -> Vec<Arc<Descriptor>> {
		self.keys
			.get(key)
			.map(|slot| slot.values().cloned().collect())
			.unwrap_or_default()
	}
}
