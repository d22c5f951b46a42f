use std::sync::Arc;

use super::runtime::Registry;
use crate::core::{Descriptor, Scope};

/// Label-ordered view over the descriptors applicable to a scope.
///
/// Nothing is computed until [`Listing::iter`] is called, and every call reads
/// the registry's current snapshot, so a listing can be kept and re-iterated
/// after further registrations. Synthetic descriptors are never listed.
#[derive(Debug, Clone)]
pub struct Listing<'a> {
	registry: &'a Registry,
	scope: Option<Scope>,
	strategy_only: bool,
}

impl<'a> Listing<'a> {
	pub(super) fn new(registry: &'a Registry, scope: Option<Scope>) -> Self {
		Self {
			registry,
			scope,
			strategy_only: false,
		}
	}

	/// Narrows the listing to strategy-eligible descriptors.
	pub fn strategy_eligible(mut self) -> Self {
		self.strategy_only = true;
		self
	}

	pub fn scope(&self) -> Option<&Scope> {
		self.scope.as_ref()
	}

	pub fn iter(&self) -> std::vec::IntoIter<Arc<Descriptor>> {
		let mut items = self.registry.snapshot().applicable(self.scope.as_ref());
		items.retain(|descriptor| {
			!descriptor.is_synthetic() && (!self.strategy_only || descriptor.is_strategy_eligible())
		});
		items.sort_by(|a, b| {
			a.label()
				.cmp(b.label())
				.then_with(|| a.key().cmp(b.key()))
				.then_with(|| a.scope().cmp(b.scope()))
		});
		items.into_iter()
	}

	/// Keys in listing order.
	pub fn keys(&self) -> Vec<String> {
		self.iter().map(|descriptor| descriptor.key().to_string()).collect()
	}
}

impl<'a> IntoIterator for &Listing<'a> {
	type Item = Arc<Descriptor>;
	type IntoIter = std::vec::IntoIter<Arc<Descriptor>>;

	fn into_iter(self) -> Self::IntoIter {
		self.iter()
	}
}
