//! Capability descriptors.
//!
//! A [`Descriptor`] is the unit of registration: one contribution of one
//! capability (a stage type, a strategy, a notification channel) for one
//! scope. Fields are private and only readable through getters; once a
//! descriptor is handed to [`crate::Registry::register`] it is moved behind an
//! `Arc` and never mutated again.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use super::domain::Domain;
use super::error::{InvalidDescriptor, InvalidReason};
use super::scope::Scope;

bitflags::bitflags! {
	/// Resolution hints carried by a descriptor.
	#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
	pub struct DescriptorFlags: u8 {
		/// Unset fields are inherited from the global descriptor of the same key.
		const USES_BASE_PROVIDER = 1 << 0;
		/// May be offered inside deployment strategies.
		const STRATEGY_ELIGIBLE = 1 << 1;
		/// Never offered outside its declared scope.
		const PROVIDER_RESTRICTED = 1 << 2;
		/// Resolvable but never offered in listings (generated by the system,
		/// not configured by users).
		const SYNTHETIC = 1 << 3;
	}
}

/// Where a descriptor was contributed from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DescriptorSource {
	/// Shipped with the console itself.
	#[default]
	Builtin,
	/// Registered by a named provider contribution.
	Crate(&'static str),
	/// Registered programmatically after startup.
	Runtime,
}

impl fmt::Display for DescriptorSource {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Builtin => write!(f, "builtin"),
			Self::Crate(name) => write!(f, "crate:{name}"),
			Self::Runtime => write!(f, "runtime"),
		}
	}
}

/// Opaque behavior reference (component, validator, config template).
///
/// The registry stores and forwards handles without inspecting them. Two
/// handles are equal when they point at the same allocation.
#[derive(Clone)]
pub struct CapabilityHandle(Arc<dyn Any + Send + Sync>);

impl CapabilityHandle {
	pub fn new<T: Any + Send + Sync>(value: T) -> Self {
		Self(Arc::new(value))
	}

	pub fn from_arc(value: Arc<dyn Any + Send + Sync>) -> Self {
		Self(value)
	}

	/// Borrows the underlying value if it has type `T`.
	pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
		self.0.downcast_ref::<T>()
	}

	pub fn ptr_eq(&self, other: &Self) -> bool {
		Arc::ptr_eq(&self.0, &other.0)
	}
}

impl PartialEq for CapabilityHandle {
	fn eq(&self, other: &Self) -> bool {
		self.ptr_eq(other)
	}
}

impl Eq for CapabilityHandle {}

impl fmt::Debug for CapabilityHandle {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_tuple("CapabilityHandle")
			.field(&Arc::as_ptr(&self.0).cast::<()>())
			.finish()
	}
}

/// Immutable record describing one registered capability.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Descriptor {
	key: Arc<str>,
	scope: Scope,
	label: String,
	description: String,
	behavior: Option<CapabilityHandle>,
	aliases: Vec<Arc<str>>,
	flags: DescriptorFlags,
	source: DescriptorSource,
}

impl Descriptor {
	/// Starts a descriptor for `key` in the global scope.
	pub fn builder(key: impl Into<Arc<str>>) -> DescriptorBuilder {
		DescriptorBuilder {
			inner: Descriptor {
				key: key.into(),
				scope: Scope::Global,
				label: String::new(),
				description: String::new(),
				behavior: None,
				aliases: Vec::new(),
				flags: DescriptorFlags::empty(),
				source: DescriptorSource::default(),
			},
		}
	}

	pub fn key(&self) -> &str {
		&self.key
	}

	pub fn scope(&self) -> &Scope {
		&self.scope
	}

	pub fn label(&self) -> &str {
		&self.label
	}

	pub fn description(&self) -> &str {
		&self.description
	}

	pub fn behavior(&self) -> Option<&CapabilityHandle> {
		self.behavior.as_ref()
	}

	pub fn aliases(&self) -> impl ExactSizeIterator<Item = &str> + '_ {
		self.aliases.iter().map(|alias| &**alias)
	}

	pub fn flags(&self) -> DescriptorFlags {
		self.flags
	}

	pub fn source(&self) -> DescriptorSource {
		self.source
	}

	pub fn uses_base_provider(&self) -> bool {
		self.flags.contains(DescriptorFlags::USES_BASE_PROVIDER)
	}

	pub fn is_strategy_eligible(&self) -> bool {
		self.flags.contains(DescriptorFlags::STRATEGY_ELIGIBLE)
	}

	pub fn is_provider_restricted(&self) -> bool {
		self.flags.contains(DescriptorFlags::PROVIDER_RESTRICTED)
	}

	pub fn is_synthetic(&self) -> bool {
		self.flags.contains(DescriptorFlags::SYNTHETIC)
	}

	/// True when label and description are both set, so the descriptor can be
	/// shown without a base to inherit from.
	pub fn is_complete(&self) -> bool {
		!self.label.trim().is_empty() && !self.description.trim().is_empty()
	}

	pub(crate) fn key_arc(&self) -> &Arc<str> {
		&self.key
	}

	pub(crate) fn alias_arcs(&self) -> &[Arc<str>] {
		&self.aliases
	}

	pub(crate) fn set_source(&mut self, source: DescriptorSource) {
		self.source = source;
	}

	/// Checks the closed schema before the descriptor touches any registry.
	///
	/// Scoped descriptors that inherit from a base provider may leave label,
	/// description and behavior unset. A global descriptor has no base, so it
	/// may not inherit.
	pub fn validate(&self, domain: Domain) -> Result<(), InvalidDescriptor> {
		let invalid = |reason| InvalidDescriptor {
			domain,
			key: self.key.to_string(),
			reason,
		};

		if self.key.is_empty() {
			return Err(invalid(InvalidReason::EmptyKey));
		}
		if self.scope.name().is_some_and(str::is_empty) {
			return Err(invalid(InvalidReason::EmptyScopeName));
		}
		if self.uses_base_provider() && self.scope.is_global() {
			return Err(invalid(InvalidReason::GlobalInheritsBase));
		}
		if !self.uses_base_provider() {
			if self.label.trim().is_empty() {
				return Err(invalid(InvalidReason::EmptyLabel));
			}
			if self.description.trim().is_empty() {
				return Err(invalid(InvalidReason::EmptyDescription));
			}
		}
		for (idx, alias) in self.aliases.iter().enumerate() {
			if alias.is_empty() {
				return Err(invalid(InvalidReason::EmptyAlias));
			}
			if alias == &self.key {
				return Err(invalid(InvalidReason::AliasShadowsKey(alias.to_string())));
			}
			if self.aliases[..idx].contains(alias) {
				return Err(invalid(InvalidReason::RepeatedAlias(alias.to_string())));
			}
		}
		Ok(())
	}

	/// Builds the effective descriptor for a scoped entry layered over `base`.
	///
	/// Fields set on `self` win; unset fields come from `base`. Identity
	/// (key, scope, flags, source) always stays with `self`.
	pub(crate) fn merged_over(&self, base: &Descriptor) -> Descriptor {
		let pick = |own: &String, inherited: &String| {
			if own.is_empty() {
				inherited.clone()
			} else {
				own.clone()
			}
		};

		Descriptor {
			key: self.key.clone(),
			scope: self.scope.clone(),
			label: pick(&self.label, &base.label),
			description: pick(&self.description, &base.description),
			behavior: self.behavior.clone().or_else(|| base.behavior.clone()),
			aliases: if self.aliases.is_empty() {
				base.aliases.clone()
			} else {
				self.aliases.clone()
			},
			flags: self.flags,
			source: self.source,
		}
	}
}

/// Builder for [`Descriptor`].
#[derive(Debug, Clone)]
pub struct DescriptorBuilder {
	inner: Descriptor,
}

impl DescriptorBuilder {
	pub fn scope(mut self, scope: impl Into<Scope>) -> Self {
		self.inner.scope = scope.into();
		self
	}

	/// Shorthand for `.scope(Scope::provider(name))`.
	pub fn provider(self, name: impl Into<Arc<str>>) -> Self {
		self.scope(Scope::provider(name))
	}

	pub fn label(mut self, label: impl Into<String>) -> Self {
		self.inner.label = label.into();
		self
	}

	pub fn description(mut self, description: impl Into<String>) -> Self {
		self.inner.description = description.into();
		self
	}

	pub fn behavior(mut self, behavior: CapabilityHandle) -> Self {
		self.inner.behavior = Some(behavior);
		self
	}

	pub fn alias(mut self, alias: impl Into<Arc<str>>) -> Self {
		self.inner.aliases.push(alias.into());
		self
	}

	pub fn flags(mut self, flags: DescriptorFlags) -> Self {
		self.inner.flags |= flags;
		self
	}

	pub fn uses_base_provider(self) -> Self {
		self.flags(DescriptorFlags::USES_BASE_PROVIDER)
	}

	pub fn strategy_eligible(self) -> Self {
		self.flags(DescriptorFlags::STRATEGY_ELIGIBLE)
	}

	pub fn provider_restricted(self) -> Self {
		self.flags(DescriptorFlags::PROVIDER_RESTRICTED)
	}

	pub fn synthetic(self) -> Self {
		self.flags(DescriptorFlags::SYNTHETIC)
	}

	pub fn source(mut self, source: DescriptorSource) -> Self {
		self.inner.source = source;
		self
	}

	pub fn build(self) -> Descriptor {
		self.inner
	}
}
