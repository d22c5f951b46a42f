use std::fmt;
use std::sync::Arc;

/// The provider or context a descriptor applies to.
///
/// [`Scope::Global`] is a sentinel rather than a provider name, so no string
/// passed to [`Scope::provider`] can ever collide with it. The derived order
/// puts `Global` before every named provider.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Scope {
	/// Base descriptor usable by any scope that does not override it.
	#[default]
	Global,
	/// A cloud provider or notification channel such as `aws` or `slack`.
	Provider(Arc<str>),
}

impl Scope {
	/// Creates a provider scope.
	pub fn provider(name: impl Into<Arc<str>>) -> Self {
		Self::Provider(name.into())
	}

	/// Returns true for the [`Scope::Global`] sentinel.
	pub fn is_global(&self) -> bool {
		matches!(self, Self::Global)
	}

	/// Returns the provider name, or `None` for [`Scope::Global`].
	pub fn name(&self) -> Option<&str> {
		match self {
			Self::Global => None,
			Self::Provider(name) => Some(name),
		}
	}
}

impl From<&str> for Scope {
	fn from(name: &str) -> Self {
		Self::provider(name)
	}
}

impl From<String> for Scope {
	fn from(name: String) -> Self {
		Self::provider(name)
	}
}

impl fmt::Display for Scope {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Global => f.write_str("<global>"),
			Self::Provider(name) => f.write_str(name),
		}
	}
}
