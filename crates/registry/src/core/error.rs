use std::fmt;

use super::domain::Domain;
use super::scope::Scope;
use crate::config::ConfigError;

/// A domain name that matches no [`Domain`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown registry domain '{0}'")]
pub struct UnknownDomain(pub String);

/// Which index a conflicting registration collided in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConflictKind {
	/// Canonical key.
	Key,
	/// Alternate lookup key.
	Alias,
}

impl fmt::Display for ConflictKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Key => write!(f, "key"),
			Self::Alias => write!(f, "alias"),
		}
	}
}

/// A `(domain, key, scope)` triple was registered twice.
///
/// Always fatal to the registering contribution. The existing entry is left
/// untouched.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("duplicate {kind} '{key}' in {domain} registry for scope {scope}")]
pub struct DuplicateCapabilityError {
	pub domain: Domain,
	/// The colliding key or alias.
	pub key: String,
	pub scope: Scope,
	pub kind: ConflictKind,
}

/// Neither a scoped nor a global descriptor exists for the requested key.
///
/// Callers are expected to degrade gracefully (omit the entry, render a
/// placeholder) rather than fail.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("no {domain} capability registered for '{key}' in scope {scope}")]
pub struct UnresolvedCapabilityError {
	pub domain: Domain,
	pub key: String,
	pub scope: Scope,
}

/// Why a descriptor failed validation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvalidReason {
	#[error("key is empty")]
	EmptyKey,
	#[error("label is empty")]
	EmptyLabel,
	#[error("description is empty")]
	EmptyDescription,
	#[error("provider scope name is empty")]
	EmptyScopeName,
	#[error("global descriptor cannot inherit from a base provider")]
	GlobalInheritsBase,
	#[error("alias is empty")]
	EmptyAlias,
	#[error("alias '{0}' repeats the key")]
	AliasShadowsKey(String),
	#[error("alias '{0}' is listed more than once")]
	RepeatedAlias(String),
}

/// A malformed descriptor was rejected before insertion.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid {domain} descriptor '{key}': {reason}")]
pub struct InvalidDescriptor {
	pub domain: Domain,
	pub key: String,
	pub reason: InvalidReason,
}

/// Registration failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegisterError {
	#[error(transparent)]
	Duplicate(#[from] DuplicateCapabilityError),
	#[error(transparent)]
	Invalid(#[from] InvalidDescriptor),
	/// Late registration while the catalog is frozen in strict mode.
	#[error("{domain} registry is frozen; rejected late registration of '{key}'")]
	Frozen { domain: Domain, key: String },
}

/// Crate-level error.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
	#[error("contribution '{name}' failed: {source}")]
	Contribution {
		name: &'static str,
		#[source]
		source: RegisterError,
	},
	#[error("registry database is already initialized")]
	AlreadyInitialized,
	#[error(transparent)]
	Config(#[from] ConfigError),
}
