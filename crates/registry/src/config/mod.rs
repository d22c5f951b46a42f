//! Registry configuration.
//!
//! Configuration is written in TOML and read once, before any contribution
//! registers:
//!
//! ```toml
//! # Reject registrations that arrive after the first resolve/list.
//! strict_freeze = true
//!
//! # Keys that are never registered, per domain.
//! [hidden]
//! stages = ["hiddenA", "hiddenB"]
//! notifications = ["pagerDuty"]
//! ```
//!
//! Domain names are the snake-case [`Domain`] names; an unknown name is a parse
//! error.

mod error;

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use serde::Deserialize;

pub use error::{ConfigError, Result};

use crate::core::Domain;

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RegistryConfig {
	/// Fail late registrations with [`crate::RegisterError::Frozen`] instead of
	/// accepting them with a warning.
	pub strict_freeze: bool,
	/// Keys skipped at registration time.
	pub hidden: BTreeMap<Domain, BTreeSet<String>>,
}

impl RegistryConfig {
	pub fn from_toml_str(content: &str) -> Result<Self> {
		Ok(toml::from_str(content)?)
	}

	pub fn load(path: &Path) -> Result<Self> {
		let content = std::fs::read_to_string(path).map_err(|error| ConfigError::Io {
			path: path.to_path_buf(),
			error,
		})?;
		let config = Self::from_toml_str(&content)?;
		tracing::debug!(path = %path.display(), "loaded registry config");
		Ok(config)
	}

	/// Hidden keys for `domain`, sorted.
	pub fn hidden_keys(&self, domain: Domain) -> impl Iterator<Item = &str> + '_ {
		self.hidden
			.get(&domain)
			.into_iter()
			.flat_map(|keys| keys.iter().map(String::as_str))
	}

	pub fn hide(mut self, domain: Domain, key: impl Into<String>) -> Self {
		self.hidden.entry(domain).or_default().insert(key.into());
		self
	}

	pub fn with_strict_freeze(mut self, strict: bool) -> Self {
		self.strict_freeze = strict;
		self
	}

	/// Layers `other` over `self`: hidden sets are unioned, and strict mode is
	/// enabled if either layer enables it.
	pub fn merge(&mut self, other: RegistryConfig) {
		self.strict_freeze |= other.strict_freeze;
		for (domain, keys) in other.hidden {
			self.hidden.entry(domain).or_default().extend(keys);
		}
	}
}
