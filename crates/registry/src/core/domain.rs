use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

use super::error::UnknownDomain;

/// One capability kind, each backed by its own [`crate::Registry`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize)]
#[serde(try_from = "String")]
pub enum Domain {
	/// Pipeline stage types (`bake`, `deploy`, `disableCluster`).
	Stages,
	/// Pipeline trigger types (`cron`, `pipeline`, `git`).
	Triggers,
	/// Deployment strategies (`highlander`, `redblack`, `none`).
	Strategies,
	/// Stage precondition types (`clusterSize`, `expression`).
	Preconditions,
	/// Notification channels (`email`, `slack`, `pagerDuty`).
	Notifications,
	/// Cloud-provider descriptors.
	CloudProviders,
}

impl Domain {
	/// Every domain, in facade order.
	pub const ALL: [Domain; 6] = [
		Domain::Stages,
		Domain::Triggers,
		Domain::Strategies,
		Domain::Preconditions,
		Domain::Notifications,
		Domain::CloudProviders,
	];

	/// Returns the snake-case name used in logs and configuration.
	pub const fn as_str(self) -> &'static str {
		match self {
			Self::Stages => "stages",
			Self::Triggers => "triggers",
			Self::Strategies => "strategies",
			Self::Preconditions => "preconditions",
			Self::Notifications => "notifications",
			Self::CloudProviders => "cloud_providers",
		}
	}
}

impl fmt::Display for Domain {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl FromStr for Domain {
	type Err = UnknownDomain;

	fn from_str(name: &str) -> Result<Self, Self::Err> {
		Self::ALL
			.into_iter()
			.find(|domain| domain.as_str() == name)
			.ok_or_else(|| UnknownDomain(name.to_string()))
	}
}

impl TryFrom<String> for Domain {
	type Error = UnknownDomain;

	fn try_from(name: String) -> Result<Self, Self::Error> {
		name.parse()
	}
}
