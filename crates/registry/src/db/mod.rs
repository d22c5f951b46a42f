//! Registry facade and global accessor surfaces.
//!
//! [`RegistryDb`] groups one [`Registry`] per [`Domain`] behind a single
//! well-known namespace (`pipeline.stages`, `notifications`,
//! `cloud_providers`, ...). A process normally uses the shared instance from
//! [`get_db`]; tests may build private instances with [`RegistryDb::new`].

use std::path::Path;
use std::sync::{Arc, LazyLock, OnceLock};

mod plugin;

pub use plugin::{Contribution, run_contributions};
pub(crate) use plugin::active_contribution;

use crate::config::RegistryConfig;
use crate::core::{Domain, Lifecycle, Phase, Registry, RegistryError};

/// Pipeline extension points.
#[derive(Debug)]
pub struct PipelineRegistries {
	pub stages: Registry,
	pub triggers: Registry,
	pub strategies: Registry,
	pub preconditions: Registry,
}

#[derive(Debug)]
pub struct RegistryDb {
	pub pipeline: PipelineRegistries,
	pub notifications: Registry,
	pub cloud_providers: Registry,
	lifecycle: Arc<Lifecycle>,
	config: RegistryConfig,
}

impl RegistryDb {
	/// Creates empty registries sharing one lifecycle, in
	/// [`Phase::Uninitialized`].
	pub fn new(config: RegistryConfig) -> Self {
		let lifecycle = Arc::new(Lifecycle::new());
		let make = |domain| Registry::with_config(domain, lifecycle.clone(), &config);

		Self {
			pipeline: PipelineRegistries {
				stages: make(Domain::Stages),
				triggers: make(Domain::Triggers),
				strategies: make(Domain::Strategies),
				preconditions: make(Domain::Preconditions),
			},
			notifications: make(Domain::Notifications),
			cloud_providers: make(Domain::CloudProviders),
			lifecycle,
			config,
		}
	}

	pub fn registry(&self, domain: Domain) -> &Registry {
		match domain {
			Domain::Stages => &self.pipeline.stages,
			Domain::Triggers => &self.pipeline.triggers,
			Domain::Strategies => &self.pipeline.strategies,
			Domain::Preconditions => &self.pipeline.preconditions,
			Domain::Notifications => &self.notifications,
			Domain::CloudProviders => &self.cloud_providers,
		}
	}

	/// Every registry, in [`Domain::ALL`] order.
	pub fn registries(&self) -> impl Iterator<Item = &Registry> + '_ {
		Domain::ALL.into_iter().map(|domain| self.registry(domain))
	}

	pub fn phase(&self) -> Phase {
		self.lifecycle.phase()
	}

	pub fn config(&self) -> &RegistryConfig {
		&self.config
	}

	/// Opens the catalog for registration and runs every collected
	/// [`Contribution`].
	pub fn load_contributions(&self) -> Result<(), RegistryError> {
		self.lifecycle.begin_loading();
		run_contributions(self)
	}

	/// Empties every registry and reopens the catalog for registration.
	pub fn reset(&self) {
		for registry in self.registries() {
			registry.clear();
		}
		self.lifecycle.begin_loading();
		tracing::debug!("registry database reset");
	}
}

static DB: OnceLock<RegistryDb> = OnceLock::new();

/// Returns the process-wide facade, creating it with the default
/// configuration and running contributions on first access.
pub fn get_db() -> &'static RegistryDb {
	DB.get_or_init(|| {
		let db = RegistryDb::new(RegistryConfig::default());
		if let Err(e) = db.load_contributions() {
			tracing::error!("Contribution loading failed: {}", e);
		}
		db
	})
}

/// Creates the process-wide facade with the default configuration.
pub fn init() -> Result<&'static RegistryDb, RegistryError> {
	init_with_config(RegistryConfig::default())
}

/// Creates the process-wide facade with `config` and runs contributions.
///
/// Fails with [`RegistryError::AlreadyInitialized`] if the facade already
/// exists (including when [`get_db`] created it lazily), and with the first
/// contribution error otherwise; the facade stays usable in that case.
pub fn init_with_config(config: RegistryConfig) -> Result<&'static RegistryDb, RegistryError> {
	let mut outcome = Err(RegistryError::AlreadyInitialized);
	let db = DB.get_or_init(|| {
		let db = RegistryDb::new(config);
		outcome = db.load_contributions();
		db
	});
	outcome.map(|()| db)
}

/// Loads configuration from a TOML file and creates the process-wide facade
/// with it.
pub fn init_from_path(path: &Path) -> Result<&'static RegistryDb, RegistryError> {
	let config = RegistryConfig::load(path)?;
	init_with_config(config)
}

/// Empties every registry of the process-wide facade and returns it to
/// [`Phase::Loading`]. Contributions are not re-run.
pub fn reset_for_testing() {
	get_db().reset();
}

pub static STAGES: LazyLock<&'static Registry> = LazyLock::new(|| &get_db().pipeline.stages);
pub static TRIGGERS: LazyLock<&'static Registry> = LazyLock::new(|| &get_db().pipeline.triggers);
pub static STRATEGIES: LazyLock<&'static Registry> =
	LazyLock::new(|| &get_db().pipeline.strategies);
pub static PRECONDITIONS: LazyLock<&'static Registry> =
	LazyLock::new(|| &get_db().pipeline.preconditions);
pub static NOTIFICATIONS: LazyLock<&'static Registry> = LazyLock::new(|| &get_db().notifications);
pub static CLOUD_PROVIDERS: LazyLock<&'static Registry> =
	LazyLock::new(|| &get_db().cloud_providers);

#[cfg(test)]
mod tests;
