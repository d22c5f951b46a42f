use pretty_assertions::assert_eq;
use serial_test::serial;

use super::*;
use crate::core::{Descriptor, RegisterError, Registered, Scope};

crate::contribution!("unit-test-cloud", |db| {
	db.cloud_providers.register(
		Descriptor::builder("unitTestCloud")
			.label("Unit Test Cloud")
			.description("Contributed through inventory")
			.source(crate::DescriptorSource::Crate("unit-test-cloud"))
			.build(),
	)?;
	Ok(())
});

crate::contribution!("unit-test-unsourced", |db| {
	db.cloud_providers.register(
		Descriptor::builder("unitTestUnsourced")
			.label("Unsourced Cloud")
			.description("Registered without an explicit source")
			.build(),
	)?;
	Ok(())
});

fn stage(key: &str, label: &str) -> Descriptor {
	Descriptor::builder(key)
		.label(label)
		.description(format!("{label} stage"))
		.build()
}

/// Each facade field is wired to the registry of its own domain.
#[test]
fn test_facade_exposes_every_domain() {
	let db = RegistryDb::new(RegistryConfig::default());
	for domain in Domain::ALL {
		assert_eq!(db.registry(domain).domain(), domain);
	}
	assert_eq!(db.registries().count(), Domain::ALL.len());
	assert_eq!(db.pipeline.strategies.domain(), Domain::Strategies);
	assert_eq!(db.cloud_providers.domain(), Domain::CloudProviders);
}

/// Uninitialized -> Loading on contribution load, Loading -> Ready on first read.
#[test]
fn test_lifecycle_transitions() {
	let db = RegistryDb::new(RegistryConfig::default());
	assert_eq!(db.phase(), Phase::Uninitialized);

	db.load_contributions().unwrap();
	assert_eq!(db.phase(), Phase::Loading);

	db.pipeline.stages.register(stage("bake", "Bake")).unwrap();
	assert_eq!(db.phase(), Phase::Loading);

	db.pipeline.stages.resolve("bake", &Scope::Global).unwrap();
	assert_eq!(db.phase(), Phase::Ready);
	assert_eq!(db.notifications.phase(), Phase::Ready, "lifecycle is shared");
}

/// A list call freezes the catalog just like resolve.
#[test]
fn test_list_freezes_catalog() {
	let db = RegistryDb::new(RegistryConfig::default());
	db.load_contributions().unwrap();
	let _ = db.notifications.list(None);
	assert_eq!(db.phase(), Phase::Ready);
}

/// Contributions submitted through inventory run against the facade.
#[test]
fn test_load_contributions_runs_submitted() {
	let db = RegistryDb::new(RegistryConfig::default());
	db.load_contributions().unwrap();

	let cloud = db
		.cloud_providers
		.resolve("unitTestCloud", &Scope::provider("anything"))
		.unwrap();
	assert_eq!(cloud.label(), "Unit Test Cloud");
	assert_eq!(cloud.source().to_string(), "crate:unit-test-cloud");
}

/// Descriptors without a source are attributed to the running contribution.
#[test]
fn test_contribution_stamps_missing_source() {
	let db = RegistryDb::new(RegistryConfig::default());
	db.load_contributions().unwrap();

	let stamped = db
		.cloud_providers
		.resolve("unitTestUnsourced", &Scope::Global)
		.unwrap();
	assert_eq!(stamped.source(), crate::DescriptorSource::Crate("unit-test-unsourced"));

	db.pipeline.stages.register(stage("bake", "Bake")).unwrap();
	assert_eq!(
		db.pipeline.stages.resolve("bake", &Scope::Global).unwrap().source(),
		crate::DescriptorSource::Builtin,
		"outside a contribution the default stays"
	);
}

/// A missing configuration file is reported before the facade is touched.
#[test]
fn test_init_from_missing_path_is_config_error() {
	let dir = tempfile::tempdir().unwrap();
	let err = init_from_path(&dir.path().join("registry.toml")).unwrap_err();
	assert!(matches!(err, RegistryError::Config(crate::ConfigError::Io { .. })), "got {err:?}");
}

#[test]
fn test_reset_empties_and_reopens() {
	let db = RegistryDb::new(RegistryConfig::default());
	db.load_contributions().unwrap();
	db.pipeline.stages.register(stage("bake", "Bake")).unwrap();
	db.pipeline.stages.resolve("bake", &Scope::Global).unwrap();
	assert_eq!(db.phase(), Phase::Ready);

	db.reset();

	assert_eq!(db.phase(), Phase::Loading);
	assert!(db.registries().all(Registry::is_empty));
	db.pipeline.stages.register(stage("bake", "Bake")).unwrap();
}

/// Hidden keys are skipped at registration and never resolvable.
#[test]
fn test_hidden_keys_from_config() {
	let config = RegistryConfig::default()
		.hide(Domain::Stages, "hiddenA")
		.hide(Domain::Stages, "hiddenB");
	let db = RegistryDb::new(config);
	db.load_contributions().unwrap();

	assert_eq!(
		db.pipeline.stages.register(stage("hiddenA", "Hidden A")).unwrap(),
		Registered::Hidden
	);
	assert_eq!(
		db.pipeline.stages.register(stage("hiddenB", "Hidden B")).unwrap(),
		Registered::Hidden
	);
	db.pipeline.stages.register(stage("bake", "Bake")).unwrap();

	assert!(db.pipeline.stages.resolve("hiddenA", &Scope::Global).is_err());
	assert_eq!(db.pipeline.stages.list(None).keys(), vec!["bake"]);
	assert!(
		db.pipeline
			.triggers
			.register(stage("hiddenA", "Not hidden here"))
			.unwrap()
			.descriptor()
			.is_some(),
		"hidden keys are per domain"
	);
}

/// In strict mode registration after the first read fails.
#[test]
fn test_strict_freeze_rejects_late_registration() {
	let db = RegistryDb::new(RegistryConfig::default().with_strict_freeze(true));
	db.load_contributions().unwrap();
	db.pipeline.stages.register(stage("bake", "Bake")).unwrap();
	db.pipeline.stages.resolve("bake", &Scope::Global).unwrap();

	let err = db.pipeline.strategies.register(stage("highlander", "Highlander")).unwrap_err();
	assert_eq!(
		err,
		RegisterError::Frozen {
			domain: Domain::Strategies,
			key: "highlander".into(),
		}
	);
	assert!(db.pipeline.strategies.is_empty());
}

/// Without strict mode late registration is accepted.
#[test]
fn test_late_registration_allowed_by_default() {
	let db = RegistryDb::new(RegistryConfig::default());
	db.load_contributions().unwrap();
	db.pipeline.stages.resolve("bake", &Scope::Global).unwrap_err();
	assert_eq!(db.phase(), Phase::Ready);

	db.pipeline.stages.register(stage("bake", "Bake")).unwrap();
	assert_eq!(
		db.pipeline.stages.resolve("bake", &Scope::Global).unwrap().label(),
		"Bake"
	);
}

/// The shared facade can be reset between test cases.
#[test]
#[serial]
fn test_global_reset_for_testing() {
	let _ = tracing_subscriber::fmt::try_init();
	reset_for_testing();
	assert_eq!(get_db().phase(), Phase::Loading);

	STAGES.register(stage("wait", "Wait")).unwrap();
	assert!(std::ptr::eq(*STAGES, &get_db().pipeline.stages));
	assert_eq!(STAGES.resolve("wait", &Scope::provider("aws")).unwrap().label(), "Wait");

	reset_for_testing();
	assert!(STAGES.is_empty());
	assert!(CLOUD_PROVIDERS.is_empty(), "contributions are not re-run");
	assert_eq!(get_db().phase(), Phase::Loading);
}

/// A second initialization is refused once the facade exists.
#[test]
#[serial]
fn test_init_after_get_db_is_refused() {
	let _ = get_db();
	assert!(matches!(init(), Err(RegistryError::AlreadyInitialized)));
	assert!(matches!(
		init_with_config(RegistryConfig::default().with_strict_freeze(true)),
		Err(RegistryError::AlreadyInitialized)
	));
	assert!(!get_db().config().strict_freeze);
}
