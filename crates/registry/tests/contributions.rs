//! End-to-end catalog assembled from independent provider contributions.

use std::sync::LazyLock;

use deckhand_registry::{
	CapabilityHandle, Descriptor, DescriptorSource, Domain, Phase, RegisterError, RegistryConfig,
	RegistryDb, Scope,
};
use pretty_assertions::assert_eq;

const CONFIG: &str = r#"
strict_freeze = true

[hidden]
stages = ["legacyRollback"]
"#;

/// Behavior handed out by the core contribution.
struct ExecutionDetails(&'static str);

fn described(key: &str, label: &str, source: &'static str) -> deckhand_registry::DescriptorBuilder {
	Descriptor::builder(key)
		.label(label)
		.description(format!("{label} ({source})"))
		.source(DescriptorSource::Crate(source))
}

deckhand_registry::contribution!("core", |db| {
	let stages = &db.pipeline.stages;
	stages.register(
		described("destroyService", "Destroy Service", "core")
			.behavior(CapabilityHandle::new(ExecutionDetails("destroy-service")))
			.build(),
	)?;
	stages.register(described("wait", "Wait", "core").strategy_eligible().build())?;
	stages.register(described("legacyRollback", "Legacy Rollback", "core").build())?;

	let strategies = &db.pipeline.strategies;
	strategies.register(described("none", "None", "core").build())?;
	strategies.register(described("highlander", "Highlander", "core").build())?;
	strategies.register(described("rollingpush", "Rolling Push", "core").build())?;

	db.pipeline
		.triggers
		.register(described("cron", "CRON", "core").build())?;
	db.pipeline
		.preconditions
		.register(described("expression", "Expression", "core").build())?;

	db.notifications
		.register(described("email", "Email", "core").build())?;
	db.notifications.register(
		described("githubStatus", "GitHub Status", "core")
			.provider_restricted()
			.build(),
	)?;
	Ok(())
});

deckhand_registry::contribution!("aws", |db| {
	let strategies = &db.pipeline.strategies;
	strategies.register(described("none", "AWS None", "aws").provider("aws").build())?;
	strategies.register(described("redblack", "Red/Black", "aws").provider("aws").build())?;
	strategies.register(described("custom", "Custom", "aws").provider("aws").build())?;
	db.cloud_providers
		.register(described("aws", "Amazon", "aws").build())?;
	Ok(())
});

deckhand_registry::contribution!("titus", |db| {
	db.pipeline.stages.register(
		Descriptor::builder("destroyService")
			.provider("titus")
			.label("Destroy Job")
			.uses_base_provider()
			.source(DescriptorSource::Crate("titus"))
			.build(),
	)?;
	db.cloud_providers
		.register(described("titus", "Titus", "titus").build())?;
	Ok(())
});

deckhand_registry::contribution!("gcp", |db| {
	db.pipeline.stages.register(
		described("disableCluster", "Disable Cluster", "gcp")
			.provider("gcp")
			.strategy_eligible()
			.build(),
	)?;
	db.cloud_providers
		.register(described("gcp", "Google", "gcp").build())?;
	Ok(())
});

deckhand_registry::contribution!("slack", |db| {
	db.notifications
		.register(described("slack", "Slack", "slack").provider("slack").build())?;
	Ok(())
});

static DB: LazyLock<&'static RegistryDb> = LazyLock::new(|| {
	let _ = tracing_subscriber::fmt().with_test_writer().try_init();
	let config = RegistryConfig::from_toml_str(CONFIG).unwrap();
	deckhand_registry::init_with_config(config).unwrap()
});

#[test]
fn test_contributions_populate_every_domain() {
	let db = *DB;
	for domain in Domain::ALL {
		assert!(!db.registry(domain).is_empty(), "{domain} is empty");
	}
	assert!(std::ptr::eq(*deckhand_registry::STRATEGIES, &db.pipeline.strategies));
}

#[test]
fn test_scope_specificity_across_providers() {
	let strategies = &DB.pipeline.strategies;
	assert_eq!(strategies.resolve("none", &Scope::provider("aws")).unwrap().label(), "AWS None");
	assert_eq!(strategies.resolve("none", &Scope::provider("gcp")).unwrap().label(), "None");
	assert_eq!(DB.phase(), Phase::Ready);
}

/// The titus override carries its own label and the core behavior.
#[test]
fn test_base_provider_merge_across_contributions() {
	let stages = &DB.pipeline.stages;
	let base = stages.resolve("destroyService", &Scope::Global).unwrap();
	let titus = stages.resolve("destroyService", &Scope::provider("titus")).unwrap();

	assert_eq!(titus.label(), "Destroy Job");
	assert_eq!(titus.description(), "Destroy Service (core)");
	assert_eq!(titus.source(), DescriptorSource::Crate("titus"));
	assert_eq!(titus.behavior(), base.behavior());
	let details = titus
		.behavior()
		.and_then(|b| b.downcast_ref::<ExecutionDetails>())
		.unwrap();
	assert_eq!(details.0, "destroy-service");
}

#[test]
fn test_list_orders_by_label() {
	let labels: Vec<String> = DB
		.pipeline
		.strategies
		.list(Some(&Scope::provider("aws")))
		.iter()
		.map(|d| d.label().to_string())
		.collect();
	assert_eq!(labels, vec!["AWS None", "Custom", "Highlander", "Red/Black", "Rolling Push"]);
}

#[test]
fn test_provider_restricted_notifications() {
	let notifications = &DB.notifications;
	assert_eq!(
		notifications.list(Some(&Scope::provider("slack"))).keys(),
		vec!["email", "slack"]
	);
	assert_eq!(
		notifications.list(Some(&Scope::Global)).keys(),
		vec!["email", "githubStatus"]
	);
}

#[test]
fn test_strategy_eligible_stages() {
	let stages = &DB.pipeline.stages;
	assert_eq!(
		stages.list(Some(&Scope::provider("gcp"))).strategy_eligible().keys(),
		vec!["disableCluster", "wait"]
	);
	assert_eq!(
		stages.list(Some(&Scope::provider("aws"))).strategy_eligible().keys(),
		vec!["wait"]
	);
}

#[test]
fn test_unresolved_lookup_is_recoverable() {
	let err = DB
		.pipeline
		.strategies
		.resolve("doesNotExist", &Scope::provider("aws"))
		.unwrap_err();
	assert_eq!(err.key, "doesNotExist");
	assert!(DB.pipeline.strategies.resolve("highlander", &Scope::provider("aws")).is_ok());
}

#[test]
fn test_hidden_key_from_config_is_absent() {
	assert!(DB.pipeline.stages.get("legacyRollback", &Scope::Global).is_none());
	assert!(!DB.pipeline.stages.list(None).keys().contains(&"legacyRollback".to_string()));
}

/// Strict mode turns registration after the first read into an error.
#[test]
fn test_late_registration_rejected_when_strict() {
	let triggers = &DB.pipeline.triggers;
	triggers.resolve("cron", &Scope::Global).unwrap();

	let err = triggers
		.register(described("webhook", "Webhook", "late").build())
		.unwrap_err();
	assert!(matches!(err, RegisterError::Frozen { domain: Domain::Triggers, .. }));
	assert!(triggers.get("webhook", &Scope::Global).is_none());
}

#[test]
fn test_providers_and_scopes_for_destroy_service() {
	let stages = &DB.pipeline.stages;
	let providers: Vec<String> = stages
		.providers_for("destroyService")
		.iter()
		.map(|d| d.scope().to_string())
		.collect();
	assert_eq!(providers, vec!["titus"]);

	let candidates = [Scope::provider("aws"), Scope::provider("gcp")];
	assert_eq!(
		stages.scopes_for("disableCluster", &candidates),
		vec![Scope::provider("gcp")]
	);
}
