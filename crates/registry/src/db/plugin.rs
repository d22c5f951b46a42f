use std::cell::Cell;

use super::RegistryDb;
use crate::core::{RegisterError, RegistryError};

/// A provider module's registration entrypoint.
///
/// Provider crates submit one of these through [`crate::contribution!`] (or
/// `inventory::submit!` directly); the facade runs every submitted
/// contribution once while the catalog is loading. Contributions never see
/// each other, only the facade. Descriptors registered without an explicit
/// source are attributed to the contribution by name.
pub struct Contribution {
	/// Name used in logs and errors, conventionally the provider crate name.
	pub name: &'static str,
	/// Called with the facade to register descriptors.
	pub register: fn(&RegistryDb) -> Result<(), RegisterError>,
}

inventory::collect!(Contribution);

impl Contribution {
	pub const fn new(
		name: &'static str,
		register: fn(&RegistryDb) -> Result<(), RegisterError>,
	) -> Self {
		Self { name, register }
	}
}

/// Submits a [`Contribution`] from a provider crate.
///
/// ```ignore
/// deckhand_registry::contribution!("aws", |db| {
///     db.pipeline.strategies.register(
///         Descriptor::builder("highlander")
///             .provider("aws")
///             .label("Highlander")
///             .description("Destroys previous server groups")
///             .build(),
///     )?;
///     Ok(())
/// });
/// ```
#[macro_export]
macro_rules! contribution {
	($name:expr, $register:expr) => {
		$crate::inventory::submit! {
			$crate::db::Contribution::new($name, $register)
		}
	};
}

thread_local! {
	static ACTIVE: Cell<Option<&'static str>> = const { Cell::new(None) };
}

/// Name of the contribution currently running on this thread, if any.
pub(crate) fn active_contribution() -> Option<&'static str> {
	ACTIVE.with(Cell::get)
}

/// Marks a contribution as running until dropped.
struct ActiveGuard {
	prev: Option<&'static str>,
}

impl ActiveGuard {
	fn enter(name: &'static str) -> Self {
		Self {
			prev: ACTIVE.with(|active| active.replace(Some(name))),
		}
	}
}

impl Drop for ActiveGuard {
	fn drop(&mut self) {
		ACTIVE.with(|active| active.set(self.prev));
	}
}

/// Runs every collected contribution against `db`, in name order.
///
/// A failing contribution is logged and does not stop the others; the first
/// failure is returned.
pub fn run_contributions(db: &RegistryDb) -> Result<(), RegistryError> {
	let mut contributions: Vec<&'static Contribution> =
		inventory::iter::<Contribution>.into_iter().collect();
	contributions.sort_by(|a, b| a.name.cmp(b.name));

	let mut first_err = None;
	for contribution in contributions {
		tracing::debug!(contribution = contribution.name, "running contribution");
		let outcome = {
			let _active = ActiveGuard::enter(contribution.name);
			(contribution.register)(db)
		};
		if let Err(source) = outcome {
			tracing::error!(contribution = contribution.name, error = %source, "contribution failed");
			first_err.get_or_insert(RegistryError::Contribution {
				name: contribution.name,
				source,
			});
		}
	}

	match first_err {
		Some(err) => Err(err),
		None => Ok(()),
	}
}
