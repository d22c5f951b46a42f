//! Bootstrap/freeze lifecycle shared by the registries of one facade.
//!
//! There is no reliable "all contributions loaded" signal, so the first read
//! (`resolve` or `list`) is treated as the freeze point.

use std::sync::atomic::{AtomicU8, Ordering};

use super::domain::Domain;

/// Catalog lifecycle phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Phase {
	/// Facade allocated, contributions not yet run.
	Uninitialized = 0,
	/// Accepting registrations.
	Loading = 1,
	/// First read happened; the catalog is assumed stable.
	Ready = 2,
}

impl Phase {
	fn from_u8(raw: u8) -> Self {
		match raw {
			0 => Self::Uninitialized,
			1 => Self::Loading,
			_ => Self::Ready,
		}
	}
}

#[derive(Debug)]
pub struct Lifecycle {
	phase: AtomicU8,
}

impl Lifecycle {
	pub const fn new() -> Self {
		Self {
			phase: AtomicU8::new(Phase::Uninitialized as u8),
		}
	}

	/// A lifecycle that already accepts registrations.
	pub const fn loading() -> Self {
		Self {
			phase: AtomicU8::new(Phase::Loading as u8),
		}
	}

	pub fn phase(&self) -> Phase {
		Phase::from_u8(self.phase.load(Ordering::Acquire))
	}

	pub(crate) fn begin_loading(&self) {
		self.phase.store(Phase::Loading as u8, Ordering::Release);
	}

	/// Moves to [`Phase::Ready`]; only the first caller logs the transition.
	pub(crate) fn mark_ready(&self, domain: Domain) {
		let prev = self.phase.swap(Phase::Ready as u8, Ordering::AcqRel);
		if prev != Phase::Ready as u8 {
			tracing::debug!(%domain, "capability catalog frozen on first read");
		}
	}
}

impl Default for Lifecycle {
	fn default() -> Self {
		Self::new()
	}
}
