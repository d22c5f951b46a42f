//! Per-domain registry index.
//!
//! # Purpose
//!
//! The `index` subsystem owns the descriptors of one domain and answers
//! `resolve` and `list` queries against them.
//!
//! # Mental Model
//!
//! 1. **Registration:** [`Registry::register`] validates a descriptor, checks it
//!    against the current [`Snapshot`] for key and alias conflicts, and
//!    publishes an extended snapshot.
//! 2. **Resolution:** [`Registry::resolve`] loads the current snapshot and picks
//!    the specific entry, the global entry, or a merge of both.
//! 3. **Listing:** [`Registry::list`] returns a [`Listing`] that recomputes its
//!    label-ordered contents on every iteration.
//!
//! # Concurrency
//!
//! - **Reads:** Wait-free (atomic load of the current snapshot).
//! - **Writes:** Serialized by a per-registry mutex around check-and-publish.
//!
//! # Invariants
//!
//! - Must reject a duplicate `(key, scope)` without touching the stored entry.
//!   - Enforced in: `Snapshot::check_conflicts`, [`Registry::register`].
//!   - Failure symptom: one provider's capability silently shadows another's.
//!
//! - Must resolve by specificity, never by recency.
//!   - Enforced in: `Snapshot::resolve_key`.
//!   - Failure symptom: results depend on module load order.

mod listing;
mod resolve;
mod runtime;
mod snapshot;

pub use listing::Listing;
pub use runtime::{Registered, Registry};
pub use snapshot::Snapshot;
