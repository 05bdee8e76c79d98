//! # tally-engine
//!
//! The reconciliation core of Tally as a library of pure functions.
//!
//! - [`reconcile`]: extract rows → assignments, count entry, correction, validation
//! - [`metrics`]: per-status counts and accuracy over a set of assignments
//! - [`lifecycle`]: session finalization and the finalized-session guard
//!
//! Every operation takes values and returns new values. Nothing here holds
//! shared state, so callers may use it from any thread without locking. The
//! caller owns persistence and must serialize writes to the same assignment
//! (see `tally-store` for the compare-and-swap discipline).

pub mod lifecycle;
pub mod metrics;
pub mod reconcile;

pub use lifecycle::{ensure_mutable, finalize, report};
pub use metrics::{by_auditor, summarize};
pub use reconcile::{correct_count, create_assignments, parse_quantity, record_count, validate};
