//! Error types shared across Tally crates.
//!
//! `ReconcileError` is the closed taxonomy returned by the reconciliation
//! engine and the session guard. Every variant is a local validation failure
//! the caller can recover from. `CoreError` covers cross-cutting failures
//! (lookups, generic validation) raised outside the engine.

use thiserror::Error;

/// Failures of the reconciliation core. Each engine operation returns exactly
/// one of these on failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReconcileError {
    /// The import batch repeats a material id.
    #[error("Duplicate material '{material_id}' in import batch")]
    DuplicateRow { material_id: String },

    /// A quantity is negative or not a number.
    #[error("Invalid quantity '{value}': must be a non-negative number")]
    InvalidQuantity { value: String },

    /// An extract row is structurally unusable (e.g. empty material id).
    #[error("Invalid extract row: {reason}")]
    InvalidRow { reason: String },

    /// A count was already recorded for this assignment.
    #[error("Assignment {assignment_id} already has a recorded count")]
    AlreadyControlled { assignment_id: String },

    /// A correction was attempted before any count was recorded.
    #[error("Assignment {assignment_id} has no recorded count to correct")]
    NotControlled { assignment_id: String },

    /// Validation was attempted on a pending assignment.
    #[error("Assignment {assignment_id} is still pending and cannot be validated")]
    NotReady { assignment_id: String },

    /// The assignment is validated; no further transitions are allowed.
    #[error("Assignment {assignment_id} is already validated")]
    AlreadyValidated { assignment_id: String },

    /// The session still has pending assignments.
    #[error("Session {session_id} has {pending} pending assignment(s)")]
    IncompleteInventory { session_id: String, pending: usize },

    /// The session is finalized; its assignments are immutable.
    #[error("Session {session_id} is finalized")]
    SessionFinalized { session_id: String },
}

impl ReconcileError {
    /// Stable machine-readable code for the orchestrating layer.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::DuplicateRow { .. } => "duplicate_row",
            Self::InvalidQuantity { .. } => "invalid_quantity",
            Self::InvalidRow { .. } => "invalid_row",
            Self::AlreadyControlled { .. } => "already_controlled",
            Self::NotControlled { .. } => "not_controlled",
            Self::NotReady { .. } => "not_ready",
            Self::AlreadyValidated { .. } => "already_validated",
            Self::IncompleteInventory { .. } => "incomplete_inventory",
            Self::SessionFinalized { .. } => "session_finalized",
        }
    }
}

/// Errors that can be raised by any Tally crate.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A state machine transition was attempted that is not allowed.
    #[error("Invalid state transition: {entity_type} {id} from {from} to {to}")]
    InvalidTransition {
        entity_type: String,
        id: String,
        from: String,
        to: String,
    },

    /// Data failed validation (schema, format, constraints).
    #[error("Validation error: {0}")]
    Validation(String),

    /// Catch-all for unexpected errors.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
