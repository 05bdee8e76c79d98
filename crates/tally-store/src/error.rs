//! Store error types for tally-store.

use tally_core::enums::{ControlStatus, EntityType};
use tally_core::errors::{CoreError, ReconcileError};
use thiserror::Error;

/// Errors from the inventory service and its trail.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The reconciliation core rejected the operation.
    #[error(transparent)]
    Reconcile(#[from] ReconcileError),

    /// A cross-cutting core failure (e.g. a disallowed status transition).
    #[error(transparent)]
    Core(#[from] CoreError),

    /// No session or assignment with this id.
    #[error("{entity} not found: {id}")]
    NotFound { entity: EntityType, id: String },

    /// The stored assignment changed between read and write.
    #[error(
        "Assignment {assignment_id} changed since it was read (expected {expected}, found {found})"
    )]
    StaleAssignment {
        assignment_id: String,
        expected: ControlStatus,
        found: ControlStatus,
    },

    /// Reading or writing a trail file failed, or a trail line is unusable.
    #[error("Trail error: {0}")]
    Trail(String),

    /// Invalid state encountered (e.g. an assignment filed under the wrong session).
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// Catch-all for unexpected errors.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl StoreError {
    pub(crate) fn session_not_found(id: &str) -> Self {
        Self::NotFound {
            entity: EntityType::Session,
            id: id.to_string(),
        }
    }

    pub(crate) fn assignment_not_found(id: &str) -> Self {
        Self::NotFound {
            entity: EntityType::Assignment,
            id: id.to_string(),
        }
    }

    /// The underlying reconciliation error, if any.
    #[must_use]
    pub const fn as_reconcile(&self) -> Option<&ReconcileError> {
        match self {
            Self::Reconcile(err) => Some(err),
            _ => None,
        }
    }
}
