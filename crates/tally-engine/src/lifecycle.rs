//! Session lifecycle guard.
//!
//! The engine's assignment functions are session-agnostic; callers run
//! [`ensure_mutable`] on the owning session before any of them.

use chrono::{DateTime, Utc};
use tally_core::entities::{Assignment, Session, SessionReport};
use tally_core::enums::SessionStatus;
use tally_core::errors::ReconcileError;

use crate::metrics::summarize;

/// Fail if the session no longer accepts assignment changes.
///
/// # Errors
///
/// Returns `SessionFinalized` for a finalized session.
pub fn ensure_mutable(session: &Session) -> Result<(), ReconcileError> {
    if session.is_finalized() {
        return Err(ReconcileError::SessionFinalized {
            session_id: session.id.clone(),
        });
    }
    Ok(())
}

/// Close a session. Only assignments carrying the session's id are considered.
///
/// # Errors
///
/// - `SessionFinalized` if the session is already finalized
/// - `IncompleteInventory` if any of its assignments is still pending
pub fn finalize(
    session: &Session,
    assignments: &[Assignment],
    now: DateTime<Utc>,
) -> Result<Session, ReconcileError> {
    if !session.status.can_transition_to(SessionStatus::Finalized) {
        return Err(ReconcileError::SessionFinalized {
            session_id: session.id.clone(),
        });
    }

    let pending = assignments
        .iter()
        .filter(|a| a.session_id == session.id && a.is_pending())
        .count();
    if pending > 0 {
        return Err(ReconcileError::IncompleteInventory {
            session_id: session.id.clone(),
            pending,
        });
    }

    Ok(Session {
        status: SessionStatus::Finalized,
        finalized_at: Some(now.max(session.created_at)),
        ..session.clone()
    })
}

/// Snapshot the metrics of a finalized session. `None` while it is active.
#[must_use]
pub fn report(session: &Session, assignments: &[Assignment]) -> Option<SessionReport> {
    let finalized_at = session.finalized_at.filter(|_| session.is_finalized())?;
    Some(SessionReport {
        session_id: session.id.clone(),
        session_name: session.name.clone(),
        inventory_type: session.inventory_type,
        finalized_at,
        metrics: summarize(assignments.iter().filter(|a| a.session_id == session.id)),
    })
}
