//! Reconciliation engine: assignments from extract rows and the control
//! lifecycle of a single assignment.
//!
//! ```text
//! pending --record_count(match)----> controlled --validate--> validated
//! pending --record_count(mismatch)-> error      --validate--> validated
//! controlled/error --correct_count--> controlled/error
//! ```
//!
//! Discrepancy policy is exact match: a count equal to the expected quantity
//! is `controlled`, anything else is `error`.

use std::collections::HashSet;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use tally_core::entities::{Assignment, ExtractRow, Quantity};
use tally_core::enums::ControlStatus;
use tally_core::errors::ReconcileError;
use tally_core::ids::{IdGenerator, PREFIX_ASSIGNMENT};

/// Turn one import batch into pending assignments for `auditor_id`.
///
/// The whole batch is checked before any id is drawn, so a rejected batch
/// consumes nothing from `ids`.
///
/// # Errors
///
/// - `InvalidRow` if a material id is blank
/// - `DuplicateRow` if a material id repeats within `rows`
/// - `InvalidQuantity` if an expected quantity is negative
pub fn create_assignments(
    session_id: &str,
    auditor_id: &str,
    rows: &[ExtractRow],
    ids: &mut impl IdGenerator,
    now: DateTime<Utc>,
) -> Result<Vec<Assignment>, ReconcileError> {
    let mut seen = HashSet::with_capacity(rows.len());
    for row in rows {
        if row.material_id.trim().is_empty() {
            return Err(ReconcileError::InvalidRow {
                reason: "material id is empty".into(),
            });
        }
        if !seen.insert(row.material_id.as_str()) {
            return Err(ReconcileError::DuplicateRow {
                material_id: row.material_id.clone(),
            });
        }
        ensure_non_negative(row.expected_quantity)?;
    }

    Ok(rows
        .iter()
        .map(|row| Assignment {
            id: ids.next_id(PREFIX_ASSIGNMENT),
            session_id: session_id.to_string(),
            auditor_id: auditor_id.to_string(),
            material_id: row.material_id.clone(),
            description: row.description.clone(),
            location_code: row.location_code.clone(),
            lot_id: row.lot_id.clone(),
            expected_quantity: row.expected_quantity,
            physical_quantity: None,
            status: ControlStatus::Pending,
            notes: None,
            created_at: now,
            controlled_at: None,
        })
        .collect())
}

/// Record the first physical count on a pending assignment.
///
/// Returns the updated assignment; `assignment` is left untouched so the
/// caller can diff before and after.
///
/// # Errors
///
/// - `InvalidQuantity` if `physical_quantity` is negative
/// - `AlreadyValidated` if the assignment is validated
/// - `AlreadyControlled` if a count is already recorded
pub fn record_count(
    assignment: &Assignment,
    physical_quantity: Quantity,
    notes: Option<&str>,
    now: DateTime<Utc>,
) -> Result<Assignment, ReconcileError> {
    ensure_non_negative(physical_quantity)?;
    if assignment.status == ControlStatus::Validated {
        return Err(ReconcileError::AlreadyValidated {
            assignment_id: assignment.id.clone(),
        });
    }
    if assignment.physical_quantity.is_some() || assignment.status != ControlStatus::Pending {
        return Err(ReconcileError::AlreadyControlled {
            assignment_id: assignment.id.clone(),
        });
    }

    Ok(Assignment {
        physical_quantity: Some(physical_quantity),
        status: outcome(assignment.expected_quantity, physical_quantity),
        notes: notes.map(str::to_string).or_else(|| assignment.notes.clone()),
        controlled_at: Some(now.max(assignment.created_at)),
        ..assignment.clone()
    })
}

/// Replace the count of a controlled or errored assignment.
///
/// The status is re-evaluated against the expected quantity. The original
/// `controlled_at` is kept: it marks the first count only.
///
/// # Errors
///
/// - `InvalidQuantity` if `physical_quantity` is negative
/// - `AlreadyValidated` if the assignment is validated
/// - `NotControlled` if no count has been recorded yet
pub fn correct_count(
    assignment: &Assignment,
    physical_quantity: Quantity,
    notes: Option<&str>,
) -> Result<Assignment, ReconcileError> {
    ensure_non_negative(physical_quantity)?;
    match assignment.status {
        ControlStatus::Validated => Err(ReconcileError::AlreadyValidated {
            assignment_id: assignment.id.clone(),
        }),
        ControlStatus::Pending => Err(ReconcileError::NotControlled {
            assignment_id: assignment.id.clone(),
        }),
        ControlStatus::Controlled | ControlStatus::Error => Ok(Assignment {
            physical_quantity: Some(physical_quantity),
            status: outcome(assignment.expected_quantity, physical_quantity),
            notes: notes.map(str::to_string).or_else(|| assignment.notes.clone()),
            ..assignment.clone()
        }),
    }
}

/// Acknowledge a counted assignment. Validation records acknowledgment, not
/// correctness: errored assignments validate directly.
///
/// # Errors
///
/// - `NotReady` if the assignment is pending
/// - `AlreadyValidated` if it is already validated
pub fn validate(assignment: &Assignment) -> Result<Assignment, ReconcileError> {
    match assignment.status {
        ControlStatus::Pending => Err(ReconcileError::NotReady {
            assignment_id: assignment.id.clone(),
        }),
        ControlStatus::Validated => Err(ReconcileError::AlreadyValidated {
            assignment_id: assignment.id.clone(),
        }),
        ControlStatus::Controlled | ControlStatus::Error => Ok(Assignment {
            status: ControlStatus::Validated,
            ..assignment.clone()
        }),
    }
}

/// Parse a user- or file-supplied quantity.
///
/// # Errors
///
/// Returns `InvalidQuantity` for non-numeric or negative input.
pub fn parse_quantity(raw: &str) -> Result<Quantity, ReconcileError> {
    let trimmed = raw.trim();
    let value = Decimal::from_str(trimmed).map_err(|_| ReconcileError::InvalidQuantity {
        value: raw.to_string(),
    })?;
    ensure_non_negative(value)?;
    Ok(value)
}

fn outcome(expected: Quantity, physical: Quantity) -> ControlStatus {
    if physical == expected {
        ControlStatus::Controlled
    } else {
        ControlStatus::Error
    }
}

fn ensure_non_negative(quantity: Quantity) -> Result<(), ReconcileError> {
    if quantity.is_sign_negative() && !quantity.is_zero() {
        return Err(ReconcileError::InvalidQuantity {
            value: quantity.to_string(),
        });
    }
    Ok(())
}
