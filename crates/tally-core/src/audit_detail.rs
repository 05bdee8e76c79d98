//! Typed before/after details for assignment and session changes.
//!
//! The engine returns new values instead of mutating in place; these types
//! capture the difference between the two for audit output.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::entities::{Assignment, Quantity};

/// A status change on an assignment or session.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct StatusChangedDetail {
    pub from: String,
    pub to: String,
    pub reason: Option<String>,
}

/// A recorded or corrected count.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct CountChangedDetail {
    pub expected: Quantity,
    pub previous: Option<Quantity>,
    pub current: Quantity,
    pub discrepancy: Quantity,
}

impl StatusChangedDetail {
    /// Diff the statuses of two versions of the same assignment.
    #[must_use]
    pub fn between(before: &Assignment, after: &Assignment) -> Self {
        Self {
            from: before.status.as_str().to_string(),
            to: after.status.as_str().to_string(),
            reason: after.notes.clone(),
        }
    }
}

impl CountChangedDetail {
    /// Diff the counts of two versions of the same assignment. `None` when
    /// `after` carries no count.
    #[must_use]
    pub fn between(before: &Assignment, after: &Assignment) -> Option<Self> {
        let current = after.physical_quantity?;
        Some(Self {
            expected: after.expected_quantity,
            previous: before.physical_quantity,
            current,
            discrepancy: current - after.expected_quantity,
        })
    }
}
