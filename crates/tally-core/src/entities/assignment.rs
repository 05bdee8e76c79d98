use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::Quantity;
use crate::enums::ControlStatus;

/// One extract row bound to one auditor, tracked from pending to a counted
/// outcome.
///
/// `expected_quantity`, `description`, `location_code` and `lot_id` are
/// snapshots of the originating extract row taken at creation time.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Assignment {
    pub id: String,
    pub session_id: String,
    pub auditor_id: String,
    pub material_id: String,
    pub description: String,
    pub location_code: String,
    pub lot_id: Option<String>,
    pub expected_quantity: Quantity,
    pub physical_quantity: Option<Quantity>,
    pub status: ControlStatus,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub controlled_at: Option<DateTime<Utc>>,
}

impl Assignment {
    /// `physical - expected`, or `None` while no count is recorded.
    #[must_use]
    pub fn discrepancy(&self) -> Option<Quantity> {
        self.physical_quantity.map(|physical| physical - self.expected_quantity)
    }

    #[must_use]
    pub const fn is_pending(&self) -> bool {
        matches!(self.status, ControlStatus::Pending)
    }

    /// Check the count/timestamp invariants:
    /// - a physical quantity is present iff the status carries a count
    /// - `controlled_at` is present iff a physical quantity is, and never
    ///   precedes `created_at`
    #[must_use]
    pub fn invariants_hold(&self) -> bool {
        let count_matches_status = self.physical_quantity.is_some() == self.status.has_count();
        let timestamp_matches_count = match (self.physical_quantity, self.controlled_at) {
            (Some(_), Some(controlled_at)) => controlled_at >= self.created_at,
            (None, None) => true,
            _ => false,
        };
        count_matches_status && timestamp_matches_count
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;
    use rust_decimal::Decimal;

    use super::*;

    fn pending() -> Assignment {
        Assignment {
            id: "asg-00000001".into(),
            session_id: "inv-00000001".into(),
            auditor_id: "ctrl01".into(),
            material_id: "MAT-100".into(),
            description: "Pallet wrap".into(),
            location_code: "A-01-02".into(),
            lot_id: None,
            expected_quantity: Decimal::from(100),
            physical_quantity: None,
            status: ControlStatus::Pending,
            notes: None,
            created_at: Utc::now(),
            controlled_at: None,
        }
    }

    #[test]
    fn pending_assignment_has_no_discrepancy() {
        let a = pending();
        assert_eq!(a.discrepancy(), None);
        assert!(a.invariants_hold());
    }

    #[test]
    fn discrepancy_is_physical_minus_expected() {
        let mut a = pending();
        a.physical_quantity = Some(Decimal::from(97));
        a.controlled_at = Some(a.created_at);
        a.status = ControlStatus::Error;
        assert_eq!(a.discrepancy(), Some(Decimal::from(-3)));
        assert!(a.invariants_hold());
    }

    #[test]
    fn count_without_status_breaks_invariants() {
        let mut a = pending();
        a.physical_quantity = Some(Decimal::from(100));
        a.controlled_at = Some(a.created_at);
        assert!(!a.invariants_hold());
    }

    #[test]
    fn controlled_before_created_breaks_invariants() {
        let mut a = pending();
        a.physical_quantity = Some(Decimal::from(100));
        a.status = ControlStatus::Controlled;
        a.controlled_at = Some(a.created_at - Duration::seconds(1));
        assert!(!a.invariants_hold());
    }
}
