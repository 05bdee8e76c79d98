//! Metrics aggregation over assignments.

use std::collections::BTreeMap;

use tally_core::entities::{Assignment, Metrics};
use tally_core::enums::ControlStatus;

/// Count assignments per status and derive accuracy.
///
/// Accuracy is `(controlled + validated) / (controlled + error + validated)`
/// as a percentage, or 100 when nothing has been counted. The result depends
/// only on the multiset of statuses, never on input order.
pub fn summarize<'a>(assignments: impl IntoIterator<Item = &'a Assignment>) -> Metrics {
    let (mut pending, mut controlled, mut error, mut validated) = (0u32, 0u32, 0u32, 0u32);
    for assignment in assignments {
        match assignment.status {
            ControlStatus::Pending => pending += 1,
            ControlStatus::Controlled => controlled += 1,
            ControlStatus::Error => error += 1,
            ControlStatus::Validated => validated += 1,
        }
    }
    Metrics::from_counts(pending, controlled, error, validated)
}

/// [`summarize`] per assigned auditor.
pub fn by_auditor<'a>(
    assignments: impl IntoIterator<Item = &'a Assignment>,
) -> BTreeMap<String, Metrics> {
    let mut grouped: BTreeMap<&str, Vec<&Assignment>> = BTreeMap::new();
    for assignment in assignments {
        grouped
            .entry(assignment.auditor_id.as_str())
            .or_default()
            .push(assignment);
    }
    grouped
        .into_iter()
        .map(|(auditor, items)| (auditor.to_string(), summarize(items)))
        .collect()
}
