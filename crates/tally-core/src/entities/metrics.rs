use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Per-status counts and the accuracy derived from them.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct Metrics {
    pub pending: u32,
    pub controlled: u32,
    pub error: u32,
    pub validated: u32,
    /// Percentage in `0.0..=100.0`. 100 when nothing has been counted yet.
    pub accuracy: f64,
}

impl Default for Metrics {
    fn default() -> Self {
        Self {
            pending: 0,
            controlled: 0,
            error: 0,
            validated: 0,
            accuracy: 100.0,
        }
    }
}

impl Metrics {
    /// Build metrics from raw counts, deriving accuracy.
    #[must_use]
    pub fn from_counts(pending: u32, controlled: u32, error: u32, validated: u32) -> Self {
        let counted = controlled + error + validated;
        let accuracy = if counted == 0 {
            100.0
        } else {
            f64::from(controlled + validated) / f64::from(counted) * 100.0
        };
        Self {
            pending,
            controlled,
            error,
            validated,
            accuracy,
        }
    }

    #[must_use]
    pub const fn total(&self) -> u32 {
        self.pending + self.controlled + self.error + self.validated
    }

    /// Combine two sets of counts; accuracy is re-derived from the sums.
    #[must_use]
    pub fn merge(self, other: Self) -> Self {
        Self::from_counts(
            self.pending + other.pending,
            self.controlled + other.controlled,
            self.error + other.error,
            self.validated + other.validated,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_counts_are_fully_accurate() {
        assert_eq!(Metrics::from_counts(0, 0, 0, 0), Metrics::default());
        assert!((Metrics::from_counts(5, 0, 0, 0).accuracy - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn merge_rederives_accuracy() {
        let a = Metrics::from_counts(0, 1, 1, 0);
        let b = Metrics::from_counts(2, 2, 0, 0);
        let merged = a.merge(b);
        assert_eq!(merged.total(), 6);
        assert!((merged.accuracy - 75.0).abs() < 1e-9);
    }
}
