//! CLI response types returned as JSON by `tally` commands.

use std::collections::BTreeMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::audit_detail::{CountChangedDetail, StatusChangedDetail};
use crate::entities::{Assignment, Metrics, Session, SessionReport};

/// Response from `tally import`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct ImportResponse {
    pub session_id: String,
    pub auditor_id: String,
    pub assignments_created: u32,
    pub rows_rejected: u32,
    pub materials_with_extensions: u32,
}

/// Response from `tally assignment count|correct|validate`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct AssignmentChangeResponse {
    pub assignment: Assignment,
    pub status: StatusChangedDetail,
    pub count: Option<CountChangedDetail>,
}

/// Response from `tally metrics`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct SessionMetricsResponse {
    pub session: Session,
    pub metrics: Metrics,
    pub by_auditor: BTreeMap<String, Metrics>,
}

/// Response from `tally session finalize`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct FinalizeResponse {
    pub session: Session,
    pub report: SessionReport,
}

/// Response from `tally dashboard`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct DashboardResponse {
    pub active_sessions: u32,
    pub finalized_sessions: u32,
    pub counts_today: u32,
    pub accuracy: f64,
    pub open_alerts: u32,
}

/// Response from `tally rebuild`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct RebuildResponse {
    pub rebuilt: bool,
    pub trail_files: u32,
    pub operations_replayed: u32,
    pub entities_created: u32,
    pub duration_ms: u64,
}
