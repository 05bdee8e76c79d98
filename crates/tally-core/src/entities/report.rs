use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::Metrics;
use crate::enums::InventoryType;

/// Snapshot of a session's metrics taken when it was finalized.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct SessionReport {
    pub session_id: String,
    pub session_name: String,
    pub inventory_type: InventoryType,
    pub finalized_at: DateTime<Utc>,
    pub metrics: Metrics,
}
