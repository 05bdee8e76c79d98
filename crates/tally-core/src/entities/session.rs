use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::{InventoryType, SessionStatus};

/// A named count campaign. Owns the assignments that carry its id.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Session {
    pub id: String,
    pub name: String,
    pub inventory_type: InventoryType,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
    pub status: SessionStatus,
    /// Number of assignments in the session; maintained by the store.
    pub item_count: u32,
    pub finalized_at: Option<DateTime<Utc>>,
}

impl Session {
    #[must_use]
    pub const fn is_finalized(&self) -> bool {
        matches!(self.status, SessionStatus::Finalized)
    }
}
