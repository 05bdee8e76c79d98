//! JSONL trail operation envelope.
//!
//! Every mutation in Tally is recorded as a `TrailOperation` in per-session
//! `.tally/trail/{session_id}.jsonl` files. Store state is rebuildable from
//! these trail files.
//!
//! The `v` field supports schema versioning: trail lines without a `v` field
//! deserialize with `v == 1` via `#[serde(default)]`.

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::{EntityType, TrailOp};

/// Current trail schema version.
pub const TRAIL_VERSION: u32 = 1;

const fn default_trail_version() -> u32 {
    1
}

/// A single operation recorded in the JSONL trail.
///
/// `data` always holds the full entity state after the operation, so replay
/// is a matter of upserting it.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct TrailOperation {
    /// Schema version. Defaults to 1 for trails without this field.
    #[serde(default = "default_trail_version")]
    pub v: u32,

    /// RFC 3339 timestamp of the operation.
    pub ts: String,

    /// Inventory session the operation belongs to.
    pub ses: String,

    /// What kind of mutation this represents.
    pub op: TrailOp,

    /// Which entity type was affected.
    pub entity: EntityType,

    /// ID of the affected entity.
    pub id: String,

    /// Entity state after the operation.
    pub data: serde_json::Value,
}

impl TrailOperation {
    /// Build an operation carrying `entity_state` as its payload.
    ///
    /// # Errors
    ///
    /// Returns `serde_json::Error` if the entity cannot be serialized.
    pub fn record<T: Serialize>(
        ts: DateTime<Utc>,
        session_id: &str,
        op: TrailOp,
        entity: EntityType,
        id: &str,
        entity_state: &T,
    ) -> Result<Self, serde_json::Error> {
        Ok(Self {
            v: TRAIL_VERSION,
            ts: ts.to_rfc3339(),
            ses: session_id.to_string(),
            op,
            entity,
            id: id.to_string(),
            data: serde_json::to_value(entity_state)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trail_op_roundtrip() {
        let op = TrailOperation {
            v: 1,
            ts: "2026-02-08T12:00:00Z".to_string(),
            ses: "inv-a3f8b2c1".to_string(),
            op: TrailOp::Count,
            entity: EntityType::Assignment,
            id: "asg-deadbeef".to_string(),
            data: serde_json::json!({"physical_quantity": "97"}),
        };

        let json = serde_json::to_string(&op).unwrap();
        let recovered: TrailOperation = serde_json::from_str(&json).unwrap();
        assert_eq!(recovered, op);
    }

    #[test]
    fn trail_op_default_version() {
        let json = r#"{"ts":"2026-01-01T00:00:00Z","ses":"inv-00000000","op":"create","entity":"session","id":"inv-00000000","data":{}}"#;
        let op: TrailOperation = serde_json::from_str(json).unwrap();
        assert_eq!(op.v, 1);
    }

    #[test]
    fn record_serializes_entity_state() {
        let ts = DateTime::parse_from_rfc3339("2026-03-01T08:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        let op = TrailOperation::record(
            ts,
            "inv-1",
            TrailOp::Transition,
            EntityType::Session,
            "inv-1",
            &serde_json::json!({"status": "finalized"}),
        )
        .unwrap();
        assert_eq!(op.v, TRAIL_VERSION);
        assert_eq!(op.ts, "2026-03-01T08:00:00+00:00");
        assert_eq!(op.data["status"], "finalized");
    }
}
