//! Serde roundtrip and JsonSchema validation tests for all entity types.

use std::collections::BTreeMap;

use chrono::Utc;
use rust_decimal::Decimal;
use schemars::schema_for;
use tally_core::audit_detail::{CountChangedDetail, StatusChangedDetail};
use tally_core::entities::*;
use tally_core::enums::*;
use tally_core::responses::*;
use tally_core::trail::TrailOperation;

/// Validate a JSON value against a schemars-generated schema.
fn validate_against_schema(
    schema: &serde_json::Value,
    instance: &serde_json::Value,
) -> Vec<String> {
    let validator = jsonschema::validator_for(schema).expect("schema should be valid");
    validator
        .iter_errors(instance)
        .map(|e| format!("{e}"))
        .collect()
}

macro_rules! roundtrip_and_validate {
    ($name:ident, $ty:ty, $instance:expr) => {
        #[test]
        fn $name() {
            let val: $ty = $instance;

            // Serde roundtrip
            let json_str = serde_json::to_string_pretty(&val).unwrap();
            let recovered: $ty = serde_json::from_str(&json_str).unwrap();
            assert_eq!(
                recovered,
                val,
                "serde roundtrip failed for {}",
                stringify!($ty)
            );

            // Schema validation
            let schema = serde_json::to_value(schema_for!($ty)).unwrap();
            let instance = serde_json::to_value(&val).unwrap();
            let errors = validate_against_schema(&schema, &instance);
            assert!(
                errors.is_empty(),
                "Schema validation failed for {}: {:?}",
                stringify!($ty),
                errors
            );
        }
    };
}

fn sample_session() -> Session {
    Session {
        id: "inv-a3f8b2c1".into(),
        name: "March wall-to-wall".into(),
        inventory_type: InventoryType::W2w,
        created_by: "admin".into(),
        created_at: Utc::now(),
        status: SessionStatus::Active,
        item_count: 3,
        finalized_at: None,
    }
}

fn sample_assignment() -> Assignment {
    let now = Utc::now();
    Assignment {
        id: "asg-c4e2d1f0".into(),
        session_id: "inv-a3f8b2c1".into(),
        auditor_id: "ctrl01".into(),
        material_id: "MAT-100".into(),
        description: "Stretch film 500mm".into(),
        location_code: "A-01-02".into(),
        lot_id: Some("L2026-03".into()),
        expected_quantity: Decimal::from(100),
        physical_quantity: Some(Decimal::new(975, 1)),
        status: ControlStatus::Error,
        notes: Some("two rolls damaged".into()),
        created_at: now,
        controlled_at: Some(now),
    }
}

roundtrip_and_validate!(session_roundtrip, Session, sample_session());

roundtrip_and_validate!(
    finalized_session_roundtrip,
    Session,
    Session {
        status: SessionStatus::Finalized,
        finalized_at: Some(Utc::now()),
        ..sample_session()
    }
);

roundtrip_and_validate!(assignment_roundtrip, Assignment, sample_assignment());

roundtrip_and_validate!(
    pending_assignment_roundtrip,
    Assignment,
    Assignment {
        physical_quantity: None,
        status: ControlStatus::Pending,
        notes: None,
        controlled_at: None,
        lot_id: None,
        ..sample_assignment()
    }
);

roundtrip_and_validate!(
    extract_row_roundtrip,
    ExtractRow,
    ExtractRow {
        material_id: "MAT-200".into(),
        description: "Cable ties".into(),
        expected_quantity: Decimal::from(50),
        location_code: "B-02-01".into(),
        lot_id: None,
    }
);

roundtrip_and_validate!(extension_attributes_roundtrip, ExtensionAttributes, {
    let mut ext = ExtensionAttributes::default();
    ext.insert("MAT-200", "plant", "1000");
    ext.insert("MAT-200", "storage_bin", "02-01");
    ext
});

roundtrip_and_validate!(
    metrics_roundtrip,
    Metrics,
    Metrics::from_counts(1, 3, 1, 0)
);

roundtrip_and_validate!(
    session_report_roundtrip,
    SessionReport,
    SessionReport {
        session_id: "inv-a3f8b2c1".into(),
        session_name: "March wall-to-wall".into(),
        inventory_type: InventoryType::W2w,
        finalized_at: Utc::now(),
        metrics: Metrics::from_counts(0, 3, 1, 0),
    }
);

roundtrip_and_validate!(
    trail_operation_roundtrip,
    TrailOperation,
    TrailOperation {
        v: 1,
        ts: "2026-03-01T08:00:00+00:00".into(),
        ses: "inv-a3f8b2c1".into(),
        op: TrailOp::Create,
        entity: EntityType::Session,
        id: "inv-a3f8b2c1".into(),
        data: serde_json::json!({"name": "March wall-to-wall"}),
    }
);

// --- Response types ---

roundtrip_and_validate!(
    import_response_roundtrip,
    ImportResponse,
    ImportResponse {
        session_id: "inv-a3f8b2c1".into(),
        auditor_id: "ctrl01".into(),
        assignments_created: 3,
        rows_rejected: 1,
        materials_with_extensions: 2,
    }
);

roundtrip_and_validate!(
    assignment_change_roundtrip,
    AssignmentChangeResponse,
    AssignmentChangeResponse {
        assignment: sample_assignment(),
        status: StatusChangedDetail {
            from: "pending".into(),
            to: "error".into(),
            reason: None,
        },
        count: Some(CountChangedDetail {
            expected: Decimal::from(100),
            previous: None,
            current: Decimal::new(975, 1),
            discrepancy: Decimal::new(-25, 1),
        }),
    }
);

roundtrip_and_validate!(
    session_metrics_roundtrip,
    SessionMetricsResponse,
    SessionMetricsResponse {
        session: sample_session(),
        metrics: Metrics::from_counts(0, 3, 1, 0),
        by_auditor: BTreeMap::from([("ctrl01".to_string(), Metrics::from_counts(0, 3, 1, 0))]),
    }
);

roundtrip_and_validate!(
    dashboard_roundtrip,
    DashboardResponse,
    DashboardResponse {
        active_sessions: 2,
        finalized_sessions: 5,
        counts_today: 42,
        accuracy: 98.5,
        open_alerts: 3,
    }
);

roundtrip_and_validate!(
    rebuild_response_roundtrip,
    RebuildResponse,
    RebuildResponse {
        rebuilt: true,
        trail_files: 3,
        operations_replayed: 150,
        entities_created: 45,
        duration_ms: 230,
    }
);

// --- Schema rejection tests ---

#[test]
fn schema_rejects_assignment_without_material() {
    let schema = serde_json::to_value(schema_for!(Assignment)).unwrap();
    let mut instance = serde_json::to_value(sample_assignment()).unwrap();
    instance.as_object_mut().unwrap().remove("material_id");
    let errors = validate_against_schema(&schema, &instance);
    assert!(
        !errors.is_empty(),
        "Should reject assignment without 'material_id'"
    );
}

#[test]
fn schema_rejects_invalid_status_value() {
    let schema = serde_json::to_value(schema_for!(Assignment)).unwrap();
    let mut instance = serde_json::to_value(sample_assignment()).unwrap();
    instance["status"] = serde_json::json!("recounted");
    let errors = validate_against_schema(&schema, &instance);
    assert!(!errors.is_empty(), "Should reject invalid status value");
}
