//! The full control cycle of one session: import, count, summarize, finalize.

use chrono::Utc;
use pretty_assertions::assert_eq;
use rust_decimal::Decimal;
use tally_core::entities::{ExtractRow, Session};
use tally_core::enums::{ControlStatus, InventoryType, SessionStatus};
use tally_core::ids::SequentialIds;
use tally_engine::{create_assignments, finalize, record_count, report, summarize, validate};

fn row(material: &str, qty: i64) -> ExtractRow {
    ExtractRow {
        material_id: material.into(),
        description: String::new(),
        expected_quantity: Decimal::from(qty),
        location_code: "W1".into(),
        lot_id: None,
    }
}

fn session() -> Session {
    Session {
        id: "inv-s".into(),
        name: "S".into(),
        inventory_type: InventoryType::General,
        created_by: "admin".into(),
        created_at: Utc::now(),
        status: SessionStatus::Active,
        item_count: 0,
        finalized_at: None,
    }
}

#[test]
fn three_rows_two_matches_one_error() {
    let session = session();
    let mut ids = SequentialIds::default();
    let created = create_assignments(
        &session.id,
        "ctrl01",
        &[row("A", 100), row("B", 50), row("C", 0)],
        &mut ids,
        Utc::now(),
    )
    .unwrap();
    assert_eq!(created.len(), 3);
    assert!(created.iter().all(|a| a.status == ControlStatus::Pending));

    // Pending work blocks finalize.
    assert_eq!(
        finalize(&session, &created, Utc::now()).unwrap_err().code(),
        "incomplete_inventory"
    );

    let counts = [100, 45, 0];
    let counted: Vec<_> = created
        .iter()
        .zip(counts)
        .map(|(a, q)| record_count(a, Decimal::from(q), None, Utc::now()).unwrap())
        .collect();

    let statuses: Vec<_> = counted.iter().map(|a| a.status).collect();
    assert_eq!(
        statuses,
        vec![
            ControlStatus::Controlled,
            ControlStatus::Error,
            ControlStatus::Controlled
        ]
    );

    let metrics = summarize(&counted);
    assert_eq!(
        (metrics.pending, metrics.controlled, metrics.error, metrics.validated),
        (0, 2, 1, 0)
    );
    assert!((metrics.accuracy - 66.7).abs() < 0.05);

    let closed = finalize(&session, &counted, Utc::now()).unwrap();
    assert_eq!(closed.status, SessionStatus::Finalized);

    let snapshot = report(&closed, &counted).unwrap();
    assert_eq!(snapshot.metrics, metrics);
}

#[test]
fn validating_everything_keeps_accuracy_honest() {
    let mut ids = SequentialIds::default();
    let created =
        create_assignments("inv-s", "ctrl01", &[row("A", 10), row("B", 10)], &mut ids, Utc::now())
            .unwrap();
    let validated: Vec<_> = created
        .iter()
        .zip([10, 9])
        .map(|(a, q)| {
            let counted = record_count(a, Decimal::from(q), None, Utc::now()).unwrap();
            validate(&counted).unwrap()
        })
        .collect();

    let metrics = summarize(&validated);
    assert_eq!(metrics.validated, 2);
    // Validation is acknowledgment: both validated rows count as accurate.
    assert!((metrics.accuracy - 100.0).abs() < f64::EPSILON);
    assert_eq!(validated[1].discrepancy(), Some(Decimal::from(-1)));
}
