use std::sync::atomic::Ordering;
use std::sync::Arc;

use super::common::*;
use crate::workflows::rating::domain::{AssignmentRow, RatingRow, SheetRecord};
use crate::workflows::rating::gateway::GatewayError;

#[test]
fn read_skips_the_header_and_defaults_missing_cells() {
    let sheets = Arc::new(MemorySheets::accepting(&["valid"]));
    sheets.seed_raw(
        "Assignments!A:C",
        vec![
            vec!["Assignment".into(), "Position".into(), "Item".into()],
            vec!["Round 12".into(), "Engineer".into(), "Backend".into()],
            vec!["Round 12".into()],
        ],
    );
    let gateway = gateway(sheets, Arc::new(StaticRefresher::yielding("valid")), "valid");

    let rows: Vec<AssignmentRow> = gateway.read("assignments").expect("read succeeds");

    assert_eq!(rows.len(), 2);
    assert_eq!(rows[1].assignment, "Round 12");
    assert_eq!(rows[1].position, "");
    assert_eq!(rows[1].item, "");
}

#[test]
fn read_drops_rows_with_unparsable_ratings() {
    let sheets = Arc::new(MemorySheets::accepting(&["valid"]));
    let mut matrix = vec![RatingRow::HEADER
        .iter()
        .map(|cell| cell.to_string())
        .collect::<Vec<_>>()];
    matrix.push(rating_row("a@x.com", "Jane", "Communication", 4).to_row());
    matrix.push(vec![
        "a@x.com".into(),
        "Jane".into(),
        "Engineer".into(),
        "Backend".into(),
        "Drive".into(),
        "nine".into(),
        "2026-08-01T09:00:00Z".into(),
    ]);
    sheets.seed_raw("Ratings!A:G", matrix);
    let gateway = gateway(sheets, Arc::new(StaticRefresher::yielding("valid")), "valid");

    let rows: Vec<RatingRow> = gateway.read("ratings").expect("read succeeds");

    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].competency, "Communication");
}

#[test]
fn write_sends_the_synthesized_header_and_every_record() {
    let sheets = Arc::new(MemorySheets::accepting(&["valid"]));
    let gateway = gateway(
        sheets.clone(),
        Arc::new(StaticRefresher::yielding("valid")),
        "valid",
    );

    gateway
        .write("assignments", &assignment_rows())
        .expect("write succeeds");

    let stored = sheets.stored("Assignments!A:C");
    assert_eq!(stored.len(), assignment_rows().len() + 1);
    assert_eq!(stored[0], vec!["Assignment", "Position", "Item"]);
    assert_eq!(stored[1], vec!["Round 12", "Engineer", "Backend"]);
}

#[test]
fn unknown_range_names_are_rejected() {
    let sheets = Arc::new(MemorySheets::accepting(&["valid"]));
    let gateway = gateway(sheets, Arc::new(StaticRefresher::yielding("valid")), "valid");

    let err = gateway
        .read::<AssignmentRow>("payroll")
        .expect_err("range is not configured");

    assert!(matches!(err, GatewayError::UnknownRange(name) if name == "payroll"));
}

#[test]
fn expired_token_triggers_exactly_one_refresh_and_retry() {
    let sheets = Arc::new(MemorySheets::accepting(&["fresh"]));
    sheets.seed("Assignments!A:C", &assignment_rows());
    let gateway = gateway(
        sheets.clone(),
        Arc::new(StaticRefresher::yielding("fresh")),
        "stale",
    );

    let rows: Vec<AssignmentRow> = gateway.read("assignments").expect("retry succeeds");

    assert_eq!(rows.len(), assignment_rows().len());
    assert_eq!(sheets.get_calls.load(Ordering::Relaxed), 2);
}

#[test]
fn failed_refresh_signs_the_caller_out() {
    let sheets = Arc::new(MemorySheets::accepting(&["fresh"]));
    sheets.seed("Assignments!A:C", &assignment_rows());
    let gateway = gateway(sheets.clone(), Arc::new(StaticRefresher::default()), "stale");

    let err = gateway
        .read::<AssignmentRow>("assignments")
        .expect_err("refresh fails");

    assert!(matches!(err, GatewayError::SignedOut));
    assert_eq!(sheets.get_calls.load(Ordering::Relaxed), 1);
}

#[test]
fn a_second_rejection_after_refresh_signs_the_caller_out() {
    let sheets = Arc::new(MemorySheets::accepting(&[]));
    let gateway = gateway(
        sheets.clone(),
        Arc::new(StaticRefresher::yielding("still-stale")),
        "stale",
    );

    let err = gateway
        .read::<AssignmentRow>("assignments")
        .expect_err("both tokens rejected");

    assert!(matches!(err, GatewayError::SignedOut));
    // One original call plus exactly one retry, never a third.
    assert_eq!(sheets.get_calls.load(Ordering::Relaxed), 2);
}
