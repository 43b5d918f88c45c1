//! Tests for the display projector and record comparator.

use super::*;
use crate::model::RecordId;
use chrono::{TimeZone, Utc};
use serde_json::json;

fn record(id: &str) -> Record {
    Record::new(RecordId::new(id).expect("valid id"))
}

fn numbered(n: usize) -> Vec<Record> {
    (0..n)
        .map(|i| record(&format!("r{:04}", i)).with_field("seq", i as u64))
        .collect()
}

fn page(n: u32) -> DisplayPage {
    DisplayPage::new(n).expect("non-zero page")
}

fn size(n: u32) -> PageSize {
    PageSize::new(n).expect("non-zero size")
}

fn by_seq() -> SortSpec {
    SortSpec::new("seq", SortDirection::Ascending)
}

fn ids(records: &[Record]) -> Vec<&str> {
    records.iter().map(|r| r.id.as_str()).collect()
}

// ===== page_count =====

#[test]
fn page_count_rounds_up() {
    assert_eq!(page_count(460, size(50)), 10);
    assert_eq!(page_count(450, size(50)), 9);
    assert_eq!(page_count(1, size(50)), 1);
    assert_eq!(page_count(0, size(50)), 0);
}

// ===== page_bounds =====

#[test]
fn page_bounds_is_half_open_window() {
    assert_eq!(page_bounds(page(1), size(50), 460), 0..50);
    assert_eq!(page_bounds(page(5), size(50), 460), 200..250);
}

#[test]
fn page_bounds_clips_final_partial_page() {
    assert_eq!(page_bounds(page(10), size(50), 460), 450..460);
}

#[test]
fn page_bounds_past_end_is_empty() {
    let bounds = page_bounds(page(11), size(50), 460);
    assert!(bounds.is_empty(), "got: {:?}", bounds);
}

// ===== project =====

#[test]
fn project_returns_requested_slice() {
    let records = numbered(460);

    let projection = project(&records, 460, page(5), size(50), &by_seq());

    assert_eq!(projection.records.len(), 50);
    assert_eq!(projection.records[0].id.as_str(), "r0200");
    assert_eq!(projection.records[49].id.as_str(), "r0249");
    assert_eq!(projection.page_count, 10);
    assert_eq!(projection.total_count, 460);
}

#[test]
fn project_final_page_is_partial() {
    let records = numbered(460);

    let projection = project(&records, 460, page(10), size(50), &by_seq());

    assert_eq!(projection.records.len(), 10);
    assert_eq!(projection.records[0].id.as_str(), "r0450");
}

#[test]
fn page_count_uses_reported_total_not_loaded_length() {
    let records = numbered(200);

    let projection = project(&records, 460, page(1), size(50), &by_seq());

    assert_eq!(projection.page_count, 10);
}

#[test]
fn project_resorts_loaded_window() {
    let records = vec![
        record("b").with_field("name", "Bravo"),
        record("c").with_field("name", "charlie"),
        record("a").with_field("name", "alpha"),
    ];

    let projection = project(
        &records,
        3,
        page(1),
        size(10),
        &SortSpec::new("name", SortDirection::Ascending),
    );

    assert_eq!(ids(&projection.records), vec!["a", "b", "c"]);
    // Input left untouched
    assert_eq!(ids(&records), vec!["b", "c", "a"]);
}

// ===== compare_records =====

#[test]
fn descending_reverses_field_order() {
    let mut records = numbered(3);
    let sort = SortSpec::new("seq", SortDirection::Descending);

    records.sort_by(|a, b| compare_records(a, b, &sort));

    assert_eq!(ids(&records), vec!["r0002", "r0001", "r0000"]);
}

#[test]
fn ties_break_on_id_in_both_directions() {
    let mut records = vec![
        record("z").with_field("role", "admin"),
        record("m").with_field("role", "admin"),
        record("a").with_field("role", "admin"),
    ];

    for direction in [SortDirection::Ascending, SortDirection::Descending] {
        let sort = SortSpec::new("role", direction);
        records.sort_by(|a, b| compare_records(a, b, &sort));
        assert_eq!(ids(&records), vec!["a", "m", "z"], "direction: {:?}", direction);
    }
}

#[test]
fn missing_values_sort_last_in_both_directions() {
    let mut records = vec![
        record("none"),
        record("low").with_field("score", 1),
        record("null").with_field("score", json!(null)),
        record("high").with_field("score", 9),
    ];

    let asc = SortSpec::new("score", SortDirection::Ascending);
    records.sort_by(|a, b| compare_records(a, b, &asc));
    assert_eq!(ids(&records), vec!["low", "high", "none", "null"]);

    let desc = SortSpec::new("score", SortDirection::Descending);
    records.sort_by(|a, b| compare_records(a, b, &desc));
    assert_eq!(ids(&records), vec!["high", "low", "none", "null"]);
}

#[test]
fn created_at_sorts_by_timestamp() {
    let early = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    let late = Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap();
    let mut records = vec![
        record("old").with_created_at(early),
        record("new").with_created_at(late),
    ];

    let sort = SortSpec::new("created_at", SortDirection::Descending);
    records.sort_by(|a, b| compare_records(a, b, &sort));

    assert_eq!(ids(&records), vec!["new", "old"]);
}

#[test]
fn numbers_compare_numerically_not_lexically() {
    let mut records = vec![
        record("ten").with_field("n", 10),
        record("two").with_field("n", 2),
    ];

    records.sort_by(|a, b| compare_records(a, b, &SortSpec::new("n", SortDirection::Ascending)));

    assert_eq!(ids(&records), vec!["two", "ten"]);
}
