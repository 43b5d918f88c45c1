//! Projection benchmarks.
//!
//! Every display page re-sorts the whole loaded window, so cost grows with
//! the number of loaded chunks rather than with the page size.
//!
//! Run with: cargo bench

#![allow(missing_docs)] // criterion macros generate undocumented items

use chrono::{Duration, TimeZone, Utc};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use pagewise::model::PageSize;
use pagewise::projector::project;
use pagewise::{DisplayPage, Record, RecordId, SortDirection, SortSpec};

/// Loaded window of 25 chunks of 200 records.
const LOADED: usize = 5_000;

fn generate_loaded_window() -> Vec<Record> {
    let base = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).single();

    (0..LOADED)
        .map(|i| {
            // Scrambled order so the sort does real work.
            let scrambled = (i * 7919) % LOADED;
            let mut record = Record::new(RecordId::new(format!("user-{:05}", i)).expect("valid id"))
                .with_field("email", format!("user{:05}@example.com", scrambled))
                .with_field("score", scrambled as u64);
            if let Some(base) = base {
                record = record.with_created_at(base + Duration::minutes(scrambled as i64));
            }
            record
        })
        .collect()
}

fn benchmark_projection(c: &mut Criterion) {
    let records = generate_loaded_window();
    let size = PageSize::new(50).expect("non-zero");
    let last_page = DisplayPage::new((LOADED / 50) as u32).expect("non-zero");

    let by_text = SortSpec::new("email", SortDirection::Ascending);
    let by_number = SortSpec::new("score", SortDirection::Descending);
    let by_timestamp = SortSpec::new("created_at", SortDirection::Descending);

    c.bench_function("project_5000_text_sort", |b| {
        b.iter(|| {
            let projection = project(
                black_box(&records),
                LOADED as u64,
                DisplayPage::FIRST,
                size,
                black_box(&by_text),
            );
            black_box(projection)
        })
    });

    c.bench_function("project_5000_numeric_sort_last_page", |b| {
        b.iter(|| {
            let projection = project(
                black_box(&records),
                LOADED as u64,
                last_page,
                size,
                black_box(&by_number),
            );
            black_box(projection)
        })
    });

    c.bench_function("project_5000_timestamp_sort", |b| {
        b.iter(|| {
            let projection = project(
                black_box(&records),
                LOADED as u64,
                DisplayPage::FIRST,
                size,
                black_box(&by_timestamp),
            );
            black_box(projection)
        })
    });
}

criterion_group!(benches, benchmark_projection);
criterion_main!(benches);
