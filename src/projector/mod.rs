//! Display Projector.
//!
//! Slices the active backing list into one display page and derives the
//! page count from the backend-reported total. Display pages are sized
//! independently of upstream chunks.
//!
//! The loaded portion is re-sorted with [`compare_records`] on every
//! projection. This only orders the loaded window: records beyond the last
//! loaded chunk are not considered, so the result can disagree with the
//! backend's global order across that boundary.

use crate::model::{DisplayPage, PageSize, Record, SortDirection, SortSpec};
use serde_json::Value;
use std::cmp::Ordering;
use std::ops::Range;

// ===== Projection =====

/// One display page of records plus pagination totals.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Projection {
    /// The page that was projected.
    pub page: DisplayPage,
    /// Records on the page, at most one display page size.
    pub records: Vec<Record>,
    /// Last total reported by the backend for the active query.
    pub total_count: u64,
    /// `ceil(total_count / display size)`.
    pub page_count: u32,
}

impl Projection {
    /// True when the page holds no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Number of display pages for `total_count` records.
pub fn page_count(total_count: u64, size: PageSize) -> u32 {
    let pages = total_count.div_ceil(size.as_u64());
    u32::try_from(pages).unwrap_or(u32::MAX)
}

/// Half-open index range `[(D-1)*S, D*S)` clipped to `len`.
pub fn page_bounds(page: DisplayPage, size: PageSize, len: usize) -> Range<usize> {
    let size = size.get() as usize;
    let start = (page.get() as usize - 1).saturating_mul(size).min(len);
    let end = start.saturating_add(size).min(len);
    start..end
}

/// Project display page `page` out of `records`.
///
/// `records` is sorted by `sort` before slicing; the input is not modified.
pub fn project(
    records: &[Record],
    total_count: u64,
    page: DisplayPage,
    size: PageSize,
    sort: &SortSpec,
) -> Projection {
    let mut ordered: Vec<&Record> = records.iter().collect();
    ordered.sort_by(|a, b| compare_records(a, b, sort));

    let bounds = page_bounds(page, size, ordered.len());
    let records = ordered[bounds].iter().map(|r| (*r).clone()).collect();

    Projection {
        page,
        records,
        total_count,
        page_count: page_count(total_count, size),
    }
}

// ===== Sorting =====

/// Comparable view of one record field.
#[derive(Debug, PartialEq)]
enum SortKey<'a> {
    Bool(bool),
    Number(f64),
    Text(&'a str),
    Timestamp(i64),
}

impl SortKey<'_> {
    fn rank(&self) -> u8 {
        match self {
            SortKey::Bool(_) => 0,
            SortKey::Number(_) => 1,
            SortKey::Timestamp(_) => 2,
            SortKey::Text(_) => 3,
        }
    }

    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (SortKey::Bool(a), SortKey::Bool(b)) => a.cmp(b),
            (SortKey::Number(a), SortKey::Number(b)) => a.total_cmp(b),
            (SortKey::Timestamp(a), SortKey::Timestamp(b)) => a.cmp(b),
            (SortKey::Text(a), SortKey::Text(b)) => compare_text(a, b),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

/// Case-insensitive, falling back to byte order so distinct strings never tie.
fn compare_text(a: &str, b: &str) -> Ordering {
    let folded = a
        .chars()
        .flat_map(char::to_lowercase)
        .cmp(b.chars().flat_map(char::to_lowercase));
    folded.then_with(|| a.cmp(b))
}

fn sort_key<'a>(record: &'a Record, field: &str) -> Option<SortKey<'a>> {
    match field {
        "id" => return Some(SortKey::Text(record.id.as_str())),
        "created_at" | "createdAt" => {
            return record
                .created_at
                .map(|t| SortKey::Timestamp(t.timestamp_micros()))
        }
        "updated_at" | "updatedAt" => {
            return record
                .updated_at
                .map(|t| SortKey::Timestamp(t.timestamp_micros()))
        }
        _ => {}
    }

    match record.field(field)? {
        Value::Null => None,
        Value::Bool(b) => Some(SortKey::Bool(*b)),
        Value::Number(n) => n.as_f64().map(SortKey::Number),
        Value::String(s) => Some(SortKey::Text(s)),
        // Arrays and objects have no meaningful order
        Value::Array(_) | Value::Object(_) => None,
    }
}

/// The single record comparator used by every consumer.
///
/// - Values compare by type-appropriate order (text case-insensitively).
/// - Records missing the field sort after all others in either direction.
/// - Ties break on record id ascending, so the order is total.
pub fn compare_records(a: &Record, b: &Record, sort: &SortSpec) -> Ordering {
    let by_field = match (sort_key(a, &sort.field), sort_key(b, &sort.field)) {
        (Some(ka), Some(kb)) => {
            let ord = ka.cmp(&kb);
            match sort.direction {
                SortDirection::Ascending => ord,
                SortDirection::Descending => ord.reverse(),
            }
        }
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    };
    by_field.then_with(|| a.id.cmp(&b.id))
}

#[cfg(test)]
#[path = "projector_tests.rs"]
mod tests;
