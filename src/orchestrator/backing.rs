//! Backing lists and their loaded-chunk bookkeeping.

use crate::model::{ChunkIndex, QueryShape, Record, RecordId};
use crate::source::PageResponse;
use std::collections::HashSet;
use std::ops::RangeInclusive;
use thiserror::Error;

// ===== LoadedChunks =====

/// Set of upstream chunks merged into a backing list.
///
/// Chunks are only ever appended in ascending order starting at 1, so the
/// set is fully described by its highest index and can never contain gaps.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadedChunks {
    last: Option<ChunkIndex>,
}

impl LoadedChunks {
    /// No chunks loaded.
    pub fn new() -> Self {
        Self::default()
    }

    /// Highest loaded chunk, if any.
    pub fn last(&self) -> Option<ChunkIndex> {
        self.last
    }

    /// Highest loaded chunk number, 0 when empty.
    pub fn last_number(&self) -> u32 {
        self.last.map_or(0, ChunkIndex::get)
    }

    /// The only chunk that may be recorded next.
    pub fn next(&self) -> ChunkIndex {
        self.last.map_or(ChunkIndex::FIRST, ChunkIndex::next)
    }

    /// True when no chunk is loaded.
    pub fn is_empty(&self) -> bool {
        self.last.is_none()
    }

    /// Number of loaded chunks.
    pub fn len(&self) -> usize {
        self.last_number() as usize
    }

    /// True when `chunk` has been merged.
    pub fn contains(&self, chunk: ChunkIndex) -> bool {
        self.last.is_some_and(|last| chunk <= last)
    }

    /// Loaded chunk numbers, ascending.
    pub fn numbers(&self) -> RangeInclusive<u32> {
        1..=self.last_number()
    }

    /// Record `chunk` as loaded. Only the next chunk in sequence is accepted.
    pub fn record(&mut self, chunk: ChunkIndex) -> Result<(), ChunkOutOfOrder> {
        let expected = self.next();
        if chunk != expected {
            return Err(ChunkOutOfOrder {
                expected,
                actual: chunk,
            });
        }
        self.last = Some(chunk);
        Ok(())
    }

    /// Forget every loaded chunk.
    pub fn clear(&mut self) {
        self.last = None;
    }
}

/// Attempt to merge a chunk that is not next in sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("Chunk {actual} merged out of order (expected chunk {expected})")]
pub struct ChunkOutOfOrder {
    /// The chunk that may be merged next.
    pub expected: ChunkIndex,
    /// The chunk that was offered.
    pub actual: ChunkIndex,
}

// ===== BackingList =====

/// Records loaded for one query shape, chunk by chunk.
///
/// # Invariants
/// - Every record id appears at most once.
/// - `len() <= loaded_chunks().len() * chunk size`; only the last chunk, or
///   records removed locally, make it shorter.
/// - Content belongs to `shape()`; a different shape must call `reset` first.
#[derive(Debug, Clone, Default)]
pub struct BackingList {
    records: Vec<Record>,
    ids: HashSet<RecordId>,
    chunks: LoadedChunks,
    total_count: Option<u64>,
    shape: Option<QueryShape>,
}

impl BackingList {
    /// Empty list with no shape.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loaded records in merge order.
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Number of loaded records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// True when no records are loaded.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Chunks merged so far.
    pub fn loaded_chunks(&self) -> LoadedChunks {
        self.chunks
    }

    /// Last total reported by the backend, `None` before the first response.
    pub fn reported_total(&self) -> Option<u64> {
        self.total_count
    }

    /// Total to paginate against: the reported total, or the loaded length
    /// when nothing has been reported yet.
    pub fn total_count(&self) -> u64 {
        self.total_count.unwrap_or(self.records.len() as u64)
    }

    /// Shape the content was fetched under.
    pub fn shape(&self) -> Option<&QueryShape> {
        self.shape.as_ref()
    }

    /// True when the content was fetched under `shape`.
    pub fn holds(&self, shape: &QueryShape) -> bool {
        self.shape.as_ref() == Some(shape)
    }

    /// Drop all content and bind the list to `shape`.
    pub fn reset(&mut self, shape: QueryShape) {
        self.clear();
        self.shape = Some(shape);
    }

    /// Drop all content and the shape.
    pub fn clear(&mut self) {
        self.records.clear();
        self.ids.clear();
        self.chunks.clear();
        self.total_count = None;
        self.shape = None;
    }

    /// Refresh the reported total without merging records.
    pub fn set_total(&mut self, total_count: u64) {
        self.total_count = Some(total_count);
    }

    /// Append one chunk response.
    ///
    /// Records whose id is already present are skipped. The reported total
    /// is refreshed from the response. Returns the number of records added.
    pub fn merge_chunk(
        &mut self,
        chunk: ChunkIndex,
        response: PageResponse,
    ) -> Result<usize, ChunkOutOfOrder> {
        self.chunks.record(chunk)?;
        self.total_count = Some(response.total_count);

        let before = self.records.len();
        for record in response.records {
            if self.ids.insert(record.id.clone()) {
                self.records.push(record);
            }
        }
        Ok(self.records.len() - before)
    }

    /// Remove the record with `id` and decrement the reported total.
    ///
    /// Returns false, changing nothing, when the id is not loaded. Loaded
    /// chunks stay recorded, so the list ends one record short of the
    /// chunks it claims until it is refetched.
    pub fn remove(&mut self, id: &RecordId) -> bool {
        if !self.ids.remove(id) {
            return false;
        }
        self.records.retain(|r| &r.id != id);
        if let Some(total) = self.total_count.as_mut() {
            *total = total.saturating_sub(1);
        }
        true
    }

    /// True when a record with `id` is loaded.
    pub fn contains(&self, id: &RecordId) -> bool {
        self.ids.contains(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{SortDirection, SortSpec};

    fn chunk(n: u32) -> ChunkIndex {
        ChunkIndex::new(n).expect("non-zero chunk")
    }

    fn id(raw: &str) -> RecordId {
        RecordId::new(raw).expect("valid id")
    }

    fn response(ids: &[&str], total_count: u64) -> PageResponse {
        PageResponse {
            records: ids.iter().map(|raw| Record::new(id(raw))).collect(),
            total_count,
        }
    }

    // ===== LoadedChunks =====

    #[test]
    fn loaded_chunks_accepts_only_next_in_sequence() {
        let mut chunks = LoadedChunks::new();

        assert_eq!(
            chunks.record(chunk(2)),
            Err(ChunkOutOfOrder {
                expected: chunk(1),
                actual: chunk(2)
            })
        );
        assert!(chunks.record(chunk(1)).is_ok());
        assert!(chunks.record(chunk(1)).is_err(), "Re-recording is rejected");
        assert!(chunks.record(chunk(2)).is_ok());

        assert_eq!(chunks.numbers().collect::<Vec<_>>(), vec![1, 2]);
        assert!(chunks.contains(chunk(1)));
        assert!(!chunks.contains(chunk(3)));
    }

    #[test]
    fn loaded_chunks_clear_restarts_at_one() {
        let mut chunks = LoadedChunks::new();
        chunks.record(chunk(1)).unwrap();

        chunks.clear();

        assert!(chunks.is_empty());
        assert_eq!(chunks.next(), chunk(1));
        assert_eq!(chunks.last_number(), 0);
    }

    // ===== BackingList =====

    #[test]
    fn merge_skips_duplicate_ids() {
        let mut list = BackingList::new();
        list.merge_chunk(chunk(1), response(&["a", "b"], 4)).unwrap();

        // Backend shifted: "b" shows up again at the top of chunk 2.
        let added = list.merge_chunk(chunk(2), response(&["b", "c"], 4)).unwrap();

        assert_eq!(added, 1);
        let ids: Vec<&str> = list.records().iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
    }

    #[test]
    fn merge_refreshes_reported_total() {
        let mut list = BackingList::new();
        list.merge_chunk(chunk(1), response(&["a"], 10)).unwrap();
        list.merge_chunk(chunk(2), response(&["b"], 12)).unwrap();

        assert_eq!(list.reported_total(), Some(12));
    }

    #[test]
    fn merge_out_of_order_changes_nothing() {
        let mut list = BackingList::new();

        assert!(list.merge_chunk(chunk(2), response(&["a"], 1)).is_err());

        assert!(list.is_empty());
        assert_eq!(list.reported_total(), None);
    }

    #[test]
    fn remove_present_id_decrements_total() {
        let mut list = BackingList::new();
        list.merge_chunk(chunk(1), response(&["a", "b"], 7)).unwrap();

        assert!(list.remove(&id("a")));

        assert_eq!(list.total_count(), 6);
        assert!(!list.contains(&id("a")));
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn remove_absent_id_is_noop() {
        let mut list = BackingList::new();
        list.merge_chunk(chunk(1), response(&["a"], 7)).unwrap();

        assert!(!list.remove(&id("zzz")));

        assert_eq!(list.total_count(), 7);
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn reset_binds_new_shape_and_drops_content() {
        let sort = SortSpec::new("name", SortDirection::Ascending);
        let mut list = BackingList::new();
        list.reset(QueryShape::browse(sort.clone()));
        list.merge_chunk(chunk(1), response(&["a"], 1)).unwrap();

        let searched = QueryShape::new("x", "", sort);
        list.reset(searched.clone());

        assert!(list.is_empty());
        assert!(list.loaded_chunks().is_empty());
        assert_eq!(list.reported_total(), None);
        assert!(list.holds(&searched));
    }
}
