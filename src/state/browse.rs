//! Host-owned browse cache.

use crate::model::{ChunkIndex, Record};
use crate::orchestrator::{BackingList, ChunkStore, LoadedChunks};
use std::ops::RangeInclusive;

/// Long-lived cache of the unfiltered collection.
///
/// Owned by the host and kept across navigation. Lend it to an engine with
/// `&mut cache` for the length of one session; the engine writes to it only
/// while browsing.
#[derive(Debug, Clone, Default)]
pub struct BrowseCache {
    list: BackingList,
    requested: Option<RangeInclusive<ChunkIndex>>,
    current_chunk: Option<ChunkIndex>,
}

impl BrowseCache {
    /// Empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached records in backend order.
    pub fn records(&self) -> &[Record] {
        self.list.records()
    }

    /// Chunks merged into the cache.
    pub fn loaded_chunks(&self) -> LoadedChunks {
        self.list.loaded_chunks()
    }

    /// Most recent chunk range requested by an engine.
    pub fn requested_range(&self) -> Option<&RangeInclusive<ChunkIndex>> {
        self.requested.as_ref()
    }

    /// Last chunk merged, as tracked by the host.
    pub fn current_chunk(&self) -> Option<ChunkIndex> {
        self.current_chunk
    }

    /// Drop every cached record and the chunk bookkeeping.
    pub fn invalidate(&mut self) {
        self.list.clear();
        self.on_reset();
    }
}

impl ChunkStore for BrowseCache {
    fn backing(&self) -> &BackingList {
        &self.list
    }

    fn backing_mut(&mut self) -> &mut BackingList {
        &mut self.list
    }

    fn on_reset(&mut self) {
        self.requested = None;
        self.current_chunk = None;
    }

    fn on_chunks_requested(&mut self, range: RangeInclusive<ChunkIndex>) {
        self.requested = Some(range);
    }

    fn set_current_chunk(&mut self, chunk: ChunkIndex) {
        self.current_chunk = Some(chunk);
    }
}
