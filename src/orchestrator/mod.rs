//! Fetch Orchestrator.
//!
//! Decides, for a requested display page, whether the active backing list
//! already holds enough records and, if not, fetches exactly the missing
//! upstream chunks in ascending order, one at a time.
//!
//! # Algorithm
//!
//! 1. `required = D * S`, clamped to the reported total once one is known.
//! 2. `required <= len` is a cache hit: no request is issued.
//! 3. Otherwise `target = ceil(required / C)` and chunks
//!    `last_loaded + 1 ..= target` are fetched sequentially. Each response is
//!    merged and its chunk recorded before the next request goes out. The
//!    loop ends early on a short or empty chunk, or once the reported total
//!    is loaded.
//! 4. A page beyond `ceil(total / S)` is never fetched.
//!
//! A failure stops the loop. Merged chunks stay recorded, the failing one
//! does not, so repeating the request resumes exactly at the failure.

pub mod backing;

pub use backing::{BackingList, ChunkOutOfOrder, LoadedChunks};

use crate::model::{ChunkIndex, DisplayPage, EngineError, PageSize, QueryShape};
use crate::params::ParamBuilder;
use crate::projector::page_count;
use crate::source::DataSource;
use std::ops::RangeInclusive;
use tracing::{debug, warn};

// ===== ChunkStore =====

/// Owner of a backing list that the orchestrator fills.
///
/// The engine's own search results implement this directly. A host that
/// keeps a long-lived browse cache implements it to receive its bookkeeping
/// callbacks while the engine fills the cache.
pub trait ChunkStore {
    /// The backing list.
    fn backing(&self) -> &BackingList;

    /// The backing list, mutably.
    fn backing_mut(&mut self) -> &mut BackingList;

    /// Called after the backing list was reset for a new query shape.
    fn on_reset(&mut self) {}

    /// Called once before a chunk range is fetched.
    fn on_chunks_requested(&mut self, _range: RangeInclusive<ChunkIndex>) {}

    /// Called after each chunk is merged.
    fn set_current_chunk(&mut self, _chunk: ChunkIndex) {}
}

impl ChunkStore for BackingList {
    fn backing(&self) -> &BackingList {
        self
    }

    fn backing_mut(&mut self) -> &mut BackingList {
        self
    }
}

impl<T: ChunkStore + ?Sized> ChunkStore for &mut T {
    fn backing(&self) -> &BackingList {
        (**self).backing()
    }

    fn backing_mut(&mut self) -> &mut BackingList {
        (**self).backing_mut()
    }

    fn on_reset(&mut self) {
        (**self).on_reset()
    }

    fn on_chunks_requested(&mut self, range: RangeInclusive<ChunkIndex>) {
        (**self).on_chunks_requested(range)
    }

    fn set_current_chunk(&mut self, chunk: ChunkIndex) {
        (**self).set_current_chunk(chunk)
    }
}

// ===== Planning =====

/// What a display-page request needs from upstream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchPlan {
    /// Enough records are loaded already.
    CacheHit,
    /// The page lies beyond the last page of the reported total.
    PastEnd,
    /// The target chunk is already loaded but the list is short, e.g. after
    /// local removals. Nothing to fetch.
    AlreadyLoaded,
    /// Fetch this chunk range, in order.
    Fetch(RangeInclusive<ChunkIndex>),
}

/// Decide what is needed to serve `page` out of `list`.
///
/// Local removals shrink the list without unloading chunks, so a page near
/// the end of the loaded window can be served short while `page_count`
/// still reports more records. The gap closes when the list is refetched.
pub fn plan_fetch(
    list: &BackingList,
    page: DisplayPage,
    display_size: PageSize,
    chunk_size: PageSize,
) -> FetchPlan {
    let mut required = u64::from(page.get()) * display_size.as_u64();

    if let Some(total) = list.reported_total() {
        if page.get() > page_count(total, display_size) {
            return FetchPlan::PastEnd;
        }
        required = required.min(total);
    }

    if required <= list.len() as u64 {
        return FetchPlan::CacheHit;
    }

    let target = required.div_ceil(chunk_size.as_u64());
    let current = list.loaded_chunks();
    if u64::from(current.last_number()) >= target {
        return FetchPlan::AlreadyLoaded;
    }

    let last = u32::try_from(target)
        .ok()
        .and_then(|n| ChunkIndex::new(n).ok());
    match last {
        Some(last) => FetchPlan::Fetch(current.next()..=last),
        None => FetchPlan::PastEnd,
    }
}

// ===== Filling =====

/// Everything needed to fill a backing list for one display page.
#[derive(Debug, Clone, Copy)]
pub struct FillRequest<'a> {
    /// Query the list must hold.
    pub shape: &'a QueryShape,
    /// Display page to make servable.
    pub page: DisplayPage,
    /// Display page size S.
    pub display_size: PageSize,
    /// Upstream chunk size C.
    pub chunk_size: PageSize,
    /// Builder for request parameters.
    pub params: &'a ParamBuilder,
    /// Filter tag handed to the extra-parameter derivation.
    ///
    /// Must be the tag `shape` was committed with; a different tag would
    /// merge responses to a different query into the same list.
    pub extras_filter: &'a str,
}

/// Result of a successful fill.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FillOutcome {
    /// No request was needed.
    CacheHit,
    /// The page is beyond the reported total; no request was issued.
    PastEnd,
    /// The needed chunks were already loaded; no request was issued.
    AlreadyLoaded,
    /// Chunks were fetched and merged.
    Fetched {
        /// First chunk merged.
        first: ChunkIndex,
        /// Last chunk merged.
        last: ChunkIndex,
    },
    /// The backend ran out of records before any chunk could be merged.
    Exhausted,
}

/// Make `request.page` servable from `store`.
///
/// A store holding a different query shape is reset first, restarting from
/// chunk 1. Chunks are requested strictly one after another.
///
/// # Errors
///
/// `EngineError::Network` when the first chunk of the range fails,
/// `EngineError::PartialLoad` when a later one does.
pub async fn fill<T, S>(
    store: &mut T,
    source: &S,
    request: FillRequest<'_>,
) -> Result<FillOutcome, EngineError>
where
    T: ChunkStore + ?Sized,
    S: DataSource + ?Sized,
{
    if !store.backing().holds(request.shape) {
        debug!(shape = ?request.shape, "Query shape changed, invalidating backing list");
        store.backing_mut().reset(request.shape.clone());
        store.on_reset();
    }

    let range = match plan_fetch(
        store.backing(),
        request.page,
        request.display_size,
        request.chunk_size,
    ) {
        FetchPlan::CacheHit => {
            debug!(page = %request.page, "Display page served from loaded records");
            return Ok(FillOutcome::CacheHit);
        }
        FetchPlan::PastEnd => return Ok(FillOutcome::PastEnd),
        FetchPlan::AlreadyLoaded => return Ok(FillOutcome::AlreadyLoaded),
        FetchPlan::Fetch(range) => range,
    };

    let (first, target) = (*range.start(), *range.end());
    debug!(page = %request.page, first = %first, target = %target, "Fetching chunk range");
    store.on_chunks_requested(range);

    let mut merged: Option<ChunkIndex> = None;
    let mut chunk = first;
    loop {
        let params = request
            .params
            .build(request.shape, chunk, request.chunk_size, request.extras_filter);

        let response = match source.fetch_page(&params).await {
            Ok(response) => response,
            Err(source) => {
                warn!(chunk = %chunk, error = %source, "Chunk fetch failed");
                return Err(match merged {
                    Some(loaded_through) => EngineError::PartialLoad {
                        loaded_through,
                        failed_chunk: chunk,
                        source,
                    },
                    None => EngineError::Network { chunk, source },
                });
            }
        };

        if response.records.is_empty() {
            debug!(chunk = %chunk, total = response.total_count, "Backend returned no records");
            store.backing_mut().set_total(response.total_count);
            break;
        }

        let short = (response.records.len() as u64) < request.chunk_size.as_u64();
        match store.backing_mut().merge_chunk(chunk, response) {
            Ok(added) => debug!(chunk = %chunk, added, "Merged chunk"),
            Err(e) => {
                warn!(error = %e, "Backing list changed during fill");
                break;
            }
        }
        store.set_current_chunk(chunk);
        merged = Some(chunk);

        let complete = store.backing().len() as u64 >= store.backing().total_count();
        if short || complete || chunk >= target {
            break;
        }
        chunk = chunk.next();
    }

    Ok(match merged {
        Some(last) => FillOutcome::Fetched { first, last },
        None => FillOutcome::Exhausted,
    })
}

#[cfg(test)]
#[path = "orchestrator_tests.rs"]
mod tests;
