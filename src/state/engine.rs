//! List engine: the public surface consumed by list views.
//!
//! One engine instance serves one session scope (e.g. one visit to an admin
//! list page). It borrows or owns the host's browse cache, owns its search
//! results, and must be ended with [`ListEngine::dispose`], which clears all
//! search state and hands the host cache back.
//!
//! Every operation takes `&mut self`, so at most one fill runs per engine
//! at any time and overlapping chunk requests cannot be issued. A fill
//! future dropped mid-way leaves completed chunks merged and the interrupted
//! chunk unrecorded, the same resumable state as a failed fetch.

use super::browse::BrowseCache;
use super::mode::{next_mode, Mode, ModeKind, Trigger};
use crate::config::EngineConfig;
use crate::model::{ChunkIndex, DisplayPage, EngineError, QueryShape, RecordId, SortSpec};
use crate::orchestrator::{fill, BackingList, ChunkStore, FillOutcome, FillRequest};
use crate::params::{ParamBuilder, QueryParams};
use crate::projector::{self, Projection};
use crate::source::DataSource;
use tracing::{debug, info};

/// Which backing list an operation targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListKind {
    /// The host's browse cache.
    Browse,
    /// The engine's search results.
    Search,
}

/// Paging engine for one list view session.
///
/// `S` is the backend, `H` the host's browse cache; pass `&mut BrowseCache`
/// to keep the cache alive beyond this engine.
#[derive(Debug)]
pub struct ListEngine<S, H = BrowseCache> {
    source: S,
    host: H,
    params: ParamBuilder,
    config: EngineConfig,

    /// Text in the search box, not yet submitted.
    pending_search: String,
    /// Filter tag as last selected, possibly not yet applied.
    pending_filter: String,
    /// Search text of the active query.
    committed_search: String,
    /// Filter tag of the active query.
    committed_filter: String,
    sort: SortSpec,
    page: DisplayPage,
    mode: Mode,
    last_error: Option<EngineError>,
}

impl<S, H> ListEngine<S, H>
where
    S: DataSource,
    H: ChunkStore,
{
    /// Start a session in Browsing mode with the default sort.
    pub fn new(source: S, host: H, config: EngineConfig) -> Self {
        Self {
            source,
            host,
            params: ParamBuilder::default(),
            sort: config.default_sort.clone(),
            config,
            pending_search: String::new(),
            pending_filter: String::new(),
            committed_search: String::new(),
            committed_filter: String::new(),
            page: DisplayPage::FIRST,
            mode: Mode::Browsing,
            last_error: None,
        }
    }

    /// Use `params` to build backend requests.
    pub fn with_params(mut self, params: ParamBuilder) -> Self {
        self.params = params;
        self
    }

    // ===== Accessors =====

    /// Current mode.
    pub fn mode(&self) -> ModeKind {
        self.mode.kind()
    }

    /// True while search results are authoritative.
    pub fn is_search_active(&self) -> bool {
        self.mode().is_searching()
    }

    /// True when the active query came from the search action.
    pub fn is_search_submitted(&self) -> bool {
        self.mode().is_submitted()
    }

    /// Text in the search box.
    pub fn search_text(&self) -> &str {
        &self.pending_search
    }

    /// Selected filter tag.
    pub fn filter_tag(&self) -> &str {
        &self.pending_filter
    }

    /// Current sort.
    pub fn sort(&self) -> &SortSpec {
        &self.sort
    }

    /// Current display page.
    pub fn page(&self) -> DisplayPage {
        self.page
    }

    /// Engine settings.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Error of the last request, cleared by the next successful one.
    pub fn last_error(&self) -> Option<&EngineError> {
        self.last_error.as_ref()
    }

    /// The host's browse cache.
    pub fn host(&self) -> &H {
        &self.host
    }

    /// The backend.
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Query shape of the active backing list.
    pub fn shape(&self) -> QueryShape {
        match self.mode {
            Mode::Browsing => QueryShape::browse(self.sort.clone()),
            Mode::Searching(_) => {
                QueryShape::new(&self.committed_search, &self.committed_filter, self.sort.clone())
            }
        }
    }

    /// The authoritative backing list.
    pub fn active_list(&self) -> &BackingList {
        self.mode.results().unwrap_or_else(|| self.host.backing())
    }

    /// Reported total of the active query.
    pub fn total_count(&self) -> u64 {
        self.active_list().total_count()
    }

    /// Number of display pages for the active query.
    pub fn page_count(&self) -> u32 {
        projector::page_count(self.total_count(), self.config.display_page_size)
    }

    /// Current display page, projected from loaded records without fetching.
    pub fn projection(&self) -> Projection {
        let list = self.active_list();
        projector::project(
            list.records(),
            list.total_count(),
            self.page,
            self.config.display_page_size,
            &self.sort,
        )
    }

    /// Parameters of the active query for its first chunk.
    ///
    /// Extras are derived from the selected, possibly unapplied, filter tag.
    pub fn query_params(&self) -> QueryParams {
        self.params.build(
            &self.shape(),
            ChunkIndex::FIRST,
            self.config.chunk_size,
            &self.pending_filter,
        )
    }

    // ===== Input =====

    /// Update the search box. Nothing is queried until [`submit_search`](Self::submit_search).
    pub fn set_search_text(&mut self, text: impl Into<String>) {
        self.pending_search = text.into();
    }

    /// Update the selected filter tag without querying.
    ///
    /// Only [`query_params`](Self::query_params) derives extras from this
    /// value; fetches keep using the applied tag until
    /// [`change_filter`](Self::change_filter).
    pub fn set_filter_tag(&mut self, tag: impl Into<String>) {
        self.pending_filter = tag.into();
    }

    // ===== Queries =====

    /// Run the typed search together with the applied filter.
    ///
    /// With both search text and filter empty while browsing, nothing
    /// changes and no request is issued.
    pub async fn submit_search(&mut self) -> Result<Projection, EngineError> {
        let search = self.pending_search.trim().to_string();
        if search.is_empty() && self.committed_filter.is_empty() && !self.is_search_active() {
            debug!("Empty search submitted while browsing, nothing to do");
            return Ok(self.projection());
        }
        self.committed_search = search;
        self.transition(Trigger::SubmitSearch).await
    }

    /// Select and apply a filter tag. Filter changes query immediately.
    pub async fn change_filter(&mut self, tag: impl Into<String>) -> Result<Projection, EngineError> {
        self.pending_filter = tag.into();
        self.committed_filter = self.pending_filter.trim().to_string();
        self.transition(Trigger::ChangeFilter).await
    }

    /// Sort by `field`; selecting the current field toggles the direction.
    ///
    /// The active list is invalidated and display page 1 is reloaded.
    pub async fn change_sort(&mut self, field: &str) -> Result<Projection, EngineError> {
        self.sort = self.sort.select(field);
        self.transition(Trigger::ChangeSort).await
    }

    /// Clear the search text; a remaining filter is re-queried on its own.
    pub async fn reset_search(&mut self) -> Result<Projection, EngineError> {
        self.pending_search.clear();
        self.committed_search.clear();
        self.transition(Trigger::ResetSearch).await
    }

    /// Clear the filter tag; a remaining search is re-queried on its own.
    pub async fn reset_filter(&mut self) -> Result<Projection, EngineError> {
        self.pending_filter.clear();
        self.committed_filter.clear();
        self.transition(Trigger::ResetFilter).await
    }

    /// Return to the initial Browsing state with the default sort.
    pub async fn reset_all(&mut self) -> Result<Projection, EngineError> {
        self.clear_search_state();
        self.sort = self.config.default_sort.clone();
        self.transition(Trigger::ResetAll).await
    }

    /// Show display page `page`, fetching missing chunks first.
    pub async fn change_page(&mut self, page: DisplayPage) -> Result<Projection, EngineError> {
        self.page = page;
        self.load().await
    }

    /// Discard the search results and load the current page again.
    ///
    /// While browsing there is no search to re-run and the host cache is
    /// left alone.
    pub async fn rerun_search(&mut self) -> Result<Projection, EngineError> {
        let Some(results) = self.mode.results_mut() else {
            debug!("No active search to re-run");
            return Ok(self.projection());
        };
        results.clear();
        self.load().await
    }

    // ===== Mutation =====

    /// Remove a record from the active list and decrement its total.
    ///
    /// Returns false, changing nothing, when the id is not loaded there.
    pub fn remove_record(&mut self, id: &RecordId) -> bool {
        self.active_list_mut().remove(id)
    }

    /// Remove a record from a specific list, active or not.
    ///
    /// Removing from `Search` while browsing is a no-op.
    pub fn remove_record_from(&mut self, list: ListKind, id: &RecordId) -> bool {
        match list {
            ListKind::Browse => self.host.backing_mut().remove(id),
            ListKind::Search => self
                .mode
                .results_mut()
                .is_some_and(|results| results.remove(id)),
        }
    }

    // ===== Teardown =====

    /// End the session: clear all search state and hand back the host cache.
    pub fn dispose(mut self) -> H {
        self.clear_search_state();
        self.mode = Mode::Browsing;
        info!("List engine disposed");
        self.host
    }

    // ===== Internals =====

    fn clear_search_state(&mut self) {
        self.pending_search.clear();
        self.pending_filter.clear();
        self.committed_search.clear();
        self.committed_filter.clear();
    }

    fn active_list_mut(&mut self) -> &mut BackingList {
        match &mut self.mode {
            Mode::Browsing => self.host.backing_mut(),
            Mode::Searching(session) => &mut session.results,
        }
    }

    async fn transition(&mut self, trigger: Trigger) -> Result<Projection, EngineError> {
        let before = self.mode();
        let committed = QueryShape::new(
            &self.committed_search,
            &self.committed_filter,
            self.sort.clone(),
        );
        let after = next_mode(before, &committed, trigger);
        if before != after {
            info!(?trigger, from = ?before, to = ?after, "Mode transition");
        }
        self.mode.apply(after);
        self.page = DisplayPage::FIRST;
        self.load().await
    }

    async fn load(&mut self) -> Result<Projection, EngineError> {
        let shape = self.shape();
        let request = FillRequest {
            shape: &shape,
            page: self.page,
            display_size: self.config.display_page_size,
            chunk_size: self.config.chunk_size,
            params: &self.params,
            extras_filter: &self.committed_filter,
        };

        let result = match &mut self.mode {
            Mode::Browsing => fill(&mut self.host, &self.source, request).await,
            Mode::Searching(session) => fill(&mut session.results, &self.source, request).await,
        };

        match result {
            Ok(outcome) => {
                if outcome == FillOutcome::PastEnd {
                    debug!(page = %self.page, "Display page beyond reported total");
                }
                self.last_error = None;
                Ok(self.projection())
            }
            Err(e) => {
                self.last_error = Some(e.clone());
                Err(e)
            }
        }
    }
}

#[cfg(test)]
#[path = "engine_tests.rs"]
mod tests;
