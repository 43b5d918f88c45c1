//! In-memory backend.
//!
//! Serves chunks out of a record vector the way a REST list endpoint would:
//! search, then filter, then sort, then slice by page/limit. Every request is
//! logged, and one-shot failures can be injected per page.

use super::{DataSource, PageResponse};
use crate::model::{Record, RecordId, SortSpec, SourceError};
use crate::params::QueryParams;
use crate::projector::compare_records;
use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashSet;
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::debug;

/// Field matched against the filter tag when none is configured.
pub const DEFAULT_FILTER_FIELD: &str = "tag";

/// In-process [`DataSource`] over a fixed record set.
#[derive(Debug)]
pub struct MemorySource {
    records: Mutex<Vec<Record>>,
    filter_field: String,
    requests: Mutex<Vec<QueryParams>>,
    failures: Mutex<HashSet<u32>>,
}

fn locked<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl MemorySource {
    /// Create a backend serving `records`.
    pub fn new(records: Vec<Record>) -> Self {
        Self {
            records: Mutex::new(records),
            filter_field: DEFAULT_FILTER_FIELD.to_string(),
            requests: Mutex::new(Vec::new()),
            failures: Mutex::new(HashSet::new()),
        }
    }

    /// Match the filter tag against `field` instead of [`DEFAULT_FILTER_FIELD`].
    pub fn with_filter_field(mut self, field: impl Into<String>) -> Self {
        self.filter_field = field.into();
        self
    }

    /// Number of records held by the backend.
    pub fn len(&self) -> usize {
        locked(&self.records).len()
    }

    /// True when the backend holds no records.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Fail the next request for upstream page `page`.
    pub fn fail_once(&self, page: u32) {
        locked(&self.failures).insert(page);
    }

    /// Delete a record on the backend side. Returns whether it existed.
    pub fn delete(&self, id: &RecordId) -> bool {
        let mut records = locked(&self.records);
        let before = records.len();
        records.retain(|r| &r.id != id);
        records.len() != before
    }

    /// Every request served so far, in arrival order.
    pub fn requests(&self) -> Vec<QueryParams> {
        locked(&self.requests).clone()
    }

    /// Upstream page numbers requested so far, in arrival order.
    pub fn requested_pages(&self) -> Vec<u32> {
        locked(&self.requests).iter().map(|p| p.page).collect()
    }

    /// Forget logged requests.
    pub fn clear_requests(&self) {
        locked(&self.requests).clear();
    }

    fn matches(&self, record: &Record, params: &QueryParams) -> bool {
        if let Some(filter) = &params.filter {
            let tagged = match record.field(&self.filter_field) {
                Some(Value::String(tag)) => tag.eq_ignore_ascii_case(filter),
                _ => false,
            };
            if !tagged {
                return false;
            }
        }

        let Some(search) = &params.search else {
            return true;
        };
        let needle = search.to_lowercase();
        record.id.as_str().to_lowercase().contains(&needle)
            || record.fields.values().any(|value| match value {
                Value::String(s) => s.to_lowercase().contains(&needle),
                _ => false,
            })
    }
}

#[async_trait]
impl DataSource for MemorySource {
    async fn fetch_page(&self, params: &QueryParams) -> Result<PageResponse, SourceError> {
        locked(&self.requests).push(params.clone());

        if locked(&self.failures).remove(&params.page) {
            debug!(page = params.page, "Injected failure");
            return Err(SourceError::Network(format!(
                "injected failure for page {}",
                params.page
            )));
        }

        let sort = SortSpec::new(params.sort_field.clone(), params.sort_direction);
        let mut matched: Vec<Record> = locked(&self.records)
            .iter()
            .filter(|r| self.matches(r, params))
            .cloned()
            .collect();
        matched.sort_by(|a, b| compare_records(a, b, &sort));

        let total_count = matched.len() as u64;
        let limit = params.limit as usize;
        let start = (params.page.max(1) as usize - 1)
            .saturating_mul(limit)
            .min(matched.len());
        let end = start.saturating_add(limit).min(matched.len());
        let records = matched.drain(start..end).collect();

        Ok(PageResponse {
            records,
            total_count,
        })
    }
}
