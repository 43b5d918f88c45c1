//! Record sources.
//!
//! This module provides the boundary to the backend:
//! - [`DataSource`]: async fetch of one upstream chunk
//! - [`MemorySource`]: in-process backend that searches, filters, sorts and paginates
//! - [`file`]: loading records from a JSONL file into a [`MemorySource`]
//!
//! The concrete endpoint, auth and transport of a real backend live behind
//! [`DataSource`] implementations supplied by the host.

use crate::model::{Record, SourceError};
use crate::params::QueryParams;
use async_trait::async_trait;

pub mod file;
pub mod memory;

pub use file::{load_records, LoadError};
pub use memory::MemorySource;

/// One backend page response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageResponse {
    /// Records of the requested chunk, in backend order.
    pub records: Vec<Record>,
    /// Total number of records matching the query, across all chunks.
    pub total_count: u64,
}

/// Backend that serves one upstream chunk per call.
///
/// Matching, filtering and ordering are entirely the backend's concern; the
/// engine relies on the backend order being stable across chunk requests
/// for one query.
#[async_trait]
pub trait DataSource: Send + Sync {
    /// Fetch the chunk described by `params`.
    async fn fetch_page(&self, params: &QueryParams) -> Result<PageResponse, SourceError>;
}

#[async_trait]
impl<T: DataSource + ?Sized> DataSource for std::sync::Arc<T> {
    async fn fetch_page(&self, params: &QueryParams) -> Result<PageResponse, SourceError> {
        (**self).fetch_page(params).await
    }
}
