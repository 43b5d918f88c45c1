//! Parameter Builder.
//!
//! Turns the current query shape plus an upstream chunk request into the
//! parameter set sent to the backend. Upstream chunks and display pages are
//! different units: the `page`/`limit` pair here always describes a chunk.

use crate::model::{ChunkIndex, PageSize, QueryShape, SortDirection};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

// ===== QueryParams =====

/// Parameters for one backend page fetch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QueryParams {
    /// Trimmed search text; absent when empty.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    /// Trimmed filter tag; absent when empty.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter: Option<String>,
    /// Field to sort by.
    pub sort_field: String,
    /// Sort direction.
    pub sort_direction: SortDirection,
    /// Upstream chunk requested, 1-based.
    pub page: u32,
    /// Chunk size.
    pub limit: u32,
    /// Static and filter-derived extras.
    #[serde(flatten)]
    pub extra: BTreeMap<String, String>,
}

impl QueryParams {
    /// The upstream chunk these parameters request.
    pub fn chunk(&self) -> Option<ChunkIndex> {
        ChunkIndex::new(self.page).ok()
    }

    /// Render as ordered key/value pairs using the configured key names.
    ///
    /// Core keys come first in a fixed order, extras follow in key order.
    pub fn to_pairs(&self, names: &ParamNames) -> Vec<(String, String)> {
        let mut pairs = Vec::with_capacity(6 + self.extra.len());
        if let Some(search) = &self.search {
            pairs.push((names.search.clone(), search.clone()));
        }
        if let Some(filter) = &self.filter {
            pairs.push((names.filter.clone(), filter.clone()));
        }
        pairs.push((names.sort_field.clone(), self.sort_field.clone()));
        pairs.push((
            names.sort_direction.clone(),
            self.sort_direction.as_str().to_string(),
        ));
        pairs.push((names.page.clone(), self.page.to_string()));
        pairs.push((names.limit.clone(), self.limit.to_string()));
        pairs.extend(self.extra.iter().map(|(k, v)| (k.clone(), v.clone())));
        pairs
    }
}

// ===== ParamNames =====

/// Key names used when rendering [`QueryParams`] for a transport.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ParamNames {
    /// Key for the search text.
    pub search: String,
    /// Key for the filter tag.
    pub filter: String,
    /// Key for the sort field.
    pub sort_field: String,
    /// Key for the sort direction.
    pub sort_direction: String,
    /// Key for the upstream page number.
    pub page: String,
    /// Key for the chunk size.
    pub limit: String,
}

impl ParamNames {
    fn is_core_key(&self, key: &str) -> bool {
        [
            &self.search,
            &self.filter,
            &self.sort_field,
            &self.sort_direction,
            &self.page,
            &self.limit,
        ]
        .iter()
        .any(|name| name.as_str() == key)
    }
}

impl Default for ParamNames {
    fn default() -> Self {
        Self {
            search: "search".to_string(),
            filter: "filter".to_string(),
            sort_field: "sortBy".to_string(),
            sort_direction: "sortOrder".to_string(),
            page: "page".to_string(),
            limit: "limit".to_string(),
        }
    }
}

// ===== ExtraParams =====

/// Derives extra parameters from the pending filter tag.
pub type FilterDerivation = dyn Fn(&str) -> BTreeMap<String, String> + Send + Sync;

/// Extra parameters appended to every request.
///
/// Static values apply to every request. The derivation receives the
/// *pending* filter tag, which may not have been committed to the engine
/// state yet; its values override static ones with the same key.
#[derive(Clone, Default)]
pub struct ExtraParams {
    fixed: BTreeMap<String, String>,
    derive: Option<Arc<FilterDerivation>>,
}

impl ExtraParams {
    /// No extras.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a static parameter.
    pub fn with_static(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.fixed.insert(key.into(), value.into());
        self
    }

    /// Set the filter-derived parameter function.
    pub fn with_derivation<F>(mut self, derive: F) -> Self
    where
        F: Fn(&str) -> BTreeMap<String, String> + Send + Sync + 'static,
    {
        self.derive = Some(Arc::new(derive));
        self
    }

    /// Resolve extras for the given pending filter tag.
    pub fn resolve(&self, pending_filter: &str) -> BTreeMap<String, String> {
        let mut extras = self.fixed.clone();
        if let Some(derive) = &self.derive {
            extras.extend(derive(pending_filter));
        }
        extras
    }
}

impl fmt::Debug for ExtraParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExtraParams")
            .field("fixed", &self.fixed)
            .field("derive", &self.derive.as_ref().map(|_| "<fn>"))
            .finish()
    }
}

// ===== ParamBuilder =====

/// Builds [`QueryParams`] for a query shape and upstream chunk.
#[derive(Debug, Clone, Default)]
pub struct ParamBuilder {
    names: ParamNames,
    extras: ExtraParams,
}

impl ParamBuilder {
    /// Create a builder with the given key names and extras.
    pub fn new(names: ParamNames, extras: ExtraParams) -> Self {
        Self { names, extras }
    }

    /// Key names used by [`QueryParams::to_pairs`].
    pub fn names(&self) -> &ParamNames {
        &self.names
    }

    /// Build parameters for `chunk` of `shape`.
    ///
    /// Search text and filter tag are included only when non-empty after
    /// trimming. Sort, page and limit are always included. Extras are
    /// derived from `filter_tag`, and never replace a core key.
    pub fn build(
        &self,
        shape: &QueryShape,
        chunk: ChunkIndex,
        chunk_size: PageSize,
        filter_tag: &str,
    ) -> QueryParams {
        let non_empty = |s: &str| {
            let trimmed = s.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        };

        let mut extra = self.extras.resolve(filter_tag.trim());
        extra.retain(|key, _| !self.names.is_core_key(key));

        QueryParams {
            search: non_empty(shape.search()),
            filter: non_empty(shape.filter()),
            sort_field: shape.sort().field.clone(),
            sort_direction: shape.sort().direction,
            page: chunk.get(),
            limit: chunk_size.get(),
            extra,
        }
    }
}

#[cfg(test)]
#[path = "params_tests.rs"]
mod tests;
