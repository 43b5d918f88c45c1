//! Domain model types (pure).
//!
//! All types in this module are pure data with smart constructors.

pub mod error;
pub mod identifiers;
pub mod query;
pub mod record;

// Re-export for convenience
pub use error::{EngineError, SourceError};
pub use identifiers::{
    ChunkIndex, DisplayPage, InvalidPageIndex, InvalidPageSize, InvalidRecordId, PageSize,
    RecordId,
};
pub use query::{InvalidSortDirection, QueryShape, SortDirection, SortSpec};
pub use record::Record;
