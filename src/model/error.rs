//! Error types for pagewise.
//!
//! This module defines the error taxonomy using `thiserror` for structured error
//! handling. Errors compose via `?` and `From` conversions.
//!
//! # Error Hierarchy
//!
//! - [`EngineError`] - Failure of a display-page request
//!   - `Network` - The first chunk of the needed range could not be fetched
//!   - `PartialLoad` - Some chunks were merged before a later chunk failed
//! - [`SourceError`] - Failure reported by a [`DataSource`](crate::source::DataSource)
//!
//! # Error Recovery Strategy
//!
//! Nothing in the engine is fatal. Every failure leaves the backing list in a
//! resumable state: merged chunks stay merged and recorded, the failing chunk
//! is not recorded, and repeating the same request resumes at the failed chunk.
//! The engine never retries on its own; retry is a caller decision.

use super::ChunkIndex;
use thiserror::Error;

/// Failure reported by a data source for a single chunk fetch.
///
/// Concrete transports map their own failures into these variants so that the
/// engine can log and surface them without knowing the transport.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SourceError {
    /// The request never produced a response (connection refused, timeout, DNS).
    #[error("Network failure: {0}")]
    Network(String),

    /// The backend answered with a failure status.
    #[error("Backend returned status {status}: {message}")]
    Backend {
        /// Status code reported by the backend.
        status: u16,
        /// Message reported by the backend.
        message: String,
    },

    /// The response arrived but could not be decoded into records.
    #[error("Malformed response: {0}")]
    Decode(String),
}

/// Failure of a display-page request.
///
/// Surfaced to the UI as a value, never as a panic. The engine also keeps the
/// most recent one available through `ListEngine::last_error` until the next
/// successful request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// The first chunk of the required range failed. Nothing new was merged.
    #[error("Failed to fetch chunk {chunk}: {source}")]
    Network {
        /// Chunk whose fetch failed.
        chunk: ChunkIndex,
        /// Underlying source failure.
        #[source]
        source: SourceError,
    },

    /// A later chunk of a multi-chunk fill failed.
    ///
    /// Chunks up to and including `loaded_through` were merged and remain
    /// recorded as loaded. `failed_chunk` was not recorded, so a retry of the
    /// same request resumes there.
    #[error("Loaded through chunk {loaded_through}, then chunk {failed_chunk} failed: {source}")]
    PartialLoad {
        /// Last chunk successfully merged.
        loaded_through: ChunkIndex,
        /// Chunk whose fetch failed.
        failed_chunk: ChunkIndex,
        /// Underlying source failure.
        #[source]
        source: SourceError,
    },
}

impl EngineError {
    /// Chunk whose fetch failed.
    pub fn failed_chunk(&self) -> ChunkIndex {
        match self {
            EngineError::Network { chunk, .. } => *chunk,
            EngineError::PartialLoad { failed_chunk, .. } => *failed_chunk,
        }
    }

    /// Underlying source failure.
    pub fn source_error(&self) -> &SourceError {
        match self {
            EngineError::Network { source, .. } | EngineError::PartialLoad { source, .. } => {
                source
            }
        }
    }
}
