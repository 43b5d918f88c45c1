//! Pagewise
//!
//! Client-side paging engine for admin list views. It presents a backend
//! collection as small display pages while fetching from the backend in
//! larger chunks, keeps a long-lived browse cache separate from ephemeral
//! search results, and re-sorts loaded records client-side.
//!
//! Layering, from the bottom:
//! - [`model`]: identifiers, records, query shapes and errors
//! - [`params`]: backend request parameters
//! - [`source`]: the backend seam ([`DataSource`]) and an in-memory backend
//! - [`orchestrator`]: chunk accounting and sequential gap filling
//! - [`projector`]: client-side sort and display page slicing
//! - [`state`]: the mode machine and the [`ListEngine`] surface
//!
//! [`config`] and [`logging`] serve the demo binary.

pub mod config;
pub mod logging;
pub mod model;
pub mod orchestrator;
pub mod params;
pub mod projector;
pub mod source;
pub mod state;

pub use config::EngineConfig;
pub use model::{DisplayPage, EngineError, Record, RecordId, SortDirection, SortSpec};
pub use projector::Projection;
pub use source::{DataSource, MemorySource, PageResponse};
pub use state::{BrowseCache, ListEngine, ListKind, ModeKind};
