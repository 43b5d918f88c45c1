//! Engine state: mode machine, host cache seam and the list engine.
//!
//! Mode transitions are pure functions testable without a backend; the
//! engine applies them and drives the orchestrator.

pub mod browse;
pub mod engine;
pub mod mode;

// Re-export for convenience
pub use browse::BrowseCache;
pub use engine::{ListEngine, ListKind};
pub use mode::{next_mode, ModeKind, Trigger};
