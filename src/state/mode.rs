//! Mode state machine.
//!
//! The engine is either browsing the host's long-lived cache or showing an
//! ephemeral search/filter result list. Mode is a sum type: the search
//! results exist only inside the `Searching` variant, so leaving search mode
//! drops them, and "submitted" cannot be set while browsing.

use crate::model::QueryShape;
use crate::orchestrator::BackingList;

// ===== ModeKind =====

/// Which backing list is authoritative, as reported to the UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ModeKind {
    /// Reading the host's cache of the unfiltered collection.
    #[default]
    Browsing,
    /// Reading the engine's own result list.
    Searching {
        /// True only when the user pressed the search action, as opposed to
        /// a filter change triggering the query on its own.
        submitted: bool,
    },
}

impl ModeKind {
    /// True in `Searching`.
    pub fn is_searching(self) -> bool {
        matches!(self, ModeKind::Searching { .. })
    }

    /// True in `Searching { submitted: true }`.
    pub fn is_submitted(self) -> bool {
        matches!(self, ModeKind::Searching { submitted: true })
    }
}

// ===== Trigger =====

/// User action that may change mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    /// Explicit search action.
    SubmitSearch,
    /// Filter tag changed; queries without a search action.
    ChangeFilter,
    /// Search text cleared.
    ResetSearch,
    /// Filter tag cleared.
    ResetFilter,
    /// Everything back to defaults.
    ResetAll,
    /// Sort field or direction changed.
    ChangeSort,
}

/// Mode after `trigger`, given the committed query shape it produced.
///
/// An unfiltered shape always browses. Otherwise the engine searches, and
/// `submitted` tracks whether a non-empty search text was explicitly
/// submitted and is still part of the query.
pub fn next_mode(current: ModeKind, committed: &QueryShape, trigger: Trigger) -> ModeKind {
    if trigger == Trigger::ResetAll || !committed.is_filtered() {
        return ModeKind::Browsing;
    }

    let has_search = !committed.search().is_empty();
    let submitted = match trigger {
        Trigger::SubmitSearch => has_search,
        Trigger::ResetSearch => false,
        Trigger::ChangeFilter | Trigger::ResetFilter | Trigger::ChangeSort => {
            current.is_submitted() && has_search
        }
        Trigger::ResetAll => false,
    };
    ModeKind::Searching { submitted }
}

// ===== Mode =====

/// Engine-owned state of a search session.
#[derive(Debug, Clone, Default)]
pub struct SearchSession {
    /// Whether the search action was pressed.
    pub submitted: bool,
    /// Ephemeral result list.
    pub results: BackingList,
}

/// Engine mode, owning the search results while searching.
#[derive(Debug, Clone, Default)]
pub enum Mode {
    /// Host cache is authoritative.
    #[default]
    Browsing,
    /// Search results are authoritative.
    Searching(SearchSession),
}

impl Mode {
    /// Reportable view of this mode.
    pub fn kind(&self) -> ModeKind {
        match self {
            Mode::Browsing => ModeKind::Browsing,
            Mode::Searching(session) => ModeKind::Searching {
                submitted: session.submitted,
            },
        }
    }

    /// Move to `next`.
    ///
    /// Entering or staying in `Searching` keeps the current result list;
    /// the orchestrator resets it if the query shape changed. Entering
    /// `Browsing` drops it.
    pub fn apply(&mut self, next: ModeKind) {
        *self = match (std::mem::take(self), next) {
            (_, ModeKind::Browsing) => Mode::Browsing,
            (Mode::Searching(session), ModeKind::Searching { submitted }) => {
                Mode::Searching(SearchSession {
                    submitted,
                    results: session.results,
                })
            }
            (Mode::Browsing, ModeKind::Searching { submitted }) => Mode::Searching(SearchSession {
                submitted,
                results: BackingList::new(),
            }),
        };
    }

    /// Search results, when searching.
    pub fn results(&self) -> Option<&BackingList> {
        match self {
            Mode::Browsing => None,
            Mode::Searching(session) => Some(&session.results),
        }
    }

    /// Search results, mutably, when searching.
    pub fn results_mut(&mut self) -> Option<&mut BackingList> {
        match self {
            Mode::Browsing => None,
            Mode::Searching(session) => Some(&mut session.results),
        }
    }
}

#[cfg(test)]
#[path = "mode_tests.rs"]
mod tests;
