//! Query shape: everything that determines whether loaded data is reusable.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ===== SortDirection =====

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SortDirection {
    /// Smallest first.
    #[serde(rename = "asc")]
    Ascending,
    /// Largest first.
    #[default]
    #[serde(rename = "desc")]
    Descending,
}

impl SortDirection {
    /// The opposite direction.
    pub fn toggled(self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }

    /// Wire form sent to the backend.
    pub fn as_str(self) -> &'static str {
        match self {
            SortDirection::Ascending => "asc",
            SortDirection::Descending => "desc",
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortDirection {
    type Err = InvalidSortDirection;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "asc" | "ascending" => Ok(SortDirection::Ascending),
            "desc" | "descending" => Ok(SortDirection::Descending),
            _ => Err(InvalidSortDirection(s.to_string())),
        }
    }
}

/// Unrecognized sort direction string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid sort direction: {0:?} (expected \"asc\" or \"desc\")")]
pub struct InvalidSortDirection(pub String);

// ===== SortSpec =====

/// Sort field plus direction.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SortSpec {
    /// Record field to sort by.
    pub field: String,
    /// Sort direction.
    pub direction: SortDirection,
}

impl SortSpec {
    /// Create a sort spec.
    pub fn new(field: impl Into<String>, direction: SortDirection) -> Self {
        Self {
            field: field.into(),
            direction,
        }
    }

    /// Sort after the user picks `field`.
    ///
    /// Picking the current field again toggles the direction. Picking a new
    /// field sorts ascending.
    pub fn select(&self, field: &str) -> SortSpec {
        if self.field == field {
            SortSpec::new(field, self.direction.toggled())
        } else {
            SortSpec::new(field, SortDirection::Ascending)
        }
    }
}

// ===== QueryShape =====

/// The tuple that determines cache validity.
///
/// Search text and filter tag are stored trimmed. Two fetches are
/// comparable only when their shapes are equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QueryShape {
    search: String,
    filter: String,
    sort: SortSpec,
}

impl QueryShape {
    /// Create a shape, trimming search text and filter tag.
    pub fn new(search: &str, filter: &str, sort: SortSpec) -> Self {
        Self {
            search: search.trim().to_string(),
            filter: filter.trim().to_string(),
            sort,
        }
    }

    /// Shape of the unfiltered collection under `sort`.
    pub fn browse(sort: SortSpec) -> Self {
        Self::new("", "", sort)
    }

    /// Trimmed search text; empty when no search is applied.
    pub fn search(&self) -> &str {
        &self.search
    }

    /// Trimmed filter tag; empty when no filter is applied.
    pub fn filter(&self) -> &str {
        &self.filter
    }

    /// Sort applied to the query.
    pub fn sort(&self) -> &SortSpec {
        &self.sort
    }

    /// True when either search text or filter tag is non-empty.
    pub fn is_filtered(&self) -> bool {
        !self.search.is_empty() || !self.filter.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn select_same_field_toggles_direction() {
        let sort = SortSpec::new("name", SortDirection::Ascending);

        let next = sort.select("name");

        assert_eq!(next, SortSpec::new("name", SortDirection::Descending));
        assert_eq!(next.select("name"), sort);
    }

    #[test]
    fn select_new_field_starts_ascending() {
        let sort = SortSpec::new("name", SortDirection::Descending);

        assert_eq!(
            sort.select("email"),
            SortSpec::new("email", SortDirection::Ascending)
        );
    }

    #[test]
    fn shape_trims_search_and_filter() {
        let shape = QueryShape::new("  alice ", " active", SortSpec::new("name", SortDirection::Ascending));

        assert_eq!(shape.search(), "alice");
        assert_eq!(shape.filter(), "active");
        assert!(shape.is_filtered());
    }

    #[test]
    fn whitespace_only_shape_is_not_filtered() {
        let shape = QueryShape::new("   ", "\t", SortSpec::new("name", SortDirection::Ascending));

        assert!(!shape.is_filtered());
        assert_eq!(shape, QueryShape::browse(SortSpec::new("name", SortDirection::Ascending)));
    }

    #[test]
    fn sort_direction_parses_wire_forms() {
        assert_eq!("asc".parse(), Ok(SortDirection::Ascending));
        assert_eq!("DESC".parse(), Ok(SortDirection::Descending));
        assert!("sideways".parse::<SortDirection>().is_err());
    }
}
