//! Identifier and index newtypes with smart constructors.
//!
//! Record ids validate non-empty strings at construction time.
//! Page and chunk indices are 1-based and reject zero.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::NonZeroU32;

// ===== RecordId =====

/// Unique identifier for a record. Identity of a record is its id only.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RecordId(String);

impl RecordId {
    /// Smart constructor: rejects empty and whitespace-only ids.
    pub fn new(raw: impl Into<String>) -> Result<Self, InvalidRecordId> {
        let s = raw.into();
        if s.trim().is_empty() {
            Err(InvalidRecordId::Empty)
        } else {
            Ok(Self(s))
        }
    }

    /// Borrow the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for RecordId {
    type Error = InvalidRecordId;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<RecordId> for String {
    fn from(id: RecordId) -> Self {
        id.0
    }
}

// ===== DisplayPage =====

/// 1-based index of a UI display page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DisplayPage(NonZeroU32);

impl DisplayPage {
    /// The first display page.
    pub const FIRST: DisplayPage = DisplayPage(NonZeroU32::MIN);

    /// Smart constructor: rejects page 0.
    pub fn new(index: u32) -> Result<Self, InvalidPageIndex> {
        NonZeroU32::new(index)
            .map(Self)
            .ok_or(InvalidPageIndex::Zero)
    }

    /// The 1-based page number.
    pub fn get(self) -> u32 {
        self.0.get()
    }
}

impl fmt::Display for DisplayPage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ===== ChunkIndex =====

/// 1-based index of an upstream chunk. One chunk is one backend page fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChunkIndex(NonZeroU32);

impl ChunkIndex {
    /// The first upstream chunk.
    pub const FIRST: ChunkIndex = ChunkIndex(NonZeroU32::MIN);

    /// Smart constructor: rejects chunk 0.
    pub fn new(index: u32) -> Result<Self, InvalidPageIndex> {
        NonZeroU32::new(index)
            .map(Self)
            .ok_or(InvalidPageIndex::Zero)
    }

    /// The 1-based chunk number.
    pub fn get(self) -> u32 {
        self.0.get()
    }

    /// The chunk after this one.
    pub fn next(self) -> ChunkIndex {
        ChunkIndex(self.0.saturating_add(1))
    }
}

impl fmt::Display for ChunkIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ===== PageSize =====

/// Non-zero number of records per page. Used for both the display page
/// size and the upstream chunk size, which are independent values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PageSize(NonZeroU32);

impl PageSize {
    /// One record per page.
    pub const MIN: PageSize = PageSize(NonZeroU32::MIN);

    /// Smart constructor: rejects a size of 0.
    pub fn new(size: u32) -> Result<Self, InvalidPageSize> {
        NonZeroU32::new(size).map(Self).ok_or(InvalidPageSize::Zero)
    }

    /// Size as `u32`.
    pub fn get(self) -> u32 {
        self.0.get()
    }

    /// Size as `u64`, for record-count arithmetic.
    pub fn as_u64(self) -> u64 {
        u64::from(self.0.get())
    }
}

impl fmt::Display for PageSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ===== Error Types =====

/// Rejected record id.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvalidRecordId {
    /// Id was empty or whitespace-only.
    #[error("Record ID cannot be empty")]
    Empty,
}

/// Rejected page or chunk index.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvalidPageIndex {
    /// Indices are 1-based.
    #[error("Page index must be at least 1")]
    Zero,
}

/// Rejected page size.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvalidPageSize {
    /// A page must hold at least one record.
    #[error("Page size must be at least 1")]
    Zero,
}

// ===== Tests =====
