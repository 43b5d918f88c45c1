//! Configuration module.

pub mod loader;

pub use loader::{
    apply_cli_overrides, apply_env_overrides, default_config_path, default_log_path,
    load_config_file, load_config_with_precedence, merge_config, ConfigError, ConfigFile,
    ResolvedConfig,
};

use crate::model::{PageSize, SortDirection, SortSpec};

/// Default upstream chunk size.
pub const DEFAULT_CHUNK_SIZE: u32 = 200;

/// Default display page size.
pub const DEFAULT_DISPLAY_PAGE_SIZE: u32 = 50;

/// Default sort field.
pub const DEFAULT_SORT_FIELD: &str = "created_at";

/// Validated engine settings.
///
/// Chunk size and display page size are independent units: one chunk is one
/// backend fetch, one display page is one UI page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// Records per upstream fetch (C).
    pub chunk_size: PageSize,
    /// Records per display page (S).
    pub display_page_size: PageSize,
    /// Sort restored by a full reset.
    pub default_sort: SortSpec,
}

impl EngineConfig {
    /// Create a config from raw sizes.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if either size is zero.
    pub fn new(
        chunk_size: u32,
        display_page_size: u32,
        default_sort: SortSpec,
    ) -> Result<Self, ConfigError> {
        let invalid = |field: &str| ConfigError::InvalidValue {
            field: field.to_string(),
            reason: "must be at least 1".to_string(),
        };
        Ok(Self {
            chunk_size: PageSize::new(chunk_size).map_err(|_| invalid("chunk_size"))?,
            display_page_size: PageSize::new(display_page_size)
                .map_err(|_| invalid("display_page_size"))?,
            default_sort,
        })
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        let size = |n| PageSize::new(n).unwrap_or(PageSize::MIN);
        Self {
            chunk_size: size(DEFAULT_CHUNK_SIZE),
            display_page_size: size(DEFAULT_DISPLAY_PAGE_SIZE),
            default_sort: SortSpec::new(DEFAULT_SORT_FIELD, SortDirection::Descending),
        }
    }
}
