//! Configuration file loading with precedence handling.

use super::{EngineConfig, DEFAULT_CHUNK_SIZE, DEFAULT_DISPLAY_PAGE_SIZE, DEFAULT_SORT_FIELD};
use crate::model::{SortDirection, SortSpec};
use crate::params::ParamNames;
use serde::Deserialize;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during config loading.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Config file path contains invalid UTF-8 or cannot be resolved.
    #[error("Invalid config path: {0}")]
    InvalidPath(String),

    /// Failed to read config file (file may not exist or have permission issues).
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError {
        /// Path that failed to read.
        path: PathBuf,
        /// Reason for failure.
        reason: String,
    },

    /// Config file contains invalid TOML syntax.
    #[error("Invalid TOML in {path}: {reason}")]
    ParseError {
        /// Path with invalid TOML.
        path: PathBuf,
        /// Parse error details.
        reason: String,
    },

    /// A setting parsed but is out of range.
    #[error("Invalid value for {field}: {reason}")]
    InvalidValue {
        /// Setting name.
        field: String,
        /// Why the value was rejected.
        reason: String,
    },
}

/// TOML configuration file structure.
///
/// All fields are optional - if not specified, hardcoded defaults are used.
/// Corresponds to `~/.config/pagewise/config.toml`.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    /// Records per upstream fetch.
    #[serde(default)]
    pub chunk_size: Option<u32>,

    /// Records per display page.
    #[serde(default)]
    pub display_page_size: Option<u32>,

    /// Sort field restored by a full reset.
    #[serde(default)]
    pub default_sort_field: Option<String>,

    /// Sort direction restored by a full reset (`"asc"` or `"desc"`).
    #[serde(default)]
    pub default_sort_direction: Option<SortDirection>,

    /// Path to log file for tracing output.
    #[serde(default)]
    pub log_file_path: Option<PathBuf>,

    /// Backend parameter key names.
    #[serde(default)]
    pub params: Option<ParamNames>,
}

/// Resolved configuration after applying precedence rules.
///
/// Created by merging defaults, config file, env vars, and CLI args.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedConfig {
    /// Records per upstream fetch.
    pub chunk_size: u32,
    /// Records per display page.
    pub display_page_size: u32,
    /// Sort field restored by a full reset.
    pub default_sort_field: String,
    /// Sort direction restored by a full reset.
    pub default_sort_direction: SortDirection,
    /// Path to log file for tracing output.
    pub log_file_path: PathBuf,
    /// Backend parameter key names.
    pub params: ParamNames,
}

impl Default for ResolvedConfig {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            display_page_size: DEFAULT_DISPLAY_PAGE_SIZE,
            default_sort_field: DEFAULT_SORT_FIELD.to_string(),
            default_sort_direction: SortDirection::Descending,
            log_file_path: default_log_path(),
            params: ParamNames::default(),
        }
    }
}

impl ResolvedConfig {
    /// Validate sizes and build the engine settings.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if a size is zero.
    pub fn engine_config(&self) -> Result<EngineConfig, ConfigError> {
        EngineConfig::new(
            self.chunk_size,
            self.display_page_size,
            SortSpec::new(self.default_sort_field.clone(), self.default_sort_direction),
        )
    }
}

/// Resolve default log file path.
///
/// Returns `~/.local/state/pagewise/pagewise.log` on Unix-like systems,
/// or appropriate platform path on other systems.
///
/// If state directory cannot be determined, falls back to current directory.
pub fn default_log_path() -> PathBuf {
    if let Some(state_dir) = dirs::state_dir() {
        state_dir.join("pagewise").join("pagewise.log")
    } else {
        PathBuf::from("pagewise.log")
    }
}

/// Load configuration file from a specific path.
///
/// Returns `Ok(None)` if file doesn't exist (not an error - use defaults).
/// Returns `Err` if file exists but cannot be read or parsed.
///
/// # Errors
///
/// Returns error if file exists but has read or parse errors.
pub fn load_config_file(path: impl Into<PathBuf>) -> Result<Option<ConfigFile>, ConfigError> {
    let path = path.into();

    // Missing file is not an error - use defaults
    if !path.exists() {
        return Ok(None);
    }

    let contents = std::fs::read_to_string(&path).map_err(|e| ConfigError::ReadError {
        path: path.clone(),
        reason: e.to_string(),
    })?;

    let config: ConfigFile = toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
        path: path.clone(),
        reason: e.to_string(),
    })?;

    Ok(Some(config))
}

/// Resolve default config file path.
///
/// Returns `~/.config/pagewise/config.toml` on Unix, appropriate path on other platforms.
/// Returns `None` if home directory cannot be determined.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("pagewise").join("config.toml"))
}

/// Load configuration with precedence handling.
///
/// Precedence (highest to lowest):
/// 1. Explicit `config_path` argument (like CLI `--config`)
/// 2. `PAGEWISE_CONFIG` environment variable
/// 3. Default path `~/.config/pagewise/config.toml`
///
/// Missing config files are NOT errors - defaults are used.
///
/// # Errors
///
/// Returns error only if a config file exists but cannot be read or parsed.
pub fn load_config_with_precedence(
    config_path: Option<PathBuf>,
) -> Result<Option<ConfigFile>, ConfigError> {
    if let Some(path) = config_path {
        return load_config_file(path);
    }

    if let Ok(env_path) = std::env::var("PAGEWISE_CONFIG") {
        return load_config_file(PathBuf::from(env_path));
    }

    if let Some(default_path) = default_config_path() {
        return load_config_file(default_path);
    }

    Ok(None)
}

/// Apply environment variable overrides to resolved config.
///
/// Checks for:
/// - `PAGEWISE_PAGE_SIZE`: Override display page size (ignored unless a positive integer)
pub fn apply_env_overrides(mut config: ResolvedConfig) -> ResolvedConfig {
    if let Some(size) = std::env::var("PAGEWISE_PAGE_SIZE")
        .ok()
        .and_then(|raw| raw.trim().parse::<u32>().ok())
        .filter(|size| *size > 0)
    {
        config.display_page_size = size;
    }

    config
}

/// Merge config file into defaults to create resolved config.
///
/// For each field in `ConfigFile`, if `Some(value)`, use it; otherwise use default.
pub fn merge_config(config_file: Option<ConfigFile>) -> ResolvedConfig {
    let defaults = ResolvedConfig::default();

    let Some(config) = config_file else {
        return defaults;
    };

    ResolvedConfig {
        chunk_size: config.chunk_size.unwrap_or(defaults.chunk_size),
        display_page_size: config
            .display_page_size
            .unwrap_or(defaults.display_page_size),
        default_sort_field: config
            .default_sort_field
            .unwrap_or(defaults.default_sort_field),
        default_sort_direction: config
            .default_sort_direction
            .unwrap_or(defaults.default_sort_direction),
        log_file_path: config.log_file_path.unwrap_or(defaults.log_file_path),
        params: config.params.unwrap_or(defaults.params),
    }
}

/// Apply CLI argument overrides to resolved config.
///
/// CLI args have the highest precedence and override all other sources.
/// Only applies overrides for flags that were explicitly set by the user.
///
/// Precedence chain: Defaults → Config File → Env Vars → CLI Args (highest)
pub fn apply_cli_overrides(
    mut config: ResolvedConfig,
    chunk_size_override: Option<u32>,
    page_size_override: Option<u32>,
) -> ResolvedConfig {
    if let Some(chunk_size) = chunk_size_override {
        config.chunk_size = chunk_size;
    }

    if let Some(page_size) = page_size_override {
        config.display_page_size = page_size;
    }

    config
}

#[cfg(test)]
#[path = "loader_tests.rs"]
mod tests;
