//! Record file loading.
//!
//! Reads a JSONL file (one record per line) into memory. Malformed lines are
//! logged and skipped so that one bad row does not hide the rest of the data.

use crate::model::Record;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::warn;

/// Errors encountered when reading a record file.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The record file does not exist.
    #[error("File not found: {path}")]
    FileNotFound {
        /// Path that was attempted.
        path: PathBuf,
    },

    /// Reading the file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Load records from a JSONL file.
///
/// Blank lines are ignored. Lines that fail to parse are logged with their
/// line number and skipped.
///
/// # Errors
///
/// Returns `LoadError::FileNotFound` if the file does not exist.
/// Returns `LoadError::Io` for other I/O errors.
pub fn load_records(path: impl AsRef<Path>) -> Result<Vec<Record>, LoadError> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(LoadError::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    let reader = BufReader::new(File::open(path)?);
    let mut records = Vec::new();

    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        match serde_json::from_str::<Record>(&line) {
            Ok(record) => records.push(record),
            Err(e) => warn!(
                path = %path.display(),
                line = index + 1,
                error = %e,
                "Skipping malformed record"
            ),
        }
    }

    Ok(records)
}
