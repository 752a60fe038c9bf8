//! Persisted lifetime filter counter.

use crate::{Error, Result, current_timestamp};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// File name of the stats file inside the data directory.
const STATS_FILE_NAME: &str = "stats.json";

/// Lifetime count of filtered items, stored as JSON.
///
/// Separate from a pipeline's in-memory total, which resets with the pipeline.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterStats {
    /// Items filtered across all runs.
    pub filtered_count: u64,
    /// Batches recorded.
    #[serde(default)]
    pub batches: u64,
    /// Unix timestamp of the last update, if any.
    #[serde(default)]
    pub updated_at: Option<u64>,
}

impl FilterStats {
    /// Default stats file location in the platform data directory.
    #[must_use]
    pub fn default_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "feedfilter")
            .map(|dirs| dirs.data_dir().join(STATS_FILE_NAME))
    }

    /// Loads stats from a file. A missing file yields zeroed stats.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = fs::read_to_string(path).map_err(|e| Error::OperationFailed {
            operation: "read_stats_file".to_string(),
            cause: format!("{}: {e}", path.display()),
        })?;
        serde_json::from_str(&contents).map_err(|e| Error::OperationFailed {
            operation: "parse_stats_file".to_string(),
            cause: e.to_string(),
        })
    }

    /// Writes stats to a file, creating parent directories.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| Error::OperationFailed {
                operation: "create_stats_dir".to_string(),
                cause: e.to_string(),
            })?;
        }
        let json = serde_json::to_string_pretty(self).map_err(|e| Error::OperationFailed {
            operation: "serialize_stats".to_string(),
            cause: e.to_string(),
        })?;
        fs::write(path, json).map_err(|e| Error::OperationFailed {
            operation: "write_stats_file".to_string(),
            cause: format!("{}: {e}", path.display()),
        })
    }

    /// Adds one batch's filtered count.
    pub fn add(&mut self, filtered: u64) {
        self.filtered_count = self.filtered_count.saturating_add(filtered);
        self.batches = self.batches.saturating_add(1);
        self.updated_at = Some(current_timestamp());
    }

    /// Zeroes every counter.
    pub fn reset(&mut self) {
        *self = Self {
            updated_at: Some(current_timestamp()),
            ..Self::default()
        };
    }

    /// Loads, adds, and saves in one step. Returns the updated stats.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or written.
    pub fn record(path: &Path, filtered: u64) -> Result<Self> {
        let mut stats = Self::load(path)?;
        stats.add(filtered);
        stats.save(path)?;
        Ok(stats)
    }
}
