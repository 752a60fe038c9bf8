//! # Feedfilter
//!
//! Keyword and hashtag filtering engine for video feeds.
//!
//! Feedfilter decides which feed items (video cards) should be hidden based on
//! a user-supplied block-list. The host scrapes the page and hands over plain
//! [`FeedItem`] records; feedfilter answers with a [`MatchResult`] per item.
//!
//! ## Features
//!
//! - Boundary-aware single-word matching with plural and possessive forms
//! - Substring matching for multi-word phrases
//! - Opt-in heuristics for obfuscated, spaced-out and zero-width spellings
//! - Exact hashtag matching, badge and channel-name matching
//! - Batch pipeline with id-based dedup and a bounded seen-set
//!
//! ## Example
//!
//! ```rust
//! use feedfilter::{FeedFilter, FeedItem};
//!
//! let mut filter = FeedFilter::default();
//! let items = vec![FeedItem::new("vid:1", "Test Video with EXPOSED scandal")];
//! let outcome = filter.process_batch(&items, &["exposed"], &[] as &[&str]);
//! assert_eq!(outcome.filtered_count, 1);
//! ```

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![warn(missing_docs)]
#![forbid(unsafe_code)]
#![allow(clippy::multiple_crate_versions)]

use thiserror::Error as ThisError;

// Module declarations
pub mod config;
pub mod matching;
pub mod models;
pub mod observability;
pub mod services;

// Re-exports for convenience
pub use config::{FilterConfig, SeenSetConfig};
pub use matching::{Classifier, MatchTier, ProbeCache, ProbeSet, evaluate};
pub use models::{
    BatchOutcome, BlockList, FeedItem, Hashtag, ItemVerdict, Keyword, MatchKind, MatchResult,
    MatchType,
};
pub use services::{FeedFilter, FilterStats, FilterWorker, SeenSet};

/// Error type for feedfilter operations.
///
/// The matching core never returns errors; these variants cover the outer
/// surfaces (configuration files, statistics persistence, logging setup,
/// worker channels).
///
/// | Variant | Raised When |
/// |---------|-------------|
/// | `InvalidInput` | Unparseable item JSON, unknown tier names |
/// | `OperationFailed` | I/O errors, TOML/JSON parse failures, worker shutdown |
#[derive(Debug, ThisError)]
pub enum Error {
    /// Invalid input was provided.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// An operation failed.
    #[error("operation '{operation}' failed: {cause}")]
    OperationFailed {
        /// The operation that failed.
        operation: String,
        /// The underlying cause.
        cause: String,
    },
}

impl Error {
    /// Builds an [`Error::OperationFailed`] from an operation name and any displayable cause.
    pub fn operation(operation: &str, cause: impl std::fmt::Display) -> Self {
        Self::OperationFailed {
            operation: operation.to_string(),
            cause: cause.to_string(),
        }
    }
}

/// Result type alias for feedfilter operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Returns the current Unix timestamp in seconds.
///
/// Falls back to 0 if the system clock is before the Unix epoch.
#[must_use]
pub fn current_timestamp() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::InvalidInput("bad item".to_string());
        assert_eq!(err.to_string(), "invalid input: bad item");

        let err = Error::OperationFailed {
            operation: "read_config_file".to_string(),
            cause: "not found".to_string(),
        };
        assert_eq!(err.to_string(), "operation 'read_config_file' failed: not found");

        let err = Error::operation("save_stats", "disk full");
        assert_eq!(err.to_string(), "operation 'save_stats' failed: disk full");
    }

    #[test]
    fn test_current_timestamp_is_recent() {
        assert!(current_timestamp() > 1_600_000_000);
    }
}
