//! Structured logging.

use crate::config::LoggingSettings;
use tracing_subscriber::EnvFilter;

/// Default filter directive when neither `RUST_LOG` nor settings give one.
const DEFAULT_FILTER: &str = "info";

/// Filter directive used for verbose or debug runs.
const VERBOSE_FILTER: &str = "feedfilter=debug,info";

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable multi-line output.
    #[default]
    Pretty,
    /// One JSON object per line.
    Json,
}

impl LogFormat {
    /// Parses a format name; anything other than `json` is pretty.
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "json" => Self::Json,
            _ => Self::Pretty,
        }
    }
}

/// Resolved logging configuration.
#[derive(Debug)]
pub struct LoggingConfig {
    /// Output format.
    pub format: LogFormat,
    /// Level filter.
    pub filter: EnvFilter,
}

impl LoggingConfig {
    /// Resolves logging configuration.
    ///
    /// `RUST_LOG` wins over everything. Otherwise verbose runs log the crate
    /// at debug, then the configured directive, then `info`.
    #[must_use]
    pub fn from_settings(settings: Option<&LoggingSettings>, verbose: bool) -> Self {
        let format = settings
            .and_then(|s| s.format.as_deref())
            .map(LogFormat::parse)
            .unwrap_or_default();

        let directive = if verbose {
            VERBOSE_FILTER
        } else {
            settings
                .and_then(|s| s.filter.as_deref())
                .unwrap_or(DEFAULT_FILTER)
        };
        let filter = EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(directive))
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

        Self { format, filter }
    }
}
