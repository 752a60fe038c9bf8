//! Configuration management.

mod defaults;

pub use defaults::{DEFAULT_KEYWORDS, DEFAULT_SEEN_HIGH_WATER, DEFAULT_SEEN_RETAIN};

use crate::matching::{DEFAULT_PROBE_SIZE_LIMIT, MatchTier};
use crate::models::BlockList;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable naming an explicit config file.
pub const ENV_CONFIG_PATH: &str = "FEEDFILTER_CONFIG_PATH";
/// Environment variable overriding the match tier.
pub const ENV_TIER: &str = "FEEDFILTER_TIER";
/// Environment variable overriding debug mode.
pub const ENV_DEBUG: &str = "FEEDFILTER_DEBUG";
/// Environment variable overriding the master switch.
pub const ENV_ENABLED: &str = "FEEDFILTER_ENABLED";

/// Main configuration for feedfilter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilterConfig {
    /// Master switch. When off, batches pass through untouched.
    pub filter_enabled: bool,
    /// Emit diagnostic events and verbose logs.
    pub debug_mode: bool,
    /// Blocked keywords and phrases, as the user wrote them.
    pub block_keywords: Vec<String>,
    /// Blocked hashtags, with or without `#`.
    pub block_hashtags: Vec<String>,
    /// Matching aggressiveness for single-word keywords.
    pub tier: MatchTier,
    /// Seen-set bounds.
    pub seen: SeenSetConfig,
    /// Compiled-size limit per probe, in bytes.
    pub max_pattern_size: usize,
    /// Logging settings.
    pub logging: LoggingSettings,
}

/// Seen-set bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SeenSetConfig {
    /// Size above which the set is compacted.
    pub high_water: usize,
    /// Number of most recent ids kept by compaction.
    pub retain: usize,
}

impl Default for SeenSetConfig {
    fn default() -> Self {
        Self {
            high_water: DEFAULT_SEEN_HIGH_WATER,
            retain: DEFAULT_SEEN_RETAIN,
        }
    }
}

/// Logging settings from the config file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// Output format: `pretty` or `json`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    /// `EnvFilter` directive, used when `RUST_LOG` is unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter: Option<String>,
}

/// Configuration file structure (for TOML parsing).
#[derive(Debug, Deserialize, Default)]
pub struct ConfigFile {
    /// Master switch.
    pub filter_enabled: Option<bool>,
    /// Debug mode.
    pub debug_mode: Option<bool>,
    /// Blocked keywords.
    pub block_keywords: Option<Vec<String>>,
    /// Blocked hashtags.
    pub block_hashtags: Option<Vec<String>>,
    /// Match tier name.
    pub tier: Option<String>,
    /// Probe size limit.
    pub max_pattern_size: Option<usize>,
    /// Seen-set section.
    pub seen: Option<ConfigFileSeen>,
    /// Logging section.
    pub logging: Option<LoggingSettings>,
}

/// Seen-set section in config file.
#[derive(Debug, Deserialize, Default)]
pub struct ConfigFileSeen {
    /// High-water mark.
    pub high_water: Option<usize>,
    /// Retain count.
    pub retain: Option<usize>,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            filter_enabled: true,
            debug_mode: false,
            block_keywords: DEFAULT_KEYWORDS.iter().map(ToString::to_string).collect(),
            block_hashtags: Vec::new(),
            tier: MatchTier::default(),
            seen: SeenSetConfig::default(),
            max_pattern_size: DEFAULT_PROBE_SIZE_LIMIT,
            logging: LoggingSettings::default(),
        }
    }
}

impl FilterConfig {
    /// Creates a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or names an
    /// unknown tier.
    pub fn load_from_file(path: &Path) -> crate::Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| crate::Error::OperationFailed {
            operation: "read_config_file".to_string(),
            cause: format!("{}: {e}", path.display()),
        })?;

        let file: ConfigFile = toml::from_str(&contents).map_err(|e| crate::Error::OperationFailed {
            operation: "parse_config_file".to_string(),
            cause: e.to_string(),
        })?;

        Self::from_config_file(file)
    }

    /// Loads configuration from the default location.
    ///
    /// A file named by `FEEDFILTER_CONFIG_PATH` is loaded like `--config`.
    /// Otherwise the following paths are searched in order:
    /// 1. Platform-specific config dir (`~/Library/Application Support/feedfilter/` on macOS)
    /// 2. XDG config dir (`~/.config/feedfilter/` for Unix compatibility)
    ///
    /// Returns default configuration if no config file is found.
    ///
    /// # Errors
    ///
    /// Returns an error if the file named by `FEEDFILTER_CONFIG_PATH` cannot
    /// be loaded.
    pub fn load_default() -> crate::Result<Self> {
        Self::load_first(Self::explicit_path().as_deref(), &Self::default_paths())
    }

    /// Loads `explicit` if given, else the first loadable file in `search`.
    ///
    /// Unreadable search-path files are logged and skipped; an explicit path
    /// must load.
    ///
    /// # Errors
    ///
    /// Returns an error if `explicit` cannot be read or parsed.
    pub fn load_first(explicit: Option<&Path>, search: &[PathBuf]) -> crate::Result<Self> {
        if let Some(path) = explicit {
            return Self::load_from_file(path);
        }
        Ok(search
            .iter()
            .filter(|path| path.exists())
            .find_map(|path| match Self::load_from_file(path) {
                Ok(config) => Some(config),
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "Ignoring config file");
                    None
                },
            })
            .unwrap_or_default())
    }

    /// The config file named by `FEEDFILTER_CONFIG_PATH`, if set.
    #[must_use]
    pub fn explicit_path() -> Option<PathBuf> {
        std::env::var(ENV_CONFIG_PATH)
            .ok()
            .filter(|path| !path.trim().is_empty())
            .map(PathBuf::from)
    }

    /// Platform config file paths, most specific first.
    #[must_use]
    pub fn default_paths() -> Vec<PathBuf> {
        let mut paths = Vec::new();
        if let Some(base_dirs) = directories::BaseDirs::new() {
            paths.push(base_dirs.config_dir().join("feedfilter").join("config.toml"));
            paths.push(
                base_dirs
                    .home_dir()
                    .join(".config")
                    .join("feedfilter")
                    .join("config.toml"),
            );
        }
        paths.dedup();
        paths
    }

    /// Converts a `ConfigFile` to `FilterConfig`.
    fn from_config_file(file: ConfigFile) -> crate::Result<Self> {
        let mut config = Self::default();

        if let Some(v) = file.filter_enabled {
            config.filter_enabled = v;
        }
        if let Some(v) = file.debug_mode {
            config.debug_mode = v;
        }
        // An empty keyword list falls back to the defaults, as on first install.
        if let Some(keywords) = file.block_keywords.filter(|k| !k.is_empty()) {
            config.block_keywords = keywords;
        }
        if let Some(hashtags) = file.block_hashtags {
            config.block_hashtags = hashtags;
        }
        if let Some(tier) = file.tier {
            config.tier = tier.parse()?;
        }
        if let Some(size) = file.max_pattern_size {
            config.max_pattern_size = size;
        }
        if let Some(seen) = file.seen {
            if let Some(v) = seen.high_water {
                config.seen.high_water = v;
            }
            if let Some(v) = seen.retain {
                config.seen.retain = v;
            }
        }
        if let Some(logging) = file.logging {
            config.logging = logging;
        }

        config.seen = config.seen.clamped();
        Ok(config)
    }

    /// Applies `FEEDFILTER_*` environment overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if `FEEDFILTER_TIER` names an unknown tier.
    pub fn apply_env_overrides(&mut self) -> crate::Result<()> {
        if let Ok(tier) = std::env::var(ENV_TIER) {
            self.tier = tier.parse()?;
        }
        if let Some(v) = env_flag(ENV_DEBUG) {
            self.debug_mode = v;
        }
        if let Some(v) = env_flag(ENV_ENABLED) {
            self.filter_enabled = v;
        }
        Ok(())
    }

    /// Returns the normalized block-lists.
    #[must_use]
    pub fn block_list(&self) -> BlockList {
        BlockList::new(&self.block_keywords, &self.block_hashtags)
    }

    /// Replaces the keyword list from newline-separated text.
    #[must_use]
    pub fn with_keyword_lines(mut self, text: &str) -> Self {
        self.block_keywords = parse_lines(text);
        self
    }

    /// Replaces the hashtag list from newline-separated text.
    #[must_use]
    pub fn with_hashtag_lines(mut self, text: &str) -> Self {
        self.block_hashtags = parse_lines(text);
        self
    }

    /// Sets the match tier.
    #[must_use]
    pub const fn with_tier(mut self, tier: MatchTier) -> Self {
        self.tier = tier;
        self
    }
}

impl SeenSetConfig {
    /// Returns bounds with `retain` no larger than `high_water`.
    #[must_use]
    pub fn clamped(self) -> Self {
        Self {
            high_water: self.high_water,
            retain: self.retain.min(self.high_water),
        }
    }
}

/// Splits newline-separated list text, trimming entries and dropping blanks.
#[must_use]
pub fn parse_lines(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(ToString::to_string)
        .collect()
}

fn env_flag(name: &str) -> Option<bool> {
    let value = std::env::var(name).ok()?;
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
