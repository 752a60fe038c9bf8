//! Per-keyword probe cache.

use super::probes::{DEFAULT_PROBE_SIZE_LIMIT, ProbeSet};
use std::collections::HashMap;
use std::sync::Arc;

/// Caches compiled probe sets by normalized keyword text.
///
/// Entries live for the lifetime of the cache and are never invalidated. A
/// changed block-list simply adds entries; stale ones are harmless because
/// they are keyed by exact keyword text. Compile failures are cached as `None`
/// so a bad keyword is only compiled once.
#[derive(Debug, Clone)]
pub struct ProbeCache {
    entries: HashMap<String, Option<Arc<ProbeSet>>>,
    size_limit: usize,
}

impl ProbeCache {
    /// Creates an empty cache using the default probe size limit.
    #[must_use]
    pub fn new() -> Self {
        Self::with_size_limit(DEFAULT_PROBE_SIZE_LIMIT)
    }

    /// Creates an empty cache with a per-probe compiled-size limit.
    #[must_use]
    pub fn with_size_limit(size_limit: usize) -> Self {
        Self {
            entries: HashMap::new(),
            size_limit,
        }
    }

    /// Returns the probe set for a normalized keyword, compiling it on first use.
    ///
    /// `None` means compilation failed and the caller must use substring
    /// containment.
    pub fn get_or_compile(&mut self, keyword: &str) -> Option<Arc<ProbeSet>> {
        if let Some(entry) = self.entries.get(keyword) {
            return entry.clone();
        }
        let compiled = ProbeSet::compile_with_limit(keyword, self.size_limit).map(Arc::new);
        tracing::debug!(
            keyword = %keyword,
            compiled = compiled.is_some(),
            "Cached probe set"
        );
        self.entries.insert(keyword.to_string(), compiled.clone());
        compiled
    }

    /// Returns true if the keyword has been compiled (successfully or not).
    #[must_use]
    pub fn contains(&self, keyword: &str) -> bool {
        self.entries.contains_key(keyword)
    }

    /// Returns the number of cached keywords.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if nothing has been cached yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the configured per-probe size limit.
    #[must_use]
    pub const fn size_limit(&self) -> usize {
        self.size_limit
    }
}

impl Default for ProbeCache {
    fn default() -> Self {
        Self::new()
    }
}
