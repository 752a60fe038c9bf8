//! Bounded, insertion-ordered set of processed item ids.

use crate::config::SeenSetConfig;
use lru::LruCache;

/// Ids of items that have already been classified.
///
/// Membership tests never reorder entries, so eviction order is insertion
/// order. The set is allowed to grow past the high-water mark while a batch is
/// running; [`SeenSet::compact`] trims it back between batches.
#[derive(Debug)]
pub struct SeenSet {
    ids: LruCache<String, ()>,
    high_water: usize,
    retain: usize,
}

impl SeenSet {
    /// Creates an empty set. `retain` is clamped to `high_water`.
    #[must_use]
    pub fn new(high_water: usize, retain: usize) -> Self {
        Self {
            ids: LruCache::unbounded(),
            high_water,
            retain: retain.min(high_water),
        }
    }

    /// Creates an empty set from configuration.
    #[must_use]
    pub fn from_config(config: SeenSetConfig) -> Self {
        Self::new(config.high_water, config.retain)
    }

    /// Returns true if the id has been recorded.
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    /// Records an id. Returns false if it was already present, in which case
    /// its position is left unchanged.
    pub fn insert(&mut self, id: &str) -> bool {
        if self.ids.contains(id) {
            return false;
        }
        self.ids.put(id.to_string(), ());
        true
    }

    /// Returns true when the set has grown past its high-water mark.
    #[must_use]
    pub fn needs_compaction(&self) -> bool {
        self.ids.len() > self.high_water
    }

    /// Drops the oldest ids until only the most recent `retain` remain, if the
    /// set is above its high-water mark. Returns the number of ids removed.
    pub fn compact(&mut self) -> usize {
        if !self.needs_compaction() {
            return 0;
        }
        let mut removed = 0;
        while self.ids.len() > self.retain && self.ids.pop_lru().is_some() {
            removed += 1;
        }
        tracing::debug!(removed, remaining = self.ids.len(), "Compacted seen-set");
        self.record_size();
        removed
    }

    /// Forgets every id.
    pub fn clear(&mut self) {
        self.ids.clear();
        self.record_size();
    }

    /// Returns the number of recorded ids.
    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Returns true if no ids are recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Returns the high-water mark.
    #[must_use]
    pub const fn high_water(&self) -> usize {
        self.high_water
    }

    /// Returns the retain count.
    #[must_use]
    pub const fn retain(&self) -> usize {
        self.retain
    }

    /// Iterates over recorded ids from oldest to newest.
    pub fn ids_oldest_first(&self) -> impl Iterator<Item = &str> {
        self.ids.iter().rev().map(|(id, ())| id.as_str())
    }

    #[allow(clippy::cast_precision_loss)]
    pub(crate) fn record_size(&self) {
        metrics::gauge!("feedfilter_seen_set_size").set(self.ids.len() as f64);
    }
}

impl Default for SeenSet {
    fn default() -> Self {
        Self::from_config(SeenSetConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_and_contains() {
        let mut seen = SeenSet::new(10, 5);
        assert!(seen.insert("a"));
        assert!(!seen.insert("a"));
        assert!(seen.contains("a"));
        assert!(!seen.contains("b"));
        assert_eq!(seen.len(), 1);
    }

    #[test]
    fn test_compaction_keeps_most_recent() {
        let mut seen = SeenSet::default();
        for i in 1..=1001 {
            seen.insert(&i.to_string());
        }
        assert!(seen.needs_compaction());
        assert_eq!(seen.compact(), 501);
        assert_eq!(seen.len(), 500);
        assert!(!seen.contains("501"));
        assert!(seen.contains("502"));
        assert!(seen.contains("1001"));
        assert_eq!(seen.ids_oldest_first().next(), Some("502"));
    }

    #[test]
    fn test_no_compaction_at_high_water() {
        let mut seen = SeenSet::new(3, 1);
        for id in ["a", "b", "c"] {
            seen.insert(id);
        }
        assert!(!seen.needs_compaction());
        assert_eq!(seen.compact(), 0);
        assert_eq!(seen.len(), 3);
    }

    #[test]
    fn test_contains_does_not_reorder() {
        let mut seen = SeenSet::new(2, 1);
        seen.insert("a");
        seen.insert("b");
        seen.insert("c");
        assert!(seen.contains("a"));
        assert!(!seen.insert("a"));
        seen.compact();
        assert_eq!(seen.ids_oldest_first().collect::<Vec<_>>(), vec!["c"]);
    }

    #[test]
    fn test_retain_clamped_to_high_water() {
        let seen = SeenSet::new(2, 10);
        assert_eq!(seen.retain(), 2);
        assert_eq!(seen.high_water(), 2);
    }

    #[test]
    fn test_clear() {
        let mut seen = SeenSet::new(10, 5);
        seen.insert("a");
        seen.clear();
        assert!(seen.is_empty());
        assert!(!seen.contains("a"));
    }
}
