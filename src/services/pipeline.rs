//! Batch filtering pipeline.

use super::seen::SeenSet;
use crate::config::FilterConfig;
use crate::matching::{Classifier, MatchTier, ProbeCache};
use crate::models::{BatchOutcome, BlockList, FeedItem, ItemVerdict};
use crate::observability::{DiagnosticEvent, EventBus};
use tracing::instrument;

const EVENT_SOURCE: &str = "pipeline";

/// Stateful feed filter: dedups items by id, classifies new ones, and keeps
/// running counts.
///
/// One instance owns its probe cache, seen-set and counters. Independent
/// instances never interfere. Every mutating operation takes `&mut self`, so
/// a reset can never interleave with a batch.
///
/// # Example
///
/// ```rust
/// use feedfilter::{FeedFilter, FeedItem};
///
/// let mut filter = FeedFilter::default();
/// let items = vec![
///     FeedItem::new("vid:1", "Prank gone wrong at the mall"),
///     FeedItem::new("vid:2", "Relaxing piano music"),
/// ];
/// let outcome = filter.process_batch(&items, &["gone wrong"], &[] as &[&str]);
/// assert_eq!(outcome.filtered_ids().collect::<Vec<_>>(), vec!["vid:1"]);
///
/// // Already-seen ids are skipped.
/// let again = filter.process_batch(&items, &["gone wrong"], &[] as &[&str]);
/// assert!(again.results.is_empty());
/// ```
#[derive(Debug)]
pub struct FeedFilter {
    classifier: Classifier,
    seen: SeenSet,
    total_filtered: u64,
    enabled: bool,
    debug: bool,
    events: Option<EventBus>,
}

impl FeedFilter {
    /// Creates a pipeline from configuration.
    #[must_use]
    pub fn new(config: &FilterConfig) -> Self {
        Self {
            classifier: Classifier::with_cache(
                config.tier,
                ProbeCache::with_size_limit(config.max_pattern_size),
            ),
            seen: SeenSet::from_config(config.seen),
            total_filtered: 0,
            enabled: config.filter_enabled,
            debug: config.debug_mode,
            events: None,
        }
    }

    /// Attaches an event bus for debug diagnostics.
    #[must_use]
    pub fn with_event_bus(mut self, bus: EventBus) -> Self {
        self.events = Some(bus);
        self
    }

    /// Classifies every unseen item against raw block-lists.
    ///
    /// Keywords and hashtags are normalized here; blank entries are dropped.
    pub fn process_batch<K, H>(&mut self, items: &[FeedItem], keywords: &[K], hashtags: &[H]) -> BatchOutcome
    where
        K: AsRef<str>,
        H: AsRef<str>,
    {
        let block = BlockList::new(keywords, hashtags);
        self.process_with(items, &block)
    }

    /// Classifies every unseen item against a normalized block-list.
    ///
    /// Items whose id was already seen are skipped without a result entry.
    /// Malformed items (blank id or title) are skipped silently. After the
    /// batch the seen-set is compacted if it passed its high-water mark.
    #[instrument(
        skip(self, items, block),
        fields(
            operation = "process_batch",
            batch_size = items.len(),
            keywords = block.keywords.len(),
            hashtags = block.hashtags.len()
        )
    )]
    pub fn process_with(&mut self, items: &[FeedItem], block: &BlockList) -> BatchOutcome {
        if !self.enabled {
            tracing::debug!("Filtering disabled, batch passed through");
            return BatchOutcome {
                results: Vec::new(),
                filtered_count: 0,
                total_filtered: self.total_filtered,
            };
        }

        let mut results = Vec::with_capacity(items.len());
        let mut filtered_count = 0usize;
        let mut skipped_seen = 0usize;
        let mut skipped_malformed = 0usize;

        for item in items {
            if !item.is_well_formed() {
                skipped_malformed += 1;
                continue;
            }
            if !self.seen.insert(&item.id) {
                skipped_seen += 1;
                continue;
            }

            let result = self
                .classifier
                .classify(item, &block.keywords, &block.hashtags);
            metrics::counter!("feedfilter_items_processed_total").increment(1);

            if let Some(match_type) = result.match_type {
                filtered_count += 1;
                metrics::counter!(
                    "feedfilter_items_filtered_total",
                    "match_type" => match_type.to_string()
                )
                .increment(1);
                tracing::debug!(
                    id = %item.id,
                    term = result.matched_term.as_deref().unwrap_or_default(),
                    match_type = %match_type,
                    "Filtered item"
                );
                if self.debug {
                    self.emit(format!(
                        "filtered {} ({match_type}: {})",
                        item.id,
                        result.matched_term.as_deref().unwrap_or_default()
                    ));
                }
            }

            results.push(ItemVerdict {
                id: item.id.clone(),
                result,
            });
        }

        self.total_filtered += filtered_count as u64;
        let compacted = self.seen.compact();
        self.seen.record_size();

        tracing::info!(
            processed = results.len(),
            filtered = filtered_count,
            skipped_seen,
            skipped_malformed,
            compacted,
            total_filtered = self.total_filtered,
            "Processed batch"
        );
        if self.debug {
            self.emit(format!(
                "batch: {} processed, {filtered_count} filtered, {} total",
                results.len(),
                self.total_filtered
            ));
        }

        BatchOutcome {
            results,
            filtered_count,
            total_filtered: self.total_filtered,
        }
    }

    /// Clears the seen-set and the running total. Cached probes are kept.
    pub fn reset(&mut self) {
        self.seen.clear();
        self.total_filtered = 0;
        tracing::info!("Filter state reset");
        if self.debug {
            self.emit("state reset".to_string());
        }
    }

    /// Compacts the seen-set if it is above its high-water mark. Returns the
    /// number of ids removed.
    pub fn compact(&mut self) -> usize {
        self.seen.compact()
    }

    /// Toggles diagnostic event emission.
    pub fn set_debug_enabled(&mut self, enabled: bool) {
        self.debug = enabled;
        tracing::debug!(enabled, "Debug mode changed");
    }

    /// Turns filtering on or off.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Changes the match tier for subsequent batches.
    pub fn set_tier(&mut self, tier: MatchTier) {
        self.classifier.set_tier(tier);
    }

    /// Returns whether filtering is on.
    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Returns whether debug diagnostics are on.
    #[must_use]
    pub const fn is_debug_enabled(&self) -> bool {
        self.debug
    }

    /// Items filtered since creation or the last reset.
    #[must_use]
    pub const fn total_filtered(&self) -> u64 {
        self.total_filtered
    }

    /// Returns the seen-set.
    #[must_use]
    pub const fn seen(&self) -> &SeenSet {
        &self.seen
    }

    /// Returns the classifier.
    #[must_use]
    pub const fn classifier(&self) -> &Classifier {
        &self.classifier
    }

    fn emit(&self, message: String) {
        if let Some(bus) = &self.events {
            bus.publish(DiagnosticEvent::new(EVENT_SOURCE, message));
        }
    }
}

impl Default for FeedFilter {
    fn default() -> Self {
        Self::new(&FilterConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SeenSetConfig;
    use crate::models::{MatchKind, MatchType};

    const NONE: &[&str] = &[];

    fn item(id: &str, title: &str) -> FeedItem {
        FeedItem::new(id, title)
    }

    #[test]
    fn test_end_to_end() {
        let mut filter = FeedFilter::default();
        let items = vec![item("vid:1", "Test Video with EXPOSED scandal disaster")];
        let outcome = filter.process_batch(&items, &["exposed", "disaster"], NONE);
        assert_eq!(outcome.filtered_count, 1);
        assert_eq!(outcome.total_filtered, 1);
        let verdict = &outcome.results[0];
        assert_eq!(verdict.id, "vid:1");
        assert_eq!(verdict.result.matched_term.as_deref(), Some("exposed"));
        assert_eq!(verdict.result.match_type, Some(MatchType::Title(MatchKind::Word)));
    }

    #[test]
    fn test_repeated_ids_are_not_recounted() {
        let mut filter = FeedFilter::default();
        let items = vec![item("a", "rage"), item("a", "rage"), item("b", "calm")];
        let first = filter.process_batch(&items, &["rage"], NONE);
        assert_eq!(first.results.len(), 2);
        assert_eq!(first.filtered_count, 1);

        let second = filter.process_batch(&items, &["rage"], NONE);
        assert!(second.results.is_empty());
        assert_eq!(second.filtered_count, 0);
        assert_eq!(second.total_filtered, 1);
    }

    #[test]
    fn test_malformed_items_are_skipped() {
        let mut filter = FeedFilter::default();
        let items = vec![item("", "rage"), item("x", "  "), item("y", "rage")];
        let outcome = filter.process_batch(&items, &["rage"], NONE);
        assert_eq!(outcome.results.len(), 1);
        assert_eq!(outcome.results[0].id, "y");
        assert!(!filter.seen().contains("x"));
    }

    #[test]
    fn test_reset_allows_reclassification() {
        let mut filter = FeedFilter::default();
        let items = vec![item("a", "rage")];
        filter.process_batch(&items, &["rage"], NONE);
        filter.reset();
        assert_eq!(filter.total_filtered(), 0);
        assert!(filter.seen().is_empty());
        let outcome = filter.process_batch(&items, &["rage"], NONE);
        assert_eq!(outcome.filtered_count, 1);
        assert_eq!(outcome.total_filtered, 1);
    }

    #[test]
    fn test_disabled_filter_passes_through() {
        let config = FilterConfig {
            filter_enabled: false,
            ..FilterConfig::default()
        };
        let mut filter = FeedFilter::new(&config);
        let outcome = filter.process_batch(&[item("a", "rage")], &["rage"], NONE);
        assert!(outcome.results.is_empty());
        assert!(filter.seen().is_empty());

        filter.set_enabled(true);
        let outcome = filter.process_batch(&[item("a", "rage")], &["rage"], NONE);
        assert_eq!(outcome.filtered_count, 1);
    }

    #[test]
    fn test_compaction_after_batch() {
        let config = FilterConfig {
            seen: SeenSetConfig {
                high_water: 4,
                retain: 2,
            },
            ..FilterConfig::default()
        };
        let mut filter = FeedFilter::new(&config);
        let items: Vec<FeedItem> = (1..=5).map(|i| item(&i.to_string(), "calm")).collect();
        let outcome = filter.process_batch(&items, &["rage"], NONE);
        // Every item of the batch is processed before compaction runs.
        assert_eq!(outcome.results.len(), 5);
        assert_eq!(filter.seen().ids_oldest_first().collect::<Vec<_>>(), vec!["4", "5"]);
    }

    #[test]
    fn test_empty_lists_pass_everything() {
        let mut filter = FeedFilter::default();
        let outcome = filter.process_batch(&[item("a", "rage")], NONE, NONE);
        assert_eq!(outcome.results.len(), 1);
        assert!(!outcome.results[0].result.filtered);
    }

    #[tokio::test]
    async fn test_debug_events_emitted_only_when_enabled() {
        let bus = EventBus::new(16);
        let mut rx = bus.subscribe();
        let mut filter = FeedFilter::default().with_event_bus(bus);

        filter.process_batch(&[item("a", "rage")], &["rage"], NONE);
        assert!(rx.try_recv().is_err());

        filter.set_debug_enabled(true);
        filter.process_batch(&[item("b", "rage")], &["rage"], NONE);
        let event = rx.recv().await.expect("diagnostic event");
        assert!(event.message.contains("filtered b"));
    }
}
