//! Item classification.
//!
//! Tiers are checked in a fixed priority order and the first hit wins:
//!
//! 1. hashtag (exact)
//! 2. badge (equality or containment)
//! 3. channel name (equality or containment)
//! 4. title, then description, per keyword in list order

use super::cache::ProbeCache;
use super::evaluator::{MatchTier, evaluate_lowercase};
use crate::models::{FeedItem, Hashtag, Keyword, MatchResult, MatchType};

/// Decides whether a feed item should be hidden.
///
/// Owns the probe cache, so compiled probes are reused across every item and
/// batch the classifier sees.
#[derive(Debug, Clone, Default)]
pub struct Classifier {
    cache: ProbeCache,
    tier: MatchTier,
}

impl Classifier {
    /// Creates a classifier with the given tier and an empty cache.
    #[must_use]
    pub fn new(tier: MatchTier) -> Self {
        Self::with_cache(tier, ProbeCache::new())
    }

    /// Creates a classifier with a pre-configured cache.
    #[must_use]
    pub const fn with_cache(tier: MatchTier, cache: ProbeCache) -> Self {
        Self { cache, tier }
    }

    /// Returns the active tier.
    #[must_use]
    pub const fn tier(&self) -> MatchTier {
        self.tier
    }

    /// Changes the tier. Cached probes stay valid.
    pub fn set_tier(&mut self, tier: MatchTier) {
        self.tier = tier;
    }

    /// Returns the probe cache.
    #[must_use]
    pub const fn cache(&self) -> &ProbeCache {
        &self.cache
    }

    /// Classifies one item against the block-lists. Never fails; absent
    /// fields simply produce no match for their tier.
    pub fn classify(
        &mut self,
        item: &FeedItem,
        keywords: &[Keyword],
        hashtags: &[Hashtag],
    ) -> MatchResult {
        if let Some(tag) = match_hashtags(item, hashtags) {
            return MatchResult::matched(tag.original(), MatchType::Hashtag);
        }

        if !keywords.is_empty() {
            if let Some(keyword) = match_badges(item, keywords) {
                return MatchResult::matched(keyword.original(), MatchType::Badge);
            }
            if let Some(keyword) = match_channel(item, keywords) {
                return MatchResult::matched(keyword.original(), MatchType::Channel);
            }
            if let Some(result) = self.match_text(item, keywords) {
                return result;
            }
        }

        MatchResult::unfiltered()
    }

    fn match_text(&mut self, item: &FeedItem, keywords: &[Keyword]) -> Option<MatchResult> {
        let title = item.title.to_lowercase();
        let description = item.description_text().map(str::to_lowercase);

        for keyword in keywords {
            let probes = if keyword.is_phrase() {
                None
            } else {
                self.cache.get_or_compile(keyword.as_str())
            };
            let probes = probes.as_deref();

            if let Some(kind) = evaluate_lowercase(&title, keyword, probes, self.tier) {
                return Some(MatchResult::matched(keyword.original(), MatchType::Title(kind)));
            }
            if let Some(kind) = description
                .as_deref()
                .and_then(|d| evaluate_lowercase(d, keyword, probes, self.tier))
            {
                return Some(MatchResult::matched(
                    keyword.original(),
                    MatchType::Description(kind),
                ));
            }
        }
        None
    }
}

fn match_hashtags<'a>(item: &FeedItem, hashtags: &'a [Hashtag]) -> Option<&'a Hashtag> {
    if item.hashtags.is_empty() {
        return None;
    }
    hashtags
        .iter()
        .find(|blocked| item.hashtags.iter().any(|tag| blocked.matches_tag(tag)))
}

fn match_badges<'a>(item: &FeedItem, keywords: &'a [Keyword]) -> Option<&'a Keyword> {
    item.badges.iter().find_map(|badge| {
        let badge = badge.trim().to_lowercase();
        if badge.is_empty() {
            return None;
        }
        keywords.iter().find(|k| badge.contains(k.as_str()))
    })
}

fn match_channel<'a>(item: &FeedItem, keywords: &'a [Keyword]) -> Option<&'a Keyword> {
    let channel = item.channel_text()?.to_lowercase();
    keywords.iter().find(|k| channel.contains(k.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BlockList, MatchKind};

    fn lists(keywords: &[&str], hashtags: &[&str]) -> BlockList {
        BlockList::new(keywords, hashtags)
    }

    fn classify(item: &FeedItem, keywords: &[&str], hashtags: &[&str], tier: MatchTier) -> MatchResult {
        let block = lists(keywords, hashtags);
        Classifier::new(tier).classify(item, &block.keywords, &block.hashtags)
    }

    #[test]
    fn test_end_to_end_title_word() {
        let item = FeedItem::new("vid:1", "Test Video with EXPOSED scandal disaster");
        let result = classify(&item, &["exposed", "disaster"], &[], MatchTier::Hardened);
        assert!(result.filtered);
        assert_eq!(result.matched_term.as_deref(), Some("exposed"));
        assert_eq!(result.match_type, Some(MatchType::Title(MatchKind::Word)));
    }

    #[test]
    fn test_hashtag_priority_over_title() {
        let item = FeedItem::new("vid:1", "Breaking news tonight").with_hashtag("News");
        let result = classify(&item, &["news"], &["#news"], MatchTier::Hardened);
        assert_eq!(result.match_type, Some(MatchType::Hashtag));
        assert_eq!(result.matched_term.as_deref(), Some("#news"));
    }

    #[test]
    fn test_hashtag_exactness() {
        let tagged = |tag: &str| FeedItem::new("1", "title").with_hashtag(tag);
        assert!(classify(&tagged("news"), &[], &["#news"], MatchTier::Strict).filtered);
        assert!(classify(&tagged("#NEWS"), &[], &["news"], MatchTier::Strict).filtered);
        assert!(!classify(&tagged("#newsroom"), &[], &["#news"], MatchTier::Strict).filtered);
    }

    #[test]
    fn test_badge_containment() {
        let item = FeedItem::new("1", "calm title").with_badge("  LIVE now ");
        let result = classify(&item, &["live"], &[], MatchTier::Strict);
        assert_eq!(result.match_type, Some(MatchType::Badge));
    }

    #[test]
    fn test_badge_before_channel() {
        let item = FeedItem::new("1", "calm title")
            .with_badge("Drama")
            .with_channel("Drama Central");
        let result = classify(&item, &["drama"], &[], MatchTier::Strict);
        assert_eq!(result.match_type, Some(MatchType::Badge));
    }

    #[test]
    fn test_channel_containment() {
        let item = FeedItem::new("1", "calm title").with_channel("The Drama Channel");
        let result = classify(&item, &["drama"], &[], MatchTier::Strict);
        assert_eq!(result.match_type, Some(MatchType::Channel));
        assert_eq!(result.matched_term.as_deref(), Some("drama"));
    }

    #[test]
    fn test_description_match() {
        let item = FeedItem::new("1", "calm title").with_description("a total disaster");
        let result = classify(&item, &["disaster"], &[], MatchTier::Strict);
        assert_eq!(result.match_type, Some(MatchType::Description(MatchKind::Word)));
    }

    #[test]
    fn test_first_keyword_in_list_order_wins() {
        let item = FeedItem::new("1", "calm title").with_description("a total disaster");
        let result = classify(&item, &["disaster", "calm"], &[], MatchTier::Strict);
        assert_eq!(result.matched_term.as_deref(), Some("disaster"));
        assert_eq!(result.match_type, Some(MatchType::Description(MatchKind::Word)));
    }

    #[test]
    fn test_phrase_in_title() {
        let item = FeedItem::new("1", "Prank gone wrong at the mall");
        let result = classify(&item, &["gone wrong"], &[], MatchTier::Strict);
        assert_eq!(result.match_type, Some(MatchType::Title(MatchKind::Phrase)));
    }

    #[test]
    fn test_matched_term_keeps_user_spelling() {
        let item = FeedItem::new("1", "a rage video");
        let result = classify(&item, &["  Rage "], &[], MatchTier::Strict);
        assert_eq!(result.matched_term.as_deref(), Some("Rage"));
    }

    #[test]
    fn test_empty_lists_pass_everything() {
        let item = FeedItem::new("1", "anything at all").with_hashtag("#x");
        assert_eq!(classify(&item, &[], &[], MatchTier::Hardened), MatchResult::unfiltered());
    }

    #[test]
    fn test_regex_special_keyword_matches_by_containment() {
        let item = FeedItem::new("1", "xa(by");
        let result = classify(&item, &["a(b"], &[], MatchTier::Strict);
        assert!(result.filtered);
        assert_eq!(result.match_type, Some(MatchType::Title(MatchKind::Simple)));
    }

    #[test]
    fn test_compile_failure_falls_back_to_substring() {
        let block = lists(&["rage"], &[]);
        let mut classifier = Classifier::with_cache(MatchTier::Strict, ProbeCache::with_size_limit(10));
        let item = FeedItem::new("1", "the garage door");
        let result = classifier.classify(&item, &block.keywords, &block.hashtags);
        assert_eq!(result.match_type, Some(MatchType::Title(MatchKind::Simple)));
    }

    #[test]
    fn test_probes_are_cached_across_items() {
        let block = lists(&["rage", "gone wrong"], &[]);
        let mut classifier = Classifier::default();
        for i in 0..3 {
            let item = FeedItem::new(i.to_string(), "calm");
            classifier.classify(&item, &block.keywords, &block.hashtags);
        }
        assert_eq!(classifier.cache().len(), 1);
        assert!(classifier.cache().contains("rage"));
    }
}
