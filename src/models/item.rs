//! Feed item records supplied by the page scraper.
// Allow expect() on static regex patterns - these are guaranteed to compile
#![allow(clippy::expect_used)]

use crate::{Error, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

/// Hashtags written inline in titles and descriptions.
static INLINE_HASHTAG_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"#[A-Za-z0-9_\x{00C0}-\x{017F}]+").expect("static regex: inline hashtag")
});

/// Eleven-character video id inside a watch or shorts link.
static VIDEO_LINK_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:v=|/)([A-Za-z0-9_-]{11})(?:\?|&|/|$)").expect("static regex: video link")
});

/// One feed item (video card) as scraped from the page.
///
/// Field names accept both the short form (`id`, `title`) and the names used
/// by the browser content script (`videoId`, `titleText`, `descriptionText`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedItem {
    /// Stable identifier, identical across repeated scrapes of the same card.
    #[serde(alias = "videoId")]
    pub id: String,
    /// Title text. Items with an empty title are rejected before classification.
    #[serde(alias = "titleText")]
    pub title: String,
    /// Description snippet.
    #[serde(default, alias = "descriptionText")]
    pub description: Option<String>,
    /// Channel display name.
    #[serde(default)]
    pub channel_name: Option<String>,
    /// Short badge labels such as "New" or "Live".
    #[serde(default)]
    pub badges: Vec<String>,
    /// Tags attached to the item, with or without the leading `#`.
    #[serde(default)]
    pub hashtags: Vec<String>,
}

impl FeedItem {
    /// Creates an item with an id and a title.
    #[must_use]
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            ..Self::default()
        }
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the channel name.
    #[must_use]
    pub fn with_channel(mut self, channel: impl Into<String>) -> Self {
        self.channel_name = Some(channel.into());
        self
    }

    /// Appends a badge label.
    #[must_use]
    pub fn with_badge(mut self, badge: impl Into<String>) -> Self {
        self.badges.push(badge.into());
        self
    }

    /// Appends a hashtag.
    #[must_use]
    pub fn with_hashtag(mut self, tag: impl Into<String>) -> Self {
        self.hashtags.push(tag.into());
        self
    }

    /// Merges hashtags written inline in the title and description into
    /// [`FeedItem::hashtags`].
    ///
    /// Extracted tags are lower-cased; duplicates are skipped.
    #[must_use]
    pub fn with_extracted_hashtags(mut self) -> Self {
        let mut found = extract_hashtags(&self.title);
        if let Some(description) = &self.description {
            found.extend(extract_hashtags(description));
        }
        for tag in found {
            if !self.hashtags.iter().any(|t| t.eq_ignore_ascii_case(&tag)) {
                self.hashtags.push(tag);
            }
        }
        self
    }

    /// Returns true when the item carries the fields classification needs.
    #[must_use]
    pub fn is_well_formed(&self) -> bool {
        !self.id.trim().is_empty() && !self.title.trim().is_empty()
    }

    /// Returns the description when present and non-empty.
    #[must_use]
    pub fn description_text(&self) -> Option<&str> {
        self.description.as_deref().filter(|d| !d.trim().is_empty())
    }

    /// Returns the channel name when present and non-empty.
    #[must_use]
    pub fn channel_text(&self) -> Option<&str> {
        self.channel_name.as_deref().filter(|c| !c.trim().is_empty())
    }

    /// Derives a stable item id from what the scraper could find on a card.
    ///
    /// Preference order: the page's native video id, a video id parsed from
    /// the card's link, the raw link, and finally the title text.
    #[must_use]
    pub fn derive_id(
        native_id: Option<&str>,
        link: Option<&str>,
        title: Option<&str>,
    ) -> Option<String> {
        if let Some(id) = native_id.map(str::trim).filter(|id| !id.is_empty()) {
            return Some(format!("vid:{id}"));
        }
        if let Some(link) = link.map(str::trim).filter(|l| !l.is_empty()) {
            return Some(VIDEO_LINK_REGEX.captures(link).map_or_else(
                || format!("url:{link}"),
                |caps| format!("href:{}", &caps[1]),
            ));
        }
        title
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(|t| format!("title:{t}"))
    }
}

/// Parses a batch of items from a JSON array or from JSON lines.
///
/// # Errors
///
/// Returns [`Error::InvalidInput`] naming the offending line (for JSON lines)
/// if any record fails to parse.
pub fn parse_items(input: &str) -> Result<Vec<FeedItem>> {
    let trimmed = input.trim_start();
    if trimmed.is_empty() {
        return Ok(Vec::new());
    }
    if trimmed.starts_with('[') {
        return serde_json::from_str(trimmed)
            .map_err(|e| Error::InvalidInput(format!("item array: {e}")));
    }
    input
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(n, line)| {
            serde_json::from_str(line)
                .map_err(|e| Error::InvalidInput(format!("item on line {}: {e}", n + 1)))
        })
        .collect()
}

/// Extracts inline `#tags` from free text, lower-cased and deduplicated in
/// order of first appearance.
#[must_use]
pub fn extract_hashtags(text: &str) -> Vec<String> {
    let mut tags: Vec<String> = Vec::new();
    for found in INLINE_HASHTAG_REGEX.find_iter(text) {
        let tag = found.as_str().to_lowercase();
        if !tags.contains(&tag) {
            tags.push(tag);
        }
    }
    tags
}
