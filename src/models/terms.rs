//! Block-list terms: keywords, hashtags, and the list that holds them.

use std::fmt;

/// Normalizes a raw keyword: trims surrounding whitespace and lower-cases.
///
/// Normalization is idempotent.
#[must_use]
pub fn normalize_keyword(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Normalizes a raw hashtag to its lower-cased, `#`-prefixed form.
///
/// Tags with or without the leading `#` normalize to the same value.
#[must_use]
pub fn normalize_hashtag(raw: &str) -> String {
    let lower = raw.trim().to_lowercase();
    if lower.starts_with('#') {
        lower
    } else {
        format!("#{lower}")
    }
}

/// A blocked keyword or phrase.
///
/// Keeps both the user's spelling (reported back as the matched term) and the
/// normalized form used for matching.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Keyword {
    original: String,
    normalized: String,
}

impl Keyword {
    /// Creates a keyword from user input.
    ///
    /// Returns `None` when the input is empty after trimming.
    #[must_use]
    pub fn new(raw: &str) -> Option<Self> {
        let normalized = normalize_keyword(raw);
        if normalized.is_empty() {
            return None;
        }
        Some(Self {
            original: raw.trim().to_string(),
            normalized,
        })
    }

    /// Returns the normalized keyword.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.normalized
    }

    /// Returns the keyword as the user wrote it (trimmed).
    #[must_use]
    pub fn original(&self) -> &str {
        &self.original
    }

    /// Returns true for multi-word phrases.
    ///
    /// Phrases skip the probe set and match by substring containment.
    #[must_use]
    pub fn is_phrase(&self) -> bool {
        self.normalized.contains(' ')
    }
}

impl fmt::Display for Keyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.normalized)
    }
}

/// A blocked hashtag, always `#`-prefixed and lower-cased.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Hashtag {
    original: String,
    normalized: String,
}

impl Hashtag {
    /// Creates a hashtag from user input.
    ///
    /// Returns `None` for empty input or a bare `#`.
    #[must_use]
    pub fn new(raw: &str) -> Option<Self> {
        let normalized = normalize_hashtag(raw);
        if normalized.len() <= 1 {
            return None;
        }
        Some(Self {
            original: raw.trim().to_string(),
            normalized,
        })
    }

    /// Returns the normalized hashtag.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.normalized
    }

    /// Returns the hashtag as the user wrote it (trimmed).
    #[must_use]
    pub fn original(&self) -> &str {
        &self.original
    }

    /// Exact comparison against a tag found on an item.
    #[must_use]
    pub fn matches_tag(&self, tag: &str) -> bool {
        normalize_hashtag(tag) == self.normalized
    }
}

impl fmt::Display for Hashtag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.normalized)
    }
}

/// Normalized block-lists for one filtering run.
///
/// Order is preserved: the first keyword in list order that matches wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BlockList {
    /// Blocked keywords and phrases.
    pub keywords: Vec<Keyword>,
    /// Blocked hashtags.
    pub hashtags: Vec<Hashtag>,
}

impl BlockList {
    /// Builds a block-list from raw user strings, discarding empty entries.
    #[must_use]
    pub fn new<K, H>(keywords: &[K], hashtags: &[H]) -> Self
    where
        K: AsRef<str>,
        H: AsRef<str>,
    {
        Self {
            keywords: keywords
                .iter()
                .filter_map(|k| Keyword::new(k.as_ref()))
                .collect(),
            hashtags: hashtags
                .iter()
                .filter_map(|h| Hashtag::new(h.as_ref()))
                .collect(),
        }
    }

    /// Parses the newline-separated text format used by the settings page.
    #[must_use]
    pub fn from_lines(keywords: &str, hashtags: &str) -> Self {
        let keywords: Vec<&str> = keywords.lines().collect();
        let hashtags: Vec<&str> = hashtags.lines().collect();
        Self::new(&keywords, &hashtags)
    }

    /// Returns true when there is nothing to match.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.keywords.is_empty() && self.hashtags.is_empty()
    }
}
