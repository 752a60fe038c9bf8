//! Classification verdicts.

use serde::{Serialize, Serializer};
use std::fmt;

/// Which probe family produced a text match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MatchKind {
    /// Substring fallback after a probe compile failure.
    Simple,
    /// Whole word, plural, or possessive form.
    Word,
    /// Punctuation-flanked or unbounded occurrence.
    Relaxed,
    /// Separators inserted after the first letter ("t.rump", "t rump").
    Enhanced,
    /// Keyword inside `>...<` tag content captured as text.
    HtmlEmbedded,
    /// Up to two single characters inserted around the keyword's midpoint.
    Obfuscated,
    /// Zero-width or whitespace characters between every letter.
    Hidden,
    /// Multi-word phrase found by substring containment.
    Phrase,
}

impl MatchKind {
    /// Returns the label used in match type strings.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Simple => "simple",
            Self::Word => "word",
            Self::Relaxed => "relaxed",
            Self::Enhanced => "enhanced",
            Self::HtmlEmbedded => "html",
            Self::Obfuscated => "obfuscated",
            Self::Hidden => "hidden",
            Self::Phrase => "phrase",
        }
    }
}

impl fmt::Display for MatchKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Which tier of the classifier filtered an item.
///
/// Serialized as a single string: `hashtag`, `badge`, `channel`,
/// `title-<kind>` or `description-<kind>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MatchType {
    /// Exact hashtag equality.
    Hashtag,
    /// Keyword contained in a badge label.
    Badge,
    /// Keyword contained in the channel name.
    Channel,
    /// Keyword matched in the title.
    Title(MatchKind),
    /// Keyword matched in the description.
    Description(MatchKind),
}

impl MatchType {
    /// Returns the text match kind for title and description matches.
    #[must_use]
    pub const fn kind(self) -> Option<MatchKind> {
        match self {
            Self::Title(kind) | Self::Description(kind) => Some(kind),
            Self::Hashtag | Self::Badge | Self::Channel => None,
        }
    }
}

impl fmt::Display for MatchType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Hashtag => write!(f, "hashtag"),
            Self::Badge => write!(f, "badge"),
            Self::Channel => write!(f, "channel"),
            Self::Title(kind) => write!(f, "title-{kind}"),
            Self::Description(kind) => write!(f, "description-{kind}"),
        }
    }
}

impl Serialize for MatchType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Verdict for a single item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchResult {
    /// Whether the item should be hidden.
    pub filtered: bool,
    /// The blocked keyword or hashtag that matched, as the user wrote it.
    pub matched_term: Option<String>,
    /// Which tier matched.
    pub match_type: Option<MatchType>,
}

impl MatchResult {
    /// Creates a result for an item that passes through.
    #[must_use]
    pub const fn unfiltered() -> Self {
        Self {
            filtered: false,
            matched_term: None,
            match_type: None,
        }
    }

    /// Creates a result for a filtered item.
    #[must_use]
    pub fn matched(term: impl Into<String>, match_type: MatchType) -> Self {
        Self {
            filtered: true,
            matched_term: Some(term.into()),
            match_type: Some(match_type),
        }
    }
}

impl Default for MatchResult {
    fn default() -> Self {
        Self::unfiltered()
    }
}

/// A verdict tagged with the id of the item it belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemVerdict {
    /// The item id.
    pub id: String,
    /// The verdict.
    #[serde(flatten)]
    pub result: MatchResult,
}

/// Everything one batch produced.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchOutcome {
    /// One verdict per newly processed item, in input order.
    pub results: Vec<ItemVerdict>,
    /// Items filtered in this batch.
    pub filtered_count: usize,
    /// Items filtered since the pipeline was created or last reset.
    pub total_filtered: u64,
}

impl BatchOutcome {
    /// Iterates over the ids of filtered items.
    pub fn filtered_ids(&self) -> impl Iterator<Item = &str> {
        self.results
            .iter()
            .filter(|v| v.result.filtered)
            .map(|v| v.id.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_match_type_display() {
        assert_eq!(MatchType::Hashtag.to_string(), "hashtag");
        assert_eq!(MatchType::Badge.to_string(), "badge");
        assert_eq!(MatchType::Channel.to_string(), "channel");
        assert_eq!(MatchType::Title(MatchKind::Word).to_string(), "title-word");
        assert_eq!(
            MatchType::Description(MatchKind::HtmlEmbedded).to_string(),
            "description-html"
        );
        assert_eq!(MatchType::Title(MatchKind::Phrase).to_string(), "title-phrase");
    }

    #[test]
    fn test_match_type_kind() {
        assert_eq!(MatchType::Title(MatchKind::Hidden).kind(), Some(MatchKind::Hidden));
        assert_eq!(MatchType::Hashtag.kind(), None);
    }

    #[test]
    fn test_unfiltered_result() {
        let result = MatchResult::unfiltered();
        assert!(!result.filtered);
        assert!(result.matched_term.is_none());
        assert!(result.match_type.is_none());
        assert_eq!(result, MatchResult::default());
    }

    #[test]
    fn test_verdict_serializes_flat() {
        let verdict = ItemVerdict {
            id: "vid:1".to_string(),
            result: MatchResult::matched("Rage", MatchType::Title(MatchKind::Word)),
        };
        let json = serde_json::to_value(&verdict).unwrap();
        assert_eq!(json["id"], "vid:1");
        assert_eq!(json["filtered"], true);
        assert_eq!(json["matchedTerm"], "Rage");
        assert_eq!(json["matchType"], "title-word");
    }

    #[test]
    fn test_unfiltered_serializes_nulls() {
        let json = serde_json::to_value(MatchResult::unfiltered()).unwrap();
        assert!(json["matchedTerm"].is_null());
        assert!(json["matchType"].is_null());
    }

    #[test]
    fn test_filtered_ids() {
        let outcome = BatchOutcome {
            results: vec![
                ItemVerdict {
                    id: "a".to_string(),
                    result: MatchResult::unfiltered(),
                },
                ItemVerdict {
                    id: "b".to_string(),
                    result: MatchResult::matched("#news", MatchType::Hashtag),
                },
            ],
            filtered_count: 1,
            total_filtered: 1,
        };
        assert_eq!(outcome.filtered_ids().collect::<Vec<_>>(), vec!["b"]);
    }
}
