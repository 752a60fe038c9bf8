//! Single-text keyword evaluation.

use super::probes::ProbeSet;
use crate::models::{Keyword, MatchKind};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How aggressively single-word keywords are matched.
///
/// Each tier includes every probe of the tiers below it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchTier {
    /// Whole word, plural and possessive forms only.
    Strict,
    /// Also punctuation-flanked and unbounded occurrences.
    Relaxed,
    /// Also separator, obfuscation, hidden-character and HTML-fragment probes.
    #[default]
    Hardened,
}

impl MatchTier {
    /// Returns the tier name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Strict => "strict",
            Self::Relaxed => "relaxed",
            Self::Hardened => "hardened",
        }
    }

    /// Parses a tier name, case-insensitively.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "strict" => Some(Self::Strict),
            "relaxed" => Some(Self::Relaxed),
            "hardened" => Some(Self::Hardened),
            _ => None,
        }
    }
}

impl fmt::Display for MatchTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for MatchTier {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s).ok_or_else(|| {
            Error::InvalidInput(format!(
                "unknown match tier '{s}' (expected strict, relaxed or hardened)"
            ))
        })
    }
}

/// Evaluates one keyword against one text.
///
/// `probes` is the keyword's compiled probe set, or `None` when compilation
/// failed. Phrases never use probes. Returns the kind of the first probe that
/// matched.
#[must_use]
pub fn evaluate(
    text: &str,
    keyword: &Keyword,
    probes: Option<&ProbeSet>,
    tier: MatchTier,
) -> Option<MatchKind> {
    evaluate_lowercase(&text.to_lowercase(), keyword, probes, tier)
}

/// Same as [`evaluate`] for text that is already lower-cased.
pub(crate) fn evaluate_lowercase(
    text: &str,
    keyword: &Keyword,
    probes: Option<&ProbeSet>,
    tier: MatchTier,
) -> Option<MatchKind> {
    if text.is_empty() {
        return None;
    }
    if keyword.is_phrase() {
        return text.contains(keyword.as_str()).then_some(MatchKind::Phrase);
    }
    let Some(probes) = probes else {
        return text.contains(keyword.as_str()).then_some(MatchKind::Simple);
    };

    if probes.matches_strict(text) {
        return Some(MatchKind::Word);
    }
    if tier >= MatchTier::Relaxed && probes.matches_relaxed(text) {
        return Some(MatchKind::Relaxed);
    }
    if tier < MatchTier::Hardened {
        return None;
    }
    if probes.matches_enhanced(text) {
        Some(MatchKind::Enhanced)
    } else if probes.matches_html_embedded(text) {
        Some(MatchKind::HtmlEmbedded)
    } else if probes.matches_obfuscated(text) {
        Some(MatchKind::Obfuscated)
    } else if probes.matches_hidden(text) {
        Some(MatchKind::Hidden)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    fn kw(s: &str) -> Keyword {
        Keyword::new(s).expect("non-empty keyword")
    }

    fn eval(text: &str, keyword: &str, tier: MatchTier) -> Option<MatchKind> {
        let keyword = kw(keyword);
        let probes = ProbeSet::compile(keyword.as_str());
        evaluate(text, &keyword, probes.as_ref(), tier)
    }

    #[test]
    fn test_word_boundary_strict() {
        assert_eq!(
            eval("He went into a RAGE today", "rage", MatchTier::Strict),
            Some(MatchKind::Word)
        );
        assert_eq!(eval("the garage door", "rage", MatchTier::Strict), None);
    }

    #[test]
    fn test_relaxed_tier_catches_embedded() {
        assert_eq!(
            eval("the garage door", "rage", MatchTier::Relaxed),
            Some(MatchKind::Relaxed)
        );
    }

    #[test]
    fn test_phrase_containment() {
        assert_eq!(
            eval("Prank gone wrong at the mall", "gone wrong", MatchTier::Strict),
            Some(MatchKind::Phrase)
        );
        assert_eq!(eval("gone very wrong", "gone wrong", MatchTier::Hardened), None);
    }

    #[test]
    fn test_simple_fallback_without_probes() {
        let keyword = kw("a(b");
        assert_eq!(
            evaluate("x A(B y", &keyword, None, MatchTier::Hardened),
            Some(MatchKind::Simple)
        );
        assert_eq!(evaluate("ab", &keyword, None, MatchTier::Hardened), None);
    }

    #[test_case("learn c++ today", "c++" ; "trailing symbols")]
    #[test_case("so hot 🔥", "🔥" ; "emoji")]
    #[test_case("xa(by", "a(b" ; "regex significant inside word")]
    fn test_unbounded_keywords_match_by_containment_in_every_tier(text: &str, keyword: &str) {
        for tier in [MatchTier::Strict, MatchTier::Relaxed, MatchTier::Hardened] {
            assert_eq!(eval(text, keyword, tier), Some(MatchKind::Simple), "{tier}");
        }
    }

    #[test_case("t.rump rally", MatchKind::Enhanced ; "enhanced")]
    #[test_case("tr*ump speaks", MatchKind::Obfuscated ; "obfuscated")]
    #[test_case("t\u{200B}r\u{200B}u\u{200B}m\u{200B}p", MatchKind::Hidden ; "zero width")]
    fn test_hardened_kinds(text: &str, expected: MatchKind) {
        assert_eq!(eval(text, "trump", MatchTier::Hardened), Some(expected));
    }

    #[test]
    fn test_unbounded_probe_shadows_html_fragment() {
        assert_eq!(
            eval("<b>trumpet</b>", "trump", MatchTier::Hardened),
            Some(MatchKind::Relaxed)
        );
    }

    #[test]
    fn test_hardened_probes_need_hardened_tier() {
        assert_eq!(eval("t.rump rally", "trump", MatchTier::Relaxed), None);
        assert_eq!(eval("tr*ump speaks", "trump", MatchTier::Strict), None);
    }

    #[test]
    fn test_word_wins_over_later_probes() {
        assert_eq!(
            eval("trump rally", "trump", MatchTier::Hardened),
            Some(MatchKind::Word)
        );
    }

    #[test]
    fn test_empty_text_never_matches() {
        assert_eq!(eval("", "rage", MatchTier::Hardened), None);
    }

    #[test_case("strict", Some(MatchTier::Strict))]
    #[test_case(" Relaxed ", Some(MatchTier::Relaxed))]
    #[test_case("HARDENED", Some(MatchTier::Hardened))]
    #[test_case("paranoid", None)]
    fn test_tier_parse(input: &str, expected: Option<MatchTier>) {
        assert_eq!(MatchTier::parse(input), expected);
    }

    #[test]
    fn test_tier_from_str_error() {
        let err = "loose".parse::<MatchTier>().unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }

    #[test]
    fn test_tier_ordering_and_default() {
        assert!(MatchTier::Strict < MatchTier::Relaxed);
        assert!(MatchTier::Relaxed < MatchTier::Hardened);
        assert_eq!(MatchTier::default(), MatchTier::Hardened);
    }
}
