//! Keyword probe compilation.
//!
//! A single-word keyword is compiled into a fixed battery of regex probes,
//! each catching one spelling variant or evasion. Every literal fragment is
//! escaped before it is spliced into a pattern.

use regex::{Regex, RegexBuilder};

/// Compiled-size limit applied to each probe by default (the `regex` crate default).
pub const DEFAULT_PROBE_SIZE_LIMIT: usize = 10 * (1 << 20);

/// Punctuation or whitespace accepted on either side by the relaxed probe.
const RELAXED_FLANK: &str = r#"[\s,.;:"'\-]"#;

/// Separators allowed after the first letter by the enhanced probe.
const ENHANCED_SEPARATORS: &str = r"[.\s\-_]*";

/// Whitespace and invisible characters allowed between letters by the hidden probe.
const HIDDEN_SEPARATORS: &str = r"[\s\x{200B}\x{200C}\x{200D}\x{FEFF}]*";

/// The compiled probes for one single-word keyword.
///
/// Immutable once built and shared read-only across every item of a run.
#[derive(Debug, Clone)]
pub struct ProbeSet {
    word: Regex,
    possessive_s: Regex,
    plural: Regex,
    possessive: Regex,
    anywhere: Regex,
    relaxed: Regex,
    enhanced: Regex,
    obfuscated: Regex,
    hidden: Regex,
    html_embedded: Regex,
}

impl ProbeSet {
    /// Compiles the probe set for a normalized keyword.
    ///
    /// Returns `None` if the keyword is empty or any probe fails to compile;
    /// callers fall back to substring containment.
    #[must_use]
    pub fn compile(keyword: &str) -> Option<Self> {
        Self::compile_with_limit(keyword, DEFAULT_PROBE_SIZE_LIMIT)
    }

    /// Compiles the probe set with an explicit per-probe compiled-size limit.
    ///
    /// Keywords that cannot be anchored on word boundaries (see
    /// [`is_probe_safe`]) get no probe set and are matched by containment.
    #[must_use]
    pub fn compile_with_limit(keyword: &str, size_limit: usize) -> Option<Self> {
        if keyword.is_empty() {
            return None;
        }
        if !is_probe_safe(keyword) {
            tracing::debug!(keyword = %keyword, "Keyword not word-bounded, using substring match");
            return None;
        }
        match build_probes(keyword, size_limit) {
            Ok(probes) => Some(probes),
            Err(e) => {
                tracing::warn!(
                    keyword = %keyword,
                    error = %e,
                    "Probe compilation failed, using substring fallback"
                );
                metrics::counter!("feedfilter_probe_compile_failures_total").increment(1);
                None
            },
        }
    }

    /// Whole word, `'s`, plural `s`, or trailing `'`.
    #[must_use]
    pub fn matches_strict(&self, text: &str) -> bool {
        self.word.is_match(text)
            || self.possessive_s.is_match(text)
            || self.plural.is_match(text)
            || self.possessive.is_match(text)
    }

    /// Punctuation-flanked or unbounded occurrence.
    #[must_use]
    pub fn matches_relaxed(&self, text: &str) -> bool {
        self.relaxed.is_match(text) || self.anywhere.is_match(text)
    }

    /// Separators inserted after the first letter.
    #[must_use]
    pub fn matches_enhanced(&self, text: &str) -> bool {
        self.enhanced.is_match(text)
    }

    /// Keyword inside rendered tag content.
    #[must_use]
    pub fn matches_html_embedded(&self, text: &str) -> bool {
        self.html_embedded.is_match(text)
    }

    /// Single-character wildcards around the keyword's midpoint.
    #[must_use]
    pub fn matches_obfuscated(&self, text: &str) -> bool {
        self.obfuscated.is_match(text)
    }

    /// Invisible or whitespace characters between letters.
    #[must_use]
    pub fn matches_hidden(&self, text: &str) -> bool {
        self.hidden.is_match(text)
    }
}

/// Characters with regex meaning. Keywords containing any of them are
/// matched literally by containment.
const REGEX_SIGNIFICANT: &[char] = &[
    '.', '*', '+', '?', '^', '$', '{', '}', '(', ')', '|', '[', ']', '\\',
];

/// Returns true if `keyword` can be matched by the word-boundary probes.
///
/// `\b` only anchors next to a word character, so the keyword must start and
/// end with one, and must not contain regex-significant characters.
#[must_use]
pub fn is_probe_safe(keyword: &str) -> bool {
    let is_word = |c: char| c.is_alphanumeric() || c == '_';
    let (Some(first), Some(last)) = (keyword.chars().next(), keyword.chars().next_back()) else {
        return false;
    };
    is_word(first) && is_word(last) && !keyword.contains(REGEX_SIGNIFICANT)
}

fn build_probes(keyword: &str, size_limit: usize) -> Result<ProbeSet, regex::Error> {
    let build = |pattern: &str| {
        RegexBuilder::new(pattern)
            .case_insensitive(true)
            .size_limit(size_limit)
            .build()
    };

    let chars: Vec<char> = keyword.chars().collect();
    let escaped = regex::escape(keyword);
    let first = escape_chars(&chars[..1]);
    let rest = escape_chars(&chars[1..]);
    let (head, tail) = obfuscation_halves(&chars);
    let spread = chars
        .iter()
        .map(|c| regex::escape(&c.to_string()))
        .collect::<Vec<_>>()
        .join(HIDDEN_SEPARATORS);

    Ok(ProbeSet {
        word: build(&format!(r"\b{escaped}\b"))?,
        possessive_s: build(&format!(r"\b{escaped}'s\b"))?,
        plural: build(&format!(r"\b{escaped}s\b"))?,
        possessive: build(&format!(r"\b{escaped}'\b"))?,
        anywhere: build(&escaped)?,
        relaxed: build(&format!("{RELAXED_FLANK}{escaped}{RELAXED_FLANK}"))?,
        enhanced: build(&format!(r"\b{first}{ENHANCED_SEPARATORS}{rest}\b"))?,
        obfuscated: build(&format!(r"\b{first}\S?{head}\S?{tail}\b"))?,
        hidden: build(&format!(r"\b{spread}\b"))?,
        html_embedded: build(&format!(">[^<]*?{escaped}[^<]*?<"))?,
    })
}

fn escape_chars(chars: &[char]) -> String {
    regex::escape(&chars.iter().collect::<String>())
}

/// Splits a keyword for the obfuscated probe.
///
/// The split point is `len / 2`. The head runs from the second character to
/// the split point; when the split point is 0 (a one-character keyword) the
/// bounds are swapped, so the head is the first character.
fn obfuscation_halves(chars: &[char]) -> (String, String) {
    let half = chars.len() / 2;
    let (lo, hi) = (half.min(1), half.max(1));
    (escape_chars(&chars[lo..hi]), escape_chars(&chars[half..]))
}
