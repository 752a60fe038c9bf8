//! Data models for feedfilter.
//!
//! Inputs (feed items, block-list terms) and outputs (verdicts, batch outcomes).

mod item;
mod result;
mod terms;

pub use item::{FeedItem, extract_hashtags, parse_items};
pub use result::{BatchOutcome, ItemVerdict, MatchKind, MatchResult, MatchType};
pub use terms::{BlockList, Hashtag, Keyword, normalize_hashtag, normalize_keyword};
