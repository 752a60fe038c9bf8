//! Built-in defaults.

/// Keywords blocked when the user has not configured any.
pub const DEFAULT_KEYWORDS: &[&str] = &[
    "exposed",
    "disaster",
    "meltdown",
    "destroyed",
    "collapsing",
    "falling apart",
    "the end of",
    "what nobody tells you",
    "what no one is saying",
    "you won't believe",
    "unbelievable",
    "shocking",
    "gone wrong",
    "worst ever",
    "biggest mistake",
    "is over",
    "humiliated",
    "embarrassed",
    "crisis",
    "scandal",
    "fraud",
    "rage",
    "rant",
    "fails",
    "explodes",
    "backlash",
    "cancelled",
    "tragedy",
    "heartbreaking",
    "ruined",
    "outburst",
    "breaking down",
    "rage quit",
    "why no one talks about",
    "left in tears",
    "freaks out",
    "gone too far",
    "must watch",
    "dark truth",
    "shut down",
    "fired",
    "quit live",
    "insane",
    "blunder",
    "triggered",
    "brutal",
    "emotional",
    "controversy",
    "🔥",
    "😱",
];

/// Seen-set size that triggers compaction.
pub const DEFAULT_SEEN_HIGH_WATER: usize = 1000;

/// Ids kept after compaction.
pub const DEFAULT_SEEN_RETAIN: usize = 500;
