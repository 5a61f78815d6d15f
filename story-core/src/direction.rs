//! Narrative direction classification.
//!
//! A user turn is classified into one of a closed set of directions by
//! keyword membership against a priority-ordered table. The table
//! order is part of the contract: ambiguous input like "help me
//! escape" must deterministically resolve to the earlier-priority
//! direction.

use serde::{Deserialize, Serialize};

/// The classified narrative category of a user turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Confrontation and violence.
    Aggressive,
    /// Helping and protecting others.
    Heroic,
    /// Avoidance and self-preservation.
    Cautious,
    /// Dialogue and negotiation.
    Diplomatic,
    /// Fallback when no keyword matches.
    Neutral,
}

impl Direction {
    /// Every direction, in classification priority order.
    pub const ALL: [Direction; 5] = [
        Direction::Aggressive,
        Direction::Heroic,
        Direction::Cautious,
        Direction::Diplomatic,
        Direction::Neutral,
    ];

    /// Get the display name.
    pub fn name(&self) -> &'static str {
        match self {
            Direction::Aggressive => "aggressive",
            Direction::Heroic => "heroic",
            Direction::Cautious => "cautious",
            Direction::Diplomatic => "diplomatic",
            Direction::Neutral => "neutral",
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Keyword sets per direction, consulted first-to-last. Adding a
/// direction means adding a row here, never new control flow.
const KEYWORD_TABLE: &[(Direction, &[&str])] = &[
    (
        Direction::Aggressive,
        &["fight", "attack", "confront", "strike", "threaten"],
    ),
    (
        Direction::Heroic,
        &["help", "save", "protect", "rescue", "defend"],
    ),
    (
        Direction::Cautious,
        &["run", "escape", "hide", "flee", "retreat"],
    ),
    (
        Direction::Diplomatic,
        &["talk", "negotiate", "diplomacy", "persuade", "reason"],
    ),
];

/// Classify a raw user utterance into a narrative direction.
///
/// Matching is case-insensitive and at word boundaries only; the
/// first direction in priority order with a matching keyword wins.
/// Text with no keyword from any set is `Neutral`. Pure function.
pub fn classify(text: &str) -> Direction {
    let text_lower = text.to_lowercase();

    for (direction, keywords) in KEYWORD_TABLE {
        if keywords.iter().any(|kw| contains_word(&text_lower, kw)) {
            return *direction;
        }
    }

    Direction::Neutral
}

/// Check if `text` contains `word` at word boundaries.
///
/// A word boundary is the start/end of string or a non-alphanumeric
/// character. Multi-word names match as whole phrases.
pub(crate) fn contains_word(text: &str, word: &str) -> bool {
    if word.is_empty() {
        return false;
    }

    let text_bytes = text.as_bytes();
    let word_bytes = word.as_bytes();
    let text_len = text_bytes.len();
    let word_len = word_bytes.len();

    if word_len > text_len {
        return false;
    }

    let mut i = 0;
    while i + word_len <= text_len {
        if &text_bytes[i..i + word_len] == word_bytes {
            let left_ok = i == 0 || !text_bytes[i - 1].is_ascii_alphanumeric();
            let right_ok =
                i + word_len == text_len || !text_bytes[i + word_len].is_ascii_alphanumeric();

            if left_ok && right_ok {
                return true;
            }
        }
        i += 1;
    }

    false
}
