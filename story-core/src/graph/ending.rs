//! Candidate story endings.

use crate::direction::Direction;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for an ending branch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EndingId(Uuid);

impl EndingId {
    /// Create a new unique ending ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for EndingId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for EndingId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A candidate story conclusion, unlocked by a narrative direction.
///
/// There is at most one branch per direction. Repeating the direction
/// reinforces the existing branch instead of creating a duplicate;
/// the weight never decreases.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EndingBranch {
    /// Unique identifier.
    pub id: EndingId,
    /// Human-readable label for the branch.
    pub label: String,
    /// The direction that unlocked (and reinforces) this branch.
    pub direction: Direction,
    /// Viability weight. Starts at 1, only ever increments.
    pub weight: u32,
    /// Turn on which the branch was first unlocked.
    pub created_turn: u32,
}

impl EndingBranch {
    /// Unlock a new branch at weight 1.
    pub fn new(label: impl Into<String>, direction: Direction, turn: u32) -> Self {
        Self {
            id: EndingId::new(),
            label: label.into(),
            direction,
            weight: 1,
            created_turn: turn,
        }
    }

    /// Reinforce the branch after its direction recurred.
    pub fn reinforce(&mut self) {
        self.weight += 1;
    }
}
