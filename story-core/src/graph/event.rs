//! The story event timeline.

use super::character::CharacterId;
use crate::direction::Direction;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a story event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EventId(Uuid);

impl EventId {
    /// Create a new unique event ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for EventId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for EventId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One event on the story timeline.
///
/// Events are immutable once recorded. The timeline is ordered by
/// turn number and is never re-sorted; insertion order is
/// authoritative.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoryEvent {
    /// Unique identifier.
    pub id: EventId,
    /// Turn on which the event happened.
    pub turn: u32,
    /// What happened, in prose.
    pub description: String,
    /// The narrative direction that produced the event.
    pub direction: Direction,
    /// Characters involved. Always non-empty.
    pub characters: Vec<CharacterId>,
}

impl StoryEvent {
    /// Create a new event.
    pub fn new(
        turn: u32,
        description: impl Into<String>,
        direction: Direction,
        characters: Vec<CharacterId>,
    ) -> Self {
        Self {
            id: EventId::new(),
            turn,
            description: description.into(),
            direction,
            characters,
        }
    }

    /// Check if this event involves a specific character.
    pub fn involves(&self, id: CharacterId) -> bool {
        self.characters.contains(&id)
    }
}
