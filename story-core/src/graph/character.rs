//! Characters tracked in the world graph.

use super::relationship::RelationshipId;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CharacterId(Uuid);

impl CharacterId {
    /// Create a new unique character ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for CharacterId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for CharacterId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A character's current emotional state.
///
/// A closed set: each non-neutral narrative direction maps onto one of
/// these through the consequence templates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum EmotionalState {
    /// No strong emotional coloring.
    #[default]
    Neutral,
    /// Tense and combative (aggressive turns).
    Agitated,
    /// Determined and brave (heroic turns).
    Resolved,
    /// Wary and frightened (cautious turns).
    Fearful,
    /// Measured and conciliatory (diplomatic turns).
    Composed,
}

impl EmotionalState {
    /// Get the display name.
    pub fn name(&self) -> &'static str {
        match self {
            EmotionalState::Neutral => "neutral",
            EmotionalState::Agitated => "agitated",
            EmotionalState::Resolved => "resolved",
            EmotionalState::Fearful => "fearful",
            EmotionalState::Composed => "composed",
        }
    }
}

impl std::fmt::Display for EmotionalState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// One entry in a character's arc development history.
///
/// Arc notes are append-only: the history is never rewritten.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArcNote {
    /// Turn on which the note was recorded.
    pub turn: u32,
    /// What changed about the character.
    pub text: String,
}

/// A character in the story world.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Character {
    /// Unique identifier, stable for the whole session.
    pub id: CharacterId,
    /// Display name.
    pub name: String,
    /// Current emotional state.
    pub emotional_state: EmotionalState,
    /// Arc development history, oldest first.
    pub arc_notes: Vec<ArcNote>,
    /// Relationships this character participates in.
    pub relationships: Vec<RelationshipId>,
}

impl Character {
    /// Create a new character in a neutral state.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: CharacterId::new(),
            name: name.into(),
            emotional_state: EmotionalState::Neutral,
            arc_notes: Vec::new(),
            relationships: Vec::new(),
        }
    }

    /// Set the starting emotional state.
    pub fn with_state(mut self, state: EmotionalState) -> Self {
        self.emotional_state = state;
        self
    }

    /// Append an arc development note.
    pub fn push_arc_note(&mut self, turn: u32, text: impl Into<String>) {
        self.arc_notes.push(ArcNote {
            turn,
            text: text.into(),
        });
    }

    /// Record participation in a relationship.
    pub fn join_relationship(&mut self, id: RelationshipId) {
        if !self.relationships.contains(&id) {
            self.relationships.push(id);
        }
    }

    /// Check if a name matches this character (case-insensitive).
    pub fn matches_name(&self, query: &str) -> bool {
        self.name.eq_ignore_ascii_case(query)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_character_creation() {
        let character = Character::new("Mira");
        assert_eq!(character.name, "Mira");
        assert_eq!(character.emotional_state, EmotionalState::Neutral);
        assert!(character.arc_notes.is_empty());
    }

    #[test]
    fn test_arc_notes_append() {
        let mut character = Character::new("Mira");
        character.push_arc_note(1, "Grew bolder");
        character.push_arc_note(2, "Grew wary");

        assert_eq!(character.arc_notes.len(), 2);
        assert_eq!(character.arc_notes[0].turn, 1);
        assert_eq!(character.arc_notes[1].text, "Grew wary");
    }

    #[test]
    fn test_join_relationship_dedupes() {
        let mut character = Character::new("Mira");
        let rel = RelationshipId::new();

        character.join_relationship(rel);
        character.join_relationship(rel);

        assert_eq!(character.relationships.len(), 1);
    }

    #[test]
    fn test_name_matching() {
        let character = Character::new("Mira");
        assert!(character.matches_name("mira"));
        assert!(character.matches_name("MIRA"));
        assert!(!character.matches_name("Kael"));
    }
}
