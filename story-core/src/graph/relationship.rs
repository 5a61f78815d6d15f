//! Relationships between characters.

use super::character::CharacterId;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Valence is a clamped integer scale. One turn shifts it by at most
/// a couple of points and it saturates at the bounds, so no single
/// exchange can swing a relationship from devoted to hostile.
pub const VALENCE_MIN: i32 = -5;
pub const VALENCE_MAX: i32 = 5;

/// Unique identifier for a relationship.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RelationshipId(Uuid);

impl RelationshipId {
    /// Create a new unique relationship ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for RelationshipId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RelationshipId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Qualitative reading of a valence score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ValenceLabel {
    Hostile,
    Strained,
    Uneasy,
    Warm,
    Devoted,
}

impl ValenceLabel {
    /// Derive the label from a raw valence score.
    pub fn from_score(score: i32) -> Self {
        match score {
            i32::MIN..=-4 => ValenceLabel::Hostile,
            -3..=-1 => ValenceLabel::Strained,
            0 => ValenceLabel::Uneasy,
            1..=3 => ValenceLabel::Warm,
            _ => ValenceLabel::Devoted,
        }
    }

    /// Get the display name.
    pub fn name(&self) -> &'static str {
        match self {
            ValenceLabel::Hostile => "hostile",
            ValenceLabel::Strained => "strained",
            ValenceLabel::Uneasy => "uneasy",
            ValenceLabel::Warm => "warm",
            ValenceLabel::Devoted => "devoted",
        }
    }
}

impl std::fmt::Display for ValenceLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// One entry in a relationship's change history. Append-only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationshipNote {
    /// Turn on which the change happened.
    pub turn: u32,
    /// What changed between the two characters.
    pub text: String,
}

/// A relationship between two characters.
///
/// The pair is ordered (initiator → target) but lookup treats the
/// pair as unordered: there is at most one relationship entity per
/// character pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Relationship {
    /// Unique identifier.
    pub id: RelationshipId,
    /// The character that first initiated contact.
    pub from: CharacterId,
    /// The target of that first contact.
    pub to: CharacterId,
    /// Valence score, clamped to `[VALENCE_MIN, VALENCE_MAX]`.
    pub valence: i32,
    /// Change history, oldest first.
    pub history: Vec<RelationshipNote>,
    /// Turn on which the relationship was first referenced.
    pub established_turn: u32,
}

impl Relationship {
    /// Create a new relationship at neutral valence.
    pub fn new(from: CharacterId, to: CharacterId, turn: u32) -> Self {
        Self {
            id: RelationshipId::new(),
            from,
            to,
            valence: 0,
            history: Vec::new(),
            established_turn: turn,
        }
    }

    /// The qualitative label for the current valence.
    pub fn label(&self) -> ValenceLabel {
        ValenceLabel::from_score(self.valence)
    }

    /// Shift the valence, saturating at the bounds.
    pub fn adjust_valence(&mut self, delta: i32) {
        self.valence = (self.valence + delta).clamp(VALENCE_MIN, VALENCE_MAX);
    }

    /// Append a change note.
    pub fn push_note(&mut self, turn: u32, text: impl Into<String>) {
        self.history.push(RelationshipNote {
            turn,
            text: text.into(),
        });
    }

    /// Check if this relationship connects the given unordered pair.
    pub fn connects(&self, a: CharacterId, b: CharacterId) -> bool {
        (self.from == a && self.to == b) || (self.from == b && self.to == a)
    }

    /// Check if this relationship involves a specific character.
    pub fn involves(&self, id: CharacterId) -> bool {
        self.from == id || self.to == id
    }

    /// Get the other character in the relationship.
    pub fn other(&self, id: CharacterId) -> Option<CharacterId> {
        if self.from == id {
            Some(self.to)
        } else if self.to == id {
            Some(self.from)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connects_is_unordered() {
        let a = CharacterId::new();
        let b = CharacterId::new();
        let c = CharacterId::new();

        let rel = Relationship::new(a, b, 1);
        assert!(rel.connects(a, b));
        assert!(rel.connects(b, a));
        assert!(!rel.connects(a, c));
    }

    #[test]
    fn test_valence_saturates() {
        let mut rel = Relationship::new(CharacterId::new(), CharacterId::new(), 1);

        for _ in 0..20 {
            rel.adjust_valence(2);
        }
        assert_eq!(rel.valence, VALENCE_MAX);

        for _ in 0..20 {
            rel.adjust_valence(-2);
        }
        assert_eq!(rel.valence, VALENCE_MIN);
    }

    #[test]
    fn test_valence_labels() {
        assert_eq!(ValenceLabel::from_score(-5), ValenceLabel::Hostile);
        assert_eq!(ValenceLabel::from_score(-2), ValenceLabel::Strained);
        assert_eq!(ValenceLabel::from_score(0), ValenceLabel::Uneasy);
        assert_eq!(ValenceLabel::from_score(2), ValenceLabel::Warm);
        assert_eq!(ValenceLabel::from_score(5), ValenceLabel::Devoted);
    }

    #[test]
    fn test_other() {
        let a = CharacterId::new();
        let b = CharacterId::new();
        let rel = Relationship::new(a, b, 1);

        assert_eq!(rel.other(a), Some(b));
        assert_eq!(rel.other(b), Some(a));
        assert_eq!(rel.other(CharacterId::new()), None);
    }
}
