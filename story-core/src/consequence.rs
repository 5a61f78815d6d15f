//! Consequence resolution: direction → state-change instructions.
//!
//! Each narrative direction maps to a fixed template describing the
//! emotional impact, character arc delta, relationship delta, and
//! ending branch that one turn in that direction produces. Templates
//! are data, not control flow: supporting a new direction means adding
//! a template entry, never new branching elsewhere.

use crate::direction::Direction;
use crate::graph::{CharacterId, EmotionalState};
use lazy_static::lazy_static;
use std::collections::HashMap;

/// How one turn shifts the valence of every actor pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelationshipDelta {
    /// Note appended to each affected relationship's history.
    pub note: String,
    /// Signed valence shift, applied symmetrically and clamped by the
    /// relationship itself.
    pub valence_shift: i32,
}

/// Descriptor for the ending branch a direction unlocks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndingDescriptor {
    /// Human-readable branch label.
    pub label: String,
    /// The direction that unlocks the branch.
    pub direction: Direction,
}

/// The structured result of resolving a direction: everything the
/// update engine needs to mutate the store for one turn.
///
/// `Neutral` resolves to a narration-only record: every optional
/// component is `None` and the turn produces just an event and an
/// audit entry.
#[derive(Debug, Clone, PartialEq)]
pub struct ConsequenceRecord {
    /// The direction this record was resolved from.
    pub direction: Direction,
    /// The characters acting this turn.
    pub actors: Vec<CharacterId>,
    /// New emotional state for every actor, if the direction has one.
    pub emotional_impact: Option<EmotionalState>,
    /// Arc development note appended to every actor, if any.
    pub arc_note: Option<String>,
    /// Relationship change applied to every unordered actor pair.
    pub relationship: Option<RelationshipDelta>,
    /// Ending branch to unlock or reinforce.
    pub ending: Option<EndingDescriptor>,
}

/// Static per-direction template the resolver instantiates from.
struct ConsequenceTemplate {
    emotional_impact: Option<EmotionalState>,
    arc_note: Option<&'static str>,
    relationship_note: Option<&'static str>,
    valence_shift: i32,
    ending_label: Option<&'static str>,
}

lazy_static! {
    /// The consequence table, built once at startup.
    static ref TEMPLATES: HashMap<Direction, ConsequenceTemplate> = {
        let mut table = HashMap::new();
        table.insert(
            Direction::Aggressive,
            ConsequenceTemplate {
                emotional_impact: Some(EmotionalState::Agitated),
                arc_note: Some("Becomes more confrontational"),
                relationship_note: Some("Tension rises between them"),
                valence_shift: -2,
                ending_label: Some("An ending forged in conflict"),
            },
        );
        table.insert(
            Direction::Heroic,
            ConsequenceTemplate {
                emotional_impact: Some(EmotionalState::Resolved),
                arc_note: Some("Develops heroic traits"),
                relationship_note: Some("A bond of trust deepens"),
                valence_shift: 2,
                ending_label: Some("An ending of heroic legend"),
            },
        );
        table.insert(
            Direction::Cautious,
            ConsequenceTemplate {
                emotional_impact: Some(EmotionalState::Fearful),
                arc_note: Some("Becomes more cautious"),
                relationship_note: Some("They drift apart in the retreat"),
                valence_shift: -1,
                ending_label: Some("An ending of quiet survival"),
            },
        );
        table.insert(
            Direction::Diplomatic,
            ConsequenceTemplate {
                emotional_impact: Some(EmotionalState::Composed),
                arc_note: Some("Becomes more diplomatic"),
                relationship_note: Some("An understanding takes root"),
                valence_shift: 1,
                ending_label: Some("An ending of hard-won peace"),
            },
        );
        table.insert(
            Direction::Neutral,
            ConsequenceTemplate {
                emotional_impact: None,
                arc_note: None,
                relationship_note: None,
                valence_shift: 0,
                ending_label: None,
            },
        );
        table
    };
}

/// Resolve a direction into a consequence record for the given actors.
///
/// Pure data-table lookup; no store access, no side effects.
pub fn resolve(direction: Direction, actors: &[CharacterId]) -> ConsequenceRecord {
    let template = &TEMPLATES[&direction];

    ConsequenceRecord {
        direction,
        actors: actors.to_vec(),
        emotional_impact: template.emotional_impact,
        arc_note: template.arc_note.map(str::to_string),
        relationship: template.relationship_note.map(|note| RelationshipDelta {
            note: note.to_string(),
            valence_shift: template.valence_shift,
        }),
        ending: template.ending_label.map(|label| EndingDescriptor {
            label: label.to_string(),
            direction,
        }),
    }
}
