//! Read-only views projected from the knowledge store.
//!
//! Nothing here mutates the store; every view reflects the state as of
//! the latest applied turn at the moment of the call.

use crate::direction::Direction;
use crate::graph::{ArcNote, CharacterId, EmotionalState, KnowledgeStore};

/// Number of recent events included in a progress report.
const RECENT_EVENTS: usize = 3;

/// Current status of one character.
#[derive(Debug, Clone, PartialEq)]
pub struct CharacterStatus {
    /// Display name.
    pub name: String,
    /// Current emotional state.
    pub emotional_state: EmotionalState,
    /// Arc development notes, most recent first.
    pub arc_notes: Vec<ArcNote>,
}

/// Project the status view for a character.
pub fn status(store: &KnowledgeStore, id: CharacterId) -> Option<CharacterStatus> {
    let character = store.get_character(id)?;
    let mut arc_notes = character.arc_notes.clone();
    arc_notes.reverse();

    Some(CharacterStatus {
        name: character.name.clone(),
        emotional_state: character.emotional_state,
        arc_notes,
    })
}

impl std::fmt::Display for CharacterStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "=== {} ===", self.name)?;
        writeln!(f, "Emotional state: {}", self.emotional_state)?;
        if self.arc_notes.is_empty() {
            writeln!(f, "No development yet.")?;
        } else {
            writeln!(f, "Development:")?;
            for note in &self.arc_notes {
                writeln!(f, "  [turn {}] {}", note.turn, note.text)?;
            }
        }
        Ok(())
    }
}

/// A short summary of one timeline event.
#[derive(Debug, Clone, PartialEq)]
pub struct EventSummary {
    /// Turn on which the event happened.
    pub turn: u32,
    /// What happened.
    pub description: String,
    /// The direction that produced the event.
    pub direction: Direction,
}

/// Overall story progress.
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressReport {
    /// Total turns applied so far.
    pub total_turns: u32,
    /// Event count per direction, in classification priority order.
    pub events_per_direction: Vec<(Direction, usize)>,
    /// The most recent events, newest first.
    pub recent_events: Vec<EventSummary>,
}

/// Project the progress view.
pub fn progress(store: &KnowledgeStore) -> ProgressReport {
    let events_per_direction = Direction::ALL
        .iter()
        .map(|&direction| {
            let count = store
                .events()
                .iter()
                .filter(|e| e.direction == direction)
                .count();
            (direction, count)
        })
        .collect();

    let recent_events = store
        .events()
        .iter()
        .rev()
        .take(RECENT_EVENTS)
        .map(|e| EventSummary {
            turn: e.turn,
            description: e.description.clone(),
            direction: e.direction,
        })
        .collect();

    ProgressReport {
        total_turns: store.turn_count() as u32,
        events_per_direction,
        recent_events,
    }
}

impl std::fmt::Display for ProgressReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "=== Story Progress ===")?;
        writeln!(f, "Turns taken: {}", self.total_turns)?;
        writeln!(f, "Events by direction:")?;
        for (direction, count) in &self.events_per_direction {
            writeln!(f, "  {direction}: {count}")?;
        }
        if !self.recent_events.is_empty() {
            writeln!(f, "Recent events:")?;
            for event in &self.recent_events {
                writeln!(f, "  [turn {}] {}", event.turn, event.description)?;
            }
        }
        Ok(())
    }
}

/// Preview of one candidate ending.
#[derive(Debug, Clone, PartialEq)]
pub struct EndingPreview {
    /// Branch label.
    pub label: String,
    /// The direction that unlocked the branch.
    pub direction: Direction,
    /// Current viability weight.
    pub weight: u32,
    /// Turn on which the branch was unlocked.
    pub created_turn: u32,
    /// A one-line teaser of where the branch leads.
    pub preview: String,
}

/// Project all ending branches, highest-weighted first; ties go to the
/// branch unlocked earliest.
pub fn endings(store: &KnowledgeStore) -> Vec<EndingPreview> {
    let mut previews: Vec<EndingPreview> = store
        .endings()
        .iter()
        .map(|branch| EndingPreview {
            label: branch.label.clone(),
            direction: branch.direction,
            weight: branch.weight,
            created_turn: branch.created_turn,
            preview: preview_line(branch.direction).to_string(),
        })
        .collect();

    previews.sort_by(|a, b| {
        b.weight
            .cmp(&a.weight)
            .then(a.created_turn.cmp(&b.created_turn))
    });
    previews
}

fn preview_line(direction: Direction) -> &'static str {
    match direction {
        Direction::Aggressive => "This path leads to a reckoning that will test every resolve.",
        Direction::Heroic => "This path ends in a legend remembered for generations.",
        Direction::Cautious => "This path uncovers hidden strengths and unexpected allies.",
        Direction::Diplomatic => "This path unites old rivals under a hard-won peace.",
        Direction::Neutral => "This path drifts on, its destination still unwritten.",
    }
}

impl std::fmt::Display for EndingPreview {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{} (weight {})", self.label, self.weight)?;
        writeln!(f, "  {}", self.preview)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consequence::resolve;
    use crate::engine;

    fn play(store: &mut KnowledgeStore, direction: Direction, text: &str) {
        let actors = store.character_ids();
        let record = resolve(direction, &actors);
        let turn = store.next_turn_number();
        engine::apply(store, turn, "0".to_string(), text, &record).unwrap();
    }

    #[test]
    fn test_status_orders_notes_by_recency() {
        let mut store = KnowledgeStore::new();
        let id = store.create_character("Mira");

        play(&mut store, Direction::Heroic, "save them");
        play(&mut store, Direction::Cautious, "then hide");

        let view = status(&store, id).unwrap();
        assert_eq!(view.arc_notes.len(), 2);
        assert_eq!(view.arc_notes[0].turn, 2);
        assert_eq!(view.arc_notes[1].turn, 1);
        assert_eq!(view.emotional_state, EmotionalState::Fearful);
    }

    #[test]
    fn test_status_of_unknown_character() {
        let store = KnowledgeStore::new();
        assert!(status(&store, CharacterId::new()).is_none());
    }

    #[test]
    fn test_progress_counts_per_direction() {
        let mut store = KnowledgeStore::new();
        store.create_character("Mira");

        play(&mut store, Direction::Heroic, "save");
        play(&mut store, Direction::Heroic, "protect");
        play(&mut store, Direction::Neutral, "wait");

        let report = progress(&store);
        assert_eq!(report.total_turns, 3);

        let heroic = report
            .events_per_direction
            .iter()
            .find(|(d, _)| *d == Direction::Heroic)
            .unwrap();
        assert_eq!(heroic.1, 2);

        // Newest first, capped at three.
        assert_eq!(report.recent_events[0].description, "wait");
    }

    #[test]
    fn test_endings_order_by_weight_then_age() {
        let mut store = KnowledgeStore::new();
        store.create_character("Mira");

        // Heroic unlocked first, then reinforced twice; aggressive once.
        play(&mut store, Direction::Heroic, "save");
        play(&mut store, Direction::Aggressive, "attack");
        play(&mut store, Direction::Heroic, "protect");
        play(&mut store, Direction::Heroic, "rescue");

        let previews = endings(&store);
        assert_eq!(previews.len(), 2);
        assert_eq!(previews[0].direction, Direction::Heroic);
        assert_eq!(previews[0].weight, 3);
        assert_eq!(previews[1].direction, Direction::Aggressive);
    }

    #[test]
    fn test_endings_stable_tie_break() {
        let mut store = KnowledgeStore::new();
        store.create_character("Mira");

        play(&mut store, Direction::Aggressive, "attack");
        play(&mut store, Direction::Diplomatic, "talk");

        // Equal weights: the earlier-created branch comes first.
        let previews = endings(&store);
        assert_eq!(previews[0].direction, Direction::Aggressive);
        assert_eq!(previews[1].direction, Direction::Diplomatic);
    }
}
