//! The update engine: applies one turn's consequences to the store.

use crate::consequence::ConsequenceRecord;
use crate::graph::{EndingBranch, KnowledgeStore, Relationship, StoryEvent, TurnRecord};
use thiserror::Error;

/// Validation failures that reject a turn before any mutation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TurnError {
    #[error("unknown character in actor set")]
    UnknownCharacter,

    #[error("a turn needs at least one actor")]
    NoActors,

    #[error("turn number {got} does not follow the audit trail (expected {expected})")]
    TurnRegression { expected: u32, got: u32 },
}

/// Apply a consequence record to the store as one logical transaction.
///
/// Validation runs first and touches nothing: if any referenced actor
/// is unknown, the actor set is empty, or the turn number is not the
/// store's next, the store is left exactly as it was and a
/// [`TurnError`] is returned. Only after every check passes does the
/// mutation phase run, in a fixed order: character states and arc
/// notes, then relationship pairs, then the event, then the ending
/// branch, then the audit record.
pub fn apply(
    store: &mut KnowledgeStore,
    turn: u32,
    timestamp: String,
    raw_text: &str,
    record: &ConsequenceRecord,
) -> Result<TurnRecord, TurnError> {
    // Validation phase. No mutation may happen before this completes.
    let mut actors = Vec::with_capacity(record.actors.len());
    for &id in &record.actors {
        if !store.contains_character(id) {
            return Err(TurnError::UnknownCharacter);
        }
        if !actors.contains(&id) {
            actors.push(id);
        }
    }
    if actors.is_empty() {
        return Err(TurnError::NoActors);
    }
    let expected = store.next_turn_number();
    if turn != expected {
        return Err(TurnError::TurnRegression { expected, got: turn });
    }

    // Mutation phase.

    // 1. Character states and arc notes.
    for &id in &actors {
        if let Some(character) = store.get_character_mut(id) {
            if let Some(state) = record.emotional_impact {
                character.emotional_state = state;
            }
            if let Some(note) = &record.arc_note {
                character.push_arc_note(turn, note.clone());
            }
        }
    }

    // 2. Relationship deltas for every unordered actor pair.
    let mut touched_relationships = Vec::new();
    if let Some(delta) = &record.relationship {
        for i in 0..actors.len() {
            for j in (i + 1)..actors.len() {
                let (a, b) = (actors[i], actors[j]);
                if store.relationship_between(a, b).is_none() {
                    let id = store.add_relationship(Relationship::new(a, b, turn));
                    tracing::debug!(%id, "created relationship");
                }
                if let Some(relationship) = store.relationship_between_mut(a, b) {
                    relationship.push_note(turn, delta.note.clone());
                    relationship.adjust_valence(delta.valence_shift);
                    touched_relationships.push(relationship.id);
                }
            }
        }
    }

    // 3. The event itself.
    let event = StoryEvent::new(turn, raw_text, record.direction, actors.clone());
    let event_id = event.id;
    store.push_event(event);

    // 4. Ending branch: unlock at weight 1 or reinforce.
    let ending_id = record.ending.as_ref().map(|descriptor| {
        if let Some(branch) = store.ending_for_direction_mut(descriptor.direction) {
            branch.reinforce();
            tracing::debug!(direction = %descriptor.direction, weight = branch.weight, "reinforced ending branch");
            branch.id
        } else {
            let branch = EndingBranch::new(&descriptor.label, descriptor.direction, turn);
            let id = branch.id;
            store.push_ending(branch);
            tracing::debug!(direction = %descriptor.direction, "unlocked ending branch");
            id
        }
    });

    // 5. Audit trail.
    let turn_record = TurnRecord {
        turn,
        raw_text: raw_text.to_string(),
        direction: record.direction,
        timestamp,
        characters: actors,
        relationships: touched_relationships,
        event: event_id,
        ending: ending_id,
    };
    store.push_turn(turn_record.clone());

    tracing::debug!(turn, direction = %record.direction, "applied turn");
    Ok(turn_record)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consequence::resolve;
    use crate::direction::Direction;
    use crate::graph::{CharacterId, EmotionalState};

    fn two_character_store() -> (KnowledgeStore, CharacterId, CharacterId) {
        let mut store = KnowledgeStore::new();
        let a = store.create_character("Mira");
        let b = store.create_character("Kael");
        (store, a, b)
    }

    fn apply_turn(
        store: &mut KnowledgeStore,
        direction: Direction,
        actors: &[CharacterId],
        text: &str,
    ) -> Result<TurnRecord, TurnError> {
        let record = resolve(direction, actors);
        let turn = store.next_turn_number();
        apply(store, turn, "0".to_string(), text, &record)
    }

    #[test]
    fn test_heroic_turn_end_to_end() {
        let (mut store, a, b) = two_character_store();

        let record = apply_turn(
            &mut store,
            Direction::Heroic,
            &[a, b],
            "I will help and protect my friend",
        )
        .unwrap();

        assert_eq!(record.turn, 1);
        assert_eq!(record.direction, Direction::Heroic);

        // Both actors shift to the heroic impact state with an arc note.
        for id in [a, b] {
            let character = store.get_character(id).unwrap();
            assert_eq!(character.emotional_state, EmotionalState::Resolved);
            assert_eq!(character.arc_notes.len(), 1);
        }

        // One relationship, positive valence, one history note.
        assert_eq!(store.relationship_count(), 1);
        let rel = store.relationship_between(a, b).unwrap();
        assert!(rel.valence > 0);
        assert_eq!(rel.history.len(), 1);

        // One event, one ending branch at weight 1, one audit entry.
        assert_eq!(store.event_count(), 1);
        assert_eq!(store.ending_count(), 1);
        assert_eq!(store.endings()[0].weight, 1);
        assert_eq!(store.turn_count(), 1);
    }

    #[test]
    fn test_relationship_lookup_is_idempotent() {
        let (mut store, a, b) = two_character_store();

        apply_turn(&mut store, Direction::Heroic, &[a, b], "save him").unwrap();
        apply_turn(&mut store, Direction::Heroic, &[a, b], "protect him").unwrap();

        assert_eq!(store.relationship_count(), 1);
        assert_eq!(store.relationship_between(a, b).unwrap().history.len(), 2);
    }

    #[test]
    fn test_ending_branch_monotonicity() {
        let (mut store, a, _) = two_character_store();

        for n in 1..=4u32 {
            apply_turn(&mut store, Direction::Aggressive, &[a], "attack").unwrap();
            assert_eq!(store.ending_count(), 1);
            assert_eq!(store.endings()[0].weight, n);
        }
    }

    #[test]
    fn test_turn_numbers_are_gap_free() {
        let (mut store, a, _) = two_character_store();

        for expected in 1..=5u32 {
            let record = apply_turn(&mut store, Direction::Neutral, &[a], "hm").unwrap();
            assert_eq!(record.turn, expected);
        }

        let turns: Vec<u32> = store.turns().iter().map(|t| t.turn).collect();
        assert_eq!(turns, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_unknown_actor_leaves_store_untouched() {
        let (mut store, a, _) = two_character_store();
        let stranger = CharacterId::new();

        let record = resolve(Direction::Heroic, &[a, stranger]);
        let err = apply(&mut store, 1, "0".to_string(), "save them", &record).unwrap_err();

        assert_eq!(err, TurnError::UnknownCharacter);
        assert_eq!(store.event_count(), 0);
        assert_eq!(store.relationship_count(), 0);
        assert_eq!(store.turn_count(), 0);
        assert_eq!(
            store.get_character(a).unwrap().emotional_state,
            EmotionalState::Neutral
        );
    }

    #[test]
    fn test_empty_actor_set_is_rejected() {
        let (mut store, _, _) = two_character_store();
        let record = resolve(Direction::Neutral, &[]);

        let err = apply(&mut store, 1, "0".to_string(), "...", &record).unwrap_err();
        assert_eq!(err, TurnError::NoActors);
        assert_eq!(store.turn_count(), 0);
    }

    #[test]
    fn test_turn_regression_is_rejected() {
        let (mut store, a, _) = two_character_store();
        apply_turn(&mut store, Direction::Neutral, &[a], "look").unwrap();

        let record = resolve(Direction::Neutral, &[a]);
        let err = apply(&mut store, 1, "0".to_string(), "look again", &record).unwrap_err();

        assert_eq!(err, TurnError::TurnRegression { expected: 2, got: 1 });
        assert_eq!(store.turn_count(), 1);
    }

    #[test]
    fn test_neutral_turn_is_narration_only() {
        let (mut store, a, b) = two_character_store();

        apply_turn(&mut store, Direction::Neutral, &[a, b], "I wait").unwrap();

        assert_eq!(store.event_count(), 1);
        assert_eq!(store.turn_count(), 1);
        assert_eq!(store.relationship_count(), 0);
        assert_eq!(store.ending_count(), 0);
        let character = store.get_character(a).unwrap();
        assert_eq!(character.emotional_state, EmotionalState::Neutral);
        assert!(character.arc_notes.is_empty());
    }

    #[test]
    fn test_duplicate_actors_collapse() {
        let (mut store, a, _) = two_character_store();

        let record = apply_turn(&mut store, Direction::Heroic, &[a, a], "save").unwrap();

        assert_eq!(record.characters, vec![a]);
        // No self-relationship.
        assert_eq!(store.relationship_count(), 0);
    }
}
