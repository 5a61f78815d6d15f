//! The knowledge store holding all world state.

use super::character::{Character, CharacterId};
use super::ending::EndingBranch;
use super::event::StoryEvent;
use super::relationship::{Relationship, RelationshipId};
use super::turn::TurnRecord;
use crate::direction::Direction;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// The mutable world knowledge graph for one session.
///
/// The store is append-mostly: histories are only ever extended, turn
/// records are only appended, and characters are never deleted. The
/// update engine is the only writer; views and collaborators read
/// through `&self` accessors.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KnowledgeStore {
    /// All characters.
    characters: HashMap<CharacterId, Character>,
    /// Lowercased name index for fast lookup.
    name_index: HashMap<String, CharacterId>,
    /// All relationships, in creation order.
    relationships: Vec<Relationship>,
    /// The event timeline, in insertion order.
    events: Vec<StoryEvent>,
    /// Candidate endings, at most one per direction.
    endings: Vec<EndingBranch>,
    /// The audit trail of applied turns.
    turns: Vec<TurnRecord>,
}

impl KnowledgeStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// The turn number the next applied turn must carry.
    pub fn next_turn_number(&self) -> u32 {
        self.turns.last().map(|t| t.turn + 1).unwrap_or(1)
    }

    // =========================================================================
    // Characters
    // =========================================================================

    /// Add a character to the store.
    pub fn add_character(&mut self, character: Character) -> CharacterId {
        let id = character.id;
        self.name_index.insert(character.name.to_lowercase(), id);
        self.characters.insert(id, character);
        id
    }

    /// Create and add a character by name.
    pub fn create_character(&mut self, name: impl Into<String>) -> CharacterId {
        self.add_character(Character::new(name))
    }

    /// Get a character by ID.
    pub fn get_character(&self, id: CharacterId) -> Option<&Character> {
        self.characters.get(&id)
    }

    /// Get a mutable character by ID.
    pub(crate) fn get_character_mut(&mut self, id: CharacterId) -> Option<&mut Character> {
        self.characters.get_mut(&id)
    }

    /// Check whether a character ID is known.
    pub fn contains_character(&self, id: CharacterId) -> bool {
        self.characters.contains_key(&id)
    }

    /// Find a character ID by name (case-insensitive).
    pub fn find_character_id(&self, name: &str) -> Option<CharacterId> {
        self.name_index.get(&name.to_lowercase()).copied()
    }

    /// Find a character by name (case-insensitive).
    pub fn find_character(&self, name: &str) -> Option<&Character> {
        self.find_character_id(name)
            .and_then(|id| self.characters.get(&id))
    }

    /// All character IDs, in name order for deterministic iteration.
    pub fn character_ids(&self) -> Vec<CharacterId> {
        let mut characters: Vec<_> = self.characters.values().collect();
        characters.sort_by(|a, b| a.name.cmp(&b.name));
        characters.iter().map(|c| c.id).collect()
    }

    /// Extract characters mentioned in free text.
    ///
    /// Names match at word boundaries only, so "Kael" matches in
    /// "I warn Kael" but not in "Kaelith draws her blade".
    pub fn extract_mentioned_characters(&self, text: &str) -> Vec<CharacterId> {
        let text_lower = text.to_lowercase();
        let mut found = Vec::new();

        for (name, &id) in &self.name_index {
            if crate::direction::contains_word(&text_lower, name) && !found.contains(&id) {
                found.push(id);
            }
        }

        found
    }

    // =========================================================================
    // Relationships
    // =========================================================================

    /// Find the relationship between an unordered pair, if any.
    pub fn relationship_between(&self, a: CharacterId, b: CharacterId) -> Option<&Relationship> {
        self.relationships.iter().find(|r| r.connects(a, b))
    }

    /// Mutable variant of [`relationship_between`](Self::relationship_between).
    pub(crate) fn relationship_between_mut(
        &mut self,
        a: CharacterId,
        b: CharacterId,
    ) -> Option<&mut Relationship> {
        self.relationships.iter_mut().find(|r| r.connects(a, b))
    }

    /// Add a relationship and register it on both endpoints.
    pub(crate) fn add_relationship(&mut self, relationship: Relationship) -> RelationshipId {
        let id = relationship.id;
        let (from, to) = (relationship.from, relationship.to);
        self.relationships.push(relationship);
        if let Some(c) = self.characters.get_mut(&from) {
            c.join_relationship(id);
        }
        if let Some(c) = self.characters.get_mut(&to) {
            c.join_relationship(id);
        }
        id
    }

    /// Get a relationship by ID.
    pub fn get_relationship(&self, id: RelationshipId) -> Option<&Relationship> {
        self.relationships.iter().find(|r| r.id == id)
    }

    /// All relationships involving a character.
    pub fn relationships_of(&self, id: CharacterId) -> Vec<&Relationship> {
        self.relationships
            .iter()
            .filter(|r| r.involves(id))
            .collect()
    }

    // =========================================================================
    // Events, endings, turns
    // =========================================================================

    /// Append an event to the timeline.
    pub(crate) fn push_event(&mut self, event: StoryEvent) {
        self.events.push(event);
    }

    /// The full event timeline, oldest first.
    pub fn events(&self) -> &[StoryEvent] {
        &self.events
    }

    /// Find the ending branch unlocked by a direction, if any.
    pub fn ending_for_direction(&self, direction: Direction) -> Option<&EndingBranch> {
        self.endings.iter().find(|e| e.direction == direction)
    }

    /// Mutable variant of [`ending_for_direction`](Self::ending_for_direction).
    pub(crate) fn ending_for_direction_mut(
        &mut self,
        direction: Direction,
    ) -> Option<&mut EndingBranch> {
        self.endings.iter_mut().find(|e| e.direction == direction)
    }

    /// Unlock a new ending branch.
    pub(crate) fn push_ending(&mut self, branch: EndingBranch) {
        self.endings.push(branch);
    }

    /// All ending branches, in unlock order.
    pub fn endings(&self) -> &[EndingBranch] {
        &self.endings
    }

    /// Append a turn record to the audit trail.
    pub(crate) fn push_turn(&mut self, record: TurnRecord) {
        self.turns.push(record);
    }

    /// The audit trail, oldest first.
    pub fn turns(&self) -> &[TurnRecord] {
        &self.turns
    }

    // =========================================================================
    // Statistics
    // =========================================================================

    /// Total number of characters.
    pub fn character_count(&self) -> usize {
        self.characters.len()
    }

    /// Total number of relationships.
    pub fn relationship_count(&self) -> usize {
        self.relationships.len()
    }

    /// Total number of events.
    pub fn event_count(&self) -> usize {
        self.events.len()
    }

    /// Total number of ending branches.
    pub fn ending_count(&self) -> usize {
        self.endings.len()
    }

    /// Total number of applied turns.
    pub fn turn_count(&self) -> usize {
        self.turns.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_creation() {
        let store = KnowledgeStore::new();
        assert_eq!(store.character_count(), 0);
        assert_eq!(store.next_turn_number(), 1);
    }

    #[test]
    fn test_character_lookup_is_case_insensitive() {
        let mut store = KnowledgeStore::new();
        let id = store.create_character("Mira");

        assert_eq!(store.find_character_id("mira"), Some(id));
        assert_eq!(store.find_character_id("MIRA"), Some(id));
        assert_eq!(store.find_character_id("Kael"), None);
    }

    #[test]
    fn test_relationship_lookup_is_unordered() {
        let mut store = KnowledgeStore::new();
        let mira = store.create_character("Mira");
        let kael = store.create_character("Kael");

        store.add_relationship(Relationship::new(mira, kael, 1));

        assert!(store.relationship_between(mira, kael).is_some());
        assert!(store.relationship_between(kael, mira).is_some());
        assert_eq!(store.relationship_count(), 1);
    }

    #[test]
    fn test_add_relationship_registers_endpoints() {
        let mut store = KnowledgeStore::new();
        let mira = store.create_character("Mira");
        let kael = store.create_character("Kael");

        let id = store.add_relationship(Relationship::new(mira, kael, 1));

        assert!(store
            .get_character(mira)
            .unwrap()
            .relationships
            .contains(&id));
        assert!(store
            .get_character(kael)
            .unwrap()
            .relationships
            .contains(&id));
    }

    #[test]
    fn test_mention_extraction_word_boundaries() {
        let mut store = KnowledgeStore::new();
        let kael = store.create_character("Kael");
        store.create_character("Mira");

        let mentioned = store.extract_mentioned_characters("I warn Kael about the storm");
        assert_eq!(mentioned, vec![kael]);

        let mentioned = store.extract_mentioned_characters("Kaelith draws her blade");
        assert!(mentioned.is_empty());
    }

    #[test]
    fn test_character_ids_are_name_ordered() {
        let mut store = KnowledgeStore::new();
        let mira = store.create_character("Mira");
        let anna = store.create_character("Anna");

        assert_eq!(store.character_ids(), vec![anna, mira]);
    }
}
