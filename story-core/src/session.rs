//! StorySession - the primary public API for interactive stories.
//!
//! This module wraps the classifier, consequence resolver, update
//! engine, view projector, and persistence into a single facade the
//! chat loop talks to. One session owns one knowledge store; there is
//! no hidden global state.

use crate::consequence::resolve;
use crate::direction::classify;
use crate::engine::{self, TurnError};
use crate::graph::{CharacterId, KnowledgeStore, TurnRecord};
use crate::narrator::{Narrator, TemplateNarrator};
use crate::persist::{self, PersistError, SavedStory, WorldSeed};
use crate::views::{self, CharacterStatus, EndingPreview, ProgressReport};
use std::path::Path;
use thiserror::Error;

/// Errors from StorySession operations.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("turn rejected: {0}")]
    Turn(#[from] TurnError),

    #[error("storage error: {0}")]
    Persist(#[from] PersistError),

    #[error("no character named '{0}' in this story")]
    UnknownCharacter(String),
}

/// The result of one processed turn.
#[derive(Debug, Clone)]
pub struct TurnOutcome {
    /// The audit record the turn produced.
    pub record: TurnRecord,

    /// The narrated prose shown to the user.
    pub narrative: String,
}

/// An interactive story session.
///
/// Lifecycle: build from a [`WorldSeed`] (or a checkpoint) at session
/// start, mutate once per [`process_turn`](Self::process_turn),
/// checkpoint with [`save`](Self::save), drop at process exit.
pub struct StorySession {
    store: KnowledgeStore,
    player: CharacterId,
    player_name: String,
    narrator: Box<dyn Narrator>,
}

impl std::fmt::Debug for StorySession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StorySession")
            .field("player", &self.player)
            .field("player_name", &self.player_name)
            .finish_non_exhaustive()
    }
}

impl StorySession {
    /// Start a session from a world seed, playing the named character.
    pub fn new(seed: WorldSeed, player_name: &str) -> Result<Self, SessionError> {
        Self::with_store(seed.into_store()?, player_name)
    }

    /// Start a session over an existing store.
    pub fn with_store(store: KnowledgeStore, player_name: &str) -> Result<Self, SessionError> {
        let player = store
            .find_character_id(player_name)
            .ok_or_else(|| SessionError::UnknownCharacter(player_name.to_string()))?;
        let player_name = store
            .get_character(player)
            .map(|c| c.name.clone())
            .unwrap_or_else(|| player_name.to_string());

        Ok(Self {
            store,
            player,
            player_name,
            narrator: Box::new(TemplateNarrator::new()),
        })
    }

    /// Replace the narrator (e.g. with an LLM-backed one).
    pub fn with_narrator(mut self, narrator: Box<dyn Narrator>) -> Self {
        self.narrator = narrator;
        self
    }

    /// Process one user turn: classify, resolve, apply, narrate.
    ///
    /// The acting cast is the player plus any characters mentioned by
    /// name in the input; when no one else is mentioned, the whole
    /// cast shares the scene. On a validation error the store is
    /// unchanged and the turn is not counted.
    pub fn process_turn(&mut self, input: &str) -> Result<TurnOutcome, SessionError> {
        let direction = classify(input);
        let actors = self.select_actors(input);

        let record = resolve(direction, &actors);
        let turn = self.store.next_turn_number();
        let applied = engine::apply(&mut self.store, turn, persist::unix_now(), input, &record)?;

        let narrative = self.narrator.narrate(&self.store, &applied);
        tracing::info!(turn = applied.turn, direction = %applied.direction, "processed turn");

        Ok(TurnOutcome {
            record: applied,
            narrative,
        })
    }

    fn select_actors(&self, input: &str) -> Vec<CharacterId> {
        let mut actors = vec![self.player];
        for id in self.store.extract_mentioned_characters(input) {
            if !actors.contains(&id) {
                actors.push(id);
            }
        }

        if actors.len() == 1 {
            // Nobody else named: the whole cast shares the scene.
            for id in self.store.character_ids() {
                if !actors.contains(&id) {
                    actors.push(id);
                }
            }
        }

        actors
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Status of a character by name.
    pub fn status(&self, name: &str) -> Result<CharacterStatus, SessionError> {
        self.store
            .find_character_id(name)
            .and_then(|id| views::status(&self.store, id))
            .ok_or_else(|| SessionError::UnknownCharacter(name.to_string()))
    }

    /// Status of the player's character.
    pub fn player_status(&self) -> Result<CharacterStatus, SessionError> {
        views::status(&self.store, self.player)
            .ok_or_else(|| SessionError::UnknownCharacter(self.player_name.clone()))
    }

    /// Overall story progress.
    pub fn progress(&self) -> ProgressReport {
        views::progress(&self.store)
    }

    /// Candidate endings, strongest first.
    pub fn endings(&self) -> Vec<EndingPreview> {
        views::endings(&self.store)
    }

    /// The name of the character the user is playing.
    pub fn player_name(&self) -> &str {
        &self.player_name
    }

    /// Read-only access to the knowledge store.
    pub fn store(&self) -> &KnowledgeStore {
        &self.store
    }

    // =========================================================================
    // Persistence
    // =========================================================================

    /// Checkpoint the session to a file.
    pub async fn save(&self, path: impl AsRef<Path>) -> Result<(), SessionError> {
        SavedStory::new(self.store.clone(), &self.player_name)
            .save_json(path)
            .await?;
        Ok(())
    }

    /// Resume a session from a checkpoint file.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, SessionError> {
        let saved = SavedStory::load_json(path).await?;
        Self::with_store(saved.store, &saved.player_character)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::direction::Direction;
    use crate::graph::EmotionalState;
    use crate::persist::{SeedCharacter, SeedRelationship};

    fn sample_seed() -> WorldSeed {
        WorldSeed {
            title: "The Broken Vale".to_string(),
            characters: vec![
                SeedCharacter {
                    name: "Mira".to_string(),
                    emotional_state: EmotionalState::Neutral,
                },
                SeedCharacter {
                    name: "Kael".to_string(),
                    emotional_state: EmotionalState::Neutral,
                },
                SeedCharacter {
                    name: "Sera".to_string(),
                    emotional_state: EmotionalState::Neutral,
                },
            ],
            relationships: vec![],
        }
    }

    #[test]
    fn test_session_requires_known_player() {
        let err = StorySession::new(sample_seed(), "Nobody").unwrap_err();
        assert!(matches!(err, SessionError::UnknownCharacter(_)));
    }

    #[test]
    fn test_mentioned_character_joins_the_scene() {
        let mut session = StorySession::new(sample_seed(), "Mira").unwrap();

        let outcome = session.process_turn("I help Kael cross the river").unwrap();

        assert_eq!(outcome.record.direction, Direction::Heroic);
        // Only Mira and Kael act; Sera stays out of it.
        assert_eq!(outcome.record.characters.len(), 2);
        let sera = session.store().find_character_id("Sera").unwrap();
        assert!(!outcome.record.characters.contains(&sera));
    }

    #[test]
    fn test_unaddressed_turn_includes_whole_cast() {
        let mut session = StorySession::new(sample_seed(), "Mira").unwrap();

        let outcome = session.process_turn("I will protect my friends").unwrap();

        assert_eq!(outcome.record.characters.len(), 3);
    }

    #[test]
    fn test_turn_numbers_increase_across_process_turn() {
        let mut session = StorySession::new(sample_seed(), "Mira").unwrap();

        for expected in 1..=4u32 {
            let outcome = session.process_turn("we march on").unwrap();
            assert_eq!(outcome.record.turn, expected);
        }
    }

    #[test]
    fn test_status_query() {
        let mut session = StorySession::new(sample_seed(), "Mira").unwrap();
        session.process_turn("I attack Kael").unwrap();

        let status = session.status("kael").unwrap();
        assert_eq!(status.emotional_state, EmotionalState::Agitated);

        assert!(session.status("Nobody").is_err());
    }

    #[test]
    fn test_progress_and_endings_reflect_turns() {
        let mut session = StorySession::new(sample_seed(), "Mira").unwrap();
        session.process_turn("let's negotiate").unwrap();
        session.process_turn("let's talk this through").unwrap();

        let progress = session.progress();
        assert_eq!(progress.total_turns, 2);

        let endings = session.endings();
        assert_eq!(endings.len(), 1);
        assert_eq!(endings[0].weight, 2);
    }

    #[tokio::test]
    async fn test_save_and_load_round_trip() {
        use tempfile::TempDir;

        let temp_dir = TempDir::new().expect("temp dir");
        let path = temp_dir.path().join("story.json");

        let mut session = StorySession::new(sample_seed(), "Mira").unwrap();
        session.process_turn("I save Kael from the wolves").unwrap();
        session.save(&path).await.expect("save should succeed");

        let resumed = StorySession::load(&path).await.expect("load should succeed");
        assert_eq!(resumed.player_name(), "Mira");
        assert_eq!(resumed.store(), session.store());

        // The resumed session keeps counting turns without gaps.
        let mut resumed = resumed;
        let outcome = resumed.process_turn("we rest").unwrap();
        assert_eq!(outcome.record.turn, 2);
    }

    #[test]
    fn test_seed_relationship_survives_into_session() {
        let mut seed = sample_seed();
        seed.relationships.push(SeedRelationship {
            from: "Mira".to_string(),
            to: "Kael".to_string(),
            valence: 2,
        });

        let session = StorySession::new(seed, "Mira").unwrap();
        let store = session.store();
        let mira = store.find_character_id("Mira").unwrap();
        let kael = store.find_character_id("Kael").unwrap();
        assert_eq!(store.relationship_between(mira, kael).unwrap().valence, 2);
    }
}
