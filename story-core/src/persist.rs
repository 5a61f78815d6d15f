//! World loading and checkpointing.
//!
//! Two documents cross this boundary: the *world seed* (the static
//! graph a session starts from) and the *checkpoint* (the full
//! knowledge store, turn history included). Both are JSON; a
//! checkpoint reloads into a structurally identical store.

use crate::graph::{Character, EmotionalState, KnowledgeStore, Relationship};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;
use tokio::fs;

/// Errors from load/checkpoint operations.
#[derive(Debug, Error)]
pub enum PersistError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Version mismatch: expected {expected}, found {found}")]
    VersionMismatch { expected: u32, found: u32 },

    #[error("World seed has no characters")]
    EmptySeed,

    #[error("World seed relationship references unknown character '{0}'")]
    UnknownSeedCharacter(String),

    #[error("World seed lists character '{0}' more than once")]
    DuplicateSeedCharacter(String),

    #[error("World seed lists more than one relationship between '{0}' and '{1}'")]
    DuplicateSeedRelationship(String, String),
}

/// Current checkpoint format version.
const SAVE_VERSION: u32 = 1;

// ============================================================================
// World seed
// ============================================================================

/// One character in the world seed document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedCharacter {
    /// Display name, unique within the seed.
    pub name: String,
    /// Starting emotional state.
    #[serde(default)]
    pub emotional_state: EmotionalState,
}

/// One pre-existing relationship in the world seed document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedRelationship {
    /// Initiator character name.
    pub from: String,
    /// Target character name.
    pub to: String,
    /// Starting valence score.
    #[serde(default)]
    pub valence: i32,
}

/// The static world graph a session is initialized from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorldSeed {
    /// Story title.
    pub title: String,
    /// The cast.
    pub characters: Vec<SeedCharacter>,
    /// Relationships established before the story begins.
    #[serde(default)]
    pub relationships: Vec<SeedRelationship>,
}

impl WorldSeed {
    /// Load a world seed from a JSON file.
    ///
    /// A missing file or malformed document fails fast; the engine
    /// never substitutes an empty world for corrupt input.
    pub async fn load_json(path: impl AsRef<Path>) -> Result<Self, PersistError> {
        let content = fs::read_to_string(path).await?;
        let seed: Self = serde_json::from_str(&content)?;
        Ok(seed)
    }

    /// Build an initialized knowledge store from the seed.
    ///
    /// Rejects an empty cast, repeated character names, relationships
    /// naming unknown characters, and more than one relationship per
    /// unordered character pair.
    pub fn into_store(self) -> Result<KnowledgeStore, PersistError> {
        if self.characters.is_empty() {
            return Err(PersistError::EmptySeed);
        }

        let mut store = KnowledgeStore::new();
        for seed in &self.characters {
            if store.find_character_id(&seed.name).is_some() {
                return Err(PersistError::DuplicateSeedCharacter(seed.name.clone()));
            }
            store.add_character(Character::new(&seed.name).with_state(seed.emotional_state));
        }

        for seed in &self.relationships {
            let from = store
                .find_character_id(&seed.from)
                .ok_or_else(|| PersistError::UnknownSeedCharacter(seed.from.clone()))?;
            let to = store
                .find_character_id(&seed.to)
                .ok_or_else(|| PersistError::UnknownSeedCharacter(seed.to.clone()))?;

            // Lookup is unordered, so Mira->Kael and Kael->Mira collide.
            if store.relationship_between(from, to).is_some() {
                return Err(PersistError::DuplicateSeedRelationship(
                    seed.from.clone(),
                    seed.to.clone(),
                ));
            }

            let mut relationship = Relationship::new(from, to, 0);
            relationship.adjust_valence(seed.valence);
            store.add_relationship(relationship);
        }

        tracing::info!(
            characters = store.character_count(),
            relationships = store.relationship_count(),
            "initialized world from seed"
        );
        Ok(store)
    }
}

// ============================================================================
// Checkpoint
// ============================================================================

/// A checkpointed story with everything needed to resume it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavedStory {
    /// Checkpoint format version for compatibility checking.
    pub version: u32,

    /// When the checkpoint was written.
    pub saved_at: String,

    /// Name of the character the user is playing.
    pub player_character: String,

    /// The complete knowledge store, turn history included.
    pub store: KnowledgeStore,

    /// Quick-access metadata about the checkpoint.
    pub metadata: StoryMetadata,
}

/// Metadata about a checkpoint for quick display.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoryMetadata {
    /// Name of the character the user is playing.
    pub player_character: String,

    /// Turns taken so far.
    pub turns_taken: u32,

    /// Ending branches unlocked so far.
    pub endings_unlocked: usize,

    /// When the checkpoint was written.
    #[serde(default)]
    pub saved_at: String,
}

impl SavedStory {
    /// Create a checkpoint from the current store state.
    pub fn new(store: KnowledgeStore, player_character: impl Into<String>) -> Self {
        let player_character = player_character.into();
        let saved_at = unix_now();
        let metadata = StoryMetadata {
            player_character: player_character.clone(),
            turns_taken: store.turn_count() as u32,
            endings_unlocked: store.ending_count(),
            saved_at: saved_at.clone(),
        };

        Self {
            version: SAVE_VERSION,
            saved_at,
            player_character,
            store,
            metadata,
        }
    }

    /// Write the checkpoint to a JSON file.
    pub async fn save_json(&self, path: impl AsRef<Path>) -> Result<(), PersistError> {
        let content = serde_json::to_string_pretty(self)?;
        fs::write(&path, content).await?;
        tracing::info!(path = %path.as_ref().display(), "wrote checkpoint");
        Ok(())
    }

    /// Load a checkpoint from a JSON file.
    pub async fn load_json(path: impl AsRef<Path>) -> Result<Self, PersistError> {
        let content = fs::read_to_string(path).await?;
        let saved: Self = serde_json::from_str(&content)?;

        if saved.version != SAVE_VERSION {
            return Err(PersistError::VersionMismatch {
                expected: SAVE_VERSION,
                found: saved.version,
            });
        }

        Ok(saved)
    }

    /// Read checkpoint metadata without loading the full store.
    pub async fn peek_metadata(path: impl AsRef<Path>) -> Result<StoryMetadata, PersistError> {
        let content = fs::read_to_string(path).await?;

        #[derive(Deserialize)]
        struct Partial {
            version: u32,
            metadata: StoryMetadata,
        }

        let partial: Partial = serde_json::from_str(&content)?;

        if partial.version != SAVE_VERSION {
            return Err(PersistError::VersionMismatch {
                expected: SAVE_VERSION,
                found: partial.version,
            });
        }

        Ok(partial.metadata)
    }
}

/// Information about a checkpoint file.
#[derive(Debug, Clone)]
pub struct SaveInfo {
    /// Path to the checkpoint file.
    pub path: String,

    /// Checkpoint metadata.
    pub metadata: StoryMetadata,
}

/// List all checkpoint files in a directory.
pub async fn list_saves(dir: impl AsRef<Path>) -> Result<Vec<SaveInfo>, PersistError> {
    let mut saves = Vec::new();

    let dir_path = dir.as_ref();
    if !dir_path.exists() {
        fs::create_dir_all(dir_path).await?;
        return Ok(saves);
    }

    let mut entries = fs::read_dir(dir_path).await?;
    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        if path.extension().map(|e| e == "json").unwrap_or(false) {
            if let Ok(metadata) = SavedStory::peek_metadata(&path).await {
                saves.push(SaveInfo {
                    path: path.to_string_lossy().to_string(),
                    metadata,
                });
            }
        }
    }

    saves.sort_by(|a, b| a.metadata.player_character.cmp(&b.metadata.player_character));
    Ok(saves)
}

/// Generate a checkpoint path for a player character.
pub fn story_save_path(dir: impl AsRef<Path>, player_character: &str) -> std::path::PathBuf {
    let sanitized = player_character
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { '_' })
        .collect::<String>();
    dir.as_ref().join(format!("{sanitized}.json"))
}

/// Current unix time in seconds, as a string.
pub(crate) fn unix_now() -> String {
    use std::time::{SystemTime, UNIX_EPOCH};

    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default();

    format!("{}", now.as_secs())
}
