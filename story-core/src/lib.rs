//! Interactive story engine with a dynamic world-state knowledge graph.
//!
//! This crate provides:
//! - A per-session knowledge graph of characters, relationships,
//!   events, and candidate endings
//! - Deterministic classification of user input into narrative
//!   directions
//! - A transactional update engine that derives and applies
//!   consequences turn by turn
//! - Read-only status/progress/ending views for the conversation layer
//! - JSON world loading and checkpointing with round-trip fidelity
//!
//! # Quick Start
//!
//! ```ignore
//! use story_core::{StorySession, WorldSeed};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let seed = WorldSeed::load_json("world.json").await?;
//!     let mut session = StorySession::new(seed, "Mira")?;
//!
//!     let outcome = session.process_turn("I will help and protect my friend")?;
//!     println!("{}", outcome.narrative);
//!
//!     session.save("saves/mira.json").await?;
//!     Ok(())
//! }
//! ```

pub mod consequence;
pub mod direction;
pub mod engine;
pub mod graph;
pub mod narrator;
pub mod persist;
pub mod session;
pub mod views;

// Primary public API
pub use direction::{classify, Direction};
pub use engine::TurnError;
pub use graph::{CharacterId, EmotionalState, KnowledgeStore};
pub use narrator::{Narrator, TemplateNarrator};
pub use persist::{PersistError, SavedStory, WorldSeed};
pub use session::{SessionError, StorySession, TurnOutcome};
pub use views::{CharacterStatus, EndingPreview, ProgressReport};
