//! The dynamic world knowledge graph.
//!
//! Everything the story engine knows about the evolving world lives
//! here: characters, the relationships between them, the event
//! timeline, candidate ending branches, and the per-turn audit trail.
//!
//! ## Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                      KnowledgeStore                            │
//! │                                                                │
//! │  ┌──────────────┐  ┌───────────────────┐  ┌────────────────┐  │
//! │  │ Characters   │  │ Relationships     │  │ Events         │  │
//! │  │ (id→char)    │  │ (char↔char)       │  │ (timeline)     │  │
//! │  └──────────────┘  └───────────────────┘  └────────────────┘  │
//! │                                                                │
//! │  ┌───────────────────────┐  ┌──────────────────────────────┐  │
//! │  │ EndingBranches        │  │ TurnRecords (audit trail)    │  │
//! │  │ (one per direction)   │  │                              │  │
//! │  └───────────────────────┘  └──────────────────────────────┘  │
//! └────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The store exclusively owns all entities; callers only ever hold
//! opaque identifiers.

mod character;
mod ending;
mod event;
mod relationship;
mod store;
mod turn;

pub use character::{ArcNote, Character, CharacterId, EmotionalState};
pub use ending::{EndingBranch, EndingId};
pub use event::{EventId, StoryEvent};
pub use relationship::{Relationship, RelationshipId, RelationshipNote, ValenceLabel};
pub use store::KnowledgeStore;
pub use turn::TurnRecord;
