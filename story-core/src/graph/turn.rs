//! The per-turn audit trail.

use super::character::CharacterId;
use super::ending::EndingId;
use super::event::EventId;
use super::relationship::RelationshipId;
use crate::direction::Direction;
use serde::{Deserialize, Serialize};

/// The durable record of one applied turn.
///
/// Turn numbers start at 1 and are strictly increasing with no gaps.
/// The record lists every entity the turn touched, which is enough to
/// reconstruct progress without replaying the conversation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TurnRecord {
    /// Turn sequence number.
    pub turn: u32,
    /// The raw user input that drove the turn.
    pub raw_text: String,
    /// The direction the input classified to.
    pub direction: Direction,
    /// When the turn was applied (unix seconds, as a string).
    pub timestamp: String,
    /// Characters whose state the turn touched.
    pub characters: Vec<CharacterId>,
    /// Relationships created or updated by the turn.
    pub relationships: Vec<RelationshipId>,
    /// The event the turn recorded.
    pub event: EventId,
    /// The ending branch the turn created or reinforced, if any.
    pub ending: Option<EndingId>,
}
