//! The pluggable prose producer.
//!
//! Narration is a collaborator, not part of the update engine: it runs
//! after a turn has been applied, reads the store, and never mutates
//! it. The default implementation is template-based; an LLM-backed
//! narrator would implement the same trait behind its own timeout and
//! retry policy.

use crate::direction::Direction;
use crate::graph::{KnowledgeStore, TurnRecord};
use rand::seq::SliceRandom;

/// Produces the prose shown to the user for one applied turn.
pub trait Narrator {
    /// Narrate an applied turn from the current store state.
    fn narrate(&self, store: &KnowledgeStore, record: &TurnRecord) -> String;
}

/// Template-based narrator used when no external text producer is
/// plugged in. Picks one of a few canned lines per direction.
#[derive(Debug, Default)]
pub struct TemplateNarrator;

impl TemplateNarrator {
    /// Create a new template narrator.
    pub fn new() -> Self {
        Self
    }

    fn templates(direction: Direction) -> &'static [&'static str] {
        match direction {
            Direction::Aggressive => &[
                "Your aggressive stance has consequences. The situation escalates around {name}.",
                "The tension rises as {name} chooses to fight. This path leads to new challenges.",
            ],
            Direction::Heroic => &[
                "Your choice to help others inspires those around {name}.",
                "{name}'s selfless act creates new opportunities and allies.",
            ],
            Direction::Cautious => &[
                "Your cautious approach keeps {name} safe, for now.",
                "{name} chooses survival over confrontation. New paths emerge from the retreat.",
            ],
            Direction::Diplomatic => &[
                "{name}'s words open doors that force could not.",
                "Choosing dialogue over violence reveals hidden opportunities for {name}.",
            ],
            Direction::Neutral => &[
                "The moment passes quietly, and the story waits on {name}'s next choice.",
                "{name} takes it all in. The world holds its breath.",
            ],
        }
    }
}

impl Narrator for TemplateNarrator {
    fn narrate(&self, store: &KnowledgeStore, record: &TurnRecord) -> String {
        let name = record
            .characters
            .first()
            .and_then(|&id| store.get_character(id))
            .map(|c| c.name.as_str())
            .unwrap_or("the hero");

        let mut rng = rand::thread_rng();
        let templates = Self::templates(record.direction);
        let template = templates
            .choose(&mut rng)
            .copied()
            .unwrap_or("The story moves on.");

        let mut line = template.replace("{name}", name);

        // A second character in the scene reacts.
        if let Some(other) = record
            .characters
            .iter()
            .skip(1)
            .filter_map(|&id| store.get_character(id))
            .collect::<Vec<_>>()
            .choose(&mut rng)
        {
            line.push_str(&format!(
                "\n\n{} notices and reacts accordingly.",
                other.name
            ));
        }

        line
    }
}
