//! Append-only conversation transcript.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::{FilterOptions, Role, Turn};

/// Ordered log of turns. Insertion order is conversation order.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Transcript {
    turns: Vec<Turn>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a turn at the end.
    pub fn append(&mut self, turn: Turn) -> &Turn {
        self.turns.push(turn);
        &self.turns[self.turns.len() - 1]
    }

    /// Drop the filter-prompt turns that precede the turn `boundary`, then
    /// append `turn`. Prompts recorded after `boundary` are kept; an
    /// unknown `boundary` drops nothing.
    ///
    /// Used only when the answer to a completed guided search arrives, so
    /// the chip set that produced it stops being shown.
    pub fn append_replacing_filter_prompts(&mut self, turn: Turn, boundary: Uuid) -> &Turn {
        let before = self.turns.len();
        let cutoff = self
            .turns
            .iter()
            .position(|t| t.id == boundary)
            .unwrap_or(0);
        let mut index = 0;
        self.turns.retain(|t| {
            let keep = index >= cutoff || t.filter_prompt.is_none();
            index += 1;
            keep
        });
        let dropped = before - self.turns.len();
        if dropped > 0 {
            tracing::debug!(dropped, "filter prompt turns removed from transcript");
        }
        self.append(turn)
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub fn last(&self) -> Option<&Turn> {
        self.turns.last()
    }

    pub fn count(&self, role: Role) -> usize {
        self.turns.iter().filter(|t| t.role == role).count()
    }

    /// The filter prompt that is still interactive: only the last turn's.
    pub fn active_filter_prompt(&self) -> Option<&FilterOptions> {
        self.turns.last().and_then(|t| t.filter_prompt.as_ref())
    }

    /// Whether the turn at `index` is the one whose filter prompt is interactive.
    pub fn is_filter_prompt_active(&self, index: usize) -> bool {
        index + 1 == self.turns.len() && self.turns[index].filter_prompt.is_some()
    }
}
