//! Structured answers and chat histories
//!
//! A [`StructuredAnswer`] is the one record every agent or judge invocation
//! produces: who answered, which option, and why. Answers are immutable once
//! created; crossing a node boundary appends a relabeled copy, never a shared
//! reference.

use crate::core::question::Choice;
use serde::{Deserialize, Serialize};

/// One agent or judge turn: a chosen option plus its rationale
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructuredAnswer {
    /// Name of the agent, judge, or sending community that produced this
    pub author: String,
    /// The selected option (1..=4)
    pub choice: Choice,
    /// Free-form reasoning behind the choice
    pub rationale: String,
}

impl StructuredAnswer {
    pub fn new(author: impl Into<String>, choice: Choice, rationale: impl Into<String>) -> Self {
        Self {
            author: author.into(),
            choice,
            rationale: rationale.into(),
        }
    }

    /// Copy of this answer with the author rewritten to an anonymous
    /// cross-boundary label. `position` is the 1-based slot the copy will
    /// occupy in the receiving node's history.
    pub fn relabeled(&self, position: usize) -> Self {
        Self {
            author: format!("[Previous Response {}]", position),
            choice: self.choice,
            rationale: self.rationale.clone(),
        }
    }
}

/// Ordered sequence of answers visible to a node's agents
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatHistory {
    entries: Vec<StructuredAnswer>,
}

impl ChatHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, answer: StructuredAnswer) {
        self.entries.push(answer);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[StructuredAnswer] {
        &self.entries
    }

    /// The final `n` entries (or all of them when fewer exist)
    pub fn last_n(&self, n: usize) -> &[StructuredAnswer] {
        let start = self.entries.len().saturating_sub(n);
        &self.entries[start..]
    }

    /// Textual summary of the whole history for prompt rendering
    pub fn render(&self) -> String {
        render_entries(&self.entries)
    }
}

/// Render a slice of answers into the prompt-facing summary format.
///
/// Returns an explicit placeholder when there is nothing to show, so a
/// first-round agent still gets a well-formed prompt.
pub fn render_entries(entries: &[StructuredAnswer]) -> String {
    if entries.is_empty() {
        return "No responses yet.".to_string();
    }
    entries
        .iter()
        .map(|a| format!("{} chose Option {}.\nReason: {}", a.author, a.choice, a.rationale))
        .collect::<Vec<_>>()
        .join("\n\n")
}
