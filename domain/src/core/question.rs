//! Question and choice value objects

use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};

/// Number of answer options every question carries.
pub const NUM_CHOICES: usize = 4;

/// A validated answer choice in the range 1..=4 (Value Object)
///
/// Deserialization goes through [`Choice::new`], so an out-of-range number
/// in serialized data is rejected rather than smuggled past the invariant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct Choice(u8);

impl Choice {
    /// Create a choice, rejecting anything outside 1..=4
    pub fn new(value: i64) -> Result<Self, DomainError> {
        if (1..=NUM_CHOICES as i64).contains(&value) {
            Ok(Self(value as u8))
        } else {
            Err(DomainError::InvalidChoice(value))
        }
    }

    /// 1-based option number
    pub fn get(self) -> u8 {
        self.0
    }

    /// 0-based index into a question's choice list
    pub fn index(self) -> usize {
        self.0 as usize - 1
    }
}

impl TryFrom<i64> for Choice {
    type Error = DomainError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Choice::new(value)
    }
}

impl From<Choice> for i64 {
    fn from(choice: Choice) -> Self {
        choice.0 as i64
    }
}

impl std::fmt::Display for Choice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A multiple-choice question with exactly four labeled options (Value Object)
///
/// Shared read-only across all agents in a run; never mutated after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    text: String,
    choices: [String; NUM_CHOICES],
}

impl Question {
    /// Create a new question
    pub fn new(
        text: impl Into<String>,
        choices: [String; NUM_CHOICES],
    ) -> Result<Self, DomainError> {
        let text = text.into();
        if text.trim().is_empty() {
            return Err(DomainError::EmptyQuestion);
        }
        Ok(Self { text, choices })
    }

    /// Get the question text
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Get the four answer options
    pub fn choices(&self) -> &[String; NUM_CHOICES] {
        &self.choices
    }

    /// The option text a choice points at
    pub fn option(&self, choice: Choice) -> &str {
        &self.choices[choice.index()]
    }
}

impl std::fmt::Display for Question {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{}", self.text)?;
        for (i, choice) in self.choices.iter().enumerate() {
            writeln!(f)?;
            write!(f, "Option {}: {}", i + 1, choice)?;
        }
        Ok(())
    }
}
