//! Domain error types

use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Choice {0} is outside the valid range 1..=4")]
    InvalidChoice(i64),

    #[error("Question text cannot be empty")]
    EmptyQuestion,

    /// A message arrived from a sender the node was not listening for.
    /// Indicates a graph-construction bug (duplicate or missing edge).
    #[error("Node '{node}' received a message from unexpected sender '{sender}'")]
    UnexpectedSender { node: String, sender: String },

    #[error("Invalid network topology: {0}")]
    BadTopology(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unexpected_sender_display() {
        let error = DomainError::UnexpectedSender {
            node: "Community 2".to_string(),
            sender: "Community 5".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Node 'Community 2' received a message from unexpected sender 'Community 5'"
        );
    }

    #[test]
    fn test_invalid_choice_display() {
        assert_eq!(
            DomainError::InvalidChoice(7).to_string(),
            "Choice 7 is outside the valid range 1..=4"
        );
    }
}
