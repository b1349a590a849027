//! Responder port
//!
//! Defines the interface to the language-model backend: given a system
//! template and a rendered user prompt, return one structured
//! choice-plus-rationale answer. Transient transport failures are the
//! adapter's problem: it retries up to its configured bound and only then
//! surfaces [`ResponderError::RetriesExhausted`], which is fatal for the
//! current question.

use async_trait::async_trait;
use thiserror::Error;

/// Errors that can occur when asking the responder
#[derive(Error, Debug)]
pub enum ResponderError {
    #[error("Transport error: {message}")]
    Transport {
        /// HTTP status of a failed response; `None` for connection-level
        /// failures that never produced one
        status: Option<u16>,
        message: String,
    },

    #[error("Malformed response: {0}")]
    Malformed(String),

    #[error("Gave up after {attempts} attempts")]
    RetriesExhausted { attempts: usize },

    #[error("Responder error: {0}")]
    Other(String),
}

/// An answer exactly as the backend returned it, before any validation.
///
/// The choice may be out of range; the agent enforces the 1..=4 invariant
/// and re-asks on violation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawAnswer {
    pub choice: i64,
    pub rationale: String,
}

impl RawAnswer {
    pub fn new(choice: i64, rationale: impl Into<String>) -> Self {
        Self {
            choice,
            rationale: rationale.into(),
        }
    }
}

/// Gateway to the language-model backend
#[async_trait]
pub trait Responder: Send + Sync {
    /// Ask for one answer at the given sampling temperature
    async fn respond(
        &self,
        system_prompt: &str,
        user_prompt: &str,
        temperature: f64,
    ) -> Result<RawAnswer, ResponderError>;
}
