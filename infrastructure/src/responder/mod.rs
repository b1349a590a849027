//! Responder adapters.

pub mod openai;

pub use openai::{OpenAiResponder, ResponderSettings};
