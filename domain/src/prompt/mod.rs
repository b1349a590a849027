//! Prompt templates for debate turns and judging.

pub mod template;

pub use template::DebatePrompt;
