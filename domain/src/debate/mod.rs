//! Debate domain: structured answers, chat histories, response parsing,
//! run traces, and batch scoring.

pub mod answer;
pub mod parsing;
pub mod stats;
pub mod trace;

pub use answer::{ChatHistory, StructuredAnswer, render_entries};
pub use parsing::parse_answer_text;
pub use stats::{BatchStats, QuestionRecord};
pub use trace::{NodeTrace, RunTrace};
