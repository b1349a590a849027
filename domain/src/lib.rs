//! Domain layer for madnet
//!
//! This crate contains the core business logic of the debate network:
//! value objects, the dependency graph with its readiness protocol, prompt
//! templates, and batch scoring. It has no dependencies on infrastructure
//! or presentation concerns.
//!
//! # Core Concepts
//!
//! ## Debate Network
//!
//! Communities of agents are wired into a directed dependency graph. A
//! community may only fire once every community it listens to has delivered
//! its verdict; a terminal judge reduces all delivered verdicts to one
//! final answer.
//!
//! ## One-shot firing
//!
//! Readiness is a consumable permit: [`DebateGraph::mark_ready`] latches a
//! node's fired flag the single time it returns `true`.

pub mod core;
pub mod debate;
pub mod graph;
pub mod prompt;

// Re-export commonly used types
pub use core::{
    error::DomainError,
    question::{Choice, NUM_CHOICES, Question},
};
pub use debate::{
    answer::{ChatHistory, StructuredAnswer, render_entries},
    parsing::parse_answer_text,
    stats::{BatchStats, QuestionRecord},
    trace::{NodeTrace, RunTrace},
};
pub use graph::{
    node::{Node, NodeId, NodeKind},
    topology::{NetworkTopology, temperature_spread},
    DebateGraph,
};
pub use prompt::template::DebatePrompt;
