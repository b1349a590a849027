//! Ports (interfaces) for external collaborators.
//!
//! Implementations (adapters) live in the infrastructure and cli layers.

pub mod observer;
pub mod responder;
pub mod run_recorder;
