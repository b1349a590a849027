//! Application layer for madnet
//!
//! Use cases and ports. The use cases orchestrate the debate network over
//! the [`ports::responder::Responder`] port; adapters live in the
//! infrastructure layer.

pub mod agent;
pub mod ports;
pub mod use_cases;

pub use agent::{Agent, AgentError, DebateParams};
pub use ports::{
    observer::{DebateObserver, NoObserver},
    responder::{RawAnswer, Responder, ResponderError},
    run_recorder::{NoRecorder, RunEvent, RunRecorder},
};
pub use use_cases::{
    run_batch::{BatchOutcome, LabeledQuestion, RunBatchError, RunBatchInput, RunBatchUseCase},
    run_network::{RunNetworkError, RunNetworkInput, RunNetworkUseCase},
};
