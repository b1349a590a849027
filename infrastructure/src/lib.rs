//! Infrastructure layer for madnet
//!
//! Adapters for the application ports: the OpenAI-style responder, file
//! configuration, the JSONL dataset loader, and the JSONL run recorder.

pub mod config;
pub mod dataset;
pub mod logging;
pub mod responder;

pub use config::{ConfigLoader, FileConfig};
pub use dataset::{DatasetError, DatasetLoader};
pub use logging::JsonlRunRecorder;
pub use responder::{OpenAiResponder, ResponderSettings};
