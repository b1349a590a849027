//! Structured run recording.

pub mod jsonl_recorder;

pub use jsonl_recorder::JsonlRunRecorder;
