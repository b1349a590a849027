//! Port for structured run recording.
//!
//! Separate from `tracing`: tracing carries human-readable diagnostics,
//! this port captures run traces and batch outcomes in a machine-readable
//! form (e.g. one JSONL line per event) for the statistics side.

use serde_json::Value;

/// A structured run event
pub struct RunEvent {
    /// Event type identifier, e.g. "run_trace" or "question_skipped"
    pub event_type: &'static str,
    /// JSON payload with event-specific data
    pub payload: Value,
}

impl RunEvent {
    pub fn new(event_type: &'static str, payload: Value) -> Self {
        Self {
            event_type,
            payload,
        }
    }
}

/// Port for recording run events.
///
/// Intentionally synchronous and non-fallible: recording failures must not
/// disrupt the run, so implementations swallow and log their own errors.
pub trait RunRecorder: Send + Sync {
    fn record(&self, event: RunEvent);
}

/// No-op implementation for tests and when recording is disabled
pub struct NoRecorder;

impl RunRecorder for NoRecorder {
    fn record(&self, _event: RunEvent) {}
}
