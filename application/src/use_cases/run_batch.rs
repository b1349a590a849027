//! Run Batch use case
//!
//! Feeds a list of labeled questions through the network one at a time.
//! A single question's fatal failure (retry exhaustion, transport death)
//! skips that question and keeps the batch going; skips are counted so the
//! final statistics stay honest about their denominator.

use crate::agent::DebateParams;
use crate::ports::observer::{DebateObserver, NoObserver};
use crate::ports::responder::Responder;
use crate::ports::run_recorder::{NoRecorder, RunEvent, RunRecorder};
use crate::use_cases::run_network::{RunNetworkInput, RunNetworkUseCase};
use madnet_domain::{
    BatchStats, Choice, NetworkTopology, Question, QuestionRecord, temperature_spread,
};
use serde_json::json;
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

/// Errors that abort a whole batch (per-question failures never do)
#[derive(Error, Debug)]
pub enum RunBatchError {
    #[error("Batch contains no questions")]
    EmptyBatch,
}

/// A question plus its ground-truth answer
#[derive(Debug, Clone)]
pub struct LabeledQuestion {
    pub question: Question,
    pub correct: Choice,
}

impl LabeledQuestion {
    pub fn new(question: Question, correct: Choice) -> Self {
        Self { question, correct }
    }
}

/// Input for the RunBatch use case
#[derive(Debug, Clone)]
pub struct RunBatchInput {
    pub questions: Vec<LabeledQuestion>,
    pub topology: NetworkTopology,
    pub params: DebateParams,
    pub temperatures: Vec<f64>,
    pub judge_temperature: f64,
}

impl RunBatchInput {
    /// Defaults match [`RunNetworkInput::new`]
    pub fn new(questions: Vec<LabeledQuestion>, topology: NetworkTopology) -> Self {
        let temperatures = temperature_spread(0.5, 1.5, topology.communities());
        Self {
            questions,
            topology,
            params: DebateParams::default(),
            temperatures,
            judge_temperature: 1.0,
        }
    }

    pub fn with_params(mut self, params: DebateParams) -> Self {
        self.params = params;
        self
    }

    pub fn with_temperatures(mut self, temperatures: Vec<f64>) -> Self {
        self.temperatures = temperatures;
        self
    }

    pub fn with_judge_temperature(mut self, temperature: f64) -> Self {
        self.judge_temperature = temperature;
        self
    }
}

/// Everything a finished batch produced
#[derive(Debug, Clone)]
pub struct BatchOutcome {
    /// Answered questions with their traces, in input order
    pub records: Vec<QuestionRecord>,
    /// Questions abandoned after a fatal failure
    pub skipped: usize,
    pub stats: BatchStats,
}

/// Use case for running a whole labeled dataset
pub struct RunBatchUseCase<R: Responder + 'static> {
    network: RunNetworkUseCase<R>,
}

impl<R: Responder + 'static> RunBatchUseCase<R> {
    pub fn new(responder: Arc<R>) -> Self {
        Self {
            network: RunNetworkUseCase::new(responder),
        }
    }

    /// Execute without progress or recording
    pub async fn execute(&self, input: RunBatchInput) -> Result<BatchOutcome, RunBatchError> {
        self.execute_with(input, &NoObserver, &NoRecorder).await
    }

    /// Execute with progress callbacks and a run recorder
    pub async fn execute_with(
        &self,
        input: RunBatchInput,
        observer: &dyn DebateObserver,
        recorder: &dyn RunRecorder,
    ) -> Result<BatchOutcome, RunBatchError> {
        if input.questions.is_empty() {
            return Err(RunBatchError::EmptyBatch);
        }

        let total = input.questions.len();
        let communities = input.topology.communities();
        info!(total, communities, "starting batch run");

        let mut records = Vec::new();
        let mut skipped = 0usize;

        for (index, labeled) in input.questions.iter().enumerate() {
            observer.on_question_start(index, total);
            recorder.record(RunEvent::new(
                "question_start",
                json!({ "index": index, "question": labeled.question.text() }),
            ));

            let run_input = RunNetworkInput::new(labeled.question.clone(), input.topology.clone())
                .with_params(input.params)
                .with_temperatures(input.temperatures.clone())
                .with_judge_temperature(input.judge_temperature);

            match self.network.execute_with_observer(run_input, observer).await {
                Ok(trace) => {
                    recorder.record(RunEvent::new(
                        "run_trace",
                        json!({
                            "index": index,
                            "correct": labeled.correct,
                            "trace": trace,
                        }),
                    ));
                    observer.on_question_complete(index, true);
                    records.push(QuestionRecord::new(labeled.correct, trace));
                }
                Err(e) => {
                    // Skip this question, keep the batch alive
                    warn!(index, error = %e, "question failed, skipping");
                    recorder.record(RunEvent::new(
                        "question_skipped",
                        json!({ "index": index, "error": e.to_string() }),
                    ));
                    observer.on_question_complete(index, false);
                    skipped += 1;
                }
            }
        }

        let stats = BatchStats::from_records(&records, communities, skipped);
        recorder.record(RunEvent::new("batch_stats", json!(stats)));
        info!(
            answered = records.len(),
            skipped,
            judge_score = stats.judge_score,
            "batch finished"
        );

        Ok(BatchOutcome {
            records,
            skipped,
            stats,
        })
    }
}
