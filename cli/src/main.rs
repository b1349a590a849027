//! CLI entrypoint for madnet
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

mod progress;
mod report;

use anyhow::{Context, Result, bail};
use clap::Parser;
use madnet_application::{
    NoObserver, NoRecorder, RunBatchInput, RunBatchUseCase, RunNetworkInput, RunNetworkUseCase,
    RunRecorder,
};
use madnet_domain::{NUM_CHOICES, Question};
use madnet_infrastructure::{ConfigLoader, DatasetLoader, JsonlRunRecorder, OpenAiResponder};
use progress::BatchProgress;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Multi-agent debate network for multiple-choice QA
#[derive(Parser, Debug)]
#[command(name = "madnet", version, about)]
struct Cli {
    /// Path to a config file (overrides global and project configs)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Ignore all config files and use built-in defaults
    #[arg(long, conflicts_with = "config")]
    no_config: bool,

    /// JSONL dataset of labeled questions to run as a batch
    #[arg(short, long)]
    dataset: Option<PathBuf>,

    /// Run at most this many questions from the dataset
    #[arg(short, long)]
    limit: Option<usize>,

    /// A single question to debate (requires --choices)
    #[arg(short, long, conflicts_with = "dataset")]
    question: Option<String>,

    /// The four answer options for --question
    #[arg(long, num_args = NUM_CHOICES, requires = "question")]
    choices: Vec<String>,

    /// Write a JSONL trace of the run to this file
    #[arg(long)]
    run_log: Option<PathBuf>,

    /// Write the statistics report to this file
    #[arg(long)]
    report: Option<PathBuf>,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress progress output
    #[arg(long)]
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity level
    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"), // -vvv or more
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    info!("Starting madnet");

    let config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_ref())?
    };
    let topology = config.network.topology()?;
    let params = config.debate.params();
    let temperatures = config.network.temperatures();

    // === Dependency Injection ===
    let responder = Arc::new(OpenAiResponder::new(config.responder.settings())?);

    // Single question mode
    if let Some(question) = cli.question {
        let choices: [String; NUM_CHOICES] = cli
            .choices
            .try_into()
            .map_err(|_| anyhow::anyhow!("--question requires exactly {NUM_CHOICES} --choices"))?;
        let question = Question::new(question, choices)?;

        let input = RunNetworkInput::new(question.clone(), topology)
            .with_params(params)
            .with_temperatures(temperatures)
            .with_judge_temperature(config.network.judge_temperature);

        let use_case = RunNetworkUseCase::new(responder);
        let trace = use_case.execute(input).await?;

        for node in trace.community_traces() {
            if let Some(verdict) = node.verdict() {
                println!("{}: Option {}", node.node, verdict.choice);
            }
        }
        match trace.final_verdict() {
            Some(verdict) => {
                println!();
                println!(
                    "[Final Result] Option {}: {}",
                    verdict.choice,
                    question.option(verdict.choice)
                );
                if !verdict.rationale.is_empty() {
                    println!("Reason: {}", verdict.rationale);
                }
            }
            None => bail!("run produced no final verdict"),
        }
        return Ok(());
    }

    // Batch mode - dataset is required
    let Some(dataset_path) = cli.dataset else {
        bail!("Either --dataset or --question is required.");
    };

    let mut loader = DatasetLoader::new();
    if let Some(limit) = cli.limit {
        loader = loader.with_limit(limit);
    }
    let questions = loader.load(&dataset_path)?;
    let total = questions.len();

    let input = RunBatchInput::new(questions, topology)
        .with_params(params)
        .with_temperatures(temperatures)
        .with_judge_temperature(config.network.judge_temperature);

    let run_log = cli.run_log.or(config.output.run_log);
    let recorder: Box<dyn RunRecorder> = match run_log.and_then(JsonlRunRecorder::new) {
        Some(recorder) => {
            info!(path = %recorder.path().display(), "recording run trace");
            Box::new(recorder)
        }
        None => Box::new(NoRecorder),
    };

    let use_case = RunBatchUseCase::new(responder);
    let outcome = if cli.quiet {
        use_case
            .execute_with(input, &NoObserver, recorder.as_ref())
            .await?
    } else {
        let progress = BatchProgress::new(total);
        let outcome = use_case
            .execute_with(input, &progress, recorder.as_ref())
            .await?;
        progress.finish();
        outcome
    };

    let rendered = report::render(&outcome.stats);
    if let Some(path) = cli.report.or(config.output.report) {
        std::fs::write(&path, &rendered)
            .with_context(|| format!("failed to write report to {}", path.display()))?;
        info!(path = %path.display(), "report written");
    }

    println!("{rendered}");

    Ok(())
}
