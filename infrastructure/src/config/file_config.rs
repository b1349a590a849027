//! Configuration file structure (`madnet.toml`)
//!
//! Example:
//!
//! ```toml
//! [network]
//! communities = 3
//! start = [1]
//! # Rows are communities, the extra last column is the judge.
//! adjacency = [
//!     [0, 1, 0, 1],
//!     [0, 0, 1, 1],
//!     [0, 0, 0, 1],
//! ]
//! temperature_min = 0.5
//! temperature_max = 1.5
//! judge_temperature = 1.0
//!
//! [debate]
//! num_agents = 3
//! num_rounds = 2
//! max_attempts = 5
//!
//! [responder]
//! model = "gpt-4o-mini"
//!
//! [output]
//! run_log = "out/run.jsonl"
//! report = "out/stats.txt"
//! ```

use crate::responder::ResponderSettings;
use madnet_application::agent::DebateParams;
use madnet_domain::{DomainError, NetworkTopology, temperature_spread};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration merged from all sources
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub network: FileNetworkConfig,
    pub debate: FileDebateConfig,
    pub responder: FileResponderConfig,
    pub output: FileOutputConfig,
}

/// `[network]` section: wiring of the dependency graph
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileNetworkConfig {
    /// Number of debate communities
    pub communities: usize,
    /// 1-based indices of communities that need no predecessor
    pub start: Vec<usize>,
    /// Adjacency rows (communities × communities+1, last column = judge).
    /// Omitted: a relay chain where each community feeds the next and all
    /// feed the judge.
    pub adjacency: Option<Vec<Vec<u8>>>,
    pub temperature_min: f64,
    pub temperature_max: f64,
    pub judge_temperature: f64,
}

impl Default for FileNetworkConfig {
    fn default() -> Self {
        Self {
            communities: 3,
            start: vec![1],
            adjacency: None,
            temperature_min: 0.5,
            temperature_max: 1.5,
            judge_temperature: 1.0,
        }
    }
}

impl FileNetworkConfig {
    /// Build the validated topology this section describes
    pub fn topology(&self) -> Result<NetworkTopology, DomainError> {
        let n = self.communities;

        let mut start = vec![false; n];
        for &index in &self.start {
            if index == 0 || index > n {
                return Err(DomainError::BadTopology(format!(
                    "start community {} is out of range 1..={}",
                    index, n
                )));
            }
            start[index - 1] = true;
        }

        let adjacency = match &self.adjacency {
            Some(rows) => rows.clone(),
            None => chain_rows(n),
        };
        NetworkTopology::new(start, adjacency)
    }

    /// Per-community sampling temperatures, evenly spread
    pub fn temperatures(&self) -> Vec<f64> {
        temperature_spread(self.temperature_min, self.temperature_max, self.communities)
    }
}

/// Default wiring: each community feeds the next, every one feeds the judge
fn chain_rows(n: usize) -> Vec<Vec<u8>> {
    let mut rows = vec![vec![0u8; n + 1]; n];
    for (i, row) in rows.iter_mut().enumerate() {
        if i + 1 < n {
            row[i + 1] = 1;
        }
        row[n] = 1;
    }
    rows
}

/// `[debate]` section: intra-community knobs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileDebateConfig {
    /// Agents per community
    pub num_agents: usize,
    /// Debate rounds per community
    pub num_rounds: usize,
    /// Re-asks an agent gets on an out-of-range choice
    pub max_attempts: usize,
}

impl Default for FileDebateConfig {
    fn default() -> Self {
        Self {
            num_agents: 3,
            num_rounds: 2,
            max_attempts: 5,
        }
    }
}

impl FileDebateConfig {
    pub fn params(&self) -> DebateParams {
        DebateParams {
            agents_per_community: self.num_agents,
            rounds: self.num_rounds,
            max_attempts: self.max_attempts,
        }
    }
}

/// `[responder]` section: language-model backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileResponderConfig {
    pub model: String,
    pub base_url: String,
    pub api_key_env: String,
    pub max_retries: usize,
    pub backoff_ms: u64,
    pub timeout_secs: u64,
}

impl Default for FileResponderConfig {
    fn default() -> Self {
        let settings = ResponderSettings::default();
        Self {
            model: settings.model,
            base_url: settings.base_url,
            api_key_env: settings.api_key_env,
            max_retries: settings.max_retries,
            backoff_ms: settings.backoff_ms,
            timeout_secs: settings.timeout_secs,
        }
    }
}

impl FileResponderConfig {
    pub fn settings(&self) -> ResponderSettings {
        ResponderSettings {
            model: self.model.clone(),
            base_url: self.base_url.clone(),
            api_key_env: self.api_key_env.clone(),
            max_retries: self.max_retries,
            backoff_ms: self.backoff_ms,
            timeout_secs: self.timeout_secs,
        }
    }
}

/// `[output]` section: where run artifacts land
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileOutputConfig {
    /// JSONL run log (omitted: no recording)
    pub run_log: Option<PathBuf>,
    /// Statistics report file (omitted: stdout only)
    pub report: Option<PathBuf>,
}
