//! Debate agents and the response contract.
//!
//! An [`Agent`] is one participant: a name, a sampling temperature, and a
//! prompt binding. Debaters and judges are the same capability with two
//! template bindings: a debater argues over the visible history, a judge
//! reduces it to one verdict.
//!
//! The agent owns exactly one invariant: the returned choice must be in
//! 1..=4. An out-of-range choice discards that attempt entirely and re-asks,
//! up to `max_attempts`; transport-level retry policy belongs to the
//! responder adapter.

use crate::ports::responder::{Responder, ResponderError};
use madnet_domain::{Choice, DebatePrompt, Question, StructuredAnswer};
use thiserror::Error;
use tracing::{debug, warn};

/// Errors an agent invocation can surface
#[derive(Error, Debug)]
pub enum AgentError {
    #[error("Responder failed for {agent}: {source}")]
    Responder {
        agent: String,
        #[source]
        source: ResponderError,
    },

    #[error("{agent} returned no valid choice in {attempts} attempts")]
    Rejected { agent: String, attempts: usize },
}

/// Shared debate knobs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DebateParams {
    /// Agents per community (N)
    pub agents_per_community: usize,
    /// Debate rounds per community (R)
    pub rounds: usize,
    /// Re-asks an agent gets before its question is abandoned
    pub max_attempts: usize,
}

impl Default for DebateParams {
    fn default() -> Self {
        Self {
            agents_per_community: 3,
            rounds: 2,
            max_attempts: 5,
        }
    }
}

/// Which user-prompt template the agent renders
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PromptBinding {
    Debater,
    Judge,
}

/// One debate participant (debater, community judge, or network judge)
#[derive(Debug, Clone)]
pub struct Agent {
    name: String,
    temperature: f64,
    system_prompt: String,
    binding: PromptBinding,
}

impl Agent {
    /// A debating agent, named "Agent {k}" with 1-based `k`
    pub fn debater(k: usize, question: &Question, temperature: f64) -> Self {
        Self {
            name: format!("Agent {}", k),
            temperature,
            system_prompt: DebatePrompt::debater_system(question),
            binding: PromptBinding::Debater,
        }
    }

    /// A community's judge. Named after the community so its verdict
    /// carries the community's name across node boundaries.
    pub fn community_judge(community: &str, question: &Question, temperature: f64) -> Self {
        Self {
            name: community.to_string(),
            temperature,
            system_prompt: DebatePrompt::community_judge_system(question),
            binding: PromptBinding::Judge,
        }
    }

    /// The terminal judge reducing community verdicts
    pub fn network_judge(question: &Question, temperature: f64) -> Self {
        Self {
            name: "Judge".to_string(),
            temperature,
            system_prompt: DebatePrompt::network_judge_system(question),
            binding: PromptBinding::Judge,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn temperature(&self) -> f64 {
        self.temperature
    }

    /// Produce one validated answer from the visible history.
    ///
    /// Invalid choices are discarded without a trace; only a valid answer
    /// or exhaustion leaves this function.
    pub async fn respond<R: Responder + ?Sized>(
        &self,
        responder: &R,
        visible: &[StructuredAnswer],
        max_attempts: usize,
    ) -> Result<StructuredAnswer, AgentError> {
        let user_prompt = match self.binding {
            PromptBinding::Debater => DebatePrompt::debater_turn(&self.name, visible),
            PromptBinding::Judge => DebatePrompt::judge_turn(visible),
        };

        for attempt in 1..=max_attempts {
            let raw = responder
                .respond(&self.system_prompt, &user_prompt, self.temperature)
                .await
                .map_err(|source| AgentError::Responder {
                    agent: self.name.clone(),
                    source,
                })?;

            match Choice::new(raw.choice) {
                Ok(choice) => {
                    debug!(agent = %self.name, %choice, "agent answered");
                    return Ok(StructuredAnswer::new(&self.name, choice, raw.rationale));
                }
                Err(_) => {
                    warn!(
                        agent = %self.name,
                        choice = raw.choice,
                        attempt,
                        "choice out of range, re-asking"
                    );
                }
            }
        }

        Err(AgentError::Rejected {
            agent: self.name.clone(),
            attempts: max_attempts,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question() -> Question {
        Question::new(
            "Which planet is largest?",
            ["Mars", "Jupiter", "Venus", "Earth"].map(String::from),
        )
        .unwrap()
    }

    #[test]
    fn test_debater_naming() {
        let agent = Agent::debater(2, &question(), 0.7);
        assert_eq!(agent.name(), "Agent 2");
        assert_eq!(agent.temperature(), 0.7);
    }

    #[test]
    fn test_community_judge_carries_community_name() {
        let judge = Agent::community_judge("Community 3", &question(), 1.0);
        assert_eq!(judge.name(), "Community 3");
    }

    #[test]
    fn test_params_defaults() {
        let params = DebateParams::default();
        assert_eq!(params.agents_per_community, 3);
        assert_eq!(params.rounds, 2);
        assert_eq!(params.max_attempts, 5);
    }
}
