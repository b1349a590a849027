//! Run Network use case
//!
//! Drives one question through the debate network: assemble the graph from
//! the topology, poll communities until each becomes ready, run the
//! intra-community debate synchronously, forward verdicts, and finish with
//! the network judge.
//!
//! Scheduling is single-threaded cooperative polling on purpose: each agent
//! must see the history exactly as it stood when its turn came, including
//! earlier agents' answers from the same round.

use crate::agent::{Agent, AgentError, DebateParams};
use crate::ports::observer::{DebateObserver, NoObserver};
use crate::ports::responder::Responder;
use madnet_domain::{
    DebateGraph, DomainError, NetworkTopology, NodeId, NodeTrace, Question, RunTrace,
    temperature_spread,
};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};

/// Errors that can occur during network execution
#[derive(Error, Debug)]
pub enum RunNetworkError {
    #[error(transparent)]
    Agent(#[from] AgentError),

    #[error(transparent)]
    Graph(#[from] DomainError),

    #[error("Expected {expected} community temperatures, got {got}")]
    TemperatureCount { expected: usize, got: usize },
}

/// Input for the RunNetwork use case
#[derive(Debug, Clone)]
pub struct RunNetworkInput {
    pub question: Question,
    pub topology: NetworkTopology,
    pub params: DebateParams,
    /// One sampling temperature per community
    pub temperatures: Vec<f64>,
    pub judge_temperature: f64,
}

impl RunNetworkInput {
    /// Defaults: standard debate params, temperatures evenly spread over
    /// 0.5..=1.5, judge at 1.0
    pub fn new(question: Question, topology: NetworkTopology) -> Self {
        let temperatures = temperature_spread(0.5, 1.5, topology.communities());
        Self {
            question,
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

/// A community's roster: its debaters plus its local judge
struct Crew {
    agents: Vec<Agent>,
    judge: Agent,
}

/// Use case for running one question through the network
pub struct RunNetworkUseCase<R: Responder + 'static> {
    responder: Arc<R>,
}

impl<R: Responder + 'static> RunNetworkUseCase<R> {
    pub fn new(responder: Arc<R>) -> Self {
        Self { responder }
    }

    /// Execute with default (no-op) progress
    pub async fn execute(&self, input: RunNetworkInput) -> Result<RunTrace, RunNetworkError> {
        self.execute_with_observer(input, &NoObserver).await
    }

    /// Execute with progress callbacks
    pub async fn execute_with_observer(
        &self,
        input: RunNetworkInput,
        observer: &dyn DebateObserver,
    ) -> Result<RunTrace, RunNetworkError> {
        let communities = input.topology.communities();
        if input.temperatures.len() != communities {
            return Err(RunNetworkError::TemperatureCount {
                expected: communities,
                got: input.temperatures.len(),
            });
        }

        info!(
            communities,
            agents = input.params.agents_per_community,
            rounds = input.params.rounds,
            "starting network run"
        );

        let (mut graph, community_ids, judge_id) = input.topology.assemble();
        let crews = self.build_crews(&input, &graph, &community_ids);
        let network_judge = Agent::network_judge(&input.question, input.judge_temperature);

        let mut trace = RunTrace::new();

        // Cooperative polling: each pass fires every community that became
        // ready, then checks the judge. Topology validation guarantees this
        // terminates; the stall check turns a latent wiring bug into a loud
        // error instead of an endless loop.
        loop {
            let mut progressed = false;

            for (i, &id) in community_ids.iter().enumerate() {
                if graph.mark_ready(id) {
                    self.run_community(&mut graph, id, &crews[i], &input.params, observer)
                        .await?;
                    trace.push(NodeTrace::new(
                        graph.node(id).name(),
                        graph.node(id).history().entries().to_vec(),
                    ));
                    progressed = true;
                }
            }

            if graph.mark_ready(judge_id) {
                let verdict = network_judge
                    .respond(
                        self.responder.as_ref(),
                        graph.node(judge_id).history().entries(),
                        input.params.max_attempts,
                    )
                    .await?;
                info!(choice = %verdict.choice, "network judge delivered the final verdict");
                observer.on_final_verdict(verdict.choice);
                trace.push(NodeTrace::new(graph.node(judge_id).name(), vec![verdict]));
                return Ok(trace);
            }

            if !progressed {
                return Err(DomainError::BadTopology(
                    "scheduler stalled: no community became ready and the judge is not satisfied"
                        .to_string(),
                )
                .into());
            }
        }
    }

    fn build_crews(
        &self,
        input: &RunNetworkInput,
        graph: &DebateGraph,
        community_ids: &[NodeId],
    ) -> Vec<Crew> {
        community_ids
            .iter()
            .enumerate()
            .map(|(i, &id)| {
                let temperature = input.temperatures[i];
                let agents = (1..=input.params.agents_per_community)
                    .map(|k| Agent::debater(k, &input.question, temperature))
                    .collect();
                let judge =
                    Agent::community_judge(graph.node(id).name(), &input.question, temperature);
                Crew { agents, judge }
            })
            .collect()
    }

    /// One community's full turn: R debate rounds, the local verdict over
    /// the final round, then dispatch to every listener.
    async fn run_community(
        &self,
        graph: &mut DebateGraph,
        id: NodeId,
        crew: &Crew,
        params: &DebateParams,
        observer: &dyn DebateObserver,
    ) -> Result<(), RunNetworkError> {
        let name = graph.node(id).name().to_string();
        observer.on_community_start(&name);
        debug!(community = %name, "community is ready, debating");

        for round in 1..=params.rounds {
            observer.on_round(&name, round);
            for agent in &crew.agents {
                // Each agent sees the history as it stands right now,
                // including earlier agents' answers from this round
                let answer = agent
                    .respond(
                        self.responder.as_ref(),
                        graph.node(id).history().entries(),
                        params.max_attempts,
                    )
                    .await?;
                graph.node_mut(id).push_answer(answer);
            }
        }

        // The judge sees only the final round's N answers
        let verdict = crew
            .judge
            .respond(
                self.responder.as_ref(),
                graph.node(id).history().last_n(params.agents_per_community),
                params.max_attempts,
            )
            .await?;
        observer.on_verdict(&name, verdict.choice);
        graph.node_mut(id).push_answer(verdict.clone());

        for target in graph.node(id).outbound().to_vec() {
            graph.deliver(target, &verdict)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::responder::{RawAnswer, Responder, ResponderError};
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// Scripted responder: pops replies in call order and captures every
    /// prompt it was asked.
    struct ScriptedResponder {
        replies: Mutex<VecDeque<RawAnswer>>,
        fallback: RawAnswer,
        calls: Mutex<Vec<String>>,
    }

    impl ScriptedResponder {
        fn new(replies: Vec<RawAnswer>) -> Self {
            Self {
                replies: Mutex::new(replies.into()),
                fallback: RawAnswer::new(2, "fallback"),
                calls: Mutex::new(Vec::new()),
            }
        }

        /// Same answer for every call
        fn repeating(choice: i64) -> Self {
            Self {
                replies: Mutex::new(VecDeque::new()),
                fallback: RawAnswer::new(choice, "fallback"),
                calls: Mutex::new(Vec::new()),
            }
        }

        fn user_prompts(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Responder for ScriptedResponder {
        async fn respond(
            &self,
            _system_prompt: &str,
            user_prompt: &str,
            _temperature: f64,
        ) -> Result<RawAnswer, ResponderError> {
            self.calls.lock().unwrap().push(user_prompt.to_string());
            Ok(self
                .replies
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| self.fallback.clone()))
        }
    }

    fn question() -> Question {
        Question::new(
            "Which planet is largest?",
            ["Mars", "Jupiter", "Venus", "Earth"].map(String::from),
        )
        .unwrap()
    }

    fn answers(n: usize, choice: i64) -> Vec<RawAnswer> {
        (0..n).map(|i| RawAnswer::new(choice, format!("r{}", i))).collect()
    }

    #[tokio::test]
    async fn test_scenario_single_community() {
        // 1 community, 3 agents, 1 round: 3 agent turns + community judge
        // + network judge = 5 calls, trace of 2 nodes with 4 and 1 entries
        let responder = Arc::new(ScriptedResponder::new(answers(5, 2)));
        let input = RunNetworkInput::new(question(), NetworkTopology::single_community())
            .with_params(DebateParams {
                agents_per_community: 3,
                rounds: 1,
                max_attempts: 5,
            });

        let trace = RunNetworkUseCase::new(Arc::clone(&responder))
            .execute(input)
            .await
            .unwrap();

        assert_eq!(trace.len(), 2);
        assert_eq!(trace.nodes[0].node, "Community 1");
        assert_eq!(trace.nodes[0].entries.len(), 4);
        assert_eq!(trace.nodes[1].node, "Judge");
        assert_eq!(trace.nodes[1].entries.len(), 1);
        assert_eq!(trace.final_verdict().unwrap().choice.get(), 2);

        // Community verdict carries the community's name
        assert_eq!(trace.nodes[0].entries[3].author, "Community 1");
        assert_eq!(responder.user_prompts().len(), 5);
    }

    #[tokio::test]
    async fn test_scenario_chained_communities() {
        // Community 1 (start) -> Community 2 -> judge, Community 1 -> judge.
        // Firing order must be community 1, community 2, judge.
        let topology = NetworkTopology::new(
            vec![true, false],
            vec![vec![0, 1, 1], vec![0, 0, 1]],
        )
        .unwrap();
        let responder = Arc::new(ScriptedResponder::repeating(2));
        let input = RunNetworkInput::new(question(), topology).with_params(DebateParams {
            agents_per_community: 3,
            rounds: 1,
            max_attempts: 5,
        });

        let trace = RunNetworkUseCase::new(Arc::clone(&responder))
            .execute(input)
            .await
            .unwrap();

        let order: Vec<_> = trace.nodes.iter().map(|n| n.node.as_str()).collect();
        assert_eq!(order, ["Community 1", "Community 2", "Judge"]);

        // Community 2 saw Community 1's delivered verdict first,
        // anonymized, before its own 3 agents and judge
        let second = &trace.nodes[1];
        assert_eq!(second.entries.len(), 5);
        assert_eq!(second.entries[0].author, "[Previous Response 1]");

        // The judge judged exactly two delivered verdicts
        let judge_prompt = responder.user_prompts().last().unwrap().clone();
        assert_eq!(judge_prompt.matches("chose Option").count(), 2);
    }

    #[tokio::test]
    async fn test_scenario_invalid_choice_retried() {
        // First reply is out of range (7); the valid retry (2) must be the
        // one that surfaces, with no trace of the invalid attempt
        let mut replies = vec![RawAnswer::new(7, "bogus")];
        replies.extend(answers(5, 2));
        let responder = Arc::new(ScriptedResponder::new(replies));
        let input = RunNetworkInput::new(question(), NetworkTopology::single_community())
            .with_params(DebateParams {
                agents_per_community: 3,
                rounds: 1,
                max_attempts: 3,
            });

        let trace = RunNetworkUseCase::new(responder)
            .execute(input)
            .await
            .unwrap();

        assert_eq!(trace.nodes[0].entries.len(), 4);
        for entry in &trace.nodes[0].entries {
            assert_eq!(entry.choice.get(), 2);
            assert_ne!(entry.rationale, "bogus");
        }
    }

    #[tokio::test]
    async fn test_retry_exhaustion_is_fatal() {
        let responder = Arc::new(ScriptedResponder::new(vec![
            RawAnswer::new(7, ""),
            RawAnswer::new(0, ""),
        ]));
        // Queue exhaustion would fall back to a valid answer; two attempts
        // only, both invalid
        let input = RunNetworkInput::new(question(), NetworkTopology::single_community())
            .with_params(DebateParams {
                agents_per_community: 1,
                rounds: 1,
                max_attempts: 2,
            });

        let err = RunNetworkUseCase::new(responder)
            .execute(input)
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            RunNetworkError::Agent(AgentError::Rejected { attempts: 2, .. })
        ));
    }

    #[tokio::test]
    async fn test_round_visibility() {
        // 2 agents, 2 rounds: agent k in round r sees (r-1)*N + (k-1)
        // prior entries
        let responder = Arc::new(ScriptedResponder::repeating(2));
        let input = RunNetworkInput::new(question(), NetworkTopology::single_community())
            .with_params(DebateParams {
                agents_per_community: 2,
                rounds: 2,
                max_attempts: 5,
            });

        RunNetworkUseCase::new(Arc::clone(&responder))
            .execute(input)
            .await
            .unwrap();

        let prompts = responder.user_prompts();
        // 4 agent turns, then community judge, then network judge
        assert_eq!(prompts.len(), 6);

        let expected_visible = [0usize, 1, 2, 3];
        for (prompt, &expected) in prompts.iter().zip(&expected_visible) {
            let seen = prompt.matches("chose Option").count();
            assert_eq!(seen, expected);
        }
        assert!(prompts[0].contains("No responses yet."));
    }

    #[tokio::test]
    async fn test_judge_truncation_to_last_round() {
        // With R=2 the community judge must see only the last round's N
        // answers, distinguished here by their scripted rationales
        let responder = Arc::new(ScriptedResponder::new(answers(6, 2)));
        let input = RunNetworkInput::new(question(), NetworkTopology::single_community())
            .with_params(DebateParams {
                agents_per_community: 2,
                rounds: 2,
                max_attempts: 5,
            });

        RunNetworkUseCase::new(Arc::clone(&responder))
            .execute(input)
            .await
            .unwrap();

        let prompts = responder.user_prompts();
        // Call 5 (index 4) is the community judge
        let judge_prompt = &prompts[4];
        assert_eq!(judge_prompt.matches("chose Option").count(), 2);
        // Round 2 rationales are r2 and r3; round 1's are absent
        assert!(judge_prompt.contains("r2"));
        assert!(judge_prompt.contains("r3"));
        assert!(!judge_prompt.contains("Reason: r0"));
        assert!(!judge_prompt.contains("Reason: r1"));
    }

    #[tokio::test]
    async fn test_temperature_count_mismatch() {
        let responder = Arc::new(ScriptedResponder::repeating(1));
        let input = RunNetworkInput::new(question(), NetworkTopology::single_community())
            .with_temperatures(vec![0.5, 1.0]);

        let err = RunNetworkUseCase::new(responder)
            .execute(input)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            RunNetworkError::TemperatureCount {
                expected: 1,
                got: 2
            }
        ));
    }
}
