//! Batch accuracy scoring over run traces.
//!
//! Pure aggregation against ground-truth answers: how often the network
//! judge, each community, and the average agent picked the correct option.
//! Skipped questions are carried separately so the denominator stays honest.

use crate::core::question::Choice;
use crate::debate::trace::RunTrace;
use serde::{Deserialize, Serialize};

/// One answered question: its ground truth plus the full run trace
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionRecord {
    pub correct: Choice,
    pub trace: RunTrace,
}

impl QuestionRecord {
    pub fn new(correct: Choice, trace: RunTrace) -> Self {
        Self { correct, trace }
    }

    /// Whether the network judge got this question right
    pub fn judge_correct(&self) -> bool {
        self.trace
            .final_verdict()
            .is_some_and(|v| v.choice == self.correct)
    }
}

/// Accuracy statistics over one batch run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchStats {
    /// Questions that produced a verdict
    pub total: usize,
    /// Questions abandoned after retry exhaustion
    pub skipped: usize,
    /// Fraction of questions the network judge answered correctly
    pub judge_score: f64,
    /// Per-community fraction of correct consensus verdicts
    pub community_scores: Vec<f64>,
    /// Mean fraction of individual agent turns that were correct,
    /// averaged across communities
    pub agents_score: f64,
}

impl BatchStats {
    /// Aggregate scores from answered questions.
    ///
    /// For each community trace, the last entry is its consensus verdict and
    /// everything before it counts as an agent-level turn (this includes
    /// relabeled cross-community deliveries, matching the trace contract).
    pub fn from_records(records: &[QuestionRecord], communities: usize, skipped: usize) -> Self {
        let total = records.len();
        if total == 0 {
            return Self {
                total: 0,
                skipped,
                judge_score: 0.0,
                community_scores: vec![0.0; communities],
                agents_score: 0.0,
            };
        }

        let mut judge_correct = 0usize;
        let mut community_correct = vec![0usize; communities];
        let mut agents_sum = 0.0f64;

        for record in records {
            if record.judge_correct() {
                judge_correct += 1;
            }

            let mut question_agent_score = 0.0;
            for (i, node) in record.trace.community_traces().iter().enumerate() {
                if i >= communities {
                    break;
                }
                if node.verdict().is_some_and(|v| v.choice == record.correct) {
                    community_correct[i] += 1;
                }

                let turns = &node.entries[..node.entries.len().saturating_sub(1)];
                if !turns.is_empty() {
                    let correct = turns
                        .iter()
                        .filter(|a| a.choice == record.correct)
                        .count();
                    question_agent_score += correct as f64 / turns.len() as f64;
                }
            }
            agents_sum += question_agent_score / communities as f64;
        }

        Self {
            total,
            skipped,
            judge_score: round3(judge_correct as f64 / total as f64),
            community_scores: community_correct
                .into_iter()
                .map(|c| round3(c as f64 / total as f64))
                .collect(),
            agents_score: round3(agents_sum / total as f64),
        }
    }
}

fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::debate::answer::StructuredAnswer;
    use crate::debate::trace::NodeTrace;

    fn answer(author: &str, choice: i64) -> StructuredAnswer {
        StructuredAnswer::new(author, Choice::new(choice).unwrap(), "")
    }

    /// One community of three agents plus its verdict, then a judge entry
    fn trace(agent_choices: [i64; 3], community: i64, judge: i64) -> RunTrace {
        let mut entries: Vec<_> = agent_choices
            .iter()
            .enumerate()
            .map(|(i, &c)| answer(&format!("Agent {}", i + 1), c))
            .collect();
        entries.push(answer("Community 1", community));

        let mut run = RunTrace::new();
        run.push(NodeTrace::new("Community 1", entries));
        run.push(NodeTrace::new("Judge", vec![answer("Judge", judge)]));
        run
    }

    #[test]
    fn test_stats_hand_computed() {
        let correct = Choice::new(2).unwrap();
        let records = vec![
            // judge right, community right, 2/3 agents right
            QuestionRecord::new(correct, trace([2, 2, 1], 2, 2)),
            // judge wrong, community wrong, 1/3 agents right
            QuestionRecord::new(correct, trace([1, 2, 3], 3, 1)),
        ];

        let stats = BatchStats::from_records(&records, 1, 1);

        assert_eq!(stats.total, 2);
        assert_eq!(stats.skipped, 1);
        assert_eq!(stats.judge_score, 0.5);
        assert_eq!(stats.community_scores, vec![0.5]);
        // (2/3 + 1/3) / 2 = 0.5
        assert_eq!(stats.agents_score, 0.5);
    }

    #[test]
    fn test_stats_empty_batch() {
        let stats = BatchStats::from_records(&[], 3, 4);
        assert_eq!(stats.total, 0);
        assert_eq!(stats.skipped, 4);
        assert_eq!(stats.judge_score, 0.0);
        assert_eq!(stats.community_scores.len(), 3);
    }

    #[test]
    fn test_stats_rounding() {
        let correct = Choice::new(1).unwrap();
        let records = vec![
            QuestionRecord::new(correct, trace([1, 2, 3], 1, 1)),
            QuestionRecord::new(correct, trace([2, 2, 3], 2, 2)),
            QuestionRecord::new(correct, trace([2, 2, 3], 2, 2)),
        ];
        let stats = BatchStats::from_records(&records, 1, 0);
        // judge 1/3
        assert_eq!(stats.judge_score, 0.333);
        // agents (1/3 + 0 + 0) / 3 = 0.111
        assert_eq!(stats.agents_score, 0.111);
    }
}
