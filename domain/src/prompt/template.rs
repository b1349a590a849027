//! Prompt templates for the debate flow
//!
//! Two roles share one response contract: debaters argue over the visible
//! history, judges reduce verdicts to one answer. Every template demands a
//! JSON `{"answer": N, "reason": "..."}` reply so the parser has a stable
//! preferred format.

use crate::core::question::Question;
use crate::debate::answer::{StructuredAnswer, render_entries};

/// Templates for generating prompts at each stage
pub struct DebatePrompt;

impl DebatePrompt {
    /// System prompt for a debating agent
    pub fn debater_system(question: &Question) -> String {
        format!(
            r#"You are an expert debater in a panel answering a multiple-choice question.
Argue for the option you believe is correct. Engage with the other panelists'
reasoning when it is shown to you: point out flaws, or change your mind when
their argument is stronger.

{}

Reply ONLY with a JSON object: {{"answer": <option number 1-4>, "reason": "<your reasoning>"}}"#,
            question
        )
    }

    /// User prompt for one debater turn
    pub fn debater_turn(name: &str, history: &[StructuredAnswer]) -> String {
        format!(
            r#"You are {}. The discussion so far:

{}

Give your current answer as JSON: {{"answer": <1-4>, "reason": "<your reasoning>"}}"#,
            name,
            render_entries(history)
        )
    }

    /// System prompt for a community judge reducing its agents' final round
    pub fn community_judge_system(question: &Question) -> String {
        format!(
            r#"You are the judge of a debate panel that discussed a multiple-choice question.
Weigh the panelists' final positions and decide which option is best supported.
Do not introduce new arguments; judge the ones given.

{}

Reply ONLY with a JSON object: {{"answer": <option number 1-4>, "reason": "<your reasoning>"}}"#,
            question
        )
    }

    /// System prompt for the network judge reducing community verdicts
    pub fn network_judge_system(question: &Question) -> String {
        format!(
            r#"You are the final judge over several independent debate panels that each
answered a multiple-choice question. Each panel's verdict is given below.
Weigh the verdicts and their reasoning and decide on the single best answer.

{}

Reply ONLY with a JSON object: {{"answer": <option number 1-4>, "reason": "<your reasoning>"}}"#,
            question
        )
    }

    /// User prompt for either judge role
    pub fn judge_turn(history: &[StructuredAnswer]) -> String {
        format!(
            r#"The positions to judge:

{}

Give the final answer as JSON: {{"answer": <1-4>, "reason": "<your reasoning>"}}"#,
            render_entries(history)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::question::{Choice, Question};

    fn question() -> Question {
        Question::new(
            "Which planet is largest?",
            ["Mars", "Jupiter", "Venus", "Earth"].map(String::from),
        )
        .unwrap()
    }

    #[test]
    fn test_debater_system_contains_question_and_options() {
        let prompt = DebatePrompt::debater_system(&question());
        assert!(prompt.contains("Which planet is largest?"));
        assert!(prompt.contains("Option 2: Jupiter"));
        assert!(prompt.contains(r#""answer""#));
    }

    #[test]
    fn test_debater_turn_empty_history_placeholder() {
        let prompt = DebatePrompt::debater_turn("Agent 1", &[]);
        assert!(prompt.contains("You are Agent 1."));
        assert!(prompt.contains("No responses yet."));
    }

    #[test]
    fn test_judge_turn_renders_history() {
        let entries = vec![StructuredAnswer::new(
            "Community 1",
            Choice::new(2).unwrap(),
            "gas giant",
        )];
        let prompt = DebatePrompt::judge_turn(&entries);
        assert!(prompt.contains("Community 1 chose Option 2."));
        assert!(prompt.contains("gas giant"));
    }

    #[test]
    fn test_judge_systems_differ_by_role() {
        let community = DebatePrompt::community_judge_system(&question());
        let network = DebatePrompt::network_judge_system(&question());
        assert!(community.contains("debate panel"));
        assert!(network.contains("independent debate panels"));
        assert_ne!(community, network);
    }
}
