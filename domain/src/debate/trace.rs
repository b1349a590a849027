//! Run traces: the recorded output of one network execution.
//!
//! One [`NodeTrace`] per community in firing order, then one entry for the
//! network judge holding exactly its verdict. The trace is the sole
//! interface handed to the statistics side.

use crate::debate::answer::StructuredAnswer;
use serde::{Deserialize, Serialize};

/// The answers produced at one node during a run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeTrace {
    /// Node name, e.g. "Community 2" or "Judge"
    pub node: String,
    /// Full local chat history for a community; a single verdict for the judge
    pub entries: Vec<StructuredAnswer>,
}

impl NodeTrace {
    pub fn new(node: impl Into<String>, entries: Vec<StructuredAnswer>) -> Self {
        Self {
            node: node.into(),
            entries,
        }
    }

    /// The node's own consensus answer (last entry)
    pub fn verdict(&self) -> Option<&StructuredAnswer> {
        self.entries.last()
    }
}

/// Full recorded output of one network run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunTrace {
    pub nodes: Vec<NodeTrace>,
}

impl RunTrace {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, node: NodeTrace) {
        self.nodes.push(node);
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Community traces in firing order (everything before the judge entry)
    pub fn community_traces(&self) -> &[NodeTrace] {
        match self.nodes.len() {
            0 => &[],
            n => &self.nodes[..n - 1],
        }
    }

    /// The network judge's final answer
    pub fn final_verdict(&self) -> Option<&StructuredAnswer> {
        self.nodes.last().and_then(|node| node.entries.last())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::question::Choice;

    fn answer(author: &str, choice: i64) -> StructuredAnswer {
        StructuredAnswer::new(author, Choice::new(choice).unwrap(), "")
    }

    #[test]
    fn test_final_verdict() {
        let mut trace = RunTrace::new();
        trace.push(NodeTrace::new(
            "Community 1",
            vec![answer("Agent 1", 1), answer("Community 1", 2)],
        ));
        trace.push(NodeTrace::new("Judge", vec![answer("Judge", 2)]));

        assert_eq!(trace.len(), 2);
        assert_eq!(trace.final_verdict().unwrap().choice.get(), 2);
        assert_eq!(trace.community_traces().len(), 1);
        assert_eq!(trace.community_traces()[0].node, "Community 1");
    }

    #[test]
    fn test_empty_trace() {
        let trace = RunTrace::new();
        assert!(trace.final_verdict().is_none());
        assert!(trace.community_traces().is_empty());
    }
}
