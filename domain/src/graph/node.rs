//! Graph vertices and the dependency/readiness protocol.
//!
//! A [`Node`] is a community or the terminal judge. Nodes are owned by a
//! [`DebateGraph`] and addressed by [`NodeId`]; edges are index references,
//! so nothing here aliases across node boundaries. Messages cross the
//! boundary by value: [`DebateGraph::deliver`] appends a relabeled copy of
//! the sender's answer to the receiver's history.
//!
//! # Invariants
//!
//! - A node fires at most once: [`Node::mark_ready`] latches the fired flag
//!   the single time it returns `true`.
//! - `pending` only shrinks during execution; dependencies are registered
//!   at construction time only.

use crate::core::error::DomainError;
use crate::debate::answer::{ChatHistory, StructuredAnswer};

/// Index of a node inside its owning [`DebateGraph`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

/// What kind of vertex this is.
///
/// An explicit tag; node behavior is never inferred from its name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    /// A debating community that forwards its consensus downstream
    Community,
    /// The terminal sink that reduces delivered verdicts to a final answer
    Judge,
}

/// A vertex in the execution dependency graph
#[derive(Debug, Clone)]
pub struct Node {
    name: String,
    kind: NodeKind,
    start: bool,
    fired: bool,
    /// Names of senders whose verdicts have not arrived yet. A multiset:
    /// duplicate edges would add duplicate entries, and delivery removes
    /// exactly one matching entry.
    pending: Vec<String>,
    outbound: Vec<NodeId>,
    history: ChatHistory,
}

impl Node {
    fn new(name: String, kind: NodeKind, start: bool) -> Self {
        Self {
            name,
            kind,
            start,
            fired: false,
            pending: Vec::new(),
            outbound: Vec::new(),
            history: ChatHistory::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    pub fn is_start(&self) -> bool {
        self.start
    }

    pub fn has_fired(&self) -> bool {
        self.fired
    }

    /// Senders this node is still waiting for
    pub fn pending(&self) -> &[String] {
        &self.pending
    }

    /// Nodes this one sends its verdict to
    pub fn outbound(&self) -> &[NodeId] {
        &self.outbound
    }

    pub fn history(&self) -> &ChatHistory {
        &self.history
    }

    /// Append an answer this node produced itself (agent turn or verdict)
    pub fn push_answer(&mut self, answer: StructuredAnswer) {
        self.history.push(answer);
    }

    /// One-shot firing permit.
    ///
    /// Returns `true` exactly once per node: either the node is a start node
    /// that has not fired, or all its dependencies have delivered and it has
    /// somewhere to send (or is the terminal judge). The `true` result
    /// latches the fired flag, so this is deliberately not idempotent; the
    /// caller must treat it as permission to run the node now.
    pub fn mark_ready(&mut self) -> bool {
        if self.fired {
            return false;
        }
        if self.start {
            self.fired = true;
            return true;
        }
        if self.pending.is_empty()
            && (!self.outbound.is_empty() || self.kind == NodeKind::Judge)
        {
            self.fired = true;
            return true;
        }
        false
    }

    /// Receive a verdict from an upstream node.
    ///
    /// Removes exactly one matching pending entry and appends an anonymized
    /// copy to the history. An author not in `pending` is a protocol
    /// violation: the graph was miswired.
    fn deliver(&mut self, answer: &StructuredAnswer) -> Result<(), DomainError> {
        let Some(at) = self.pending.iter().position(|name| *name == answer.author) else {
            return Err(DomainError::UnexpectedSender {
                node: self.name.clone(),
                sender: answer.author.clone(),
            });
        };
        self.pending.remove(at);
        self.history.push(answer.relabeled(self.history.len() + 1));
        Ok(())
    }
}

/// Arena of nodes plus the cross-node operations (edges and delivery)
#[derive(Debug, Default)]
pub struct DebateGraph {
    nodes: Vec<Node>,
}

impl DebateGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_node(&mut self, name: impl Into<String>, kind: NodeKind, start: bool) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node::new(name.into(), kind, start));
        id
    }

    /// Register a directed edge.
    ///
    /// Edge and dependency are two sides of one relation and are always
    /// created together: `to` gains `from`'s name as a pending sender.
    /// Construction-time only.
    pub fn register_edge(&mut self, from: NodeId, to: NodeId) {
        let sender = self.nodes[from.0].name.clone();
        self.nodes[from.0].outbound.push(to);
        self.nodes[to.0].pending.push(sender);
    }

    /// Deliver a verdict to a node (copy-on-deliver, see [`Node::deliver`])
    pub fn deliver(&mut self, to: NodeId, answer: &StructuredAnswer) -> Result<(), DomainError> {
        self.nodes[to.0].deliver(answer)
    }

    /// One-shot readiness check for a node (see [`Node::mark_ready`])
    pub fn mark_ready(&mut self, id: NodeId) -> bool {
        self.nodes[id.0].mark_ready()
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    pub fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.0]
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = NodeId> + use<> {
        (0..self.nodes.len()).map(NodeId)
    }
}
