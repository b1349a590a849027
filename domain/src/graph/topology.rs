//! Declarative network wiring: adjacency matrix, start flags, temperatures.
//!
//! A [`NetworkTopology`] describes who sends to whom over `n` communities
//! plus an implicit judge column. Construction validates that the wiring can
//! actually terminate under the readiness protocol, so the scheduling loop
//! never has to guard against silent infinite polling.

use crate::core::error::DomainError;
use crate::graph::node::{DebateGraph, NodeId, NodeKind};

/// Validated wiring of a debate network.
///
/// `adjacency` has one row per community and `communities + 1` columns; the
/// last column is the terminal judge. `adjacency[i][j] == 1` means community
/// `i` sends its verdict to `j`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkTopology {
    communities: usize,
    start: Vec<bool>,
    adjacency: Vec<Vec<u8>>,
}

impl NetworkTopology {
    /// Build and validate a topology.
    ///
    /// Rejects wirings that could hang the scheduler: malformed shapes,
    /// self-edges, no start community, a community that can never fire, a
    /// community whose verdict never reaches the judge.
    pub fn new(start: Vec<bool>, adjacency: Vec<Vec<u8>>) -> Result<Self, DomainError> {
        let topology = Self {
            communities: start.len(),
            start,
            adjacency,
        };
        topology.validate()?;
        Ok(topology)
    }

    /// One start community feeding only the judge
    pub fn single_community() -> Self {
        Self::new(vec![true], vec![vec![0, 1]])
            .unwrap_or_else(|_| unreachable!("static topology is valid"))
    }

    /// `n` communities in a relay: each feeds the next, every one also
    /// feeds the judge, only the first is a start node
    pub fn chain(n: usize) -> Result<Self, DomainError> {
        if n == 0 {
            return Err(DomainError::BadTopology(
                "network needs at least one community".to_string(),
            ));
        }
        let mut start = vec![false; n];
        start[0] = true;

        let mut adjacency = vec![vec![0u8; n + 1]; n];
        for (i, row) in adjacency.iter_mut().enumerate() {
            if i + 1 < n {
                row[i + 1] = 1;
            }
            row[n] = 1;
        }
        Self::new(start, adjacency)
    }

    pub fn communities(&self) -> usize {
        self.communities
    }

    pub fn is_start(&self, community: usize) -> bool {
        self.start[community]
    }

    pub fn adjacency(&self) -> &[Vec<u8>] {
        &self.adjacency
    }

    /// Materialize the graph: community nodes in order, then the judge.
    ///
    /// Returns the graph, the community node ids, and the judge id.
    pub fn assemble(&self) -> (DebateGraph, Vec<NodeId>, NodeId) {
        let mut graph = DebateGraph::new();

        let community_ids: Vec<NodeId> = (0..self.communities)
            .map(|i| {
                graph.add_node(
                    format!("Community {}", i + 1),
                    NodeKind::Community,
                    self.start[i],
                )
            })
            .collect();
        let judge = graph.add_node("Judge", NodeKind::Judge, false);

        for (i, row) in self.adjacency.iter().enumerate() {
            for (j, &flag) in row.iter().enumerate() {
                if flag != 1 {
                    continue;
                }
                let to = if j == self.communities {
                    judge
                } else {
                    community_ids[j]
                };
                graph.register_edge(community_ids[i], to);
            }
        }

        (graph, community_ids, judge)
    }

    fn validate(&self) -> Result<(), DomainError> {
        let n = self.communities;
        if n == 0 {
            return Err(DomainError::BadTopology(
                "network needs at least one community".to_string(),
            ));
        }
        if self.adjacency.len() != n {
            return Err(DomainError::BadTopology(format!(
                "adjacency has {} rows for {} communities",
                self.adjacency.len(),
                n
            )));
        }
        for (i, row) in self.adjacency.iter().enumerate() {
            if row.len() != n + 1 {
                return Err(DomainError::BadTopology(format!(
                    "adjacency row {} has {} columns, expected {} (communities + judge)",
                    i + 1,
                    row.len(),
                    n + 1
                )));
            }
            if row.iter().any(|&v| v > 1) {
                return Err(DomainError::BadTopology(format!(
                    "adjacency row {} contains a value other than 0/1",
                    i + 1
                )));
            }
            if row[i] == 1 {
                return Err(DomainError::BadTopology(format!(
                    "community {} sends to itself",
                    i + 1
                )));
            }
        }
        if !self.start.iter().any(|&s| s) {
            return Err(DomainError::BadTopology(
                "no start community: nothing can ever fire".to_string(),
            ));
        }
        if !self.adjacency.iter().any(|row| row[n] == 1) {
            return Err(DomainError::BadTopology(
                "no community sends to the judge".to_string(),
            ));
        }

        self.check_firing_order()?;
        self.check_judge_reachability()
    }

    /// Simulate the readiness rule to a fixpoint: start communities fire,
    /// then any community whose senders have all fired. Anything left over
    /// would poll forever at runtime.
    fn check_firing_order(&self) -> Result<(), DomainError> {
        let n = self.communities;
        let mut fired = self.start.clone();

        loop {
            let mut progressed = false;
            for i in 0..n {
                if fired[i] {
                    continue;
                }
                let senders_done = (0..n)
                    .filter(|&k| self.adjacency[k][i] == 1)
                    .all(|k| fired[k]);
                if senders_done {
                    fired[i] = true;
                    progressed = true;
                }
            }
            if !progressed {
                break;
            }
        }

        match fired.iter().position(|&f| !f) {
            Some(i) => Err(DomainError::BadTopology(format!(
                "community {} can never fire (dependency cycle or dangling sender)",
                i + 1
            ))),
            None => Ok(()),
        }
    }

    /// Every community's verdict must reach the judge, directly or through
    /// downstream communities.
    fn check_judge_reachability(&self) -> Result<(), DomainError> {
        let n = self.communities;
        // reaches[i]: community i reaches the judge column
        let mut reaches: Vec<bool> = self.adjacency.iter().map(|row| row[n] == 1).collect();

        loop {
            let mut progressed = false;
            for i in 0..n {
                if reaches[i] {
                    continue;
                }
                let via_downstream =
                    (0..n).any(|j| self.adjacency[i][j] == 1 && reaches[j]);
                if via_downstream {
                    reaches[i] = true;
                    progressed = true;
                }
            }
            if !progressed {
                break;
            }
        }

        match reaches.iter().position(|&r| !r) {
            Some(i) => Err(DomainError::BadTopology(format!(
                "community {}'s verdict never reaches the judge",
                i + 1
            ))),
            None => Ok(()),
        }
    }
}

/// Evenly spaced per-community temperatures over `[lo, hi]`.
///
/// With a single community the low end is used.
pub fn temperature_spread(lo: f64, hi: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![lo],
        _ => (0..n)
            .map(|i| lo + (hi - lo) * i as f64 / (n - 1) as f64)
            .collect(),
    }
}
