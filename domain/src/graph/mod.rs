//! The debate dependency graph.
//!
//! [`node`] holds the vertex type and the arena-style [`DebateGraph`] with
//! the readiness/delivery protocol; [`topology`] holds the declarative
//! wiring (adjacency matrix, start flags) and its validity check.

pub mod node;
pub mod topology;

pub use node::{DebateGraph, Node, NodeId, NodeKind};
pub use topology::{NetworkTopology, temperature_spread};
