//! Use cases: one network run, and the batch driver around it.

pub mod run_batch;
pub mod run_network;
