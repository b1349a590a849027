//! Labeled-question datasets.

pub mod loader;

pub use loader::{DatasetError, DatasetLoader};
