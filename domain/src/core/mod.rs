//! Core domain primitives: errors and the question value object.

pub mod error;
pub mod question;
