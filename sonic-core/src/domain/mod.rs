//! Core domain types
//!
//! These types describe what a stage is, which image runs it and what gets
//! recorded about each execution. They are shared between the runner (which
//! executes and persists) and the CLI (which builds them from configuration).

pub mod audit;
pub mod image;
pub mod stage;
