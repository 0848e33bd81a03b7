//! Data models
//!
//! Core data structures shared by runnables, strategies, and directives.

mod run_result;

pub use run_result::{RunResult, RunSummary};
