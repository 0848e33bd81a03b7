//! Utility helpers
//!
//! Partitioning, logging setup, and timing.

mod divide;
pub mod logger;
mod timer;

pub use divide::{divide, divide_optional};
pub use logger::{init_logger, LogLevel};
pub use timer::Timer;
