//! Runner adapters
//!
//! Leaf runnables backed by external processes, and the resolver that maps
//! target paths onto them.

mod command;

pub use command::{CommandResolver, CommandRunnable};
