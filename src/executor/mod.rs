//! Directive execution engine
//!
//! Provides the runnable contract, the sequence, chain, and parallel run
//! strategies, and directives that compose runnables under a strategy.

mod directive;
mod runnable;
mod strategy;

#[cfg(test)]
pub(crate) mod test_support;

pub use directive::Directive;
pub use runnable::{Item, Runnable, TargetResolver};
pub use strategy::{
    ChainRunStrategy, ItemExecutor, ParallelRunStrategy, RunStrategy, SequenceRunStrategy,
    StrategyKind, DEFAULT_PARALLEL_CHUNKS,
};
