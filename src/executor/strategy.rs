//! Run strategies
//!
//! A strategy decides the order and concurrency in which a directive's
//! items execute, and which batches of results count as acceptable.

use anyhow::Result;
use async_trait::async_trait;
use futures::future::join_all;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, info};

use super::Runnable;
use crate::config::EnvConfig;
use crate::error::DirectiveError;
use crate::models::RunResult;
use crate::utils::divide;

/// Default number of chunks the parallel strategy splits items into
pub const DEFAULT_PARALLEL_CHUNKS: usize = 4;

/// Per-item callback handed to a strategy by its directive
///
/// Executes the item, records the result on the directive, and returns it
/// so the strategy can make control-flow decisions.
#[async_trait]
pub trait ItemExecutor: Send + Sync {
    async fn execute_item(&self, item: &mut dyn Runnable) -> Result<RunResult>;
}

/// Execution policy over a directive's items
#[async_trait]
pub trait RunStrategy: Send + Sync {
    fn name(&self) -> &'static str;

    /// Drive execution of `items` through `executor`
    ///
    /// The first error returned by the executor aborts the remaining work.
    async fn run(&self, items: &mut [Box<dyn Runnable>], executor: &dyn ItemExecutor)
        -> Result<()>;

    /// Whether a completed batch of results is acceptable
    fn accept(&self, results: &[RunResult]) -> bool;
}

/// Runs every item in order and never stops early
///
/// Acceptable if at least one item passed.
#[derive(Clone, Copy, Debug, Default)]
pub struct SequenceRunStrategy;

#[async_trait]
impl RunStrategy for SequenceRunStrategy {
    fn name(&self) -> &'static str {
        "sequence"
    }

    async fn run(
        &self,
        items: &mut [Box<dyn Runnable>],
        executor: &dyn ItemExecutor,
    ) -> Result<()> {
        for item in items.iter_mut() {
            executor.execute_item(item.as_mut()).await?;
        }
        Ok(())
    }

    fn accept(&self, results: &[RunResult]) -> bool {
        results.iter().any(|r| r.ok)
    }
}

/// Runs items in order and stops at the first failed result
///
/// Acceptable if every executed item passed.
#[derive(Clone, Copy, Debug, Default)]
pub struct ChainRunStrategy;

#[async_trait]
impl RunStrategy for ChainRunStrategy {
    fn name(&self) -> &'static str {
        "chain"
    }

    async fn run(
        &self,
        items: &mut [Box<dyn Runnable>],
        executor: &dyn ItemExecutor,
    ) -> Result<()> {
        let total = items.len();

        for (index, item) in items.iter_mut().enumerate() {
            let result = executor.execute_item(item.as_mut()).await?;
            if !result.ok {
                let skipped = total - index - 1;
                if skipped > 0 {
                    info!(
                        "Chain stopped at {}, skipping {} remaining item(s)",
                        item.describe(),
                        skipped
                    );
                }
                break;
            }
        }
        Ok(())
    }

    fn accept(&self, results: &[RunResult]) -> bool {
        results.iter().all(|r| r.ok)
    }
}

/// Runs items chunk by chunk, concurrently within each chunk
///
/// Items are split into `chunks` contiguous groups. Every item of a chunk is
/// polled concurrently on the current task and the whole chunk finishes
/// before the next one starts.
///
/// Failures never stop later chunks, but acceptance still requires every
/// executed item to pass (unlike [`SequenceRunStrategy`], which accepts any
/// single pass).
///
/// The strategy was meant to ignore failures and pass when any item passes.
/// Acceptance does not do that: one failed item anywhere fails the batch.
#[derive(Clone, Copy, Debug)]
pub struct ParallelRunStrategy {
    chunks: usize,
}

impl ParallelRunStrategy {
    pub fn new(chunks: usize) -> Self {
        Self { chunks }
    }

    /// Chunk count from `DIRECTIVE_PARALLEL_PROCESSES`, defaulting to 4
    pub fn from_env() -> Result<Self, DirectiveError> {
        Ok(Self::new(EnvConfig::load().parallel_chunks()?))
    }

    pub fn chunks(&self) -> usize {
        self.chunks
    }
}

impl Default for ParallelRunStrategy {
    fn default() -> Self {
        Self::new(DEFAULT_PARALLEL_CHUNKS)
    }
}

#[async_trait]
impl RunStrategy for ParallelRunStrategy {
    fn name(&self) -> &'static str {
        "parallel"
    }

    async fn run(
        &self,
        items: &mut [Box<dyn Runnable>],
        executor: &dyn ItemExecutor,
    ) -> Result<()> {
        let chunks = divide(self.chunks, items.iter_mut())?;

        for (index, chunk) in chunks.into_iter().enumerate() {
            if chunk.is_empty() {
                continue;
            }

            debug!(
                "Dispatching chunk {}/{} with {} item(s)",
                index + 1,
                self.chunks,
                chunk.len()
            );

            let mut pending = Vec::with_capacity(chunk.len());
            for item in chunk {
                pending.push(executor.execute_item(item.as_mut()));
            }

            let outcomes = join_all(pending).await;

            for outcome in outcomes {
                outcome?;
            }
        }
        Ok(())
    }

    fn accept(&self, results: &[RunResult]) -> bool {
        results.iter().all(|r| r.ok)
    }
}

/// Named strategy selection, as used by the CLI and plan files
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StrategyKind {
    Sequence,
    Chain,
    Parallel,
}

impl StrategyKind {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "sequence" | "seq" => Some(StrategyKind::Sequence),
            "chain" => Some(StrategyKind::Chain),
            "parallel" | "par" => Some(StrategyKind::Parallel),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            StrategyKind::Sequence => "sequence",
            StrategyKind::Chain => "chain",
            StrategyKind::Parallel => "parallel",
        }
    }

    /// Build the strategy; `chunks` only applies to parallel
    pub fn build(self, chunks: usize) -> Box<dyn RunStrategy> {
        match self {
            StrategyKind::Sequence => Box::new(SequenceRunStrategy),
            StrategyKind::Chain => Box::new(ChainRunStrategy),
            StrategyKind::Parallel => Box::new(ParallelRunStrategy::new(chunks)),
        }
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::executor::test_support::{Journal, MockRunnable, Recorder};

    fn mocks(outcomes: &[(&str, bool)], journal: &Journal) -> Vec<Box<dyn Runnable>> {
        outcomes
            .iter()
            .map(|(name, ok)| {
                if *ok {
                    MockRunnable::passing(name, journal).boxed()
                } else {
                    MockRunnable::failing(name, journal).boxed()
                }
            })
            .collect()
    }

    async fn drive(strategy: &dyn RunStrategy, items: &mut [Box<dyn Runnable>]) -> Vec<RunResult> {
        let recorder = Recorder::new();
        strategy.run(items, &recorder).await.unwrap();
        recorder.into_results()
    }

    #[tokio::test]
    async fn test_sequence_runs_everything_and_accepts_any_pass() {
        let journal = Journal::new();
        let mut items = mocks(&[("a", true), ("b", false), ("c", true)], &journal);

        let results = drive(&SequenceRunStrategy, &mut items).await;

        assert_eq!(journal.executed(), vec!["a", "b", "c"]);
        assert_eq!(results.len(), 3);
        assert!(SequenceRunStrategy.accept(&results));
    }

    #[tokio::test]
    async fn test_sequence_all_fail() {
        let journal = Journal::new();
        let mut items = mocks(&[("a", false), ("b", false)], &journal);

        let results = drive(&SequenceRunStrategy, &mut items).await;

        assert_eq!(journal.executed().len(), 2);
        assert!(!SequenceRunStrategy.accept(&results));
    }

    #[tokio::test]
    async fn test_sequence_is_strictly_ordered() {
        let journal = Journal::new();
        let mut items = mocks(&[("a", true), ("b", true)], &journal);

        drive(&SequenceRunStrategy, &mut items).await;

        assert_eq!(journal.events(), vec!["start:a", "end:a", "start:b", "end:b"]);
    }

    #[test]
    fn test_sequence_accepts_nothing_when_empty() {
        assert!(!SequenceRunStrategy.accept(&[]));
    }

    #[tokio::test]
    async fn test_chain_stops_at_first_failure() {
        let journal = Journal::new();
        let mut items = mocks(&[("a", true), ("b", false), ("c", true)], &journal);

        let results = drive(&ChainRunStrategy, &mut items).await;

        assert_eq!(journal.executed(), vec!["a", "b"]);
        assert_eq!(results.len(), 2);
        assert!(!ChainRunStrategy.accept(&results));
    }

    #[tokio::test]
    async fn test_chain_all_pass() {
        let journal = Journal::new();
        let mut items = mocks(&[("a", true), ("b", true)], &journal);

        let results = drive(&ChainRunStrategy, &mut items).await;

        assert_eq!(journal.executed(), vec!["a", "b"]);
        assert!(ChainRunStrategy.accept(&results));
    }

    #[test]
    fn test_chain_accepts_empty_vacuously() {
        assert!(ChainRunStrategy.accept(&[]));
    }

    #[tokio::test]
    async fn test_parallel_runs_every_chunk() {
        let journal = Journal::new();
        let mut items = mocks(&[("a", true), ("b", true), ("c", true), ("d", true)], &journal);
        let strategy = ParallelRunStrategy::new(2);

        let results = drive(&strategy, &mut items).await;

        assert_eq!(results.len(), 4);
        assert!(strategy.accept(&results));

        // chunk [c, d] never starts before chunk [a, b] is done
        let second_chunk_start = journal.position("start:c").min(journal.position("start:d"));
        assert!(journal.position("end:a") < second_chunk_start);
        assert!(journal.position("end:b") < second_chunk_start);

        // items within a chunk interleave
        assert!(journal.position("start:b") < journal.position("end:a"));
    }

    #[tokio::test]
    async fn test_parallel_requires_every_item_to_pass() {
        let journal = Journal::new();
        let mut items = mocks(&[("a", true), ("b", true), ("c", false), ("d", true)], &journal);
        let strategy = ParallelRunStrategy::new(2);

        let results = drive(&strategy, &mut items).await;

        assert_eq!(journal.executed().len(), 4);
        assert!(!strategy.accept(&results));
    }

    #[tokio::test]
    async fn test_parallel_with_more_chunks_than_items() {
        let journal = Journal::new();
        let mut items = mocks(&[("a", true), ("b", true)], &journal);
        let strategy = ParallelRunStrategy::default();

        let results = drive(&strategy, &mut items).await;

        assert_eq!(strategy.chunks(), DEFAULT_PARALLEL_CHUNKS);
        assert_eq!(results.len(), 2);
    }

    #[tokio::test]
    async fn test_parallel_zero_chunks_is_invalid() {
        let journal = Journal::new();
        let mut items = mocks(&[("a", true)], &journal);
        let recorder = Recorder::new();

        let err = ParallelRunStrategy::new(0)
            .run(&mut items, &recorder)
            .await
            .unwrap_err();

        assert!(matches!(
            err.downcast_ref::<DirectiveError>(),
            Some(DirectiveError::InvalidArgument(_))
        ));
        assert!(journal.events().is_empty());
    }

    #[tokio::test]
    async fn test_parallel_error_finishes_chunk_then_aborts() {
        let journal = Journal::new();
        let mut items: Vec<Box<dyn Runnable>> = vec![
            MockRunnable::erroring("a", "boom", &journal).boxed(),
            MockRunnable::passing("b", &journal).boxed(),
            MockRunnable::passing("c", &journal).boxed(),
        ];
        let recorder = Recorder::new();

        let err = ParallelRunStrategy::new(2)
            .run(&mut items, &recorder)
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "boom");
        // b shares a's chunk and still completes, c is never started
        assert_eq!(journal.executed(), vec!["a", "b"]);
    }

    #[tokio::test]
    async fn test_sequence_error_aborts_remaining() {
        let journal = Journal::new();
        let mut items: Vec<Box<dyn Runnable>> = vec![
            MockRunnable::passing("a", &journal).boxed(),
            MockRunnable::erroring("b", "crashed", &journal).boxed(),
            MockRunnable::passing("c", &journal).boxed(),
        ];
        let recorder = Recorder::new();

        let err = SequenceRunStrategy
            .run(&mut items, &recorder)
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "crashed");
        assert_eq!(journal.executed(), vec!["a", "b"]);
        assert_eq!(recorder.into_results().len(), 1);
    }

    #[test]
    fn test_strategy_kind_from_str() {
        assert_eq!(StrategyKind::from_str("chain"), Some(StrategyKind::Chain));
        assert_eq!(StrategyKind::from_str("SEQUENCE"), Some(StrategyKind::Sequence));
        assert_eq!(StrategyKind::from_str("par"), Some(StrategyKind::Parallel));
        assert_eq!(StrategyKind::from_str("random"), None);
    }

    #[test]
    fn test_strategy_kind_build() {
        assert_eq!(StrategyKind::Sequence.build(4).name(), "sequence");
        assert_eq!(StrategyKind::Chain.build(4).name(), "chain");
        assert_eq!(StrategyKind::Parallel.build(2).name(), "parallel");
        assert_eq!(StrategyKind::Parallel.to_string(), "parallel");
    }
}
