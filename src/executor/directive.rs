//! Directives
//!
//! A directive owns an ordered list of runnables and a run strategy. It is
//! itself a [`Runnable`], so directives nest inside other directives.

use anyhow::Result;
use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::{debug, info};

use super::{
    ChainRunStrategy, Item, ItemExecutor, ParallelRunStrategy, RunStrategy, Runnable,
    SequenceRunStrategy, TargetResolver,
};
use crate::error::DirectiveError;
use crate::models::{RunResult, RunSummary};
use crate::utils::Timer;

/// Composite runnable driven by a run strategy
///
/// Run arguments and results accumulate across calls to [`Directive::run`]:
/// every call appends its extra arguments to the base list, and acceptance
/// is evaluated over every result recorded so far, including earlier runs.
///
/// `run` takes `&mut self`, so one instance cannot be run concurrently.
pub struct Directive {
    items: Vec<Box<dyn Runnable>>,
    strategy: Box<dyn RunStrategy>,
    run_args: Vec<String>,
    results: Vec<RunResult>,
    runs: usize,
}

impl Directive {
    /// Resolve `raw_items` and build a directive around `strategy`
    ///
    /// Fails on the first target the resolver cannot map.
    pub fn new<R, I>(
        raw_items: I,
        strategy: Box<dyn RunStrategy>,
        resolver: &R,
    ) -> Result<Self, DirectiveError>
    where
        R: TargetResolver + ?Sized,
        I: IntoIterator<Item = Item<R::Target>>,
    {
        let items = raw_items
            .into_iter()
            .map(|item| resolver.to_runnable(item))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            items,
            strategy,
            run_args: Vec::new(),
            results: Vec::new(),
            runs: 0,
        })
    }

    pub fn sequence<R, I>(raw_items: I, resolver: &R) -> Result<Self, DirectiveError>
    where
        R: TargetResolver + ?Sized,
        I: IntoIterator<Item = Item<R::Target>>,
    {
        Self::new(raw_items, Box::new(SequenceRunStrategy), resolver)
    }

    pub fn chain<R, I>(raw_items: I, resolver: &R) -> Result<Self, DirectiveError>
    where
        R: TargetResolver + ?Sized,
        I: IntoIterator<Item = Item<R::Target>>,
    {
        Self::new(raw_items, Box::new(ChainRunStrategy), resolver)
    }

    /// Parallel directive with the chunk count from the environment
    pub fn parallel<R, I>(raw_items: I, resolver: &R) -> Result<Self, DirectiveError>
    where
        R: TargetResolver + ?Sized,
        I: IntoIterator<Item = Item<R::Target>>,
    {
        Self::new(raw_items, Box::new(ParallelRunStrategy::from_env()?), resolver)
    }

    /// Set the initial base arguments
    pub fn with_run_args(mut self, args: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.run_args = args.into_iter().map(Into::into).collect();
        self
    }

    /// Run every item under the strategy and aggregate the verdict
    ///
    /// The returned result carries only the `ok` flag; child output stays on
    /// the child results. An error from any child aborts the run and is
    /// returned as is, after keeping the results recorded before it.
    pub async fn run(&mut self, extra_args: &[String]) -> Result<RunResult> {
        self.run_args.extend_from_slice(extra_args);
        self.runs += 1;

        let name = self.strategy.name();
        let timer = Timer::start(format!("{name} directive"));
        info!(
            "Running {} directive with {} item(s), args {:?}",
            name,
            self.items.len(),
            self.run_args
        );

        let collector = ResultCollector::new(&self.run_args, std::mem::take(&mut self.results));
        let outcome = self.strategy.run(&mut self.items, &collector).await;
        self.results = collector.into_results();
        outcome?;

        let ok = self.strategy.accept(&self.results);
        info!(
            "{} directive finished in {}ms: {}",
            name,
            timer.elapsed_ms(),
            if ok { "OK" } else { "FAILED" }
        );
        timer.stop();

        Ok(RunResult::new(ok))
    }

    pub fn strategy_name(&self) -> &'static str {
        self.strategy.name()
    }

    pub fn run_args(&self) -> &[String] {
        &self.run_args
    }

    /// Every result recorded across all runs, in completion order
    pub fn results(&self) -> &[RunResult] {
        &self.results
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of calls to [`Directive::run`] so far
    pub fn runs(&self) -> usize {
        self.runs
    }

    /// Summary over every run so far
    pub fn summary(&self) -> RunSummary {
        RunSummary::new(
            self.strategy.name(),
            self.items.len(),
            &self.results,
            self.strategy.accept(&self.results),
        )
        .with_runs(self.runs)
    }
}

#[async_trait]
impl Runnable for Directive {
    async fn execute(&mut self, args: &[String]) -> Result<RunResult> {
        self.run(args).await
    }

    fn describe(&self) -> String {
        format!("{} directive ({} items)", self.strategy.name(), self.items.len())
    }
}

impl<T> From<Directive> for Item<T> {
    fn from(directive: Directive) -> Self {
        Item::runnable(directive)
    }
}

/// Per-item executor bound to one directive run
struct ResultCollector<'a> {
    args: &'a [String],
    results: Mutex<Vec<RunResult>>,
}

impl<'a> ResultCollector<'a> {
    fn new(args: &'a [String], results: Vec<RunResult>) -> Self {
        Self {
            args,
            results: Mutex::new(results),
        }
    }

    fn into_results(self) -> Vec<RunResult> {
        self.results.into_inner()
    }
}

#[async_trait]
impl<'a> ItemExecutor for ResultCollector<'a> {
    async fn execute_item(&self, item: &mut dyn Runnable) -> Result<RunResult> {
        debug!("Executing {}", item.describe());

        let result = item.execute(self.args).await?;
        debug!("  {} {}", result.symbol(), item.describe());

        self.results.lock().await.push(result.clone());
        Ok(result)
    }
}
