//! Runnable and target resolution contracts
//!
//! A runnable is anything that can be executed with a list of extra
//! arguments and report a [`RunResult`]. Leaf units (a subprocess, a mock)
//! and directives implement the same trait, so a directive can hold other
//! directives without callers telling them apart.

use anyhow::Result;
use async_trait::async_trait;

use crate::error::DirectiveError;
use crate::models::RunResult;

/// A unit of work that executes and reports a result
///
/// A returned `Err` is a hard execution error: it is never converted into a
/// failed result by the orchestration layer and aborts the enclosing run.
#[async_trait]
pub trait Runnable: Send + Sync {
    /// Execute with the given arguments
    async fn execute(&mut self, args: &[String]) -> Result<RunResult>;

    /// Human-readable label used in logs
    fn describe(&self) -> String {
        "runnable".to_string()
    }
}

/// A raw directive member: either already runnable or a target to resolve
pub enum Item<T> {
    Runnable(Box<dyn Runnable>),
    Target(T),
}

impl<T> Item<T> {
    pub fn runnable(runnable: impl Runnable + 'static) -> Self {
        Item::Runnable(Box::new(runnable))
    }

    pub fn target(target: T) -> Self {
        Item::Target(target)
    }
}

impl<T> From<Box<dyn Runnable>> for Item<T> {
    fn from(runnable: Box<dyn Runnable>) -> Self {
        Item::Runnable(runnable)
    }
}

/// Converts domain-specific targets into runnables
pub trait TargetResolver {
    type Target;

    /// Map a target to a runnable, failing with `NotFound` when it cannot
    fn resolve(&self, target: Self::Target) -> Result<Box<dyn Runnable>, DirectiveError>;

    /// Pass runnables through untouched and resolve everything else
    fn to_runnable(&self, item: Item<Self::Target>) -> Result<Box<dyn Runnable>, DirectiveError> {
        match item {
            Item::Runnable(runnable) => Ok(runnable),
            Item::Target(target) => self.resolve(target),
        }
    }
}
