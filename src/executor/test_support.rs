//! Mock runnables and executors shared by the executor tests

use anyhow::Result;
use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use tokio::sync::Mutex as AsyncMutex;

use super::{ItemExecutor, Runnable};
use crate::models::RunResult;

/// Ordered record of `start:<name>` / `end:<name>` events across mocks
#[derive(Clone, Default)]
pub(crate) struct Journal(Arc<Mutex<Vec<String>>>);

impl Journal {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&self, event: String) {
        self.0.lock().unwrap().push(event);
    }

    pub fn events(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }

    /// Names of mocks that finished, in completion order
    pub fn executed(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|e| e.strip_prefix("end:").map(str::to_string))
            .collect()
    }

    pub fn position(&self, event: &str) -> usize {
        self.events()
            .iter()
            .position(|e| e == event)
            .unwrap_or_else(|| panic!("event {event} not recorded"))
    }
}

enum Outcome {
    Result(bool),
    Error(String),
}

/// Scripted runnable recording every call's arguments
pub(crate) struct MockRunnable {
    name: String,
    outcome: Outcome,
    journal: Journal,
    calls: Arc<Mutex<Vec<Vec<String>>>>,
}

impl MockRunnable {
    fn with_outcome(name: &str, outcome: Outcome, journal: &Journal) -> Self {
        Self {
            name: name.to_string(),
            outcome,
            journal: journal.clone(),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn passing(name: &str, journal: &Journal) -> Self {
        Self::with_outcome(name, Outcome::Result(true), journal)
    }

    pub fn failing(name: &str, journal: &Journal) -> Self {
        Self::with_outcome(name, Outcome::Result(false), journal)
    }

    pub fn erroring(name: &str, message: &str, journal: &Journal) -> Self {
        Self::with_outcome(name, Outcome::Error(message.to_string()), journal)
    }

    /// Handle to the argument lists this mock is called with
    pub fn calls(&self) -> Arc<Mutex<Vec<Vec<String>>>> {
        self.calls.clone()
    }

    pub fn boxed(self) -> Box<dyn Runnable> {
        Box::new(self)
    }
}

#[async_trait]
impl Runnable for MockRunnable {
    async fn execute(&mut self, args: &[String]) -> Result<RunResult> {
        self.journal.push(format!("start:{}", self.name));
        self.calls.lock().unwrap().push(args.to_vec());

        // Give sibling futures in the same chunk a chance to start
        tokio::task::yield_now().await;

        self.journal.push(format!("end:{}", self.name));
        match &self.outcome {
            Outcome::Result(ok) => Ok(RunResult::new(*ok).with_stdout([self.name.clone()])),
            Outcome::Error(message) => anyhow::bail!("{}", message),
        }
    }

    fn describe(&self) -> String {
        self.name.clone()
    }
}

/// Item executor that runs without arguments and keeps every result
#[derive(Default)]
pub(crate) struct Recorder {
    results: AsyncMutex<Vec<RunResult>>,
}

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn into_results(self) -> Vec<RunResult> {
        self.results.into_inner()
    }
}

#[async_trait]
impl ItemExecutor for Recorder {
    async fn execute_item(&self, item: &mut dyn Runnable) -> Result<RunResult> {
        let result = item.execute(&[]).await?;
        self.results.lock().await.push(result.clone());
        Ok(result)
    }
}
