//! Run result models
//!
//! Defines the outcome of a single execution and the summary of a
//! directive's accumulated results.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Outcome of one execution attempt of one runnable
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunResult {
    pub ok: bool,
    #[serde(default)]
    pub stdout: Vec<String>,
    #[serde(default)]
    pub stderr: Vec<String>,
}

impl RunResult {
    pub fn new(ok: bool) -> Self {
        Self {
            ok,
            stdout: Vec::new(),
            stderr: Vec::new(),
        }
    }

    pub fn passed() -> Self {
        Self::new(true)
    }

    pub fn failed() -> Self {
        Self::new(false)
    }

    pub fn with_stdout(mut self, lines: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.stdout = lines.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_stderr(mut self, lines: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.stderr = lines.into_iter().map(Into::into).collect();
        self
    }

    pub fn symbol(&self) -> &'static str {
        if self.ok {
            "✓"
        } else {
            "✗"
        }
    }
}

impl fmt::Display for RunResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "RunResult(ok={}, stdout={:?}, stderr={:?})",
            self.ok, self.stdout, self.stderr
        )
    }
}

/// Summary of the results a directive has accumulated
///
/// Counts cover every run so far, not just the latest one.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    pub strategy: String,
    pub items: usize,
    #[serde(default = "default_runs")]
    pub runs: usize,
    pub executed: usize,
    pub passed: usize,
    pub failed: usize,
    pub ok: bool,
}

impl RunSummary {
    pub fn new(strategy: impl Into<String>, items: usize, results: &[RunResult], ok: bool) -> Self {
        let passed = results.iter().filter(|r| r.ok).count();

        Self {
            strategy: strategy.into(),
            items,
            runs: 1,
            executed: results.len(),
            passed,
            failed: results.len() - passed,
            ok,
        }
    }

    pub fn with_runs(mut self, runs: usize) -> Self {
        self.runs = runs;
        self
    }

    pub fn pass_rate(&self) -> f64 {
        if self.executed == 0 {
            0.0
        } else {
            (self.passed as f64 / self.executed as f64) * 100.0
        }
    }

    /// Item executions that never happened across all runs (fail-fast skips)
    pub fn skipped(&self) -> usize {
        (self.items * self.runs).saturating_sub(self.executed)
    }
}

fn default_runs() -> usize {
    1
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{} directive - {} items, {} run(s)",
            self.strategy, self.items, self.runs
        )?;
        writeln!(f, "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━")?;
        writeln!(
            f,
            "Executed: {} | Pass: {} | Fail: {} | Skipped: {}",
            self.executed,
            self.passed,
            self.failed,
            self.skipped()
        )?;
        writeln!(
            f,
            "Pass Rate: {:.1}% | Verdict: {}",
            self.pass_rate(),
            if self.ok { "OK" } else { "FAILED" }
        )
    }
}
