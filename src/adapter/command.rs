//! Subprocess runnables
//!
//! Runs a target through an external test runner (pytest by default) and
//! maps its exit status onto a [`RunResult`].

use anyhow::{Context, Result};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;
use tracing::{debug, error, info};

use crate::error::DirectiveError;
use crate::executor::{Runnable, TargetResolver};
use crate::models::RunResult;

/// Separator between a file path and a selector inside it
const SELECTOR_SEPARATOR: &str = "::";

/// Runs `program [base args] [run args] target` in a child process
#[derive(Clone, Debug)]
pub struct CommandRunnable {
    program: String,
    base_args: Vec<String>,
    target: String,
}

impl CommandRunnable {
    pub fn new(program: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            base_args: Vec::new(),
            target: target.into(),
        }
    }

    pub fn with_args(mut self, args: Vec<String>) -> Self {
        self.base_args = args;
        self
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    /// Arguments passed to the program for one invocation
    pub fn build_args(&self, run_args: &[String]) -> Vec<String> {
        let mut args = self.base_args.clone();
        args.extend_from_slice(run_args);
        args.push(self.target.clone());
        args
    }
}

#[async_trait]
impl Runnable for CommandRunnable {
    async fn execute(&mut self, args: &[String]) -> Result<RunResult> {
        let args = self.build_args(args);
        debug!("Running {}: {} {}", self.target, self.program, args.join(" "));

        let output = Command::new(&self.program)
            .args(&args)
            .stdin(Stdio::null())
            .output()
            .await
            .with_context(|| format!("Failed to execute {} for {}", self.program, self.target))?;

        let stdout = collect_lines(&output.stdout);
        let stderr = collect_lines(&output.stderr);

        for line in &stdout {
            info!("{}", line);
        }
        for line in &stderr {
            error!("{}", line);
        }

        let ok = output.status.success();
        if ok {
            debug!("{} finished without errors", self.target);
        } else {
            error!(
                "Errors in results of {} (exit code {})",
                self.target,
                output
                    .status
                    .code()
                    .map_or_else(|| "none".to_string(), |c| c.to_string())
            );
        }

        Ok(RunResult { ok, stdout, stderr })
    }

    fn describe(&self) -> String {
        self.target().to_string()
    }
}

fn collect_lines(bytes: &[u8]) -> Vec<String> {
    String::from_utf8_lossy(bytes)
        .lines()
        .map(|line| line.trim_end().to_string())
        .collect()
}

/// Resolves `path[::selector]` targets into [`CommandRunnable`]s
#[derive(Clone, Debug)]
pub struct CommandResolver {
    program: String,
    base_args: Vec<String>,
    root: Option<PathBuf>,
}

impl CommandResolver {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            base_args: Vec::new(),
            root: None,
        }
    }

    /// Resolver for pytest test files, modules, and test functions
    pub fn pytest() -> Self {
        Self::new("pytest")
    }

    pub fn with_args(mut self, args: Vec<String>) -> Self {
        self.base_args = args;
        self
    }

    /// Resolve relative target paths against `root`
    pub fn with_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.root = Some(root.into());
        self
    }

    fn locate(&self, path: &str) -> PathBuf {
        match &self.root {
            Some(root) => root.join(path),
            None => Path::new(path).to_path_buf(),
        }
    }
}

impl TargetResolver for CommandResolver {
    type Target = String;

    fn resolve(&self, target: String) -> Result<Box<dyn Runnable>, DirectiveError> {
        let (path, selector) = match target.split_once(SELECTOR_SEPARATOR) {
            Some((path, selector)) => (path, Some(selector)),
            None => (target.as_str(), None),
        };

        let location = self.locate(path);
        if !location.exists() {
            return Err(DirectiveError::not_found(target.clone()));
        }

        let mut resolved = location.display().to_string();
        if let Some(selector) = selector {
            resolved.push_str(SELECTOR_SEPARATOR);
            resolved.push_str(selector);
        }
        debug!("Resolved {} to {}", target, resolved);

        Ok(Box::new(
            CommandRunnable::new(&self.program, resolved).with_args(self.base_args.clone()),
        ))
    }
}
