//! Configuration module
//!
//! Handles loading application settings, environment overrides, and
//! directive plan files.

mod env;
mod plan;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::adapter::CommandResolver;
use crate::error::DirectiveError;
use crate::executor::DEFAULT_PARALLEL_CHUNKS;

pub use env::{parse_parallel_chunks, print_env_help, EnvBuilder, EnvConfig, EnvGuard};
pub use plan::{PlanItem, PlanNode};

/// Application configuration
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Program used to run targets
    pub runner: String,

    /// Arguments placed before the run arguments on every invocation
    pub runner_args: Vec<String>,

    /// Chunk count for parallel directives
    pub parallel_chunks: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            runner: "pytest".to_string(),
            runner_args: Vec::new(),
            parallel_chunks: DEFAULT_PARALLEL_CHUNKS,
        }
    }
}

impl AppConfig {
    /// Load configuration from file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Self = if is_yaml_file(path) {
            serde_yaml::from_str(&content)
                .with_context(|| format!("Failed to parse YAML config: {}", path.display()))?
        } else {
            serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse JSON config: {}", path.display()))?
        };

        Ok(config)
    }

    /// Apply overrides from the process environment
    pub fn with_env(self) -> Result<Self, DirectiveError> {
        self.apply_env(&EnvConfig::load())
    }

    pub fn apply_env(mut self, env: &EnvConfig) -> Result<Self, DirectiveError> {
        self.runner = env.runner_or(&self.runner);
        if env.parallel_processes.is_some() {
            self.parallel_chunks = env.parallel_chunks()?;
        }
        Ok(self)
    }

    /// Resolver running targets with the configured program
    pub fn resolver(&self, root: Option<PathBuf>) -> CommandResolver {
        let resolver = CommandResolver::new(&self.runner).with_args(self.runner_args.clone());
        match root {
            Some(root) => resolver.with_root(root),
            None => resolver,
        }
    }
}

pub(crate) fn is_yaml_file(path: &Path) -> bool {
    path.extension()
        .map(|e| e == "yaml" || e == "yml")
        .unwrap_or(false)
}
