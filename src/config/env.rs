//! Environment variable configuration
//!
//! Provides environment variable overrides for configuration.

use std::env;

use crate::error::DirectiveError;
use crate::executor::DEFAULT_PARALLEL_CHUNKS;
use crate::utils::LogLevel;

/// Environment variable prefix
const ENV_PREFIX: &str = "DIRECTIVE";

/// Environment configuration from environment variables
#[derive(Clone, Debug, Default)]
pub struct EnvConfig {
    /// Raw chunk count from DIRECTIVE_PARALLEL_PROCESSES
    pub parallel_processes: Option<String>,
    /// Runner program from DIRECTIVE_RUNNER
    pub runner: Option<String>,
    /// Log level from DIRECTIVE_LOG
    pub log_level: Option<String>,
}

impl EnvConfig {
    /// Load configuration from environment variables
    pub fn load() -> Self {
        Self {
            parallel_processes: get_env("PARALLEL_PROCESSES"),
            runner: get_env("RUNNER"),
            log_level: get_env("LOG"),
        }
    }

    /// Check if any environment variables are set
    pub fn has_any(&self) -> bool {
        self.parallel_processes.is_some() || self.runner.is_some() || self.log_level.is_some()
    }

    /// Parallel chunk count, 4 when unset
    pub fn parallel_chunks(&self) -> Result<usize, DirectiveError> {
        parse_parallel_chunks(self.parallel_processes.as_deref())
    }

    /// Get runner with fallback
    pub fn runner_or(&self, default: &str) -> String {
        self.runner.clone().unwrap_or_else(|| default.to_string())
    }

    /// Log level, `info` when unset or unrecognised
    pub fn log_level(&self) -> LogLevel {
        self.log_level
            .as_deref()
            .and_then(LogLevel::from_str)
            .unwrap_or_default()
    }
}

/// Parse a raw chunk count
///
/// Non-integers are a type mismatch and negatives are invalid. Zero is
/// passed through; the partitioner rejects it when the parallel run starts.
pub fn parse_parallel_chunks(raw: Option<&str>) -> Result<usize, DirectiveError> {
    let Some(raw) = raw else {
        return Ok(DEFAULT_PARALLEL_CHUNKS);
    };

    let value: i64 = raw
        .trim()
        .parse()
        .map_err(|_| DirectiveError::type_mismatch("integer", format!("{raw:?}")))?;

    usize::try_from(value).map_err(|_| {
        DirectiveError::invalid_argument(format!(
            "{ENV_PREFIX}_PARALLEL_PROCESSES must not be negative, got {value}"
        ))
    })
}

/// Get environment variable with prefix
fn get_env(name: &str) -> Option<String> {
    env::var(format!("{ENV_PREFIX}_{name}")).ok()
}

/// Builder for setting environment variables (useful for testing)
pub struct EnvBuilder {
    vars: Vec<(String, String)>,
}

impl EnvBuilder {
    pub fn new() -> Self {
        Self { vars: Vec::new() }
    }

    pub fn parallel_processes(mut self, value: impl Into<String>) -> Self {
        self.vars
            .push((format!("{ENV_PREFIX}_PARALLEL_PROCESSES"), value.into()));
        self
    }

    pub fn runner(mut self, runner: impl Into<String>) -> Self {
        self.vars.push((format!("{ENV_PREFIX}_RUNNER"), runner.into()));
        self
    }

    pub fn log_level(mut self, level: impl Into<String>) -> Self {
        self.vars.push((format!("{ENV_PREFIX}_LOG"), level.into()));
        self
    }

    /// Apply environment variables
    pub fn apply(self) {
        for (key, value) in self.vars {
            env::set_var(key, value);
        }
    }

    /// Apply and return guard that restores on drop
    pub fn apply_scoped(self) -> EnvGuard {
        let previous: Vec<_> = self
            .vars
            .iter()
            .map(|(k, _)| (k.clone(), env::var(k).ok()))
            .collect();

        self.apply();

        EnvGuard { previous }
    }
}

impl Default for EnvBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Guard that restores environment variables on drop
pub struct EnvGuard {
    previous: Vec<(String, Option<String>)>,
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        for (key, value) in &self.previous {
            match value {
                Some(v) => env::set_var(key, v),
                None => env::remove_var(key),
            }
        }
    }
}

/// Print all DIRECTIVE environment variables
pub fn print_env_help() {
    println!("Environment Variables:");
    println!();
    println!("  {ENV_PREFIX}_PARALLEL_PROCESSES  Chunk count for parallel directives (default 4)");
    println!("  {ENV_PREFIX}_RUNNER              Program used to run targets (default pytest)");
    println!("  {ENV_PREFIX}_LOG                 Log level (trace, debug, info, warn, error)");
    println!();
    println!("Example:");
    println!("  export {ENV_PREFIX}_PARALLEL_PROCESSES=8");
    println!("  test-directives run --strategy parallel tests/test_api.py tests/test_db.py");
}
