//! Logging utilities
//!
//! Provides logging configuration for the command-line binary. `DIRECTIVE_LOG`
//! is either a bare level for this crate (`debug`) or a full filter directive
//! string (`test_directives=trace,tokio=warn`).

use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Tracing target of this crate
const CRATE_TARGET: &str = "test_directives";

/// Log level configuration
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn to_tracing_level(self) -> Level {
        match self {
            LogLevel::Trace => Level::TRACE,
            LogLevel::Debug => Level::DEBUG,
            LogLevel::Info => Level::INFO,
            LogLevel::Warn => Level::WARN,
            LogLevel::Error => Level::ERROR,
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "trace" => Some(LogLevel::Trace),
            "debug" => Some(LogLevel::Debug),
            "info" => Some(LogLevel::Info),
            "warn" | "warning" => Some(LogLevel::Warn),
            "error" => Some(LogLevel::Error),
            _ => None,
        }
    }
}

/// Filter for `level`, unless `directives` is a filter directive string
///
/// Only values containing `=` count as directives, so a mistyped level never
/// silences this crate. Unparsable directives fall back to `level`.
pub fn build_filter(level: LogLevel, directives: Option<&str>) -> EnvFilter {
    match directives.filter(|raw| raw.contains('=')) {
        Some(raw) => EnvFilter::try_new(raw).unwrap_or_else(|_| crate_filter(level)),
        None => crate_filter(level),
    }
}

fn crate_filter(level: LogLevel) -> EnvFilter {
    EnvFilter::new(format!("{CRATE_TARGET}={}", level.to_tracing_level()))
}

/// Initialize the logger with specified level and optional directives
pub fn init_logger(level: LogLevel, directives: Option<&str>) {
    tracing_subscriber::fmt()
        .with_env_filter(build_filter(level, directives))
        .with_target(false)
        .compact()
        .init();
}
