//! CLI argument parsing
//!
//! Defines command-line interface using clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Run test targets as sequence, chain, or parallel directives
#[derive(Parser, Debug)]
#[command(name = "test-directives")]
#[command(version)]
#[command(about = "Run test targets under sequence, chain, or parallel directives")]
#[command(long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Configuration file (YAML or JSON)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run targets under a single directive
    Run(RunArgs),

    /// Run a nested directive plan file
    Plan(PlanArgs),

    /// Show supported environment variables
    Env,
}

/// Options shared by every command that runs targets
#[derive(Parser, Debug)]
pub struct RunnerArgs {
    /// Program used to run each target (overrides config and environment)
    #[arg(long)]
    pub runner: Option<String>,

    /// Chunk count for parallel directives
    #[arg(long)]
    pub chunks: Option<usize>,

    /// Directory that relative target paths are resolved against
    #[arg(long)]
    pub root: Option<PathBuf>,

    /// Output format (table, json, json-pretty, summary)
    #[arg(short, long, default_value = "table")]
    pub format: String,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,
}

/// Arguments for run command
#[derive(Parser, Debug)]
pub struct RunArgs {
    /// Run strategy (sequence, chain, parallel)
    #[arg(short, long, default_value = "sequence")]
    pub strategy: String,

    #[command(flatten)]
    pub runner: RunnerArgs,

    /// Targets to run, as `path` or `path::selector`
    #[arg(required = true)]
    pub targets: Vec<String>,

    /// Extra arguments passed to every target, after `--`
    #[arg(last = true)]
    pub extra: Vec<String>,
}

/// Arguments for plan command
#[derive(Parser, Debug)]
pub struct PlanArgs {
    /// Plan file describing the directive tree
    pub file: PathBuf,

    #[command(flatten)]
    pub runner: RunnerArgs,

    /// Extra arguments passed to every target, after `--`
    #[arg(last = true)]
    pub extra: Vec<String>,
}
