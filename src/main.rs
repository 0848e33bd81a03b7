//! Test directives CLI
//!
//! Runs test targets under sequence, chain, or parallel directives, either
//! from the command line or from a nested plan file.
//!
//! ## Usage
//!
//! ```bash
//! # Run targets one after another, stopping at the first failure
//! test-directives run --strategy chain tests/test_setup.py tests/test_api.py
//!
//! # Run targets in 2 concurrent chunks and forward arguments to pytest
//! test-directives run --strategy parallel --chunks 2 tests/ -- -q
//!
//! # Run a nested plan
//! test-directives plan directives.yaml
//! ```

use anyhow::{Context, Result};
use clap::Parser;
use std::path::Path;
use tracing::info;

mod cli;

use cli::{Args, Command, PlanArgs, RunArgs, RunnerArgs};
use test_directives::config::{print_env_help, AppConfig, EnvConfig, PlanNode};
use test_directives::output::{OutputFormat, ResultFormatter};
use test_directives::utils::{init_logger, LogLevel};
use test_directives::StrategyKind;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    if args.verbose {
        init_logger(LogLevel::Debug, None);
    } else {
        let env = EnvConfig::load();
        init_logger(env.log_level(), env.log_level.as_deref());
    }

    let ok = match args.command {
        Command::Run(run_args) => run_targets(run_args, args.config.as_deref()).await?,
        Command::Plan(plan_args) => run_plan(plan_args, args.config.as_deref()).await?,
        Command::Env => {
            print_env_help();
            return Ok(());
        }
    };

    if !ok {
        std::process::exit(1);
    }
    Ok(())
}

/// Load config file, then environment, then command-line overrides
fn load_config(path: Option<&Path>, runner: &RunnerArgs) -> Result<AppConfig> {
    let config = match path {
        Some(path) => AppConfig::load(path)?,
        None => AppConfig::default(),
    };
    let mut config = config.with_env()?;

    if let Some(program) = &runner.runner {
        config.runner = program.clone();
    }
    if let Some(chunks) = runner.chunks {
        config.parallel_chunks = chunks;
    }
    Ok(config)
}

async fn run_targets(args: RunArgs, config_path: Option<&Path>) -> Result<bool> {
    let strategy = StrategyKind::from_str(&args.strategy)
        .with_context(|| format!("Unknown strategy: {}", args.strategy))?;
    let config = load_config(config_path, &args.runner)?;

    let plan = PlanNode::flat(strategy, args.targets);
    execute_plan(&plan, &config, &args.runner, &args.extra).await
}

async fn run_plan(args: PlanArgs, config_path: Option<&Path>) -> Result<bool> {
    let config = load_config(config_path, &args.runner)?;
    let plan = PlanNode::load(&args.file)?;

    execute_plan(&plan, &config, &args.runner, &args.extra).await
}

async fn execute_plan(
    plan: &PlanNode,
    config: &AppConfig,
    runner: &RunnerArgs,
    extra: &[String],
) -> Result<bool> {
    let format = OutputFormat::from_str(&runner.format)
        .with_context(|| format!("Unknown output format: {}", runner.format))?;

    info!(
        "Resolving {} target(s) for {} with {}",
        plan.target_count(),
        plan.strategy,
        config.runner
    );

    let resolver = config.resolver(runner.root.clone());
    let mut directive = plan.build(&resolver, config.parallel_chunks)?;
    let result = directive.run(extra).await?;

    let mut formatter = ResultFormatter::new(format);
    if runner.no_color {
        formatter = formatter.no_color();
    }
    println!(
        "{}",
        formatter.format_summary(&directive.summary(), directive.results())
    );

    Ok(result.ok)
}
