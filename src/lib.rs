//! Test directives - compose test targets into runnable directives
//!
//! Groups test targets into directives and runs them under one of three
//! strategies:
//!
//! - **sequence**: run every item in order, ok if any item passed
//! - **chain**: run in order, stop at the first failure, ok if all passed
//! - **parallel**: run in chunks, items of a chunk concurrently, ok if all passed
//!
//! Directives are runnables themselves, so they nest.
//!
//! ```no_run
//! use test_directives::adapter::CommandResolver;
//! use test_directives::executor::{Directive, Item};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let resolver = CommandResolver::pytest();
//! let smoke = Directive::parallel(
//!     vec![Item::target("tests/test_api.py".to_string()), Item::target("tests/test_db.py".to_string())],
//!     &resolver,
//! )?;
//! let mut suite = Directive::chain(
//!     vec![Item::target("tests/test_setup.py".to_string()), Item::from(smoke)],
//!     &resolver,
//! )?;
//!
//! let result = suite.run(&["-q".to_string()]).await?;
//! println!("ok: {}", result.ok);
//! # Ok(())
//! # }
//! ```

pub mod adapter;
pub mod config;
pub mod error;
pub mod executor;
pub mod models;
pub mod output;
pub mod utils;

pub use error::DirectiveError;
pub use executor::{Directive, Item, RunStrategy, Runnable, StrategyKind, TargetResolver};
pub use models::{RunResult, RunSummary};
