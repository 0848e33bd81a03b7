//! Output formatting module
//!
//! Provides various output formats for directive results.

mod formatter;

pub use formatter::{OutputFormat, ResultFormatter};
