//! Directive errors
//!
//! Local predicate failures raised while partitioning work, reading
//! configuration, or resolving targets. Failures coming out of a child's
//! execution are not represented here; they travel as `anyhow::Error`.

use thiserror::Error;

/// Errors raised synchronously by the orchestration layer
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DirectiveError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Type mismatch: expected {expected}, found {found}")]
    TypeMismatch {
        expected: &'static str,
        found: String,
    },

    #[error("Target not found: {0}")]
    NotFound(String),
}

impl DirectiveError {
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        DirectiveError::InvalidArgument(message.into())
    }

    pub fn type_mismatch(expected: &'static str, found: impl Into<String>) -> Self {
        DirectiveError::TypeMismatch {
            expected,
            found: found.into(),
        }
    }

    pub fn not_found(target: impl Into<String>) -> Self {
        DirectiveError::NotFound(target.into())
    }
}
