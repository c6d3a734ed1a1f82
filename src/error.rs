//! Domain errors for snapshot selection.
//!
//! Everything else in the crate goes through `anyhow`; these two kinds are
//! typed so that callers (and the CLI exit codes) can tell them apart.

use thiserror::Error;

use crate::consts::{EXIT_FAILURE, EXIT_MALFORMED_EXPRESSION, EXIT_UNRECOGNIZED_ARGUMENT};

#[derive(Debug, Error)]
pub enum SelectError {
    /// A `@`-expression did not match the range grammar.
    #[error("Malformed filter expression: {0}")]
    MalformedExpression(String),

    /// Neither an existing file, a glob, nor a range expression.
    #[error("Unrecognized argument or missing file: {0}")]
    UnrecognizedArgument(String),

    /// Glob pattern could not be compiled for enumeration.
    #[error("invalid snapshot pattern {pattern}: {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },
}

impl SelectError {
    pub fn exit_code(&self) -> i32 {
        match self {
            SelectError::MalformedExpression(_) => EXIT_MALFORMED_EXPRESSION,
            SelectError::UnrecognizedArgument(_) => EXIT_UNRECOGNIZED_ARGUMENT,
            SelectError::Pattern { .. } => EXIT_FAILURE,
        }
    }
}

pub type SelectResult<T> = std::result::Result<T, SelectError>;
