//! Crate-level error type
//!
//! Each layer has its own error enum; [`Error`] wraps all of them for callers
//! that drive the whole pipeline.

use crate::copybook::{RenderError, SchemaError};
use crate::evaluator::EvalError;
use crate::expression::CompileError;
use crate::registry::FunctionError;
use thiserror::Error;

/// Result type alias for pipeline operations
pub type Result<T> = std::result::Result<T, Error>;

/// Any failure from compiling, mapping or rendering
#[derive(Error, Debug)]
pub enum Error {
    /// Mapping specification did not compile
    #[error(transparent)]
    Compile(#[from] CompileError),

    /// Mapping failed against the scope
    #[error(transparent)]
    Eval(#[from] EvalError),

    /// Function call failed outside an expression
    #[error(transparent)]
    Function(#[from] FunctionError),

    /// Copybook schema is invalid
    #[error(transparent)]
    Schema(#[from] SchemaError),

    /// Mapped record does not fit the copybook
    #[error(transparent)]
    Render(#[from] RenderError),

    /// Configuration document is malformed
    #[error("Invalid configuration: {0}")]
    Config(#[from] serde_json::Error),
}
