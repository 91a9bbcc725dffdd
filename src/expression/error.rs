// Error types for compiling mappings and expressions

use crate::parser::ParseError;
use crate::resolve::ResolveError;
use thiserror::Error;

/// Result type for compile operations
pub type CompileResult<T> = Result<T, CompileError>;

/// Errors raised while compiling expression sources or mapping specifications.
///
/// Compilation is atomic: on error no partial mapper is produced.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CompileError {
    /// Expression source could not be parsed
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    /// A reference could not be turned into a resolution
    #[error("Resolution error: {0}")]
    Resolve(#[from] ResolveError),

    /// Expression calls a function missing from the registry
    #[error("Unknown function '{name}'")]
    UnknownFunction {
        /// Function name
        name: String,
    },

    /// Compiling a mapping entry failed
    #[error("create expression for field [{field}] error: {source}")]
    Field {
        /// Mapping key
        field: String,
        /// Underlying failure
        #[source]
        source: Box<CompileError>,
    },
}

impl CompileError {
    /// Attach the mapping key that failed
    pub fn for_field(self, field: impl Into<String>) -> Self {
        Self::Field {
            field: field.into(),
            source: Box::new(self),
        }
    }

    /// Innermost error, unwrapping field context
    pub fn root_cause(&self) -> &CompileError {
        match self {
            Self::Field { source, .. } => source.root_cause(),
            other => other,
        }
    }
}
