// Error types for mapping expression evaluation

use crate::registry::FunctionError;
use crate::resolve::ResolveError;
use thiserror::Error;

/// Result type for evaluation operations
pub type EvalResult<T> = Result<T, EvalError>;

/// Errors that can occur while evaluating a compiled expression against a scope
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EvalError {
    /// A reference could not be resolved against the scope
    #[error("Resolution error: {0}")]
    Resolve(#[from] ResolveError),

    /// Function arity, coercion or body error
    #[error("Function error: {0}")]
    Function(#[from] FunctionError),

    /// Binary operator applied to operands it does not support
    #[error("Type error: cannot apply '{op}' to {left} and {right}")]
    TypeMismatch {
        /// Operator symbol
        op: String,
        /// Left operand type
        left: String,
        /// Right operand type
        right: String,
    },

    /// Unary operator applied to an operand it does not support
    #[error("Type error: cannot apply '{op}' to {operand}")]
    InvalidOperand {
        /// Operator symbol
        op: String,
        /// Operand type
        operand: String,
    },

    /// Division or remainder by zero
    #[error("Division by zero")]
    DivisionByZero,

    /// Checked arithmetic overflowed
    #[error("Arithmetic overflow in '{op}'")]
    Overflow {
        /// Operator symbol
        op: String,
    },

    /// Function is not in the registry
    #[error("Unknown function '{name}'")]
    UnknownFunction {
        /// Function name
        name: String,
    },

    /// Evaluation of a mapped field failed
    #[error("Failed to evaluate field [{field}]: {source}")]
    Field {
        /// Output field name
        field: String,
        /// Underlying failure
        #[source]
        source: Box<EvalError>,
    },
}

impl EvalError {
    /// Innermost error, unwrapping field context
    pub fn root_cause(&self) -> &EvalError {
        match self {
            Self::Field { source, .. } => source.root_cause(),
            other => other,
        }
    }
}
