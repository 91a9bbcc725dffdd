//! Function signatures used for arity checks and argument coercion

use crate::model::DataType;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Function signature: declared parameter types and variadic flag
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FunctionSignature {
    /// Function name
    pub name: String,
    /// Declared parameter types
    pub parameters: Vec<DataType>,
    /// Whether the function accepts any number of arguments
    pub variadic: bool,
    /// Return type
    pub return_type: DataType,
}

impl FunctionSignature {
    /// Create a fixed-arity function signature
    pub fn new(name: impl Into<String>, parameters: Vec<DataType>, return_type: DataType) -> Self {
        Self {
            name: name.into(),
            parameters,
            variadic: false,
            return_type,
        }
    }

    /// Create a variadic function signature.
    ///
    /// Every argument of a variadic call is coerced to the first declared
    /// parameter type.
    pub fn variadic(name: impl Into<String>, parameter: DataType, return_type: DataType) -> Self {
        Self {
            name: name.into(),
            parameters: vec![parameter],
            variadic: true,
            return_type,
        }
    }

    /// Number of arguments a fixed-arity call must supply
    pub fn arity(&self) -> usize {
        self.parameters.len()
    }
}

impl fmt::Display for FunctionSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.name)?;
        for (i, param) in self.parameters.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{param}")?;
        }
        if self.variadic {
            write!(f, "...")?;
        }
        write!(f, ") -> {}", self.return_type)
    }
}
