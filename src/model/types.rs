//! Declared types for function parameters

use serde::{Deserialize, Serialize};
use std::fmt;

/// Type a function parameter is coerced to before invocation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataType {
    /// Any value, passed through unchanged
    Any,
    /// Boolean value (true/false)
    Boolean,
    /// Integer numeric value
    Integer,
    /// Decimal numeric value
    Decimal,
    /// String value
    String,
    /// Sequence of values
    Array,
    /// Keyed mapping of values
    Object,
}

impl DataType {
    /// Get the type name
    pub fn type_name(&self) -> &'static str {
        match self {
            DataType::Any => "Any",
            DataType::Boolean => "Boolean",
            DataType::Integer => "Integer",
            DataType::Decimal => "Decimal",
            DataType::String => "String",
            DataType::Array => "Array",
            DataType::Object => "Object",
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_name())
    }
}
