//! String functions

use crate::model::{DataType, Value};
use crate::registry::function::{Function, FunctionError, FunctionResult};
use crate::registry::signature::FunctionSignature;
use std::sync::LazyLock;

/// Arguments reach function bodies already coerced, so string parameters are strings
fn string_arg<'a>(name: &str, args: &'a [Value], index: usize) -> FunctionResult<&'a str> {
    args.get(index)
        .and_then(Value::as_str)
        .ok_or_else(|| FunctionError::EvaluationError {
            name: name.to_string(),
            message: format!("argument {index} is not a string"),
        })
}

fn integer_arg(name: &str, args: &[Value], index: usize) -> FunctionResult<i64> {
    args.get(index)
        .and_then(Value::as_integer)
        .ok_or_else(|| FunctionError::EvaluationError {
            name: name.to_string(),
            message: format!("argument {index} is not an integer"),
        })
}

/// string.concat(String...) - joins every argument
pub struct ConcatFunction;

impl Function for ConcatFunction {
    fn signature(&self) -> &FunctionSignature {
        static SIG: LazyLock<FunctionSignature> = LazyLock::new(|| {
            FunctionSignature::variadic("string.concat", DataType::String, DataType::String)
        });
        &SIG
    }

    fn evaluate(&self, args: &[Value]) -> FunctionResult<Value> {
        let mut joined = String::new();
        for index in 0..args.len() {
            joined.push_str(string_arg(self.name(), args, index)?);
        }
        Ok(Value::String(joined))
    }

    fn documentation(&self) -> &str {
        "Concatenates all arguments as strings"
    }
}

/// string.length(String) - number of characters
pub struct LengthFunction;

impl Function for LengthFunction {
    fn signature(&self) -> &FunctionSignature {
        static SIG: LazyLock<FunctionSignature> = LazyLock::new(|| {
            FunctionSignature::new("string.length", vec![DataType::String], DataType::Integer)
        });
        &SIG
    }

    fn evaluate(&self, args: &[Value]) -> FunctionResult<Value> {
        let s = string_arg(self.name(), args, 0)?;
        Ok(Value::Integer(s.chars().count() as i64))
    }
}

/// string.upper(String)
pub struct UpperFunction;

impl Function for UpperFunction {
    fn signature(&self) -> &FunctionSignature {
        static SIG: LazyLock<FunctionSignature> = LazyLock::new(|| {
            FunctionSignature::new("string.upper", vec![DataType::String], DataType::String)
        });
        &SIG
    }

    fn evaluate(&self, args: &[Value]) -> FunctionResult<Value> {
        Ok(Value::String(string_arg(self.name(), args, 0)?.to_uppercase()))
    }
}

/// string.lower(String)
pub struct LowerFunction;

impl Function for LowerFunction {
    fn signature(&self) -> &FunctionSignature {
        static SIG: LazyLock<FunctionSignature> = LazyLock::new(|| {
            FunctionSignature::new("string.lower", vec![DataType::String], DataType::String)
        });
        &SIG
    }

    fn evaluate(&self, args: &[Value]) -> FunctionResult<Value> {
        Ok(Value::String(string_arg(self.name(), args, 0)?.to_lowercase()))
    }
}

/// string.trim(String) - strips surrounding whitespace
pub struct TrimFunction;

impl Function for TrimFunction {
    fn signature(&self) -> &FunctionSignature {
        static SIG: LazyLock<FunctionSignature> = LazyLock::new(|| {
            FunctionSignature::new("string.trim", vec![DataType::String], DataType::String)
        });
        &SIG
    }

    fn evaluate(&self, args: &[Value]) -> FunctionResult<Value> {
        Ok(Value::String(string_arg(self.name(), args, 0)?.trim().to_string()))
    }
}

/// string.substring(String, start, length) - character based, clamped to the input
pub struct SubstringFunction;

impl Function for SubstringFunction {
    fn signature(&self) -> &FunctionSignature {
        static SIG: LazyLock<FunctionSignature> = LazyLock::new(|| {
            FunctionSignature::new(
                "string.substring",
                vec![DataType::String, DataType::Integer, DataType::Integer],
                DataType::String,
            )
        });
        &SIG
    }

    fn evaluate(&self, args: &[Value]) -> FunctionResult<Value> {
        let s = string_arg(self.name(), args, 0)?;
        let start = integer_arg(self.name(), args, 1)?;
        let length = integer_arg(self.name(), args, 2)?;
        if start < 0 || length < 0 {
            return Err(FunctionError::EvaluationError {
                name: self.name().to_string(),
                message: format!("start ({start}) and length ({length}) must not be negative"),
            });
        }

        let substring = s
            .chars()
            .skip(start as usize)
            .take(length as usize)
            .collect();
        Ok(Value::String(substring))
    }
}
