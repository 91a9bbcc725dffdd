//! Type coercion for function arguments

use super::types::DataType;
use super::value::Value;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use std::str::FromStr;
use thiserror::Error;

/// Result type for type coercion operations
pub type CoercionResult<T> = Result<T, CoercionError>;

/// Errors that can occur during type coercion
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoercionError {
    /// Cannot coerce between the specified types
    #[error("Cannot coerce from {from} to {to}")]
    IncompatibleTypes {
        /// Source type name
        from: String,
        /// Target type
        to: DataType,
    },
    /// The value format is invalid for the target type
    #[error("Invalid format '{value}' for type {target_type}")]
    InvalidFormat {
        /// Offending value, rendered
        value: String,
        /// Target type
        target_type: DataType,
    },
}

/// Type coercion utility for values
pub struct TypeCoercion;

impl TypeCoercion {
    /// Attempt to coerce a value to the specified type
    pub fn coerce_to_type(value: &Value, target_type: DataType) -> CoercionResult<Value> {
        match target_type {
            DataType::Any => Ok(value.clone()),
            DataType::Boolean => Self::coerce_to_boolean(value),
            DataType::Integer => Self::coerce_to_integer(value),
            DataType::Decimal => Self::coerce_to_decimal(value),
            DataType::String => Self::coerce_to_string(value),
            DataType::Array => Self::coerce_to_array(value),
            DataType::Object => Self::coerce_to_object(value),
        }
    }

    /// Coerce value to boolean
    pub fn coerce_to_boolean(value: &Value) -> CoercionResult<Value> {
        match value {
            Value::Boolean(b) => Ok(Value::Boolean(*b)),
            Value::Integer(i) => Ok(Value::Boolean(*i != 0)),
            Value::Decimal(d) => Ok(Value::Boolean(!d.is_zero())),
            Value::Null => Ok(Value::Boolean(false)),
            Value::String(s) => match s.trim().to_lowercase().as_str() {
                "true" | "t" | "yes" | "y" | "1" => Ok(Value::Boolean(true)),
                "false" | "f" | "no" | "n" | "0" | "" => Ok(Value::Boolean(false)),
                _ => Err(invalid_format(value, DataType::Boolean)),
            },
            _ => Err(incompatible(value, DataType::Boolean)),
        }
    }

    /// Coerce value to integer
    pub fn coerce_to_integer(value: &Value) -> CoercionResult<Value> {
        match value {
            Value::Integer(i) => Ok(Value::Integer(*i)),
            Value::Decimal(d) if d.fract().is_zero() => d
                .to_i64()
                .map(Value::Integer)
                .ok_or_else(|| invalid_format(value, DataType::Integer)),
            Value::Decimal(_) => Err(invalid_format(value, DataType::Integer)),
            Value::Boolean(b) => Ok(Value::Integer(i64::from(*b))),
            Value::String(s) => s
                .trim()
                .parse::<i64>()
                .map(Value::Integer)
                .map_err(|_| invalid_format(value, DataType::Integer)),
            _ => Err(incompatible(value, DataType::Integer)),
        }
    }

    /// Coerce value to decimal
    pub fn coerce_to_decimal(value: &Value) -> CoercionResult<Value> {
        match value {
            Value::Decimal(d) => Ok(Value::Decimal(*d)),
            Value::Integer(i) => Ok(Value::Decimal(Decimal::from(*i))),
            Value::Boolean(b) => Ok(Value::Decimal(if *b { Decimal::ONE } else { Decimal::ZERO })),
            Value::String(s) => Decimal::from_str(s.trim())
                .map(Value::Decimal)
                .map_err(|_| invalid_format(value, DataType::Decimal)),
            _ => Err(incompatible(value, DataType::Decimal)),
        }
    }

    /// Coerce value to string; containers are rendered as JSON
    pub fn coerce_to_string(value: &Value) -> CoercionResult<Value> {
        Ok(Value::String(value.to_string()))
    }

    /// Coerce value to array; JSON array text is parsed
    pub fn coerce_to_array(value: &Value) -> CoercionResult<Value> {
        match value {
            Value::Array(items) => Ok(Value::Array(items.clone())),
            Value::Null => Ok(Value::Array(Vec::new())),
            Value::String(s) => match serde_json::from_str::<serde_json::Value>(s) {
                Ok(json @ serde_json::Value::Array(_)) => Ok(Value::from(json)),
                _ => Err(invalid_format(value, DataType::Array)),
            },
            _ => Err(incompatible(value, DataType::Array)),
        }
    }

    /// Coerce value to object; JSON object text is parsed
    pub fn coerce_to_object(value: &Value) -> CoercionResult<Value> {
        match value {
            Value::Object(fields) => Ok(Value::Object(fields.clone())),
            Value::String(s) => match serde_json::from_str::<serde_json::Value>(s) {
                Ok(json @ serde_json::Value::Object(_)) => Ok(Value::from(json)),
                _ => Err(invalid_format(value, DataType::Object)),
            },
            _ => Err(incompatible(value, DataType::Object)),
        }
    }
}

fn incompatible(value: &Value, to: DataType) -> CoercionError {
    CoercionError::IncompatibleTypes {
        from: value.type_name().to_string(),
        to,
    }
}

fn invalid_format(value: &Value, target_type: DataType) -> CoercionError {
    CoercionError::InvalidFormat {
        value: value.to_string(),
        target_type,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(Value::Boolean(true), true)]
    #[case(Value::Integer(0), false)]
    #[case(Value::from("yes"), true)]
    #[case(Value::from("F"), false)]
    #[case(Value::Null, false)]
    fn test_boolean_coercion(#[case] input: Value, #[case] expected: bool) {
        assert_eq!(
            TypeCoercion::coerce_to_boolean(&input).unwrap(),
            Value::Boolean(expected)
        );
    }

    #[test]
    fn test_integer_coercion() {
        assert_eq!(
            TypeCoercion::coerce_to_integer(&Value::Decimal(Decimal::from(42))).unwrap(),
            Value::Integer(42)
        );
        assert_eq!(
            TypeCoercion::coerce_to_integer(&Value::from(" 42 ")).unwrap(),
            Value::Integer(42)
        );

        // Fractional values and non-numeric text are rejected
        assert!(TypeCoercion::coerce_to_integer(&Value::Decimal(Decimal::new(425, 1))).is_err());
        assert!(TypeCoercion::coerce_to_integer(&Value::from("42.5")).is_err());
        assert!(matches!(
            TypeCoercion::coerce_to_integer(&Value::Array(vec![])),
            Err(CoercionError::IncompatibleTypes { to: DataType::Integer, .. })
        ));
    }

    #[test]
    fn test_string_coercion_renders_leaves_bare() {
        assert_eq!(
            TypeCoercion::coerce_to_string(&Value::Integer(7)).unwrap(),
            Value::from("7")
        );
        assert_eq!(
            TypeCoercion::coerce_to_string(&Value::Null).unwrap(),
            Value::from("")
        );
    }

    #[test]
    fn test_array_coercion_parses_json_text() {
        assert_eq!(
            TypeCoercion::coerce_to_array(&Value::from("[1, 2]")).unwrap(),
            Value::Array(vec![Value::Integer(1), Value::Integer(2)])
        );
        assert!(TypeCoercion::coerce_to_array(&Value::from("{}")).is_err());
    }

    #[test]
    fn test_any_passes_through() {
        let value = Value::Array(vec![Value::from("x")]);
        assert_eq!(
            TypeCoercion::coerce_to_type(&value, DataType::Any).unwrap(),
            value
        );
    }
}
