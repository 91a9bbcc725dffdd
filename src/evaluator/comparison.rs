//! Comparison operations evaluator

use super::error::{EvalError, EvalResult};
use crate::ast::BinaryOperator;
use crate::model::Value;
use std::cmp::Ordering;

/// Specialized evaluator for equality and ordering
pub struct ComparisonEvaluator;

impl ComparisonEvaluator {
    /// Evaluate `== != < <= > >=`
    pub fn evaluate(op: BinaryOperator, left: &Value, right: &Value) -> EvalResult<Value> {
        let result = match op {
            BinaryOperator::Equal => Self::equals(left, right),
            BinaryOperator::NotEqual => !Self::equals(left, right),
            BinaryOperator::LessThan => Self::compare(op, left, right)?.is_lt(),
            BinaryOperator::LessThanOrEqual => Self::compare(op, left, right)?.is_le(),
            BinaryOperator::GreaterThan => Self::compare(op, left, right)?.is_gt(),
            BinaryOperator::GreaterThanOrEqual => Self::compare(op, left, right)?.is_ge(),
            _ => {
                return Err(EvalError::TypeMismatch {
                    op: op.to_string(),
                    left: left.type_name().to_string(),
                    right: right.type_name().to_string(),
                });
            }
        };
        Ok(Value::Boolean(result))
    }

    /// Numbers compare by value across integer and decimal; everything else structurally
    pub fn equals(left: &Value, right: &Value) -> bool {
        match (left.as_decimal(), right.as_decimal()) {
            (Some(a), Some(b)) => a == b,
            _ => left == right,
        }
    }

    fn compare(op: BinaryOperator, left: &Value, right: &Value) -> EvalResult<Ordering> {
        match (left, right) {
            (Value::String(a), Value::String(b)) => Ok(a.cmp(b)),
            (Value::Boolean(a), Value::Boolean(b)) => Ok(a.cmp(b)),
            _ => match (left.as_decimal(), right.as_decimal()) {
                (Some(a), Some(b)) => Ok(a.cmp(&b)),
                _ => Err(EvalError::TypeMismatch {
                    op: op.to_string(),
                    left: left.type_name().to_string(),
                    right: right.type_name().to_string(),
                }),
            },
        }
    }
}
