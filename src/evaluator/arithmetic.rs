//! Arithmetic operations evaluator

use super::error::{EvalError, EvalResult};
use crate::ast::{BinaryOperator, UnaryOperator};
use crate::model::Value;
use rust_decimal::Decimal;

/// Operand pair after numeric promotion
enum Operands {
    Integers(i64, i64),
    Decimals(Decimal, Decimal),
}

impl Operands {
    fn promote(op: BinaryOperator, left: &Value, right: &Value) -> EvalResult<Self> {
        match (left, right) {
            (Value::Integer(a), Value::Integer(b)) => Ok(Self::Integers(*a, *b)),
            _ => match (left.as_decimal(), right.as_decimal()) {
                (Some(a), Some(b)) => Ok(Self::Decimals(a, b)),
                _ => Err(type_mismatch(op, left, right)),
            },
        }
    }
}

/// Specialized evaluator for arithmetic operations
pub struct ArithmeticEvaluator;

impl ArithmeticEvaluator {
    /// Evaluate `+ - * / %`
    pub fn evaluate(op: BinaryOperator, left: &Value, right: &Value) -> EvalResult<Value> {
        match op {
            BinaryOperator::Add => Self::add(left, right),
            BinaryOperator::Subtract => {
                Self::checked(op, left, right, i64::checked_sub, Decimal::checked_sub)
            }
            BinaryOperator::Multiply => {
                Self::checked(op, left, right, i64::checked_mul, Decimal::checked_mul)
            }
            BinaryOperator::Divide => Self::divide(left, right),
            BinaryOperator::Modulo => Self::modulo(left, right),
            _ => Err(type_mismatch(op, left, right)),
        }
    }

    /// `+` concatenates when either side is a string
    fn add(left: &Value, right: &Value) -> EvalResult<Value> {
        if matches!(left, Value::String(_)) || matches!(right, Value::String(_)) {
            if !left.is_scalar() || !right.is_scalar() {
                return Err(type_mismatch(BinaryOperator::Add, left, right));
            }
            return Ok(Value::String(format!("{left}{right}")));
        }
        Self::checked(
            BinaryOperator::Add,
            left,
            right,
            i64::checked_add,
            Decimal::checked_add,
        )
    }

    fn checked(
        op: BinaryOperator,
        left: &Value,
        right: &Value,
        int_op: fn(i64, i64) -> Option<i64>,
        dec_op: fn(Decimal, Decimal) -> Option<Decimal>,
    ) -> EvalResult<Value> {
        let result = match Operands::promote(op, left, right)? {
            Operands::Integers(a, b) => int_op(a, b).map(Value::Integer),
            Operands::Decimals(a, b) => dec_op(a, b).map(Value::Decimal),
        };
        result.ok_or_else(|| overflow(op))
    }

    /// Integer result when both sides are integers and divide exactly
    fn divide(left: &Value, right: &Value) -> EvalResult<Value> {
        let op = BinaryOperator::Divide;
        match Operands::promote(op, left, right)? {
            Operands::Integers(_, 0) => Err(EvalError::DivisionByZero),
            Operands::Integers(a, b) if a.checked_rem(b) == Some(0) => {
                a.checked_div(b).map(Value::Integer).ok_or_else(|| overflow(op))
            }
            Operands::Integers(a, b) => Decimal::from(a)
                .checked_div(Decimal::from(b))
                .map(|d| Value::Decimal(d.normalize()))
                .ok_or_else(|| overflow(op)),
            Operands::Decimals(_, b) if b.is_zero() => Err(EvalError::DivisionByZero),
            Operands::Decimals(a, b) => a
                .checked_div(b)
                .map(|d| Value::Decimal(d.normalize()))
                .ok_or_else(|| overflow(op)),
        }
    }

    fn modulo(left: &Value, right: &Value) -> EvalResult<Value> {
        let op = BinaryOperator::Modulo;
        match Operands::promote(op, left, right)? {
            Operands::Integers(_, 0) => Err(EvalError::DivisionByZero),
            Operands::Integers(a, b) => a
                .checked_rem(b)
                .map(Value::Integer)
                .ok_or_else(|| overflow(op)),
            Operands::Decimals(_, b) if b.is_zero() => Err(EvalError::DivisionByZero),
            Operands::Decimals(a, b) => a
                .checked_rem(b)
                .map(Value::Decimal)
                .ok_or_else(|| overflow(op)),
        }
    }

    /// Evaluate unary minus
    pub fn negate(operand: &Value) -> EvalResult<Value> {
        match operand {
            Value::Integer(i) => i
                .checked_neg()
                .map(Value::Integer)
                .ok_or_else(|| EvalError::Overflow {
                    op: UnaryOperator::Negate.to_string(),
                }),
            Value::Decimal(d) => Ok(Value::Decimal(-*d)),
            other => Err(EvalError::InvalidOperand {
                op: UnaryOperator::Negate.to_string(),
                operand: other.type_name().to_string(),
            }),
        }
    }
}

fn type_mismatch(op: BinaryOperator, left: &Value, right: &Value) -> EvalError {
    EvalError::TypeMismatch {
        op: op.to_string(),
        left: left.type_name().to_string(),
        right: right.type_name().to_string(),
    }
}

fn overflow(op: BinaryOperator) -> EvalError {
    EvalError::Overflow { op: op.to_string() }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::str::FromStr;

    fn dec(s: &str) -> Value {
        Value::Decimal(Decimal::from_str(s).unwrap())
    }

    #[rstest]
    #[case(BinaryOperator::Add, Value::Integer(2), Value::Integer(3), Value::Integer(5))]
    #[case(BinaryOperator::Add, Value::Integer(2), dec("0.5"), dec("2.5"))]
    #[case(BinaryOperator::Add, Value::from("INV-"), Value::Integer(7), Value::from("INV-7"))]
    #[case(BinaryOperator::Subtract, dec("10.25"), Value::Integer(1), dec("9.25"))]
    #[case(BinaryOperator::Multiply, Value::Integer(6), Value::Integer(7), Value::Integer(42))]
    #[case(BinaryOperator::Divide, Value::Integer(10), Value::Integer(2), Value::Integer(5))]
    #[case(BinaryOperator::Divide, Value::Integer(10), Value::Integer(4), dec("2.5"))]
    #[case(BinaryOperator::Modulo, Value::Integer(10), Value::Integer(4), Value::Integer(2))]
    fn test_arithmetic(
        #[case] op: BinaryOperator,
        #[case] left: Value,
        #[case] right: Value,
        #[case] expected: Value,
    ) {
        assert_eq!(ArithmeticEvaluator::evaluate(op, &left, &right).unwrap(), expected);
    }

    #[test]
    fn test_arithmetic_errors() {
        assert_eq!(
            ArithmeticEvaluator::evaluate(
                BinaryOperator::Divide,
                &Value::Integer(1),
                &Value::Integer(0)
            ),
            Err(EvalError::DivisionByZero)
        );
        assert!(matches!(
            ArithmeticEvaluator::evaluate(
                BinaryOperator::Add,
                &Value::Integer(i64::MAX),
                &Value::Integer(1)
            ),
            Err(EvalError::Overflow { .. })
        ));
        assert!(matches!(
            ArithmeticEvaluator::evaluate(
                BinaryOperator::Multiply,
                &Value::from("a"),
                &Value::Integer(2)
            ),
            Err(EvalError::TypeMismatch { .. })
        ));
        assert!(matches!(
            ArithmeticEvaluator::negate(&Value::Boolean(true)),
            Err(EvalError::InvalidOperand { .. })
        ));
    }
}
