//! Numeric functions

use crate::model::{DataType, Value};
use crate::registry::function::{Function, FunctionError, FunctionResult};
use crate::registry::signature::FunctionSignature;
use rust_decimal::RoundingStrategy;
use std::sync::LazyLock;

/// number.round(Decimal, places) - half away from zero
pub struct RoundFunction;

impl Function for RoundFunction {
    fn signature(&self) -> &FunctionSignature {
        static SIG: LazyLock<FunctionSignature> = LazyLock::new(|| {
            FunctionSignature::new(
                "number.round",
                vec![DataType::Decimal, DataType::Integer],
                DataType::Decimal,
            )
        });
        &SIG
    }

    fn evaluate(&self, args: &[Value]) -> FunctionResult<Value> {
        let (Some(Value::Decimal(value)), Some(Value::Integer(places))) =
            (args.first(), args.get(1))
        else {
            return Err(FunctionError::EvaluationError {
                name: self.name().to_string(),
                message: "expected (Decimal, Integer) arguments".to_string(),
            });
        };

        let places = u32::try_from(*places).map_err(|_| FunctionError::EvaluationError {
            name: self.name().to_string(),
            message: format!("decimal places must be between 0 and {}, got {places}", u32::MAX),
        })?;

        Ok(Value::Decimal(
            value.round_dp_with_strategy(places, RoundingStrategy::MidpointAwayFromZero),
        ))
    }
}

/// number.int(Integer) - coerces a value to an integer
pub struct IntFunction;

impl Function for IntFunction {
    fn signature(&self) -> &FunctionSignature {
        static SIG: LazyLock<FunctionSignature> = LazyLock::new(|| {
            FunctionSignature::new("number.int", vec![DataType::Integer], DataType::Integer)
        });
        &SIG
    }

    fn evaluate(&self, args: &[Value]) -> FunctionResult<Value> {
        Ok(args.first().cloned().unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::function::invoke;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    #[test]
    fn test_round_half_away_from_zero() {
        let result = invoke(&RoundFunction, &[Value::from("2.345"), Value::Integer(2)]).unwrap();
        assert_eq!(result, Value::Decimal(Decimal::from_str("2.35").unwrap()));

        let result = invoke(&RoundFunction, &[Value::Integer(7), Value::Integer(0)]).unwrap();
        assert_eq!(result, Value::Decimal(Decimal::from(7)));
    }

    #[test]
    fn test_int_rejects_fractions() {
        assert_eq!(
            invoke(&IntFunction, &[Value::from("12")]).unwrap(),
            Value::Integer(12)
        );
        assert!(matches!(
            invoke(&IntFunction, &[Value::from("1.5")]),
            Err(FunctionError::InvalidArgumentType { index: 0, .. })
        ));
    }
}
