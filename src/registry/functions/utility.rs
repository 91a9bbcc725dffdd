//! Utility functions

use crate::model::{DataType, Value};
use crate::registry::function::{Function, FunctionResult};
use crate::registry::signature::FunctionSignature;
use std::sync::LazyLock;

/// utility.coalesce(Any...) - first argument that is not null
pub struct CoalesceFunction;

impl Function for CoalesceFunction {
    fn signature(&self) -> &FunctionSignature {
        static SIG: LazyLock<FunctionSignature> = LazyLock::new(|| {
            FunctionSignature::variadic("utility.coalesce", DataType::Any, DataType::Any)
        });
        &SIG
    }

    fn evaluate(&self, args: &[Value]) -> FunctionResult<Value> {
        Ok(args
            .iter()
            .find(|value| !value.is_null())
            .cloned()
            .unwrap_or_default())
    }
}

/// utility.isNull(Any) - true when the argument is null
pub struct IsNullFunction;

impl Function for IsNullFunction {
    fn signature(&self) -> &FunctionSignature {
        static SIG: LazyLock<FunctionSignature> = LazyLock::new(|| {
            FunctionSignature::new("utility.isNull", vec![DataType::Any], DataType::Boolean)
        });
        &SIG
    }

    fn evaluate(&self, args: &[Value]) -> FunctionResult<Value> {
        Ok(Value::Boolean(args.first().is_none_or(Value::is_null)))
    }
}
