//! Nested object mapping shape

use super::Mapper;
use crate::evaluator::EvalResult;
use crate::model::{Record, Scope, Value};
use serde_json::{Map, Value as JsonValue};

pub(crate) const MAPPING_KEY: &str = "mapping";

/// Object with the single key `mapping` holding an object
pub fn get_object_mapping(value: &Map<String, JsonValue>) -> Option<&Map<String, JsonValue>> {
    if value.len() != 1 {
        return None;
    }
    value.get(MAPPING_KEY).and_then(JsonValue::as_object)
}

/// Applies a sub-mapper, producing a nested record
#[derive(Debug, Clone)]
pub struct ObjectExpr {
    pub(crate) mapper: Option<Mapper>,
}

impl ObjectExpr {
    /// Evaluate against a scope; an empty sub-mapping yields an empty object
    pub fn eval(&self, scope: &dyn Scope) -> EvalResult<Value> {
        match &self.mapper {
            Some(mapper) => Ok(Value::Object(mapper.apply(scope)?)),
            None => Ok(Value::Object(Record::new())),
        }
    }
}
