//! `if`/`then`/`else` mapping shape

use crate::evaluator::EvalResult;
use crate::expression::Expr;
use crate::model::{Scope, Value};
use serde_json::{Map, Value as JsonValue};

pub(crate) const IF_KEY: &str = "if";
pub(crate) const THEN_KEY: &str = "then";
pub(crate) const ELSE_KEY: &str = "else";

/// Object whose keys are `if` and `then`, optionally `else`, and nothing else
pub fn is_conditional_mapping(value: &Map<String, JsonValue>) -> bool {
    value.contains_key(IF_KEY)
        && value.contains_key(THEN_KEY)
        && value
            .keys()
            .all(|key| matches!(key.as_str(), IF_KEY | THEN_KEY | ELSE_KEY))
}

/// Evaluates the predicate, then exactly one branch
#[derive(Debug, Clone)]
pub struct ConditionalExpr {
    pub(crate) condition: Expr,
    pub(crate) then_expr: Expr,
    pub(crate) else_expr: Option<Expr>,
}

impl ConditionalExpr {
    /// Evaluate against a scope; a missing `else` yields `Null`
    pub fn eval(&self, scope: &dyn Scope) -> EvalResult<Value> {
        if self.condition.eval(scope)?.to_boolean() {
            self.then_expr.eval(scope)
        } else {
            match &self.else_expr {
                Some(else_expr) => else_expr.eval(scope),
                None => Ok(Value::Null),
            }
        }
    }
}
