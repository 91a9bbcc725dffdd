//! Tree-walking evaluator for parsed mapping expressions

use super::arithmetic::ArithmeticEvaluator;
use super::comparison::ComparisonEvaluator;
use super::error::{EvalError, EvalResult};
use crate::ast::{BinaryOperator, ExpressionNode, UnaryOperator};
use crate::model::{Scope, Value};
use crate::registry::{FunctionRegistry, invoke};
use crate::resolve::{Resolution, ResolveError};
use rustc_hash::FxHashMap;
use std::sync::Arc;

/// Resolutions built at compile time, keyed by reference text
pub type ResolutionTable = FxHashMap<String, Arc<dyn Resolution>>;

/// Evaluates an [`ExpressionNode`] against one scope.
///
/// Borrowed for the duration of a single evaluation; holds no state of its own.
pub struct Evaluator<'a> {
    scope: &'a dyn Scope,
    resolutions: &'a ResolutionTable,
    functions: &'a FunctionRegistry,
}

impl<'a> Evaluator<'a> {
    /// Create an evaluator
    pub fn new(
        scope: &'a dyn Scope,
        resolutions: &'a ResolutionTable,
        functions: &'a FunctionRegistry,
    ) -> Self {
        Self {
            scope,
            resolutions,
            functions,
        }
    }

    /// Evaluate a node
    pub fn evaluate(&self, node: &ExpressionNode) -> EvalResult<Value> {
        match node {
            ExpressionNode::Literal(literal) => Ok(literal.to_value()),
            ExpressionNode::Reference(reference) => self.evaluate_reference(reference),
            ExpressionNode::BinaryOp(data) => match data.op {
                BinaryOperator::And => {
                    let left = self.evaluate(&data.left)?;
                    if !left.to_boolean() {
                        return Ok(Value::Boolean(false));
                    }
                    Ok(Value::Boolean(self.evaluate(&data.right)?.to_boolean()))
                }
                BinaryOperator::Or => {
                    let left = self.evaluate(&data.left)?;
                    if left.to_boolean() {
                        return Ok(Value::Boolean(true));
                    }
                    Ok(Value::Boolean(self.evaluate(&data.right)?.to_boolean()))
                }
                op => {
                    let left = self.evaluate(&data.left)?;
                    let right = self.evaluate(&data.right)?;
                    if op.is_arithmetic() {
                        ArithmeticEvaluator::evaluate(op, &left, &right)
                    } else {
                        ComparisonEvaluator::evaluate(op, &left, &right)
                    }
                }
            },
            ExpressionNode::UnaryOp { op, operand } => {
                let value = self.evaluate(operand)?;
                match op {
                    UnaryOperator::Not => Ok(Value::Boolean(!value.to_boolean())),
                    UnaryOperator::Negate => ArithmeticEvaluator::negate(&value),
                }
            }
            ExpressionNode::FunctionCall(data) => {
                let function =
                    self.functions
                        .get(&data.name)
                        .ok_or_else(|| EvalError::UnknownFunction {
                            name: data.name.clone(),
                        })?;
                let args = data
                    .args
                    .iter()
                    .map(|arg| self.evaluate(arg))
                    .collect::<EvalResult<Vec<_>>>()?;
                Ok(invoke(function.as_ref(), &args)?)
            }
            ExpressionNode::Conditional(data) => {
                if self.evaluate(&data.condition)?.to_boolean() {
                    self.evaluate(&data.then_expr)
                } else {
                    self.evaluate(&data.else_expr)
                }
            }
        }
    }

    fn evaluate_reference(&self, reference: &str) -> EvalResult<Value> {
        let resolution = self
            .resolutions
            .get(reference)
            .ok_or_else(|| ResolveError::NotFound {
                name: reference.to_string(),
            })?;
        Ok(resolution.get_value(self.scope)?)
    }
}
