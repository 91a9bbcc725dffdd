//! Compiled expressions
//!
//! An [`Expr`] is built once by [`ExprFactory`] (or by the mapper for the
//! conditional and object shapes) and evaluated against a scope per request.
//! Every variant is immutable after construction.

mod error;
mod factory;

pub use error::{CompileError, CompileResult};
pub use factory::{ExprFactory, ScriptExpr};

use crate::evaluator::EvalResult;
use crate::mapper::{ConditionalExpr, ObjectExpr};
use crate::model::{Scope, Value};
use crate::resolve::Resolution;
use std::fmt;
use std::sync::Arc;

/// A compiled, evaluable expression
#[derive(Clone)]
pub enum Expr {
    /// Fixed value captured at compile time
    Literal(Value),
    /// Bare reference delegated to a resolution
    Resolved(Arc<dyn Resolution>),
    /// Operators, function calls or ternaries over references
    Script(Box<ScriptExpr>),
    /// `if`/`then`/`else` mapping shape
    Conditional(Box<ConditionalExpr>),
    /// Nested object mapping
    Object(Box<ObjectExpr>),
}

impl Expr {
    /// Create a literal expression
    pub fn literal(value: impl Into<Value>) -> Self {
        Self::Literal(value.into())
    }

    /// Evaluate against a scope
    pub fn eval(&self, scope: &dyn Scope) -> EvalResult<Value> {
        match self {
            Self::Literal(value) => Ok(value.clone()),
            Self::Resolved(resolution) => Ok(resolution.get_value(scope)?),
            Self::Script(script) => script.eval(scope),
            Self::Conditional(conditional) => conditional.eval(scope),
            Self::Object(object) => object.eval(scope),
        }
    }
}

impl fmt::Debug for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Literal(value) => f.debug_tuple("Literal").field(value).finish(),
            Self::Resolved(resolution) => f.debug_tuple("Resolved").field(resolution).finish(),
            Self::Script(script) => f.debug_tuple("Script").field(&script.source()).finish(),
            Self::Conditional(conditional) => conditional.fmt(f),
            Self::Object(object) => object.fmt(f),
        }
    }
}
