//! Mapping expression evaluator
//!
//! Walks a parsed [`ExpressionNode`](crate::ast::ExpressionNode) against a
//! scope. References are looked up in a table of resolutions built when the
//! expression was compiled; function calls go through the registry's
//! coercion adapter.

mod arithmetic;
mod comparison;
mod engine;
mod error;

pub use arithmetic::ArithmeticEvaluator;
pub use comparison::ComparisonEvaluator;
pub use engine::{Evaluator, ResolutionTable};
pub use error::{EvalError, EvalResult};
