//! Expression AST node definitions

use super::operator::{BinaryOperator, UnaryOperator};
use crate::model::Value;
use rust_decimal::Decimal;
use smallvec::SmallVec;

/// AST representation of mapping expressions
///
/// Large variants are boxed to keep the enum small.
#[derive(Debug, Clone, PartialEq)]
pub enum ExpressionNode {
    /// Literal value (string, number, boolean, null)
    Literal(LiteralValue),

    /// Resolver reference, kept verbatim including the leading `$` (e.g. `$.order.id`)
    Reference(String),

    /// Binary operation (arithmetic, comparison, logical)
    BinaryOp(Box<BinaryOpData>),

    /// Unary operation (negation, not)
    UnaryOp {
        /// The operator
        op: UnaryOperator,
        /// The operand
        operand: Box<ExpressionNode>,
    },

    /// Registry function call (`string.concat(a, b)`)
    FunctionCall(Box<FunctionCallData>),

    /// Ternary conditional (`cond ? a : b`)
    Conditional(Box<ConditionalData>),
}

/// Binary operation data
#[derive(Debug, Clone, PartialEq)]
pub struct BinaryOpData {
    /// The operator
    pub op: BinaryOperator,
    /// Left operand
    pub left: ExpressionNode,
    /// Right operand
    pub right: ExpressionNode,
}

/// Function call data
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionCallData {
    /// Qualified function name
    pub name: String,
    /// Function arguments
    pub args: SmallVec<[ExpressionNode; 4]>,
}

/// Ternary conditional data
#[derive(Debug, Clone, PartialEq)]
pub struct ConditionalData {
    /// Condition
    pub condition: ExpressionNode,
    /// Then branch
    pub then_expr: ExpressionNode,
    /// Else branch
    pub else_expr: ExpressionNode,
}

/// Literal values in mapping expressions
#[derive(Debug, Clone, PartialEq)]
pub enum LiteralValue {
    /// `null`
    Null,
    /// `true` / `false`
    Boolean(bool),
    /// Integer literal
    Integer(i64),
    /// Decimal literal
    Decimal(Decimal),
    /// Quoted string literal, escapes already applied
    String(String),
}

impl LiteralValue {
    /// Convert to a runtime value
    pub fn to_value(&self) -> Value {
        match self {
            Self::Null => Value::Null,
            Self::Boolean(b) => Value::Boolean(*b),
            Self::Integer(i) => Value::Integer(*i),
            Self::Decimal(d) => Value::Decimal(*d),
            Self::String(s) => Value::String(s.clone()),
        }
    }
}

impl ExpressionNode {
    /// Create a literal node
    pub fn literal(value: LiteralValue) -> Self {
        Self::Literal(value)
    }

    /// Create a binary operation node
    pub fn binary(op: BinaryOperator, left: ExpressionNode, right: ExpressionNode) -> Self {
        Self::BinaryOp(Box::new(BinaryOpData { op, left, right }))
    }

    /// Create a unary operation node
    pub fn unary(op: UnaryOperator, operand: ExpressionNode) -> Self {
        Self::UnaryOp {
            op,
            operand: Box::new(operand),
        }
    }

    /// Create a function call node
    pub fn function_call(name: impl Into<String>, args: SmallVec<[ExpressionNode; 4]>) -> Self {
        Self::FunctionCall(Box::new(FunctionCallData {
            name: name.into(),
            args,
        }))
    }

    /// Create a ternary conditional node
    pub fn conditional(
        condition: ExpressionNode,
        then_expr: ExpressionNode,
        else_expr: ExpressionNode,
    ) -> Self {
        Self::Conditional(Box::new(ConditionalData {
            condition,
            then_expr,
            else_expr,
        }))
    }

    /// Visit every node depth-first, parents before children
    pub fn walk<'a>(&'a self, visit: &mut dyn FnMut(&'a ExpressionNode)) {
        visit(self);
        match self {
            Self::Literal(_) | Self::Reference(_) => {}
            Self::BinaryOp(data) => {
                data.left.walk(visit);
                data.right.walk(visit);
            }
            Self::UnaryOp { operand, .. } => operand.walk(visit),
            Self::FunctionCall(data) => {
                for arg in &data.args {
                    arg.walk(visit);
                }
            }
            Self::Conditional(data) => {
                data.condition.walk(visit);
                data.then_expr.walk(visit);
                data.else_expr.walk(visit);
            }
        }
    }
}
