//! Abstract Syntax Tree (AST) definitions for mapping expressions

mod expression;
mod operator;

pub use expression::*;
pub use operator::*;
