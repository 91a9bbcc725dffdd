//! Mapping expression parser
//!
//! Converts expression source (the text after a mapping's leading `=`) into
//! an [`ExpressionNode`](crate::ast::ExpressionNode) tree.

pub mod error;
pub mod pratt;
pub mod tokenizer;

pub use error::{ParseError, ParseResult};
pub use pratt::{PrattParser, Precedence, parse_expression_pratt};
pub use tokenizer::{Token, Tokenizer};

/// Parse an expression string into an AST
pub fn parse(input: &str) -> ParseResult<crate::ast::ExpressionNode> {
    parse_expression_pratt(input)
}
