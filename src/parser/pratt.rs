//! Pratt parser for mapping expressions

use super::error::{ParseError, ParseResult};
use super::tokenizer::{Token, Tokenizer};
use crate::ast::{BinaryOperator, ExpressionNode, LiteralValue, UnaryOperator};
use rust_decimal::Decimal;
use smallvec::SmallVec;
use std::str::FromStr;

/// Operator precedence levels (higher = tighter binding)
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Precedence {
    /// Lowest precedence - ternary conditional (right associative)
    Ternary = 1,
    /// Logical OR
    Or = 2,
    /// Logical AND
    And = 3,
    /// Equality operators (==, !=)
    Equality = 4,
    /// Ordering operators (<, >, <=, >=)
    Comparison = 5,
    /// Additive operators (+, -)
    Additive = 6,
    /// Multiplicative operators (*, /, %)
    Multiplicative = 7,
    /// Prefix operators (!, -)
    Unary = 8,
}

impl Precedence {
    /// Get the next higher precedence level for left-associative operators
    pub const fn next_level(self) -> Self {
        match self {
            Precedence::Ternary => Precedence::Or,
            Precedence::Or => Precedence::And,
            Precedence::And => Precedence::Equality,
            Precedence::Equality => Precedence::Comparison,
            Precedence::Comparison => Precedence::Additive,
            Precedence::Additive => Precedence::Multiplicative,
            Precedence::Multiplicative => Precedence::Unary,
            Precedence::Unary => Precedence::Unary,
        }
    }
}

/// Binary operator and precedence for an infix token
fn binary_operator(token: &Token<'_>) -> Option<(BinaryOperator, Precedence)> {
    let entry = match token {
        Token::Equal => (BinaryOperator::Equal, Precedence::Equality),
        Token::NotEqual => (BinaryOperator::NotEqual, Precedence::Equality),
        Token::And => (BinaryOperator::And, Precedence::And),
        Token::Or => (BinaryOperator::Or, Precedence::Or),
        Token::Plus => (BinaryOperator::Add, Precedence::Additive),
        Token::Minus => (BinaryOperator::Subtract, Precedence::Additive),
        Token::Multiply => (BinaryOperator::Multiply, Precedence::Multiplicative),
        Token::Divide => (BinaryOperator::Divide, Precedence::Multiplicative),
        Token::Modulo => (BinaryOperator::Modulo, Precedence::Multiplicative),
        Token::LessThan => (BinaryOperator::LessThan, Precedence::Comparison),
        Token::LessThanOrEqual => (BinaryOperator::LessThanOrEqual, Precedence::Comparison),
        Token::GreaterThan => (BinaryOperator::GreaterThan, Precedence::Comparison),
        Token::GreaterThanOrEqual => (BinaryOperator::GreaterThanOrEqual, Precedence::Comparison),
        _ => return None,
    };
    Some(entry)
}

/// Precedence-climbing parser over a token stream
pub struct PrattParser<'input> {
    tokenizer: Tokenizer<'input>,
    current_token: Option<(Token<'input>, usize)>,
}

impl<'input> PrattParser<'input> {
    /// Create new parser
    pub fn new(input: &'input str) -> Self {
        Self {
            tokenizer: Tokenizer::new(input),
            current_token: None,
        }
    }

    /// Parse the complete input into a single expression
    pub fn parse(&mut self) -> ParseResult<ExpressionNode> {
        self.advance()?;
        if self.current_token.is_none() {
            return Err(ParseError::EmptyExpression);
        }

        let expression = self.parse_expression(Precedence::Ternary)?;

        match self.current_token.take() {
            None => Ok(expression),
            Some((token, position)) => Err(ParseError::UnexpectedToken {
                token: format!("{token:?}"),
                position,
            }),
        }
    }

    fn advance(&mut self) -> ParseResult<()> {
        self.current_token = self.tokenizer.next_token()?;
        Ok(())
    }

    fn current(&self) -> Option<&Token<'input>> {
        self.current_token.as_ref().map(|(token, _)| token)
    }

    fn current_position(&self) -> usize {
        self.current_token
            .as_ref()
            .map_or(self.tokenizer.position(), |(_, position)| *position)
    }

    fn expect(&mut self, expected: Token<'input>, description: &str) -> ParseResult<()> {
        match self.current() {
            Some(token) if *token == expected => self.advance(),
            _ => Err(ParseError::ExpectedToken {
                expected: description.to_string(),
                position: self.current_position(),
            }),
        }
    }

    fn parse_expression(&mut self, min_precedence: Precedence) -> ParseResult<ExpressionNode> {
        let mut left = self.parse_unary()?;

        while let Some(token) = self.current() {
            if *token == Token::Question {
                // Ternary binds loosest and associates to the right
                if min_precedence > Precedence::Ternary {
                    break;
                }
                self.advance()?;
                let then_expr = self.parse_expression(Precedence::Ternary)?;
                self.expect(Token::Colon, "':' in conditional expression")?;
                let else_expr = self.parse_expression(Precedence::Ternary)?;
                left = ExpressionNode::conditional(left, then_expr, else_expr);
                continue;
            }

            let (op, precedence) = match binary_operator(token) {
                Some((op, precedence)) if precedence >= min_precedence => (op, precedence),
                _ => break,
            };

            self.advance()?;
            let right = self.parse_expression(precedence.next_level())?;
            left = ExpressionNode::binary(op, left, right);
        }

        Ok(left)
    }

    fn parse_unary(&mut self) -> ParseResult<ExpressionNode> {
        match self.current() {
            Some(Token::Not) => {
                self.advance()?;
                let operand = self.parse_unary()?;
                Ok(ExpressionNode::unary(UnaryOperator::Not, operand))
            }
            Some(Token::Minus) => {
                self.advance()?;
                let operand = self.parse_unary()?;
                // Fold negative numeric literals so `-5` stays a literal
                Ok(match operand {
                    ExpressionNode::Literal(LiteralValue::Integer(i)) => {
                        ExpressionNode::literal(LiteralValue::Integer(-i))
                    }
                    ExpressionNode::Literal(LiteralValue::Decimal(d)) => {
                        ExpressionNode::literal(LiteralValue::Decimal(-d))
                    }
                    other => ExpressionNode::unary(UnaryOperator::Negate, other),
                })
            }
            _ => self.parse_primary(),
        }
    }

    fn parse_primary(&mut self) -> ParseResult<ExpressionNode> {
        let Some((token, position)) = self.current_token.take() else {
            return Err(ParseError::UnexpectedEof);
        };

        let node = match token {
            Token::Integer(i) => ExpressionNode::literal(LiteralValue::Integer(i)),
            Token::Decimal(text) => {
                let value = Decimal::from_str(text).map_err(|_| ParseError::InvalidLiteral {
                    literal_type: "decimal".to_string(),
                    value: text.to_string(),
                    position,
                })?;
                ExpressionNode::literal(LiteralValue::Decimal(value))
            }
            Token::String(value) => ExpressionNode::literal(LiteralValue::String(value)),
            Token::True => ExpressionNode::literal(LiteralValue::Boolean(true)),
            Token::False => ExpressionNode::literal(LiteralValue::Boolean(false)),
            Token::Null => ExpressionNode::literal(LiteralValue::Null),
            Token::Reference(reference) => ExpressionNode::Reference(reference.to_string()),
            Token::Identifier(name) => {
                self.advance()?;
                if self.current() != Some(&Token::LeftParen) {
                    return Err(ParseError::BareIdentifier {
                        identifier: name.to_string(),
                        position,
                    });
                }
                return self.parse_call(name);
            }
            Token::LeftParen => {
                self.advance()?;
                let inner = self.parse_expression(Precedence::Ternary)?;
                self.expect(Token::RightParen, "')'")?;
                return Ok(inner);
            }
            other => {
                return Err(ParseError::UnexpectedToken {
                    token: format!("{other:?}"),
                    position,
                });
            }
        };

        self.advance()?;
        Ok(node)
    }

    /// Parse `(arg, ...)` after a function name; the current token is `(`
    fn parse_call(&mut self, name: &str) -> ParseResult<ExpressionNode> {
        self.advance()?;
        let mut args = SmallVec::new();

        if self.current() == Some(&Token::RightParen) {
            self.advance()?;
            return Ok(ExpressionNode::function_call(name, args));
        }

        loop {
            args.push(self.parse_expression(Precedence::Ternary)?);
            match self.current() {
                Some(Token::Comma) => self.advance()?,
                Some(Token::RightParen) => {
                    self.advance()?;
                    break;
                }
                _ => {
                    return Err(ParseError::ExpectedToken {
                        expected: format!("',' or ')' in call to {name}"),
                        position: self.current_position(),
                    });
                }
            }
        }

        Ok(ExpressionNode::function_call(name, args))
    }
}

/// Parse an expression source string into an AST
pub fn parse_expression_pratt(input: &str) -> ParseResult<ExpressionNode> {
    let mut parser = PrattParser::new(input);
    parser.parse()
}
