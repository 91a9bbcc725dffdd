//! Tokenizer for mapping expressions
//!
//! Produces zero-copy slices for numbers, identifiers and references; string
//! literals are owned because escapes are applied while scanning.

use super::error::{ParseError, ParseResult};

/// Expression token
#[derive(Debug, Clone, PartialEq)]
pub enum Token<'input> {
    // Literals
    /// Integer literal (e.g., 42)
    Integer(i64),
    /// Decimal literal as string slice, parsed by the parser (e.g., 12.34)
    Decimal(&'input str),
    /// String literal with escapes applied (e.g., 'hello')
    String(String),
    /// Boolean literal true
    True,
    /// Boolean literal false
    False,
    /// Null literal
    Null,

    // Names
    /// Resolver reference including the leading `$` (e.g., `$.order.id`)
    Reference(&'input str),
    /// Possibly dotted identifier (e.g., `string.concat`)
    Identifier(&'input str),

    // Operators
    /// Addition operator (+)
    Plus,
    /// Subtraction operator (-)
    Minus,
    /// Multiplication operator (*)
    Multiply,
    /// Division operator (/)
    Divide,
    /// Remainder operator (%)
    Modulo,
    /// Equality operator (==)
    Equal,
    /// Inequality operator (!=)
    NotEqual,
    /// Less than operator (<)
    LessThan,
    /// Less than or equal operator (<=)
    LessThanOrEqual,
    /// Greater than operator (>)
    GreaterThan,
    /// Greater than or equal operator (>=)
    GreaterThanOrEqual,
    /// Logical AND operator (&&)
    And,
    /// Logical OR operator (||)
    Or,
    /// Logical NOT operator (!)
    Not,
    /// Ternary question mark (?)
    Question,
    /// Ternary colon (:)
    Colon,

    // Punctuation
    /// Left parenthesis (
    LeftParen,
    /// Right parenthesis )
    RightParen,
    /// Comma separator (,)
    Comma,
}

impl Token<'_> {
    /// Get keyword from string
    pub fn from_keyword(s: &str) -> Option<Token<'static>> {
        match s {
            "true" => Some(Token::True),
            "false" => Some(Token::False),
            "null" | "nil" => Some(Token::Null),
            _ => None,
        }
    }
}

/// Expression tokenizer
pub struct Tokenizer<'input> {
    input: &'input str,
    position: usize,
}

impl<'input> Tokenizer<'input> {
    /// Create a tokenizer over `input`
    pub fn new(input: &'input str) -> Self {
        Self { input, position: 0 }
    }

    /// Byte offset of the next unread character
    pub fn position(&self) -> usize {
        self.position
    }

    /// Tokenize the whole input
    pub fn tokenize_all(&mut self) -> ParseResult<Vec<(Token<'input>, usize)>> {
        let mut tokens = Vec::new();
        while let Some(token) = self.next_token()? {
            tokens.push(token);
        }
        Ok(tokens)
    }

    /// Read the next token and its start position, `None` at end of input
    pub fn next_token(&mut self) -> ParseResult<Option<(Token<'input>, usize)>> {
        self.skip_whitespace();

        let start = self.position;
        let Some(ch) = self.peek_char() else {
            return Ok(None);
        };

        let token = match ch {
            '0'..='9' => self.scan_number()?,
            '\'' | '"' => self.scan_string(ch)?,
            '$' => self.scan_reference(),
            c if is_identifier_start(c) => self.scan_identifier(),
            _ => self.scan_operator(ch)?,
        };

        Ok(Some((token, start)))
    }

    fn peek_char(&self) -> Option<char> {
        self.input[self.position..].chars().next()
    }

    fn peek_second(&self) -> Option<char> {
        self.input[self.position..].chars().nth(1)
    }

    fn bump(&mut self) -> Option<char> {
        let ch = self.peek_char()?;
        self.position += ch.len_utf8();
        Some(ch)
    }

    fn skip_whitespace(&mut self) {
        while self.peek_char().is_some_and(char::is_whitespace) {
            self.bump();
        }
    }

    fn eat_while(&mut self, predicate: impl Fn(char) -> bool) {
        while self.peek_char().is_some_and(&predicate) {
            self.bump();
        }
    }

    fn scan_number(&mut self) -> ParseResult<Token<'input>> {
        let start = self.position;
        self.eat_while(|c| c.is_ascii_digit());

        let is_decimal = self.peek_char() == Some('.')
            && self.peek_second().is_some_and(|c| c.is_ascii_digit());
        if is_decimal {
            self.bump();
            self.eat_while(|c| c.is_ascii_digit());
            return Ok(Token::Decimal(&self.input[start..self.position]));
        }

        let text = &self.input[start..self.position];
        text.parse::<i64>()
            .map(Token::Integer)
            .map_err(|_| ParseError::InvalidLiteral {
                literal_type: "integer".to_string(),
                value: text.to_string(),
                position: start,
            })
    }

    fn scan_string(&mut self, quote: char) -> ParseResult<Token<'input>> {
        let start = self.position;
        self.bump();

        let mut value = String::new();
        loop {
            match self.bump() {
                None => return Err(ParseError::UnclosedString { position: start }),
                Some(c) if c == quote => break,
                Some('\\') => {
                    let escape_at = self.position - 1;
                    let escaped = match self.bump() {
                        Some('n') => '\n',
                        Some('t') => '\t',
                        Some('r') => '\r',
                        Some('\\') => '\\',
                        Some('\'') => '\'',
                        Some('"') => '"',
                        Some(other) => {
                            return Err(ParseError::InvalidEscape {
                                sequence: format!("\\{other}"),
                                position: escape_at,
                            });
                        }
                        None => return Err(ParseError::UnclosedString { position: start }),
                    };
                    value.push(escaped);
                }
                Some(c) => value.push(c),
            }
        }

        Ok(Token::String(value))
    }

    fn scan_reference(&mut self) -> Token<'input> {
        let start = self.position;
        self.bump();
        self.eat_while(|c| c.is_alphanumeric() || matches!(c, '_' | '.' | '[' | ']'));
        Token::Reference(&self.input[start..self.position])
    }

    fn scan_identifier(&mut self) -> Token<'input> {
        let start = self.position;
        loop {
            self.eat_while(is_identifier_part);
            let continues = self.peek_char() == Some('.')
                && self.peek_second().is_some_and(is_identifier_start);
            if !continues {
                break;
            }
            self.bump();
        }

        let text = &self.input[start..self.position];
        Token::from_keyword(text).unwrap_or(Token::Identifier(text))
    }

    fn scan_operator(&mut self, ch: char) -> ParseResult<Token<'input>> {
        let start = self.position;
        self.bump();
        let next = self.peek_char();

        let (token, two_chars) = match (ch, next) {
            ('=', Some('=')) => (Token::Equal, true),
            ('!', Some('=')) => (Token::NotEqual, true),
            ('<', Some('=')) => (Token::LessThanOrEqual, true),
            ('>', Some('=')) => (Token::GreaterThanOrEqual, true),
            ('&', Some('&')) => (Token::And, true),
            ('|', Some('|')) => (Token::Or, true),
            ('!', _) => (Token::Not, false),
            ('<', _) => (Token::LessThan, false),
            ('>', _) => (Token::GreaterThan, false),
            ('+', _) => (Token::Plus, false),
            ('-', _) => (Token::Minus, false),
            ('*', _) => (Token::Multiply, false),
            ('/', _) => (Token::Divide, false),
            ('%', _) => (Token::Modulo, false),
            ('?', _) => (Token::Question, false),
            (':', _) => (Token::Colon, false),
            ('(', _) => (Token::LeftParen, false),
            (')', _) => (Token::RightParen, false),
            (',', _) => (Token::Comma, false),
            _ => {
                return Err(ParseError::UnexpectedToken {
                    token: ch.to_string(),
                    position: start,
                });
            }
        };

        if two_chars {
            self.bump();
        }
        Ok(token)
    }
}

fn is_identifier_start(c: char) -> bool {
    c.is_alphabetic() || c == '_'
}

fn is_identifier_part(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(input: &str) -> Vec<Token<'_>> {
        Tokenizer::new(input)
            .tokenize_all()
            .unwrap()
            .into_iter()
            .map(|(token, _)| token)
            .collect()
    }

    #[test]
    fn test_references_and_operators() {
        assert_eq!(
            tokens("$.order.total >= 10.5 && !$.flag"),
            vec![
                Token::Reference("$.order.total"),
                Token::GreaterThanOrEqual,
                Token::Decimal("10.5"),
                Token::And,
                Token::Not,
                Token::Reference("$.flag"),
            ]
        );
    }

    #[test]
    fn test_dotted_function_name() {
        assert_eq!(
            tokens("string.concat('a', \"b\")"),
            vec![
                Token::Identifier("string.concat"),
                Token::LeftParen,
                Token::String("a".to_string()),
                Token::Comma,
                Token::String("b".to_string()),
                Token::RightParen,
            ]
        );
    }

    #[test]
    fn test_string_escapes() {
        assert_eq!(tokens(r"'it\'s'"), vec![Token::String("it's".to_string())]);
        assert!(matches!(
            Tokenizer::new(r"'\q'").tokenize_all(),
            Err(ParseError::InvalidEscape { position: 1, .. })
        ));
        assert!(matches!(
            Tokenizer::new("'open").tokenize_all(),
            Err(ParseError::UnclosedString { position: 0 })
        ));
    }

    #[test]
    fn test_single_equals_is_rejected() {
        assert!(matches!(
            Tokenizer::new("1 = 1").tokenize_all(),
            Err(ParseError::UnexpectedToken { position: 2, .. })
        ));
    }
}
