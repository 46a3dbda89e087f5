//! Pratt parser for the restricted grammar.
//!
//! Pipeline: validate -> lex -> implicit multiplication -> parse.

use crate::engine::expr::{Expr, SymbolTable};
use crate::engine::lexer::{insert_implicit_multiplication, lex, Token};
use crate::error::ParseError;

/// Nesting limit for parentheses and unary operators.
pub const MAX_DEPTH: usize = 200;

const ADDITIVE: u8 = 10;
const MULTIPLICATIVE: u8 = 20;
const UNARY: u8 = 25;
const POWER: u8 = 30;

/// Parse `input` into an expression, resolving names only through `symbols`.
pub fn parse(input: &str, symbols: &SymbolTable) -> Result<Expr, ParseError> {
    if input.trim().is_empty() {
        return Err(ParseError::Empty);
    }

    let tokens = insert_implicit_multiplication(lex(input, symbols)?);
    let mut parser = Parser {
        tokens: &tokens,
        pos: 0,
        depth: 0,
    };
    let expr = parser.parse_expr(0)?;

    match parser.current() {
        None => Ok(expr),
        Some(token) => Err(ParseError::UnexpectedToken {
            expected: "an operator or end of input".to_string(),
            found: token.describe(),
        }),
    }
}

struct Parser<'a> {
    tokens: &'a [Token],
    pos: usize,
    depth: usize,
}

impl<'a> Parser<'a> {
    fn current(&self) -> Option<&'a Token> {
        self.tokens.get(self.pos)
    }

    fn advance(&mut self) {
        self.pos += 1;
    }

    fn enter(&mut self) -> Result<(), ParseError> {
        self.depth += 1;
        if self.depth > MAX_DEPTH {
            return Err(ParseError::MaxDepthExceeded(MAX_DEPTH));
        }
        Ok(())
    }

    fn parse_expr(&mut self, min_precedence: u8) -> Result<Expr, ParseError> {
        self.enter()?;
        let mut left = self.parse_prefix()?;

        while let Some(token) = self.current() {
            let (precedence, right_assoc) = match token {
                Token::Plus | Token::Minus => (ADDITIVE, false),
                Token::Star | Token::Slash => (MULTIPLICATIVE, false),
                Token::Power => (POWER, true),
                _ => break,
            };
            if precedence < min_precedence {
                break;
            }

            self.advance();
            let next_min = if right_assoc { precedence } else { precedence + 1 };
            let right = self.parse_expr(next_min)?;
            left = match token {
                Token::Plus => Expr::add(left, right),
                Token::Minus => Expr::sub(left, right),
                Token::Star => Expr::mul(left, right),
                Token::Slash => Expr::div(left, right),
                _ => Expr::pow(left, right),
            };
        }

        self.depth -= 1;
        Ok(left)
    }

    fn parse_prefix(&mut self) -> Result<Expr, ParseError> {
        let token = self.current().ok_or(ParseError::UnexpectedEndOfInput)?;

        match token {
            Token::Number(n) => {
                self.advance();
                Ok(Expr::number(n.clone()))
            }
            Token::Symbol(s) => {
                self.advance();
                Ok(Expr::symbol(*s))
            }
            Token::Minus => {
                self.advance();
                Ok(Expr::neg(self.parse_expr(UNARY)?))
            }
            Token::Plus => {
                self.advance();
                self.parse_expr(UNARY)
            }
            Token::LeftParen => {
                self.advance();
                let inner = self.parse_expr(0)?;
                match self.current() {
                    Some(Token::RightParen) => {
                        self.advance();
                        Ok(inner)
                    }
                    Some(other) => Err(ParseError::UnexpectedToken {
                        expected: "')'".to_string(),
                        found: other.describe(),
                    }),
                    None => Err(ParseError::UnexpectedToken {
                        expected: "')'".to_string(),
                        found: "end of input".to_string(),
                    }),
                }
            }
            other => Err(ParseError::UnexpectedToken {
                expected: "a number, variable or '('".to_string(),
                found: other.describe(),
            }),
        }
    }
}
