//! Tokenizer for the restricted expression grammar.
//!
//! Only decimal literals, identifiers known to the [`SymbolTable`], the
//! operators `+ - * / ** ^` and parentheses are accepted.

use crate::engine::expr::{Symbol, SymbolTable};
use crate::error::ParseError;
use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{One, Pow};

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Token {
    Number(BigRational),
    Symbol(Symbol),
    Plus,
    Minus,
    Star,
    Slash,
    Power,
    LeftParen,
    RightParen,
}

impl Token {
    pub(crate) fn describe(&self) -> String {
        match self {
            Token::Number(n) => format!("number {}", n),
            Token::Symbol(s) => format!("variable '{}'", s),
            Token::Plus => "'+'".to_string(),
            Token::Minus => "'-'".to_string(),
            Token::Star => "'*'".to_string(),
            Token::Slash => "'/'".to_string(),
            Token::Power => "'**'".to_string(),
            Token::LeftParen => "'('".to_string(),
            Token::RightParen => "')'".to_string(),
        }
    }
}

pub(crate) fn lex(input: &str, table: &SymbolTable) -> Result<Vec<Token>, ParseError> {
    let chars: Vec<char> = input.chars().collect();
    let mut tokens = Vec::with_capacity(chars.len());
    let mut pos = 0;

    while pos < chars.len() {
        let ch = chars[pos];
        match ch {
            c if c.is_whitespace() => pos += 1,
            c if c.is_ascii_digit() || c == '.' => {
                let start = pos;
                while pos < chars.len() && (chars[pos].is_ascii_digit() || chars[pos] == '.') {
                    pos += 1;
                }
                if let Some(len) = exponent_suffix_len(&chars[pos..]) {
                    let literal: String = chars[start..pos + len].iter().collect();
                    return Err(ParseError::InvalidNumber {
                        value: literal,
                        position: start + 1,
                    });
                }
                let literal: String = chars[start..pos].iter().collect();
                tokens.push(Token::Number(parse_decimal(&literal, start + 1)?));
            }
            c if c.is_alphabetic() => {
                let start = pos;
                while pos < chars.len() && chars[pos].is_alphabetic() {
                    pos += 1;
                }
                let word: String = chars[start..pos].iter().collect();
                tokens.extend(resolve_word(&word, start + 1, table)?);
            }
            '*' if chars.get(pos + 1) == Some(&'*') => {
                tokens.push(Token::Power);
                pos += 2;
            }
            '^' => {
                tokens.push(Token::Power);
                pos += 1;
            }
            '*' => {
                tokens.push(Token::Star);
                pos += 1;
            }
            '/' => {
                tokens.push(Token::Slash);
                pos += 1;
            }
            '+' => {
                tokens.push(Token::Plus);
                pos += 1;
            }
            '-' => {
                tokens.push(Token::Minus);
                pos += 1;
            }
            '(' => {
                tokens.push(Token::LeftParen);
                pos += 1;
            }
            ')' => {
                tokens.push(Token::RightParen);
                pos += 1;
            }
            other => {
                return Err(ParseError::InvalidCharacter {
                    ch: other,
                    position: pos + 1,
                })
            }
        }
    }

    Ok(tokens)
}

/// A word is either a name in the table or a run of single-letter names (`xy` → `x`, `y`).
fn resolve_word(word: &str, position: usize, table: &SymbolTable) -> Result<Vec<Token>, ParseError> {
    if let Some(symbol) = table.resolve(word) {
        return Ok(vec![Token::Symbol(symbol)]);
    }

    let mut buf = [0u8; 4];
    word.chars()
        .map(|c| table.resolve(c.encode_utf8(&mut buf)).map(Token::Symbol))
        .collect::<Option<Vec<_>>>()
        .ok_or_else(|| ParseError::UnknownIdentifier {
            name: word.to_string(),
            position,
        })
}

/// Length of an `e3` / `E-2` suffix, which is not part of the grammar.
fn exponent_suffix_len(rest: &[char]) -> Option<usize> {
    if !matches!(rest.first(), Some('e' | 'E')) {
        return None;
    }
    let sign = usize::from(matches!(rest.get(1), Some('+' | '-')));
    let digits = rest[1 + sign..]
        .iter()
        .take_while(|c| c.is_ascii_digit())
        .count();
    (digits > 0).then_some(1 + sign + digits)
}

/// Exact decimal: `12.5` → 25/2.
fn parse_decimal(literal: &str, position: usize) -> Result<BigRational, ParseError> {
    let invalid = || ParseError::InvalidNumber {
        value: literal.to_string(),
        position,
    };

    let (int_part, frac_part) = match literal.split_once('.') {
        Some((_, frac)) if frac.contains('.') => return Err(invalid()),
        Some((int, frac)) => (int, frac),
        None => (literal, ""),
    };
    if int_part.is_empty() && frac_part.is_empty() {
        return Err(invalid());
    }

    let digits = format!("{}{}", int_part, frac_part);
    let numer: BigInt = digits.parse().map_err(|_| invalid())?;
    let denom = if frac_part.is_empty() {
        BigInt::one()
    } else {
        BigInt::from(10u32).pow(frac_part.len() as u32)
    };
    Ok(BigRational::new(numer, denom))
}

/// Check if implicit multiplication should be inserted between two tokens
fn should_insert_mul(current: &Token, next: &Token) -> bool {
    // 2x, xy, )x, 2(, x(, )(, x2, )2
    matches!(
        (current, next),
        (
            Token::Number(_) | Token::Symbol(_) | Token::RightParen,
            Token::Symbol(_) | Token::LeftParen
        ) | (Token::Symbol(_) | Token::RightParen, Token::Number(_))
    )
}

/// Insert `*` wherever multiplication is written by juxtaposition.
pub(crate) fn insert_implicit_multiplication(tokens: Vec<Token>) -> Vec<Token> {
    if !tokens.windows(2).any(|w| should_insert_mul(&w[0], &w[1])) {
        return tokens;
    }

    let mut result = Vec::with_capacity(tokens.len() * 3 / 2);
    let mut it = tokens.into_iter().peekable();
    while let Some(token) = it.next() {
        let insert = it.peek().is_some_and(|next| should_insert_mul(&token, next));
        result.push(token);
        if insert {
            result.push(Token::Star);
        }
    }
    result
}
