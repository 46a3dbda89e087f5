//! Safe expression parsing boundary.
//!
//! Text from a query only becomes an [`Expr`] here: the input is normalised
//! (`^` → `**`, commas dropped) and handed to the engine's restricted grammar
//! together with the fixed `{x, y, z}` symbol table. Nothing is ever evaluated
//! as code and no other name can resolve.

use crate::engine::{Expr, SymbolTable, SymbolicEngine};
use crate::error::ParseError;
use std::sync::LazyLock;

/// The only names a query may use.
static ALLOWED_SYMBOLS: LazyLock<SymbolTable> = LazyLock::new(SymbolTable::standard);

pub fn allowed_symbols() -> &'static SymbolTable {
    &ALLOWED_SYMBOLS
}

/// `^` becomes `**` and thousands separators are removed.
pub fn preprocess(text: &str) -> String {
    text.replace('^', "**").replace(',', "")
}

pub struct SafeExpressionParser<'a, E: ?Sized> {
    engine: &'a E,
}

impl<'a, E: SymbolicEngine + ?Sized> SafeExpressionParser<'a, E> {
    pub fn new(engine: &'a E) -> Self {
        Self { engine }
    }

    pub fn parse(&self, text: &str) -> Result<Expr, ParseError> {
        self.engine.parse(&preprocess(text), allowed_symbols())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{PolyEngine, Symbol};

    fn parse(text: &str) -> Result<Expr, ParseError> {
        SafeExpressionParser::new(&PolyEngine).parse(text)
    }

    #[test]
    fn test_preprocess() {
        assert_eq!(preprocess("x^2 + 1,000"), "x**2 + 1000");
    }

    #[test]
    fn test_thousands_separator() {
        assert_eq!(parse("1,000").unwrap(), Expr::integer(1000));
    }

    #[test]
    fn test_only_xyz_resolve() {
        assert_eq!(parse("X").unwrap(), Expr::symbol(Symbol::X));
        for hostile in ["exp(1)", "sin(x)", "a + b", "pi", "eval"] {
            assert!(
                matches!(parse(hostile), Err(ParseError::UnknownIdentifier { .. })),
                "expected rejection for {}",
                hostile
            );
        }
        assert!(parse("__import__('os')").is_err());
        assert!(matches!(
            parse("x; y"),
            Err(ParseError::InvalidCharacter { ch: ';', .. })
        ));
    }

    #[test]
    fn test_implicit_multiplication_forms() {
        for (implicit, explicit) in [
            ("2x", "2*x"),
            ("xy", "x*y"),
            ("2(x + 1)", "2*(x + 1)"),
            ("(x)(y)", "x*y"),
            ("x(y)", "x*y"),
        ] {
            assert_eq!(parse(implicit).unwrap(), parse(explicit).unwrap());
        }
    }
}
