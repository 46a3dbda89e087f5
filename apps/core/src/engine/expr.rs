//! Expression tree shared by the parser, the engine and the resolver.

use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{One, Signed, Zero};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use std::fmt;

/// The closed variable vocabulary. No other identifier can be represented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Symbol {
    X,
    Y,
    Z,
}

impl Symbol {
    pub const ALL: [Symbol; 3] = [Symbol::X, Symbol::Y, Symbol::Z];

    pub fn name(self) -> &'static str {
        match self {
            Symbol::X => "x",
            Symbol::Y => "y",
            Symbol::Z => "z",
        }
    }

    /// Slot of this symbol inside a polynomial monomial.
    pub fn index(self) -> usize {
        match self {
            Symbol::X => 0,
            Symbol::Y => 1,
            Symbol::Z => 2,
        }
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Names the parser is allowed to resolve. Anything absent is rejected.
#[derive(Debug, Clone, Default)]
pub struct SymbolTable {
    names: HashMap<String, Symbol>,
}

impl SymbolTable {
    /// An empty table: every identifier is rejected.
    pub fn new() -> Self {
        Self::default()
    }

    /// `x`, `y`, `z` in either case.
    pub fn standard() -> Self {
        Symbol::ALL.iter().fold(Self::new(), |table, symbol| {
            table
                .with(symbol.name(), *symbol)
                .with(&symbol.name().to_uppercase(), *symbol)
        })
    }

    pub fn with(mut self, name: &str, symbol: Symbol) -> Self {
        self.names.insert(name.to_string(), symbol);
        self
    }

    pub fn resolve(&self, name: &str) -> Option<Symbol> {
        self.names.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// Symbolic expression handle.
///
/// `Sqrt`, `Log` and `ImaginaryUnit` are only ever produced by the engine
/// (solutions and antiderivatives); the parser cannot build them.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Number(BigRational),
    Symbol(Symbol),
    Add(Box<Expr>, Box<Expr>),
    Sub(Box<Expr>, Box<Expr>),
    Mul(Box<Expr>, Box<Expr>),
    Div(Box<Expr>, Box<Expr>),
    Pow(Box<Expr>, Box<Expr>),
    Neg(Box<Expr>),
    Sqrt(Box<Expr>),
    Log(Box<Expr>),
    ImaginaryUnit,
}

impl Expr {
    pub fn integer(n: i64) -> Self {
        Expr::Number(BigRational::from_integer(BigInt::from(n)))
    }

    pub fn number(value: BigRational) -> Self {
        Expr::Number(value)
    }

    pub fn symbol(symbol: Symbol) -> Self {
        Expr::Symbol(symbol)
    }

    pub fn add(left: Expr, right: Expr) -> Self {
        Expr::Add(Box::new(left), Box::new(right))
    }

    pub fn sub(left: Expr, right: Expr) -> Self {
        Expr::Sub(Box::new(left), Box::new(right))
    }

    pub fn mul(left: Expr, right: Expr) -> Self {
        Expr::Mul(Box::new(left), Box::new(right))
    }

    pub fn div(left: Expr, right: Expr) -> Self {
        Expr::Div(Box::new(left), Box::new(right))
    }

    pub fn pow(base: Expr, exponent: Expr) -> Self {
        Expr::Pow(Box::new(base), Box::new(exponent))
    }

    pub fn neg(inner: Expr) -> Self {
        Expr::Neg(Box::new(inner))
    }

    pub fn sqrt(inner: Expr) -> Self {
        Expr::Sqrt(Box::new(inner))
    }

    pub fn log(inner: Expr) -> Self {
        Expr::Log(Box::new(inner))
    }

    pub fn as_number(&self) -> Option<&BigRational> {
        match self {
            Expr::Number(n) => Some(n),
            _ => None,
        }
    }

    pub fn is_zero(&self) -> bool {
        self.as_number().is_some_and(Zero::is_zero)
    }

    pub fn is_one(&self) -> bool {
        self.as_number().is_some_and(One::is_one)
    }

    pub fn is_negative_number(&self) -> bool {
        self.as_number().is_some_and(Signed::is_negative)
    }

    /// Direct sub-expressions, left to right.
    pub fn children(&self) -> Vec<&Expr> {
        match self {
            Expr::Number(_) | Expr::Symbol(_) | Expr::ImaginaryUnit => Vec::new(),
            Expr::Add(a, b)
            | Expr::Sub(a, b)
            | Expr::Mul(a, b)
            | Expr::Div(a, b)
            | Expr::Pow(a, b) => vec![&**a, &**b],
            Expr::Neg(a) | Expr::Sqrt(a) | Expr::Log(a) => vec![&**a],
        }
    }

    /// Free symbols in `x, y, z` order, without duplicates.
    pub fn free_symbols(&self) -> Vec<Symbol> {
        let mut found = BTreeSet::new();
        self.collect_symbols(&mut found);
        found.into_iter().collect()
    }

    fn collect_symbols(&self, found: &mut BTreeSet<Symbol>) {
        if let Expr::Symbol(s) = self {
            found.insert(*s);
        }
        for child in self.children() {
            child.collect_symbols(found);
        }
    }

    pub fn contains_symbol(&self, symbol: Symbol) -> bool {
        match self {
            Expr::Symbol(s) => *s == symbol,
            _ => self.children().iter().any(|c| c.contains_symbol(symbol)),
        }
    }

    /// Depth of the tree; a leaf has depth 1.
    pub fn depth(&self) -> usize {
        1 + self
            .children()
            .iter()
            .map(|c| c.depth())
            .max()
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_table_resolves_both_cases() {
        let table = SymbolTable::standard();
        assert_eq!(table.resolve("x"), Some(Symbol::X));
        assert_eq!(table.resolve("Y"), Some(Symbol::Y));
        assert_eq!(table.resolve("z"), Some(Symbol::Z));
        assert_eq!(table.resolve("sin"), None);
        assert_eq!(table.resolve("a"), None);
        assert_eq!(table.len(), 6);
    }

    #[test]
    fn test_free_symbols_sorted_and_unique() {
        let expr = Expr::add(
            Expr::mul(Expr::symbol(Symbol::Z), Expr::symbol(Symbol::X)),
            Expr::pow(Expr::symbol(Symbol::X), Expr::integer(2)),
        );
        assert_eq!(expr.free_symbols(), vec![Symbol::X, Symbol::Z]);
        assert!(expr.contains_symbol(Symbol::Z));
        assert!(!expr.contains_symbol(Symbol::Y));
    }

    #[test]
    fn test_number_predicates() {
        assert!(Expr::integer(0).is_zero());
        assert!(Expr::integer(1).is_one());
        assert!(Expr::integer(-4).is_negative_number());
        assert!(!Expr::symbol(Symbol::X).is_zero());
        assert_eq!(Expr::add(Expr::integer(1), Expr::integer(2)).depth(), 2);
    }
}
