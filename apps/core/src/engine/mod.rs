//! # Engine Module
//!
//! Symbolic mathematics behind the resolver.
//!
//! ## Components
//! - `expr`: Expression tree and the closed variable vocabulary
//! - `lexer` / `parser`: Restricted grammar, the only way to build an `Expr` from text
//! - `poly` / `rational`: Canonical form over ℚ(x, y, z)
//! - `simplify`, `diff`, `integrate`, `factor`, `solve`, `numeric`: Operations
//! - `display`: Human-facing rendering
//!
//! The resolver only talks to the [`SymbolicEngine`] trait; [`PolyEngine`] is
//! the bundled implementation.

pub mod diff;
pub mod display;
pub mod expr;
pub mod factor;
pub mod integrate;
mod lexer;
pub mod numeric;
pub mod parser;
pub mod poly;
pub mod rational;
mod roots;
pub mod simplify;
pub mod solve;

pub use expr::{Expr, Symbol, SymbolTable};
pub use solve::Solution;

use crate::error::{MathError, ParseError};

/// Defines the symbolic capabilities the resolver dispatches to.
///
/// Implementations must be pure: the same input always yields the same output,
/// and no call may panic on any `Expr` the parser can produce.
pub trait SymbolicEngine: Send + Sync {
    /// Builds an expression from text, resolving names only through `symbols`.
    fn parse(&self, text: &str, symbols: &SymbolTable) -> Result<Expr, ParseError>;

    fn differentiate(&self, expr: &Expr, var: Symbol) -> Result<Expr, MathError>;

    /// Antiderivative without the constant of integration.
    fn integrate(&self, expr: &Expr, var: Symbol) -> Result<Expr, MathError>;

    fn simplify(&self, expr: &Expr) -> Result<Expr, MathError>;

    fn factor(&self, expr: &Expr) -> Result<Expr, MathError>;

    fn expand(&self, expr: &Expr) -> Result<Expr, MathError>;

    /// Solves `expr = 0` for `symbols`. An empty list means no solutions.
    fn solve(&self, expr: &Expr, symbols: &[Symbol]) -> Result<Vec<Solution>, MathError>;

    /// Fails with [`MathError::NotNumeric`] when `expr` has free symbols or no
    /// finite real value.
    fn numeric_evaluate(&self, expr: &Expr) -> Result<f64, MathError>;
}

/// Exact engine over rational functions in `x, y, z`.
#[derive(Debug, Clone, Copy, Default)]
pub struct PolyEngine;

impl SymbolicEngine for PolyEngine {
    fn parse(&self, text: &str, symbols: &SymbolTable) -> Result<Expr, ParseError> {
        parser::parse(text, symbols)
    }

    fn differentiate(&self, expr: &Expr, var: Symbol) -> Result<Expr, MathError> {
        diff::differentiate(expr, var)
    }

    fn integrate(&self, expr: &Expr, var: Symbol) -> Result<Expr, MathError> {
        integrate::integrate(expr, var)
    }

    fn simplify(&self, expr: &Expr) -> Result<Expr, MathError> {
        simplify::simplify(expr)
    }

    fn factor(&self, expr: &Expr) -> Result<Expr, MathError> {
        factor::factor(expr)
    }

    fn expand(&self, expr: &Expr) -> Result<Expr, MathError> {
        simplify::expand(expr)
    }

    fn solve(&self, expr: &Expr, symbols: &[Symbol]) -> Result<Vec<Solution>, MathError> {
        solve::solve(expr, symbols)
    }

    fn numeric_evaluate(&self, expr: &Expr) -> Result<f64, MathError> {
        numeric::evaluate(expr)
    }
}
