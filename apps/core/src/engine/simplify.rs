//! Simplification and expansion.
//!
//! Expressions inside ℚ(x, y, z) go through the canonical [`RatFunc`] form.
//! Anything else (`x^y`, `x^(1/2)`, roots and logarithms produced by the
//! engine) is rewritten structurally, with each rational sub-tree still
//! brought into canonical form.

use crate::engine::expr::Expr;
use crate::engine::rational::{LowerError, RatFunc};
use crate::error::MathError;
use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{One, Signed, Zero};
use tracing::debug;

pub fn simplify(expr: &Expr) -> Result<Expr, MathError> {
    match RatFunc::from_expr(expr) {
        Ok(canonical) => Ok(canonical.to_expr()),
        Err(LowerError::Failed(err)) => Err(err),
        Err(LowerError::NonRational(reason)) => {
            debug!(reason, "falling back to structural simplification");
            structural(expr)
        }
    }
}

/// Canonical form already multiplies out every product and power, so
/// expansion and simplification share one normal form.
pub fn expand(expr: &Expr) -> Result<Expr, MathError> {
    simplify(expr)
}

fn structural(expr: &Expr) -> Result<Expr, MathError> {
    Ok(match expr {
        Expr::Number(_) | Expr::Symbol(_) | Expr::ImaginaryUnit => expr.clone(),
        Expr::Add(a, b) => {
            let (a, b) = (simplify(a)?, simplify(b)?);
            if a.is_zero() {
                b
            } else if b.is_zero() {
                a
            } else {
                Expr::add(a, b)
            }
        }
        Expr::Sub(a, b) => {
            let (a, b) = (simplify(a)?, simplify(b)?);
            if a == b {
                Expr::integer(0)
            } else if b.is_zero() {
                a
            } else if a.is_zero() {
                negate(b)
            } else {
                Expr::sub(a, b)
            }
        }
        Expr::Mul(a, b) => {
            let (a, b) = (simplify(a)?, simplify(b)?);
            if a.is_zero() || b.is_zero() {
                Expr::integer(0)
            } else if a.is_one() {
                b
            } else if b.is_one() {
                a
            } else {
                Expr::mul(a, b)
            }
        }
        Expr::Div(a, b) => {
            let (a, b) = (simplify(a)?, simplify(b)?);
            if b.is_zero() {
                return Err(MathError::division_by_zero());
            }
            if a.is_zero() {
                Expr::integer(0)
            } else if b.is_one() {
                a
            } else if a == b {
                Expr::integer(1)
            } else {
                Expr::div(a, b)
            }
        }
        Expr::Pow(base, exponent) => {
            let (base, exponent) = (simplify(base)?, simplify(exponent)?);
            if exponent.is_zero() || base.is_one() {
                Expr::integer(1)
            } else if exponent.is_one() {
                base
            } else {
                Expr::pow(base, exponent)
            }
        }
        Expr::Neg(a) => negate(simplify(a)?),
        Expr::Sqrt(a) => {
            let a = simplify(a)?;
            match a.as_number().and_then(exact_sqrt) {
                Some(root) => Expr::number(root),
                None => Expr::sqrt(a),
            }
        }
        Expr::Log(a) => {
            let a = simplify(a)?;
            if a.is_one() {
                Expr::integer(0)
            } else {
                Expr::log(a)
            }
        }
    })
}

fn negate(expr: Expr) -> Expr {
    match expr {
        Expr::Number(n) => Expr::number(-n),
        Expr::Neg(inner) => *inner,
        other => Expr::neg(other),
    }
}

/// Square root of a non-negative rational whose numerator and denominator are
/// both perfect squares.
pub(crate) fn exact_sqrt(value: &BigRational) -> Option<BigRational> {
    if value.is_negative() {
        return None;
    }
    if value.is_zero() {
        return Some(BigRational::zero());
    }
    let n = perfect_square_root(value.numer())?;
    let d = perfect_square_root(value.denom())?;
    Some(BigRational::new(n, d))
}

fn perfect_square_root(n: &BigInt) -> Option<BigInt> {
    let root = n.sqrt();
    (&root * &root == *n).then_some(root)
}

/// Split a positive integer into `s^2 * f` with `f` square-free as far as trial
/// division up to `limit` can tell.
pub(crate) fn square_free_split(n: &BigInt, limit: u64) -> (BigInt, BigInt) {
    let mut rest = n.clone();
    let mut outside = BigInt::one();
    let mut p = BigInt::from(2u32);
    let limit = BigInt::from(limit);
    while &p * &p <= rest && p <= limit {
        let square = &p * &p;
        while (&rest % &square).is_zero() {
            rest /= &square;
            outside *= &p;
        }
        p += 1u32;
    }
    (outside, rest)
}
