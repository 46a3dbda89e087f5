//! Equation solving for `residual = 0`.

use crate::engine::expr::{Expr, Symbol};
use crate::engine::poly::{self, Poly};
use crate::engine::rational::{LowerError, RatFunc};
use crate::engine::roots;
use crate::engine::simplify::{exact_sqrt, simplify, square_free_split};
use crate::error::MathError;
use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{One, Signed, ToPrimitive, Zero};
use std::fmt;

/// Trial-division bound when pulling squares out of a discriminant.
const SURD_FACTOR_LIMIT: u64 = 1_000_000;

/// One value of one unknown.
#[derive(Debug, Clone, PartialEq)]
pub struct Solution {
    pub symbol: Symbol,
    pub value: Expr,
}

impl fmt::Display for Solution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.symbol, self.value)
    }
}

/// A root together with its position in the complex plane, for ordering.
struct Root {
    value: Expr,
    re: f64,
    im: f64,
}

pub fn solve(residual: &Expr, symbols: &[Symbol]) -> Result<Vec<Solution>, MathError> {
    let residual = match RatFunc::from_expr(residual) {
        Ok(r) => r,
        Err(LowerError::Failed(err)) => return Err(err),
        Err(LowerError::NonRational(reason)) => {
            return Err(MathError::Computation(format!(
                "the built-in engine cannot solve an equation containing a {}",
                reason
            )))
        }
    };

    let num = residual.num();
    let present: Vec<Symbol> = symbols
        .iter()
        .copied()
        .filter(|s| num.degree_in(*s) > 0)
        .collect();

    match present[..] {
        [] => Ok(Vec::new()),
        [symbol] if num.symbols().len() == 1 => solve_univariate(&residual, symbol),
        _ => solve_linear(&residual, &present)
            .or_else(|_| solve_quadratic_in_one(&residual, &present)),
    }
}

fn solve_univariate(residual: &RatFunc, symbol: Symbol) -> Result<Vec<Solution>, MathError> {
    let coeffs = residual.num().to_univariate(symbol).ok_or_else(|| {
        MathError::Computation(format!("equation is not univariate in {}", symbol))
    })?;

    let (mut rational, rest) = roots::deflate(&coeffs);
    rational.sort();
    rational.dedup();

    let den = residual.den();
    let mut found: Vec<Root> = rational
        .into_iter()
        .filter(|r| {
            den.evaluate_univariate(symbol, r)
                .map_or(true, |v| !v.is_zero())
        })
        .map(|r| Root {
            re: r.to_f64().unwrap_or(f64::NAN),
            im: 0.0,
            value: Expr::number(r),
        })
        .collect();

    match poly::degree(&rest) {
        0 => {}
        2 => found.extend(quadratic_roots(&rest[0], &rest[1], &rest[2])),
        n if is_binomial(&rest) => found.extend(real_nth_roots(&rest, n)?),
        n => {
            return Err(MathError::Computation(format!(
                "the built-in engine cannot solve a degree-{} polynomial equation in closed form",
                n
            )))
        }
    }

    found.sort_by(|a, b| a.re.total_cmp(&b.re).then(a.im.total_cmp(&b.im)));
    Ok(found
        .into_iter()
        .map(|root| Solution {
            symbol,
            value: root.value,
        })
        .collect())
}

/// `c2 s^2 + c1 s + c0 = 0` with no rational roots.
fn quadratic_roots(c0: &BigRational, c1: &BigRational, c2: &BigRational) -> Vec<Root> {
    let two = BigRational::from_integer(BigInt::from(2));
    let discriminant = c1 * c1 - BigRational::from_integer(BigInt::from(4)) * c2 * c0;
    let re = -c1 / (&two * c2);
    let two_a = (&two * c2).abs();

    // sqrt(n/d) = sqrt(|n·d|)/d
    let radicand = (discriminant.numer() * discriminant.denom()).abs();
    let (outside, inside) = square_free_split(&radicand, SURD_FACTOR_LIMIT);
    let coef = BigRational::new(outside, discriminant.denom().clone()) / two_a;
    let complex = discriminant.is_negative();

    if !complex && inside.is_one() {
        return [&re - &coef, &re + &coef]
            .into_iter()
            .map(|r| Root {
                re: r.to_f64().unwrap_or(f64::NAN),
                im: 0.0,
                value: Expr::number(r),
            })
            .collect();
    }

    let mut parts = Vec::new();
    if !coef.is_one() {
        parts.push(Expr::number(coef.clone()));
    }
    if !inside.is_one() {
        parts.push(Expr::sqrt(Expr::number(BigRational::from_integer(inside.clone()))));
    }
    if complex {
        parts.push(Expr::ImaginaryUnit);
    }
    let magnitude = parts.into_iter().reduce(Expr::mul).unwrap_or(Expr::integer(1));
    let offset = coef.to_f64().unwrap_or(f64::NAN) * inside.to_f64().unwrap_or(f64::NAN).sqrt();
    let re_value = re.to_f64().unwrap_or(f64::NAN);

    let (lower, upper) = if re.is_zero() {
        (Expr::neg(magnitude.clone()), magnitude)
    } else {
        (
            Expr::sub(Expr::number(re.clone()), magnitude.clone()),
            Expr::add(Expr::number(re), magnitude),
        )
    };

    let (lower_pos, upper_pos) = if complex {
        ((re_value, -offset), (re_value, offset))
    } else {
        ((re_value - offset, 0.0), (re_value + offset, 0.0))
    };
    vec![
        Root {
            value: lower,
            re: lower_pos.0,
            im: lower_pos.1,
        },
        Root {
            value: upper,
            re: upper_pos.0,
            im: upper_pos.1,
        },
    ]
}

/// `a s^n + c`: only the leading and constant coefficients are set.
fn is_binomial(coeffs: &[BigRational]) -> bool {
    let n = poly::degree(coeffs);
    n > 0 && coeffs[1..n].iter().all(Zero::is_zero)
}

/// Real solutions of `a s^n + c = 0` for `n > 2`, written as radicals.
fn real_nth_roots(coeffs: &[BigRational], n: usize) -> Result<Vec<Root>, MathError> {
    let target = -&coeffs[0] / &coeffs[n];
    if target.is_zero() {
        return Ok(vec![Root {
            value: Expr::integer(0),
            re: 0.0,
            im: 0.0,
        }]);
    }
    if n % 2 == 0 && target.is_negative() {
        return Err(MathError::Computation(format!(
            "the built-in engine only finds real roots of degree-{} binomial equations, and this one has none",
            n
        )));
    }

    // (s^2)^k = r^2 reduces to s^k = r.
    let mut radicand = target.abs();
    let mut index = n;
    while index % 2 == 0 {
        match exact_sqrt(&radicand) {
            Some(root) => {
                radicand = root;
                index /= 2;
            }
            None => break,
        }
    }

    if index == 2 {
        let zero = BigRational::zero();
        return Ok(quadratic_roots(&-radicand, &zero, &BigRational::one()));
    }

    let magnitude = if index == 1 {
        Expr::number(radicand.clone())
    } else {
        let index_inverse = BigRational::new(BigInt::one(), BigInt::from(index));
        Expr::pow(Expr::number(radicand.clone()), Expr::number(index_inverse))
    };
    let offset = radicand
        .to_f64()
        .unwrap_or(f64::NAN)
        .powf(1.0 / index as f64);

    if n % 2 == 0 {
        Ok(vec![
            Root {
                value: Expr::neg(magnitude.clone()),
                re: -offset,
                im: 0.0,
            },
            Root {
                value: magnitude,
                re: offset,
                im: 0.0,
            },
        ])
    } else if target.is_negative() {
        Ok(vec![Root {
            value: Expr::neg(magnitude),
            re: -offset,
            im: 0.0,
        }])
    } else {
        Ok(vec![Root {
            value: magnitude,
            re: offset,
            im: 0.0,
        }])
    }
}

/// Solve for the first candidate in which the numerator is linear.
fn solve_linear(residual: &RatFunc, candidates: &[Symbol]) -> Result<Vec<Solution>, MathError> {
    let num = residual.num();
    for &symbol in candidates {
        if num.degree_in(symbol) != 1 {
            continue;
        }
        let coeffs: Vec<Poly> = num.coefficients_in(symbol);
        let value = RatFunc::new(coeffs[0].neg(), coeffs[1].clone())?;
        return Ok(vec![Solution {
            symbol,
            value: value.to_expr(),
        }]);
    }

    let names: Vec<&str> = candidates.iter().map(|s| s.name()).collect();
    Err(MathError::Computation(format!(
        "the built-in engine cannot solve for {}: the equation is not linear in any of them",
        names.join(", ")
    )))
}

/// Quadratic formula in the first candidate of degree two, with the other
/// symbols left in the coefficients.
fn solve_quadratic_in_one(
    residual: &RatFunc,
    candidates: &[Symbol],
) -> Result<Vec<Solution>, MathError> {
    let num = residual.num();
    let Some(symbol) = candidates.iter().copied().find(|s| num.degree_in(*s) == 2) else {
        let names: Vec<&str> = candidates.iter().map(|s| s.name()).collect();
        return Err(MathError::Computation(format!(
            "the built-in engine cannot solve for {}: the equation is neither linear nor quadratic in any of them",
            names.join(", ")
        )));
    };

    let coeffs = num.coefficients_in(symbol);
    let (c0, c1, c2) = (&coeffs[0], &coeffs[1], &coeffs[2]);
    let two_a = c2.scale(&BigRational::from_integer(BigInt::from(2)));
    let center = RatFunc::new(c1.neg(), two_a.clone())?.to_expr();
    // (c1^2 - 4 c2 c0) / (2 c2)^2
    let four = BigRational::from_integer(BigInt::from(4));
    let discriminant = RatFunc::new(
        c1.mul(c1).sub(&c2.mul(c0).scale(&four)),
        two_a.mul(&two_a),
    )?;
    let root = Expr::sqrt(discriminant.to_expr());

    [
        Expr::sub(center.clone(), root.clone()),
        Expr::add(center, root),
    ]
    .iter()
    .map(|value| simplify(value).map(|value| Solution { symbol, value }))
    .collect()
}
