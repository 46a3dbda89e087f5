//! Indefinite integration of rational functions whose denominator is free of
//! the integration variable or a single monomial.

use crate::engine::expr::{Expr, Symbol};
use crate::engine::poly::{Monomial, Poly};
use crate::engine::rational::{LowerError, RatFunc};
use crate::error::MathError;
use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::One;

pub fn integrate(expr: &Expr, var: Symbol) -> Result<Expr, MathError> {
    let integrand = match RatFunc::from_expr(expr) {
        Ok(r) => r,
        Err(LowerError::Failed(err)) => return Err(err),
        Err(LowerError::NonRational(reason)) => {
            return Err(MathError::Computation(format!(
                "cannot integrate an expression containing a {} in closed form",
                reason
            )))
        }
    };

    let den = integrand.den();
    if den.degree_in(var) == 0 {
        let antiderivative = integrate_polynomial(integrand.num(), var);
        return Ok(RatFunc::new(antiderivative, den.clone())?.to_expr());
    }

    let den_terms: Vec<_> = den.terms().collect();
    let result = match den_terms[..] {
        [(m, c)] => integrate_over_monomial(integrand.num(), *m, c, var),
        _ => Err(MathError::Computation(format!(
            "cannot integrate {} with respect to {}: the denominator is not a monomial in {}",
            integrand.to_expr(),
            var,
            var
        ))),
    };
    result
}

fn raised(m: &Monomial, var: Symbol, exponent: u32) -> Monomial {
    let mut m = *m;
    m[var.index()] = exponent;
    m
}

fn integrate_polynomial(p: &Poly, var: Symbol) -> Poly {
    p.terms().fold(Poly::zero(), |acc, (m, c)| {
        let e = m[var.index()] + 1;
        let coeff = c / BigRational::from_integer(BigInt::from(e));
        acc.add(&Poly::monomial(raised(m, var, e), coeff))
    })
}

/// `num / (c * var^k * rest)` where `rest` is free of `var`: integrate each
/// Laurent term of `num / var^k`, collecting `var^-1` terms into a logarithm.
fn integrate_over_monomial(
    num: &Poly,
    den_monomial: Monomial,
    den_coeff: &BigRational,
    var: Symbol,
) -> Result<Expr, MathError> {
    let k = i64::from(den_monomial[var.index()]);
    let outside = RatFunc::from_poly(Poly::monomial(
        raised(&den_monomial, var, 0),
        den_coeff.clone(),
    ));

    let mut rational = RatFunc::zero();
    let mut log_coeff = Poly::zero();
    for (m, c) in num.terms() {
        let e = i64::from(m[var.index()]) - k;
        let free = raised(m, var, 0);
        if e == -1 {
            log_coeff = log_coeff.add(&Poly::monomial(free, c.clone()));
            continue;
        }
        let power = e + 1;
        let coeff = c / BigRational::from_integer(BigInt::from(power));
        let term = RatFunc::from_poly(Poly::monomial(free, coeff));
        let var_power = RatFunc::from_poly(Poly::var(var)).pow(power)?;
        rational = rational.add(&term.mul(&var_power));
    }

    let rational = rational.div(&outside)?;
    let log_coeff = RatFunc::from_poly(log_coeff).div(&outside)?;
    let log_term = log_coeff_term(&log_coeff, var);

    Ok(match (rational.is_zero(), log_term) {
        (_, None) => rational.to_expr(),
        (true, Some(log_term)) => log_term,
        (false, Some(log_term)) => Expr::add(rational.to_expr(), log_term),
    })
}

fn log_coeff_term(coeff: &RatFunc, var: Symbol) -> Option<Expr> {
    if coeff.is_zero() {
        return None;
    }
    let log = Expr::log(Expr::symbol(var));
    Some(match coeff.constant_value() {
        Some(c) if c.is_one() => log,
        Some(c) if (-&c).is_one() => Expr::neg(log),
        _ => Expr::mul(coeff.to_expr(), log),
    })
}
