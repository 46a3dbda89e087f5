//! Factorisation over ℚ.
//!
//! Pulls out the numeric content and the common monomial, then splits a
//! univariate remainder into linear factors at its rational roots. Whatever is
//! left (irreducible over ℚ, or multivariate) is kept as one factor.

use crate::engine::expr::{Expr, Symbol};
use crate::engine::poly::Poly;
use crate::engine::rational::{LowerError, RatFunc};
use crate::engine::roots;
use crate::engine::simplify::simplify;
use crate::error::MathError;
use num_rational::BigRational;
use num_traits::One;
use std::cmp::Ordering;

pub fn factor(expr: &Expr) -> Result<Expr, MathError> {
    let canonical = match RatFunc::from_expr(expr) {
        Ok(r) => r,
        Err(LowerError::Failed(err)) => return Err(err),
        Err(LowerError::NonRational(_)) => return simplify(expr),
    };
    let num = Factored::of(canonical.num()).to_expr();
    if canonical.is_polynomial() {
        Ok(num)
    } else {
        Ok(Expr::div(num, Factored::of(canonical.den()).to_expr()))
    }
}

/// `content * Π factor^multiplicity`, each factor primitive with a positive
/// leading coefficient.
#[derive(Debug)]
struct Factored {
    content: BigRational,
    factors: Vec<(Poly, u32)>,
}

impl Factored {
    fn of(p: &Poly) -> Self {
        if let Some(c) = p.constant_value() {
            return Self {
                content: c,
                factors: Vec::new(),
            };
        }

        let mut content = p.content();
        let primitive = p.scale(&(BigRational::one() / &content));
        let mono = primitive.monomial_content();
        let mut rest = primitive.divide_monomial(&mono);

        let mut factors: Vec<(Poly, u32)> = Symbol::ALL
            .into_iter()
            .filter(|s| mono[s.index()] > 0)
            .map(|s| (Poly::var(s), mono[s.index()]))
            .collect();

        let mut others = Vec::new();
        if let [symbol] = rest.symbols()[..] {
            if let Some(coeffs) = rest.to_univariate(symbol) {
                let (found, residual) = roots::deflate(&coeffs);
                let mut scale = BigRational::one();
                for (root, multiplicity) in group(found) {
                    // q·s - p for the root p/q
                    let q = BigRational::from_integer(root.denom().clone());
                    let p = BigRational::from_integer(root.numer().clone());
                    for _ in 0..multiplicity {
                        scale *= &q;
                    }
                    others.push((Poly::from_univariate(symbol, &[-p, q]), multiplicity));
                }
                rest = Poly::from_univariate(symbol, &residual).scale(&(BigRational::one() / scale));
            }
        }

        let leftover = rest.content();
        content *= &leftover;
        let rest = rest.scale(&(BigRational::one() / leftover));
        if !rest.is_one() {
            others.push((rest, 1));
        }
        others.sort_by(|(a, _), (b, _)| factor_order(a, b));
        factors.extend(others);

        Self { content, factors }
    }

    fn to_expr(&self) -> Expr {
        let product = self
            .factors
            .iter()
            .map(|(p, multiplicity)| match multiplicity {
                1 => p.to_expr(),
                m => Expr::pow(p.to_expr(), Expr::integer(i64::from(*m))),
            })
            .reduce(Expr::mul);
        match product {
            None => Expr::number(self.content.clone()),
            Some(product) if self.content.is_one() => product,
            Some(product) if (-&self.content).is_one() => Expr::neg(product),
            Some(product) => Expr::mul(Expr::number(self.content.clone()), product),
        }
    }
}

fn group(roots: Vec<BigRational>) -> Vec<(BigRational, u32)> {
    let mut grouped: Vec<(BigRational, u32)> = Vec::new();
    for root in roots {
        match grouped.iter_mut().find(|(r, _)| *r == root) {
            Some((_, count)) => *count += 1,
            None => grouped.push((root, 1)),
        }
    }
    grouped
}

/// Lower degree first, then by coefficients from the constant term up.
fn factor_order(a: &Poly, b: &Poly) -> Ordering {
    a.total_degree()
        .cmp(&b.total_degree())
        .then_with(|| a.terms().cmp(b.terms()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::expr::SymbolTable;
    use crate::engine::parser::parse;

    fn factored(input: &str) -> String {
        let expr = parse(input, &SymbolTable::standard()).unwrap();
        factor(&expr).unwrap().to_string()
    }

    #[test]
    fn test_difference_of_squares() {
        assert_eq!(factored("x^2 - 16"), "(x - 4)(x + 4)");
        assert_eq!(factored("1 - x^2"), "-(x - 1)(x + 1)");
    }

    #[test]
    fn test_content_and_monomial() {
        assert_eq!(factored("2x^2 + 4x"), "2x(x + 2)");
        assert_eq!(factored("x^2y + xy^2"), "xy(x + y)");
        assert_eq!(factored("12"), "12");
    }

    #[test]
    fn test_repeated_and_fractional_roots() {
        assert_eq!(factored("x^2 + 2x + 1"), "(x + 1)^2");
        assert_eq!(factored("2x^2 - 3x + 1"), "(x - 1)(2x - 1)");
    }

    #[test]
    fn test_irreducible_parts_kept() {
        assert_eq!(factored("x^3 + x"), "x(x^2 + 1)");
        assert_eq!(factored("x^2 + 1"), "x^2 + 1");
    }

    #[test]
    fn test_quotients() {
        assert_eq!(factored("(x^2 - 1)/(x^2 + 4x + 4)"), "(x - 1)(x + 1)/(x + 2)^2");
    }
}
