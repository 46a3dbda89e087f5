//! Rational roots of univariate polynomials: candidate generation from the
//! rational root theorem followed by synthetic deflation.

use crate::engine::poly::{self, primitive_integer};
use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{Signed, ToPrimitive, Zero};
use std::collections::HashSet;

/// Upper bound on `±p/q` candidates tried per deflation step.
const MAX_CANDIDATES: usize = 2_000;

/// Divisor lists longer than this are treated as "too expensive".
const MAX_DIVISORS: usize = 128;

/// Coefficients above this are not factored by trial division.
const MAX_ENUMERABLE: u64 = 1_000_000_000_000;

fn small_divisors(n: &BigInt) -> Vec<BigInt> {
    let Some(n) = n.abs().to_u64().filter(|n| (1..=MAX_ENUMERABLE).contains(n)) else {
        return Vec::new();
    };
    let mut divisors = Vec::new();
    let mut i = 1u64;
    while i.saturating_mul(i) <= n {
        if n % i == 0 {
            divisors.push(BigInt::from(i));
            if i != n / i {
                divisors.push(BigInt::from(n / i));
            }
        }
        i += 1;
    }
    if divisors.len() > MAX_DIVISORS {
        return Vec::new();
    }
    divisors
}

/// `±p/q` with `p | a0` and `q | an`, deduplicated. Empty when the constant or
/// leading coefficient is too large to enumerate.
fn candidates(int_coeffs: &[BigInt]) -> Vec<BigRational> {
    let (Some(a0), Some(an)) = (int_coeffs.first(), int_coeffs.last()) else {
        return Vec::new();
    };
    if an.is_zero() {
        return Vec::new();
    }
    if a0.is_zero() {
        return vec![BigRational::zero()];
    }

    let ps = small_divisors(a0);
    let qs = small_divisors(an);
    if ps.is_empty() || qs.is_empty() || ps.len() * qs.len() * 2 > MAX_CANDIDATES {
        return Vec::new();
    }

    let mut seen = HashSet::new();
    let mut out = Vec::with_capacity(ps.len() * qs.len() * 2);
    for p in &ps {
        for q in &qs {
            let candidate = BigRational::new(p.clone(), q.clone());
            for value in [candidate.clone(), -candidate] {
                if seen.insert(value.clone()) {
                    out.push(value);
                }
            }
        }
    }
    out
}

/// Divide by `(x - root)`; the remainder is assumed to be zero.
fn synthetic_division(coeffs: &[BigRational], root: &BigRational) -> Vec<BigRational> {
    let n = coeffs.len();
    if n <= 1 {
        return vec![BigRational::zero()];
    }
    let mut quotient = vec![BigRational::zero(); n - 1];
    quotient[n - 2] = coeffs[n - 1].clone();
    for i in (0..n - 2).rev() {
        quotient[i] = &coeffs[i + 1] + root * &quotient[i + 1];
    }
    quotient
}

/// Strip every rational root, with multiplicity.
///
/// Returns the roots in discovery order and the residual polynomial, whose
/// leading coefficient equals the input's. The residual has no rational roots
/// unless candidate enumeration was cut short.
pub(crate) fn deflate(coeffs: &[BigRational]) -> (Vec<BigRational>, Vec<BigRational>) {
    let mut coeffs = coeffs.to_vec();
    poly::trim(&mut coeffs);
    let mut roots = Vec::new();

    loop {
        while coeffs.len() > 1 && coeffs[0].is_zero() {
            coeffs.remove(0);
            roots.push(BigRational::zero());
        }
        match poly::degree(&coeffs) {
            0 => break,
            1 => {
                roots.push(-&coeffs[0] / &coeffs[1]);
                coeffs = vec![coeffs[1].clone()];
                break;
            }
            _ => {}
        }

        let (_, ints) = primitive_integer(&coeffs);
        let found = candidates(&ints)
            .into_iter()
            .find(|c| poly::eval(&coeffs, c).is_zero());
        match found {
            Some(root) => {
                coeffs = synthetic_division(&coeffs, &root);
                roots.push(root);
            }
            None => break,
        }
    }
    (roots, coeffs)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn q(n: i64) -> BigRational {
        BigRational::from_integer(n.into())
    }

    #[test]
    fn test_deflate_finds_roots_with_multiplicity() {
        // (x - 1)^2 (x + 2) = x^3 - 3x + 2
        let (mut roots, residual) = deflate(&[q(2), q(-3), q(0), q(1)]);
        roots.sort();
        assert_eq!(roots, vec![q(-2), q(1), q(1)]);
        assert_eq!(residual, vec![q(1)]);
    }

    #[test]
    fn test_deflate_keeps_irreducible_part() {
        // x (x^2 + 1)
        let (roots, residual) = deflate(&[q(0), q(1), q(0), q(1)]);
        assert_eq!(roots, vec![q(0)]);
        assert_eq!(residual, vec![q(1), q(0), q(1)]);
    }

    #[test]
    fn test_fractional_roots() {
        // 2x^2 - 3x + 1 = (2x - 1)(x - 1)
        let (mut roots, residual) = deflate(&[q(1), q(-3), q(2)]);
        roots.sort();
        assert_eq!(roots, vec![BigRational::new(1.into(), 2.into()), q(1)]);
        assert_eq!(residual, vec![q(2)]);
    }

    #[test]
    fn test_candidates_bounded() {
        let huge = BigInt::from(u64::MAX) * BigInt::from(u64::MAX);
        assert!(candidates(&[huge, BigInt::from(1)]).is_empty());
    }
}
