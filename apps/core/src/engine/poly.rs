//! Sparse multivariate polynomials over ℚ in the fixed variables `x, y, z`,
//! plus dense univariate helpers used by factoring and solving.

use crate::engine::expr::{Expr, Symbol};
use num_bigint::BigInt;
use num_integer::Integer;
use num_rational::BigRational;
use num_traits::{One, Signed, Zero};
use std::collections::BTreeMap;

/// Exponents of `x`, `y`, `z`.
pub type Monomial = [u32; 3];

const UNIT: Monomial = [0, 0, 0];

/// Polynomial with no zero coefficients stored.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Poly {
    terms: BTreeMap<Monomial, BigRational>,
}

impl Poly {
    pub fn zero() -> Self {
        Self::default()
    }

    pub fn one() -> Self {
        Self::constant(BigRational::one())
    }

    pub fn constant(value: BigRational) -> Self {
        Self::monomial(UNIT, value)
    }

    pub fn var(symbol: Symbol) -> Self {
        let mut m = UNIT;
        m[symbol.index()] = 1;
        Self::monomial(m, BigRational::one())
    }

    pub fn monomial(m: Monomial, coeff: BigRational) -> Self {
        let mut p = Self::zero();
        p.add_term(m, coeff);
        p
    }

    fn add_term(&mut self, m: Monomial, coeff: BigRational) {
        if coeff.is_zero() {
            return;
        }
        let entry = self.terms.entry(m).or_insert_with(BigRational::zero);
        *entry += coeff;
        if entry.is_zero() {
            self.terms.remove(&m);
        }
    }

    pub fn is_zero(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn is_one(&self) -> bool {
        self.constant_value().is_some_and(|c| c.is_one())
    }

    pub fn is_constant(&self) -> bool {
        self.terms.keys().all(|m| *m == UNIT)
    }

    /// Value of a constant polynomial (zero included).
    pub fn constant_value(&self) -> Option<BigRational> {
        if !self.is_constant() {
            return None;
        }
        Some(self.terms.get(&UNIT).cloned().unwrap_or_else(BigRational::zero))
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Terms in ascending monomial order.
    pub fn terms(&self) -> impl Iterator<Item = (&Monomial, &BigRational)> {
        self.terms.iter()
    }

    pub fn add(&self, other: &Poly) -> Poly {
        let mut result = self.clone();
        for (m, c) in &other.terms {
            result.add_term(*m, c.clone());
        }
        result
    }

    pub fn sub(&self, other: &Poly) -> Poly {
        self.add(&other.neg())
    }

    pub fn neg(&self) -> Poly {
        self.scale(&-BigRational::one())
    }

    pub fn scale(&self, factor: &BigRational) -> Poly {
        if factor.is_zero() {
            return Poly::zero();
        }
        Poly {
            terms: self
                .terms
                .iter()
                .map(|(m, c)| (*m, c * factor))
                .collect(),
        }
    }

    pub fn mul(&self, other: &Poly) -> Poly {
        let mut result = Poly::zero();
        for (ma, ca) in &self.terms {
            for (mb, cb) in &other.terms {
                let m = [ma[0] + mb[0], ma[1] + mb[1], ma[2] + mb[2]];
                result.add_term(m, ca * cb);
            }
        }
        result
    }

    /// Square-and-multiply power.
    pub fn pow(&self, mut exponent: u32) -> Poly {
        let mut base = self.clone();
        let mut result = Poly::one();
        while exponent > 0 {
            if exponent & 1 == 1 {
                result = result.mul(&base);
            }
            exponent >>= 1;
            if exponent > 0 {
                base = base.mul(&base);
            }
        }
        result
    }

    pub fn degree_in(&self, symbol: Symbol) -> u32 {
        self.terms
            .keys()
            .map(|m| m[symbol.index()])
            .max()
            .unwrap_or(0)
    }

    pub fn total_degree(&self) -> u32 {
        self.terms
            .keys()
            .map(|m| m.iter().sum())
            .max()
            .unwrap_or(0)
    }

    /// Symbols with a non-zero exponent somewhere, in `x, y, z` order.
    pub fn symbols(&self) -> Vec<Symbol> {
        Symbol::ALL
            .into_iter()
            .filter(|s| self.degree_in(*s) > 0)
            .collect()
    }

    /// Dense coefficients (ascending powers) if `symbol` is the only variable.
    pub fn to_univariate(&self, symbol: Symbol) -> Option<Vec<BigRational>> {
        let idx = symbol.index();
        let mut coeffs = vec![BigRational::zero(); self.degree_in(symbol) as usize + 1];
        for (m, c) in &self.terms {
            if m.iter().enumerate().any(|(i, e)| i != idx && *e > 0) {
                return None;
            }
            coeffs[m[idx] as usize] = c.clone();
        }
        Some(coeffs)
    }

    pub fn from_univariate(symbol: Symbol, coeffs: &[BigRational]) -> Poly {
        let mut p = Poly::zero();
        for (power, c) in coeffs.iter().enumerate() {
            let mut m = UNIT;
            m[symbol.index()] = power as u32;
            p.add_term(m, c.clone());
        }
        p
    }

    /// Coefficients in ascending powers of `symbol`; each is free of `symbol`.
    pub fn coefficients_in(&self, symbol: Symbol) -> Vec<Poly> {
        let idx = symbol.index();
        let mut coeffs = vec![Poly::zero(); self.degree_in(symbol) as usize + 1];
        for (m, c) in &self.terms {
            let mut rest = *m;
            rest[idx] = 0;
            coeffs[m[idx] as usize].add_term(rest, c.clone());
        }
        coeffs
    }

    /// Greatest monomial dividing every term.
    pub fn monomial_content(&self) -> Monomial {
        let mut iter = self.terms.keys();
        let Some(first) = iter.next() else {
            return UNIT;
        };
        iter.fold(*first, |acc, m| {
            [acc[0].min(m[0]), acc[1].min(m[1]), acc[2].min(m[2])]
        })
    }

    /// Divide by a monomial that divides every term.
    pub fn divide_monomial(&self, divisor: &Monomial) -> Poly {
        Poly {
            terms: self
                .terms
                .iter()
                .map(|(m, c)| {
                    (
                        [m[0] - divisor[0], m[1] - divisor[1], m[2] - divisor[2]],
                        c.clone(),
                    )
                })
                .collect(),
        }
    }

    /// Terms in display order: highest total degree first, then `x` before `y` before `z`.
    pub fn sorted_terms(&self) -> Vec<(Monomial, BigRational)> {
        let mut terms: Vec<_> = self.terms.iter().map(|(m, c)| (*m, c.clone())).collect();
        terms.sort_by(|(a, _), (b, _)| {
            let da: u32 = a.iter().sum();
            let db: u32 = b.iter().sum();
            db.cmp(&da).then_with(|| b.cmp(a))
        });
        terms
    }

    pub fn leading_coefficient(&self) -> Option<BigRational> {
        self.sorted_terms().into_iter().next().map(|(_, c)| c)
    }

    /// Rational content: `self / content` has coprime integer coefficients and a
    /// positive leading coefficient.
    pub fn content(&self) -> BigRational {
        if self.is_zero() {
            return BigRational::one();
        }
        let mut numer_gcd = BigInt::zero();
        let mut denom_lcm = BigInt::one();
        for c in self.terms.values() {
            numer_gcd = numer_gcd.gcd(c.numer());
            denom_lcm = denom_lcm.lcm(c.denom());
        }
        let content = BigRational::new(numer_gcd, denom_lcm);
        match self.leading_coefficient() {
            Some(lc) if lc.is_negative() => -content,
            _ => content,
        }
    }

    pub fn evaluate_univariate(&self, symbol: Symbol, value: &BigRational) -> Option<BigRational> {
        self.to_univariate(symbol).map(|c| eval(&c, value))
    }

    /// Canonical expression, e.g. `3x^2 - xy + 1`.
    pub fn to_expr(&self) -> Expr {
        let mut terms = self.sorted_terms().into_iter();
        let Some((m, c)) = terms.next() else {
            return Expr::integer(0);
        };
        terms.fold(term_expr(&m, &c), |acc, (m, c)| {
            if c.is_negative() {
                Expr::sub(acc, term_expr(&m, &-c))
            } else {
                Expr::add(acc, term_expr(&m, &c))
            }
        })
    }
}

fn monomial_expr(m: &Monomial) -> Option<Expr> {
    Symbol::ALL
        .into_iter()
        .filter(|s| m[s.index()] > 0)
        .map(|s| match m[s.index()] {
            1 => Expr::symbol(s),
            e => Expr::pow(Expr::symbol(s), Expr::integer(i64::from(e))),
        })
        .reduce(Expr::mul)
}

fn term_expr(m: &Monomial, c: &BigRational) -> Expr {
    match monomial_expr(m) {
        None => Expr::number(c.clone()),
        Some(mono) if c.is_one() => mono,
        Some(mono) if (-c).is_one() => Expr::neg(mono),
        Some(mono) => Expr::mul(Expr::number(c.clone()), mono),
    }
}

// --- Dense univariate helpers (coefficients in ascending powers) ---

pub(crate) fn trim(coeffs: &mut Vec<BigRational>) {
    while coeffs.len() > 1 && coeffs.last().is_some_and(Zero::is_zero) {
        coeffs.pop();
    }
}

pub(crate) fn degree(coeffs: &[BigRational]) -> usize {
    coeffs
        .iter()
        .rposition(|c| !c.is_zero())
        .unwrap_or(0)
}

pub(crate) fn is_zero_poly(coeffs: &[BigRational]) -> bool {
    coeffs.iter().all(Zero::is_zero)
}

/// Horner evaluation.
pub(crate) fn eval(coeffs: &[BigRational], x: &BigRational) -> BigRational {
    coeffs
        .iter()
        .rev()
        .fold(BigRational::zero(), |acc, c| acc * x + c)
}

/// Polynomial long division; `divisor` must not be zero.
pub(crate) fn div_rem(
    dividend: &[BigRational],
    divisor: &[BigRational],
) -> (Vec<BigRational>, Vec<BigRational>) {
    let mut rem = dividend.to_vec();
    trim(&mut rem);
    let mut divisor = divisor.to_vec();
    trim(&mut divisor);

    let dd = degree(&divisor);
    let lead = divisor[dd].clone();
    if is_zero_poly(&rem) || degree(&rem) < dd {
        return (vec![BigRational::zero()], rem);
    }

    let mut quot = vec![BigRational::zero(); degree(&rem) - dd + 1];
    while !is_zero_poly(&rem) && degree(&rem) >= dd {
        let dr = degree(&rem);
        let factor = &rem[dr] / &lead;
        let shift = dr - dd;
        for (i, c) in divisor.iter().enumerate() {
            rem[i + shift] -= &factor * c;
        }
        quot[shift] = factor;
        trim(&mut rem);
    }
    trim(&mut quot);
    (quot, rem)
}

/// Monic greatest common divisor.
pub(crate) fn gcd(a: &[BigRational], b: &[BigRational]) -> Vec<BigRational> {
    let mut a = a.to_vec();
    let mut b = b.to_vec();
    trim(&mut a);
    trim(&mut b);
    while !is_zero_poly(&b) {
        let (_, r) = div_rem(&a, &b);
        a = b;
        b = r;
    }
    if is_zero_poly(&a) {
        return vec![BigRational::one()];
    }
    let lead = a[degree(&a)].clone();
    a.iter().map(|c| c / &lead).collect()
}

/// Scale rational coefficients to coprime integers with a positive leading term.
pub(crate) fn primitive_integer(coeffs: &[BigRational]) -> (BigRational, Vec<BigInt>) {
    let p = Poly::from_univariate(Symbol::X, coeffs);
    let content = p.content();
    let ints = coeffs
        .iter()
        .map(|c| (c / &content).to_integer())
        .collect();
    (content, ints)
}
