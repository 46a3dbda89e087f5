//! Canonical form: a reduced quotient of two polynomials.

use crate::engine::expr::{Expr, Symbol};
use crate::engine::poly::{self, Poly};
use crate::error::MathError;
use num_bigint::BigInt;
use num_integer::Integer;
use num_rational::BigRational;
use num_traits::{One, Signed, ToPrimitive};

/// Largest exponent magnitude accepted while expanding powers.
pub const MAX_EXPONENT: u32 = 256;

/// Largest number of terms a power may expand to, estimated up front.
pub const MAX_EXPANDED_TERMS: u64 = 2_000;

const TOO_LARGE_TO_EXPAND: &str = "power too large to expand";

/// Why an expression could not be brought into rational-function form.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum LowerError {
    /// The expression is valid but outside ℚ(x, y, z), e.g. `x^y` or `log(x)`.
    NonRational(&'static str),
    Failed(MathError),
}

impl From<MathError> for LowerError {
    fn from(err: MathError) -> Self {
        LowerError::Failed(err)
    }
}

/// `num / den`, kept reduced: no common monomial, no common univariate factor,
/// denominator `1` when constant, otherwise integer coefficients on both sides
/// with a positive leading denominator coefficient.
#[derive(Debug, Clone, PartialEq)]
pub struct RatFunc {
    num: Poly,
    den: Poly,
}

/// Monomials of total degree at most `degree` in `symbols` variables,
/// `C(degree + symbols, symbols)`, saturating.
fn term_bound(symbols: usize, degree: u64) -> u64 {
    (1..=symbols as u64).fold(1u64, |acc, i| acc.saturating_mul(degree + i) / i)
}

impl RatFunc {
    pub fn from_poly(num: Poly) -> Self {
        Self {
            num,
            den: Poly::one(),
        }
    }

    pub fn new(num: Poly, den: Poly) -> Result<Self, MathError> {
        if den.is_zero() {
            return Err(MathError::division_by_zero());
        }
        let mut r = Self { num, den };
        r.normalize();
        Ok(r)
    }

    pub fn zero() -> Self {
        Self::from_poly(Poly::zero())
    }

    pub fn num(&self) -> &Poly {
        &self.num
    }

    pub fn den(&self) -> &Poly {
        &self.den
    }

    pub fn is_zero(&self) -> bool {
        self.num.is_zero()
    }

    pub fn is_polynomial(&self) -> bool {
        self.den.is_one()
    }

    pub fn add(&self, other: &RatFunc) -> RatFunc {
        let num = self.num.mul(&other.den).add(&other.num.mul(&self.den));
        let mut r = RatFunc {
            num,
            den: self.den.mul(&other.den),
        };
        r.normalize();
        r
    }

    pub fn neg(&self) -> RatFunc {
        RatFunc {
            num: self.num.neg(),
            den: self.den.clone(),
        }
    }

    pub fn sub(&self, other: &RatFunc) -> RatFunc {
        self.add(&other.neg())
    }

    pub fn mul(&self, other: &RatFunc) -> RatFunc {
        let mut r = RatFunc {
            num: self.num.mul(&other.num),
            den: self.den.mul(&other.den),
        };
        r.normalize();
        r
    }

    pub fn div(&self, other: &RatFunc) -> Result<RatFunc, MathError> {
        if other.is_zero() {
            return Err(MathError::division_by_zero());
        }
        RatFunc::new(self.num.mul(&other.den), self.den.mul(&other.num))
    }

    /// Whether raising to `exponent` stays within the expansion limits.
    pub fn expandable(&self, exponent: i64) -> bool {
        let magnitude = exponent.unsigned_abs();
        magnitude <= u64::from(MAX_EXPONENT)
            && [&self.num, &self.den].into_iter().all(|p| {
                let degree = u64::from(p.total_degree()) * magnitude;
                term_bound(p.symbols().len(), degree) <= MAX_EXPANDED_TERMS
            })
    }

    pub fn pow(&self, exponent: i64) -> Result<RatFunc, MathError> {
        if !self.expandable(exponent) {
            return Err(MathError::Computation(format!(
                "power with exponent {} is too large to expand",
                exponent
            )));
        }
        let magnitude = exponent.unsigned_abs() as u32;
        let raised = RatFunc {
            num: self.num.pow(magnitude),
            den: self.den.pow(magnitude),
        };
        if exponent >= 0 {
            Ok(raised)
        } else {
            RatFunc::from_poly(Poly::one()).div(&raised)
        }
    }

    /// Lower an expression tree into canonical form.
    pub(crate) fn from_expr(expr: &Expr) -> Result<RatFunc, LowerError> {
        Ok(match expr {
            Expr::Number(n) => RatFunc::from_poly(Poly::constant(n.clone())),
            Expr::Symbol(s) => RatFunc::from_poly(Poly::var(*s)),
            Expr::Add(a, b) => Self::from_expr(a)?.add(&Self::from_expr(b)?),
            Expr::Sub(a, b) => Self::from_expr(a)?.sub(&Self::from_expr(b)?),
            Expr::Mul(a, b) => Self::from_expr(a)?.mul(&Self::from_expr(b)?),
            Expr::Div(a, b) => Self::from_expr(a)?.div(&Self::from_expr(b)?)?,
            Expr::Neg(a) => Self::from_expr(a)?.neg(),
            Expr::Pow(base, exponent) => {
                let exponent = Self::from_expr(exponent)?;
                let value = exponent
                    .constant_value()
                    .ok_or(LowerError::NonRational("symbolic exponent"))?;
                if !value.is_integer() {
                    return Err(LowerError::NonRational("fractional exponent"));
                }
                let base = Self::from_expr(base)?;
                let saturated = if value.is_negative() { i64::MIN } else { i64::MAX };
                let n = value.to_integer().to_i64().unwrap_or(saturated);
                if n == 0 {
                    RatFunc::from_poly(Poly::one())
                } else if base.is_zero() {
                    if n < 0 {
                        return Err(MathError::division_by_zero().into());
                    }
                    base
                } else if !base.expandable(n) {
                    // Kept as a power; the structural pass handles it.
                    return Err(LowerError::NonRational(TOO_LARGE_TO_EXPAND));
                } else {
                    base.pow(n)?
                }
            }
            Expr::Sqrt(_) => return Err(LowerError::NonRational("square root")),
            Expr::Log(_) => return Err(LowerError::NonRational("logarithm")),
            Expr::ImaginaryUnit => return Err(LowerError::NonRational("imaginary unit")),
        })
    }

    pub fn constant_value(&self) -> Option<BigRational> {
        let n = self.num.constant_value()?;
        let d = self.den.constant_value()?;
        Some(n / d)
    }

    pub fn symbols(&self) -> Vec<Symbol> {
        let mut symbols = self.num.symbols();
        for s in self.den.symbols() {
            if !symbols.contains(&s) {
                symbols.push(s);
            }
        }
        symbols.sort();
        symbols
    }

    pub fn to_expr(&self) -> Expr {
        if self.den.is_one() {
            self.num.to_expr()
        } else {
            Expr::div(self.num.to_expr(), self.den.to_expr())
        }
    }

    fn normalize(&mut self) {
        if self.num.is_zero() {
            self.den = Poly::one();
            return;
        }

        // Common monomial factor.
        let mn = self.num.monomial_content();
        let md = self.den.monomial_content();
        let common = [mn[0].min(md[0]), mn[1].min(md[1]), mn[2].min(md[2])];
        if common != [0, 0, 0] {
            self.num = self.num.divide_monomial(&common);
            self.den = self.den.divide_monomial(&common);
        }

        // Common univariate factor.
        if !self.den.is_constant() {
            if let [symbol] = self.symbols()[..] {
                self.cancel_univariate(symbol);
            }
        }

        // Scale: denominator primitive with positive lead.
        let den_content = self.den.content();
        let inv = BigRational::one() / &den_content;
        self.num = self.num.scale(&inv);
        self.den = self.den.scale(&inv);
        if self.den.is_constant() {
            return;
        }

        // Integer numerator; then divide out the shared integer content.
        let mut lcm = BigInt::one();
        for (_, c) in self.num.terms() {
            lcm = lcm.lcm(c.denom());
        }
        let lcm = BigRational::from_integer(lcm);
        let num = self.num.scale(&lcm);
        let den = self.den.scale(&lcm);
        let shared = num.content().abs().numer().gcd(den.content().abs().numer());
        let shared = BigRational::from_integer(shared);
        self.num = num.scale(&(BigRational::one() / &shared));
        self.den = den.scale(&(BigRational::one() / shared));
    }

    fn cancel_univariate(&mut self, symbol: Symbol) {
        let (Some(n), Some(d)) = (
            self.num.to_univariate(symbol),
            self.den.to_univariate(symbol),
        ) else {
            return;
        };
        let g = poly::gcd(&n, &d);
        if poly::degree(&g) == 0 {
            return;
        }
        let (nq, _) = poly::div_rem(&n, &g);
        let (dq, _) = poly::div_rem(&d, &g);
        self.num = Poly::from_univariate(symbol, &nq);
        self.den = Poly::from_univariate(symbol, &dq);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::expr::SymbolTable;
    use crate::engine::parser::parse;

    fn lower(input: &str) -> RatFunc {
        let expr = parse(input, &SymbolTable::standard()).unwrap();
        RatFunc::from_expr(&expr).unwrap()
    }

    #[test]
    fn test_cancels_common_univariate_factor() {
        let r = lower("(x^2 - 1)/(x - 1)");
        assert!(r.is_polynomial());
        assert_eq!(r, lower("x + 1"));
    }

    #[test]
    fn test_cancels_common_monomial() {
        assert_eq!(lower("(2xy)/(4y)"), lower("x/2"));
    }

    #[test]
    fn test_denominator_normalized() {
        let r = lower("x/(2x + 2)");
        assert_eq!(r.den().leading_coefficient(), Some(BigRational::from_integer(2.into())));
        assert_eq!(lower("-x/(-2x - 2)"), r);
    }

    #[test]
    fn test_negative_and_zero_exponents() {
        assert_eq!(lower("x^-2 * x^2"), lower("1"));
        assert_eq!(lower("(x + y)^0"), lower("1"));
    }

    #[test]
    fn test_non_rational_inputs() {
        let expr = parse("x^y", &SymbolTable::standard()).unwrap();
        assert!(matches!(
            RatFunc::from_expr(&expr),
            Err(LowerError::NonRational(_))
        ));
        let expr = parse("x^0.5", &SymbolTable::standard()).unwrap();
        assert!(matches!(
            RatFunc::from_expr(&expr),
            Err(LowerError::NonRational(_))
        ));
    }

    #[test]
    fn test_failures() {
        let expr = parse("1/(x - x)", &SymbolTable::standard()).unwrap();
        assert_eq!(
            RatFunc::from_expr(&expr),
            Err(LowerError::Failed(MathError::division_by_zero()))
        );
        let expr = parse("0^-3", &SymbolTable::standard()).unwrap();
        assert_eq!(
            RatFunc::from_expr(&expr),
            Err(LowerError::Failed(MathError::division_by_zero()))
        );
    }

    #[test]
    fn test_oversized_powers_stay_unexpanded() {
        assert_eq!(term_bound(1, 10), 11);
        assert_eq!(term_bound(3, 2), 10);
        assert!(RatFunc::from_expr(&parse("(x + y)^40", &SymbolTable::standard()).unwrap()).is_ok());
        for input in ["(x + y + z)^100", "x^300", "(x + 1)^300", "x^100000000000000000000"] {
            let expr = parse(input, &SymbolTable::standard()).unwrap();
            assert_eq!(
                RatFunc::from_expr(&expr),
                Err(LowerError::NonRational(TOO_LARGE_TO_EXPAND)),
                "input {}",
                input
            );
        }
        assert!(RatFunc::from_poly(Poly::var(Symbol::X)).pow(300).is_err());
    }
}
