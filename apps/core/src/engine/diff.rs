//! Symbolic differentiation on the expression tree.

use crate::engine::expr::{Expr, Symbol};
use crate::engine::simplify::simplify;
use crate::error::MathError;
use num_rational::BigRational;
use num_traits::One;

/// `d/d(var)` of `expr`, simplified.
pub fn differentiate(expr: &Expr, var: Symbol) -> Result<Expr, MathError> {
    simplify(&derive(expr, var))
}

fn derive(expr: &Expr, var: Symbol) -> Expr {
    if !expr.contains_symbol(var) {
        return Expr::integer(0);
    }
    match expr {
        Expr::Number(_) | Expr::ImaginaryUnit => Expr::integer(0),
        Expr::Symbol(s) => Expr::integer(i64::from(*s == var)),
        Expr::Add(a, b) => Expr::add(derive(a, var), derive(b, var)),
        Expr::Sub(a, b) => Expr::sub(derive(a, var), derive(b, var)),
        Expr::Neg(a) => Expr::neg(derive(a, var)),
        Expr::Mul(a, b) => Expr::add(
            Expr::mul(derive(a, var), (**b).clone()),
            Expr::mul((**a).clone(), derive(b, var)),
        ),
        Expr::Div(a, b) => Expr::div(
            Expr::sub(
                Expr::mul(derive(a, var), (**b).clone()),
                Expr::mul((**a).clone(), derive(b, var)),
            ),
            Expr::pow((**b).clone(), Expr::integer(2)),
        ),
        Expr::Pow(base, exponent) => derive_power(base, exponent, var),
        Expr::Sqrt(a) => Expr::div(
            derive(a, var),
            Expr::mul(Expr::integer(2), Expr::sqrt((**a).clone())),
        ),
        Expr::Log(a) => Expr::div(derive(a, var), (**a).clone()),
    }
}

fn derive_power(base: &Expr, exponent: &Expr, var: Symbol) -> Expr {
    let u = base.clone();
    let v = exponent.clone();

    // u^n: n u^(n-1) u'
    if !exponent.contains_symbol(var) {
        let reduced = match exponent.as_number() {
            Some(n) => Expr::number(n - BigRational::one()),
            None => Expr::sub(v.clone(), Expr::integer(1)),
        };
        return Expr::mul(Expr::mul(v, Expr::pow(u, reduced)), derive(base, var));
    }

    // a^v: a^v log(a) v'
    if !base.contains_symbol(var) {
        return Expr::mul(
            Expr::mul(Expr::pow(u.clone(), v), Expr::log(u)),
            derive(exponent, var),
        );
    }

    // u^v (v' log(u) + v u'/u)
    Expr::mul(
        Expr::pow(u.clone(), v.clone()),
        Expr::add(
            Expr::mul(derive(exponent, var), Expr::log(u.clone())),
            Expr::div(Expr::mul(v, derive(base, var)), u),
        ),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::expr::SymbolTable;
    use crate::engine::parser::parse;

    fn d(input: &str) -> String {
        let expr = parse(input, &SymbolTable::standard()).unwrap();
        differentiate(&expr, Symbol::X).unwrap().to_string()
    }

    #[test]
    fn test_polynomials() {
        assert_eq!(d("x^2 + 3x"), "2x + 3");
        assert_eq!(d("x^3/3"), "x^2");
        assert_eq!(d("5"), "0");
        assert_eq!(d("x*y"), "y");
    }

    #[test]
    fn test_quotients() {
        assert_eq!(d("1/x"), "-1/x^2");
        assert_eq!(d("x/(x + 1)"), "1/(x^2 + 2x + 1)");
    }

    #[test]
    fn test_non_rational_powers() {
        assert_eq!(d("x^0.5"), "x^(-1/2)/2");
        assert_eq!(d("2^x"), "2^x*log(2)");
        assert_eq!(d("y^x"), "y^x*log(y)");
    }
}
