//! Human-facing rendering of expressions.
//!
//! Products are written by juxtaposition where the result re-parses the same
//! way (`2x`, `xy`, `(x - 4)(x + 4)`), rational coefficients as a trailing
//! division (`3x^2/2`), and negated addends as subtraction.

use crate::engine::expr::Expr;
use num_rational::BigRational;
use num_traits::{One, Signed};
use std::fmt;

const ADD: u8 = 1;
const NEG: u8 = 2;
const MUL: u8 = 3;
const POW: u8 = 4;
const ATOM: u8 = 5;

fn precedence(expr: &Expr) -> u8 {
    match expr {
        Expr::Number(n) if n.is_negative() => NEG,
        Expr::Number(n) if !n.is_integer() => MUL,
        Expr::Number(_) | Expr::Symbol(_) | Expr::ImaginaryUnit => ATOM,
        Expr::Sqrt(_) | Expr::Log(_) => ATOM,
        Expr::Add(..) | Expr::Sub(..) => ADD,
        Expr::Neg(_) => NEG,
        Expr::Mul(..) | Expr::Div(..) => MUL,
        Expr::Pow(..) => POW,
    }
}

/// The positive counterpart of an addend that reads as negative.
fn negated(expr: &Expr) -> Option<Expr> {
    match expr {
        Expr::Neg(inner) => Some((**inner).clone()),
        Expr::Number(n) if n.is_negative() => Some(Expr::number(-n)),
        Expr::Mul(a, b) => match a.as_number() {
            Some(n) if n.is_negative() && (-n).is_one() => Some((**b).clone()),
            Some(n) if n.is_negative() => Some(Expr::mul(Expr::number(-n), (**b).clone())),
            _ => None,
        },
        Expr::Div(a, b) => negated(a).map(|a| Expr::div(a, (**b).clone())),
        _ => None,
    }
}

struct Wrapped<'a>(&'a Expr, bool);

impl fmt::Display for Wrapped<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.1 {
            write!(f, "({})", self.0)
        } else {
            write!(f, "{}", self.0)
        }
    }
}

fn wrap(expr: &Expr, parenthesize: bool) -> Wrapped<'_> {
    Wrapped(expr, parenthesize)
}

fn write_number(f: &mut fmt::Formatter<'_>, n: &BigRational) -> fmt::Result {
    if n.is_integer() {
        write!(f, "{}", n.numer())
    } else {
        write!(f, "{}/{}", n.numer(), n.denom())
    }
}

fn write_product(f: &mut fmt::Formatter<'_>, left: &Expr, right: &Expr) -> fmt::Result {
    // Rational coefficient: p/q * e  ->  p e / q
    if let Some(n) = left.as_number().filter(|n| !n.is_integer()) {
        let sign = if n.is_negative() { "-" } else { "" };
        let magnitude = n.numer().abs();
        let scaled = if magnitude.is_one() {
            right.clone()
        } else {
            Expr::mul(Expr::number(BigRational::from_integer(magnitude)), right.clone())
        };
        return write!(
            f,
            "{}{}/{}",
            sign,
            wrap(&scaled, precedence(&scaled) < MUL),
            n.denom()
        );
    }

    let left_text = wrap(left, precedence(left) <= ADD).to_string();
    let right_text = wrap(right, precedence(right) < MUL).to_string();
    let juxtapose = right_text.starts_with(['x', 'y', 'z', '('])
        || (matches!(right, Expr::ImaginaryUnit) && left.as_number().is_some());
    if juxtapose {
        write!(f, "{}{}", left_text, right_text)
    } else {
        write!(f, "{}*{}", left_text, right_text)
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Number(n) => write_number(f, n),
            Expr::Symbol(s) => write!(f, "{}", s),
            Expr::ImaginaryUnit => f.write_str("i"),
            Expr::Add(a, b) => match negated(b) {
                Some(positive) => write!(f, "{} - {}", a, wrap(&positive, precedence(&positive) <= ADD)),
                None => write!(f, "{} + {}", a, b),
            },
            Expr::Sub(a, b) => write!(f, "{} - {}", a, wrap(b, precedence(b) <= NEG)),
            Expr::Mul(a, b) => write_product(f, a, b),
            Expr::Div(a, b) => write!(
                f,
                "{}/{}",
                wrap(a, precedence(a) <= ADD),
                wrap(b, precedence(b) <= MUL)
            ),
            Expr::Pow(a, b) => write!(
                f,
                "{}^{}",
                wrap(a, precedence(a) <= POW),
                wrap(b, precedence(b) < ATOM)
            ),
            Expr::Neg(a) => write!(f, "-{}", wrap(a, precedence(a) <= NEG)),
            Expr::Sqrt(a) => write!(f, "sqrt({})", a),
            Expr::Log(a) => write!(f, "log({})", a),
        }
    }
}
