//! Floating-point evaluation.

use crate::engine::expr::Expr;
use crate::error::MathError;
use num_traits::ToPrimitive;

/// Evaluate a closed expression to a finite real `f64`.
pub fn evaluate(expr: &Expr) -> Result<f64, MathError> {
    if let Some(symbol) = expr.free_symbols().first() {
        return Err(MathError::NotNumeric(format!(
            "expression contains the free variable {}",
            symbol
        )));
    }
    let value = eval(expr)?;
    if value.is_finite() {
        Ok(value)
    } else {
        Err(MathError::NotNumeric(
            "result is not a finite real number".to_string(),
        ))
    }
}

fn eval(expr: &Expr) -> Result<f64, MathError> {
    Ok(match expr {
        Expr::Number(n) => n
            .to_f64()
            .ok_or_else(|| MathError::NotNumeric(format!("{} does not fit in a float", n)))?,
        Expr::Symbol(s) => {
            return Err(MathError::NotNumeric(format!(
                "expression contains the free variable {}",
                s
            )))
        }
        Expr::ImaginaryUnit => {
            return Err(MathError::NotNumeric(
                "expression is not a real number".to_string(),
            ))
        }
        Expr::Add(a, b) => eval(a)? + eval(b)?,
        Expr::Sub(a, b) => eval(a)? - eval(b)?,
        Expr::Mul(a, b) => eval(a)? * eval(b)?,
        Expr::Div(a, b) => eval(a)? / eval(b)?,
        Expr::Pow(a, b) => eval(a)?.powf(eval(b)?),
        Expr::Neg(a) => -eval(a)?,
        Expr::Sqrt(a) => eval(a)?.sqrt(),
        Expr::Log(a) => eval(a)?.ln(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::expr::SymbolTable;
    use crate::engine::parser::parse;

    fn n(input: &str) -> Result<f64, MathError> {
        evaluate(&parse(input, &SymbolTable::standard()).unwrap())
    }

    #[test]
    fn test_arithmetic() {
        assert_eq!(n("2 + 3*4").unwrap(), 14.0);
        assert_eq!(n("2^10").unwrap(), 1024.0);
        assert_eq!(n("1/4").unwrap(), 0.25);
        assert!((n("2^0.5").unwrap() - std::f64::consts::SQRT_2).abs() < 1e-12);
    }

    #[test]
    fn test_not_numeric() {
        assert!(matches!(n("x + 1"), Err(MathError::NotNumeric(_))));
        assert!(matches!(n("1/0"), Err(MathError::NotNumeric(_))));
        assert!(matches!(n("(-8)^0.5"), Err(MathError::NotNumeric(_))));
        assert!(matches!(
            evaluate(&Expr::ImaginaryUnit),
            Err(MathError::NotNumeric(_))
        ));
    }
}
