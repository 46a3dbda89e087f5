//! Routes a classified operation to the symbolic engine and formats the reply.

use crate::engine::{Expr, Solution, Symbol, SymbolicEngine};
use crate::error::MathError;
use crate::resolver::operation::Operation;
use crate::resolver::parser::SafeExpressionParser;
use tracing::debug;

/// Calculus is always taken with respect to `x`.
pub const CALCULUS_VARIABLE: Symbol = Symbol::X;

pub struct OperationDispatcher<'a, E: ?Sized> {
    engine: &'a E,
    parser: SafeExpressionParser<'a, E>,
}

impl<'a, E: SymbolicEngine + ?Sized> OperationDispatcher<'a, E> {
    pub fn new(engine: &'a E) -> Self {
        Self {
            engine,
            parser: SafeExpressionParser::new(engine),
        }
    }

    pub fn dispatch(&self, operation: Operation, expression: &str) -> Result<String, MathError> {
        debug!(%operation, expression, "dispatching");
        match operation {
            Operation::Derivative => {
                let expr = self.parse(expression)?;
                let derivative = self.engine.differentiate(&expr, CALCULUS_VARIABLE)?;
                let derivative = self.engine.simplify(&derivative)?;
                Ok(format!("Derivative (d/dx): {}", derivative))
            }
            Operation::Integral => {
                let expr = self.parse(expression)?;
                let integral = self.engine.integrate(&expr, CALCULUS_VARIABLE)?;
                let integral = self.engine.simplify(&integral)?;
                Ok(format!("Indefinite integral: {} + C", integral))
            }
            Operation::Simplify => {
                let expr = self.parse(expression)?;
                Ok(format!("Simplified: {}", self.engine.simplify(&expr)?))
            }
            Operation::Factor => {
                let expr = self.parse(expression)?;
                Ok(format!("Factored: {}", self.engine.factor(&expr)?))
            }
            Operation::Expand => {
                let expr = self.parse(expression)?;
                Ok(format!("Expanded: {}", self.engine.expand(&expr)?))
            }
            Operation::SolveOrEvaluate => match expression.split_once('=') {
                Some((left, right)) => self.solve(left, right),
                None => self.evaluate(expression),
            },
        }
    }

    fn parse(&self, text: &str) -> Result<Expr, MathError> {
        Ok(self.parser.parse(text)?)
    }

    fn solve(&self, left: &str, right: &str) -> Result<String, MathError> {
        let residual = Expr::sub(self.parse(left)?, self.parse(right)?);
        let symbols = residual.free_symbols();
        let solutions = self.engine.solve(&residual, &symbols)?;
        Ok(format!(
            "Solved: [{}]",
            render_solutions(&solutions, symbols.len() > 1)
        ))
    }

    fn evaluate(&self, expression: &str) -> Result<String, MathError> {
        let expr = self.parse(expression)?;
        match self.engine.numeric_evaluate(&expr) {
            Ok(value) => Ok(format!("Result: {:?}", value)),
            Err(MathError::NotNumeric(reason)) => {
                debug!(%reason, "not numeric, simplifying instead");
                Ok(format!("Result: {}", self.engine.simplify(&expr)?))
            }
            Err(err) => Err(err),
        }
    }
}

/// `3, -3` for a single unknown, `{x: -y + 3}` when several were requested.
fn render_solutions(solutions: &[Solution], keyed: bool) -> String {
    solutions
        .iter()
        .map(|s| {
            if keyed {
                format!("{{{}}}", s)
            } else {
                s.value.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::PolyEngine;

    fn run(operation: Operation, expression: &str) -> Result<String, MathError> {
        OperationDispatcher::new(&PolyEngine).dispatch(operation, expression)
    }

    #[test]
    fn test_reply_formats() {
        assert_eq!(
            run(Operation::Derivative, "x^2 + 3x").unwrap(),
            "Derivative (d/dx): 2x + 3"
        );
        assert_eq!(
            run(Operation::Integral, "2x").unwrap(),
            "Indefinite integral: x^2 + C"
        );
        assert_eq!(
            run(Operation::Simplify, "(x^2 - 1)/(x - 1)").unwrap(),
            "Simplified: x + 1"
        );
        assert_eq!(
            run(Operation::Factor, "x^2 - 16").unwrap(),
            "Factored: (x - 4)(x + 4)"
        );
        assert_eq!(
            run(Operation::Expand, "(x + 1)(x - 1)").unwrap(),
            "Expanded: x^2 - 1"
        );
    }

    #[test]
    fn test_solve_splits_on_first_equals() {
        assert_eq!(run(Operation::SolveOrEvaluate, "x + 2 = 5").unwrap(), "Solved: [3]");
        assert_eq!(run(Operation::SolveOrEvaluate, "2 = 3").unwrap(), "Solved: []");
        assert_eq!(
            run(Operation::SolveOrEvaluate, "x + y = 3").unwrap(),
            "Solved: [{x: -y + 3}]"
        );
        assert!(matches!(
            run(Operation::SolveOrEvaluate, "x = 1 = 2"),
            Err(MathError::Parse(_))
        ));
    }

    #[test]
    fn test_evaluate_falls_back_to_simplify() {
        assert_eq!(run(Operation::SolveOrEvaluate, "2 + 3").unwrap(), "Result: 5.0");
        assert_eq!(
            run(Operation::SolveOrEvaluate, "x + x").unwrap(),
            "Result: 2x"
        );
        assert_eq!(
            run(Operation::SolveOrEvaluate, "1/0"),
            Err(MathError::division_by_zero())
        );
    }
}
