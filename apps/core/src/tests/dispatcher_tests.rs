//! Dispatcher Tests
//!
//! Runs the dispatcher and the façade against a canned engine so reply
//! formatting and error mapping are checked independently of `PolyEngine`.

use crate::engine::{parser, Expr, Solution, Symbol, SymbolTable, SymbolicEngine};
use crate::error::{MathError, ParseError};
use crate::resolver::{MathQueryResolver, MathReply, Operation, OperationDispatcher};
use std::sync::Mutex;

/// Engine double: parses for real, answers everything else from fixed values
/// and records what it was asked.
#[derive(Default)]
struct MockEngine {
    calls: Mutex<Vec<String>>,
    numeric: Option<f64>,
    fail_with: Option<MathError>,
    panic_on_differentiate: bool,
}

impl MockEngine {
    fn record(&self, call: impl Into<String>) {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(call.into());
        }
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    fn canned(&self, value: i64) -> Result<Expr, MathError> {
        match &self.fail_with {
            Some(err) => Err(err.clone()),
            None => Ok(Expr::integer(value)),
        }
    }
}

impl SymbolicEngine for MockEngine {
    fn parse(&self, text: &str, symbols: &SymbolTable) -> Result<Expr, ParseError> {
        self.record(format!("parse {}", text));
        parser::parse(text, symbols)
    }

    fn differentiate(&self, _expr: &Expr, var: Symbol) -> Result<Expr, MathError> {
        self.record(format!("differentiate {}", var));
        if self.panic_on_differentiate {
            panic!("mock engine blew up");
        }
        self.canned(11)
    }

    fn integrate(&self, _expr: &Expr, var: Symbol) -> Result<Expr, MathError> {
        self.record(format!("integrate {}", var));
        self.canned(22)
    }

    fn simplify(&self, expr: &Expr) -> Result<Expr, MathError> {
        self.record("simplify");
        match &self.fail_with {
            Some(err) => Err(err.clone()),
            None => Ok(expr.clone()),
        }
    }

    fn factor(&self, _expr: &Expr) -> Result<Expr, MathError> {
        self.record("factor");
        self.canned(33)
    }

    fn expand(&self, _expr: &Expr) -> Result<Expr, MathError> {
        self.record("expand");
        self.canned(44)
    }

    fn solve(&self, _expr: &Expr, symbols: &[Symbol]) -> Result<Vec<Solution>, MathError> {
        let names: Vec<&str> = symbols.iter().map(|s| s.name()).collect();
        self.record(format!("solve {}", names.join(",")));
        if let Some(err) = &self.fail_with {
            return Err(err.clone());
        }
        Ok(symbols
            .iter()
            .map(|&symbol| Solution {
                symbol,
                value: Expr::integer(7),
            })
            .collect())
    }

    fn numeric_evaluate(&self, _expr: &Expr) -> Result<f64, MathError> {
        self.record("numeric_evaluate");
        self.numeric
            .ok_or_else(|| MathError::NotNumeric("canned engine has no value".to_string()))
    }
}

#[cfg(test)]
mod dispatch_tests {
    use super::*;

    #[test]
    fn test_derivative_is_taken_in_x_then_simplified() {
        let engine = MockEngine::default();
        let reply = OperationDispatcher::new(&engine)
            .dispatch(Operation::Derivative, "y^2")
            .unwrap();
        assert_eq!(reply, "Derivative (d/dx): 11");
        assert_eq!(
            engine.calls(),
            vec!["parse y**2", "differentiate x", "simplify"]
        );
    }

    #[test]
    fn test_keyword_operation_formats() {
        let engine = MockEngine::default();
        let dispatcher = OperationDispatcher::new(&engine);
        assert_eq!(
            dispatcher.dispatch(Operation::Integral, "x").unwrap(),
            "Indefinite integral: 22 + C"
        );
        assert_eq!(
            dispatcher.dispatch(Operation::Factor, "x").unwrap(),
            "Factored: 33"
        );
        assert_eq!(
            dispatcher.dispatch(Operation::Expand, "x").unwrap(),
            "Expanded: 44"
        );
        assert_eq!(
            dispatcher.dispatch(Operation::Simplify, "x + 1").unwrap(),
            "Simplified: x + 1"
        );
    }

    #[test]
    fn test_solve_requests_free_symbols_in_order() {
        let engine = MockEngine::default();
        let reply = OperationDispatcher::new(&engine)
            .dispatch(Operation::SolveOrEvaluate, "z + x = 1")
            .unwrap();
        assert_eq!(reply, "Solved: [{x: 7}, {z: 7}]");
        assert!(engine.calls().contains(&"solve x,z".to_string()));
    }

    #[test]
    fn test_constant_equation_solves_to_empty_list() {
        let engine = MockEngine::default();
        let reply = OperationDispatcher::new(&engine)
            .dispatch(Operation::SolveOrEvaluate, "2 = 3")
            .unwrap();
        assert_eq!(reply, "Solved: []");
    }

    #[test]
    fn test_evaluate_uses_numeric_value() {
        let engine = MockEngine {
            numeric: Some(2.5),
            ..MockEngine::default()
        };
        let reply = OperationDispatcher::new(&engine)
            .dispatch(Operation::SolveOrEvaluate, "5/2")
            .unwrap();
        assert_eq!(reply, "Result: 2.5");
        assert!(!engine.calls().contains(&"simplify".to_string()));
    }

    #[test]
    fn test_not_numeric_falls_back_to_simplify() {
        let engine = MockEngine::default();
        let reply = OperationDispatcher::new(&engine)
            .dispatch(Operation::SolveOrEvaluate, "x")
            .unwrap();
        assert_eq!(reply, "Result: x");
        assert_eq!(
            engine.calls(),
            vec!["parse x", "numeric_evaluate", "simplify"]
        );
    }

    #[test]
    fn test_engine_errors_propagate_unrendered() {
        let engine = MockEngine {
            fail_with: Some(MathError::Computation("canned failure".to_string())),
            ..MockEngine::default()
        };
        let result = OperationDispatcher::new(&engine).dispatch(Operation::Factor, "x");
        assert_eq!(
            result,
            Err(MathError::Computation("canned failure".to_string()))
        );
    }
}

#[cfg(test)]
mod facade_with_mock_tests {
    use super::*;

    #[test]
    fn test_engine_error_rendered_once() {
        let engine = MockEngine {
            fail_with: Some(MathError::Computation("canned failure".to_string())),
            ..MockEngine::default()
        };
        let reply = MathQueryResolver::with_engine(engine).handle_math_query("factor x^2");
        assert_eq!(
            reply,
            MathReply::handled("Error parsing math expression: canned failure")
        );
    }

    #[test]
    fn test_engine_panic_is_contained() {
        let engine = MockEngine {
            panic_on_differentiate: true,
            ..MockEngine::default()
        };
        let resolver = MathQueryResolver::with_engine(engine);
        let reply = resolver.handle_math_query("derivative of x^2");
        assert_eq!(
            reply,
            MathReply::handled("Error parsing math expression: internal engine failure")
        );
        // The call was recorded before the panic.
        assert!(resolver
            .engine()
            .calls()
            .contains(&"differentiate x".to_string()));
    }

    #[test]
    fn test_gate_and_conversion_skip_engine() {
        let resolver = MathQueryResolver::with_engine(MockEngine::default());
        assert!(!resolver.handle_math_query("good morning").handled);
        assert!(resolver.handle_math_query("10 km to m").handled);
        assert!(resolver.engine().calls().is_empty());
    }
}
