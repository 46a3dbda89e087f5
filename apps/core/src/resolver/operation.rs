//! Operation classification using regex trigger patterns.
//!
//! Triggers are checked in a fixed precedence order and the first hit wins,
//! so "simplify the derivative of x^2" is a derivative request.

use crate::resolver::extractor::extract;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::LazyLock;

/// Requested mathematical operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    /// d/dx (derivative, differentiate, d/dx)
    Derivative,
    /// Indefinite integral in x (integral, integrate, antiderivative)
    Integral,
    Simplify,
    Factor,
    Expand,
    /// Default: solve when the expression has `=`, evaluate otherwise
    SolveOrEvaluate,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl Operation {
    /// Classification order, highest priority first.
    pub const PRECEDENCE: [Operation; 6] = [
        Operation::Derivative,
        Operation::Integral,
        Operation::Simplify,
        Operation::Factor,
        Operation::Expand,
        Operation::SolveOrEvaluate,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Operation::Derivative => "derivative",
            Operation::Integral => "integral",
            Operation::Simplify => "simplify",
            Operation::Factor => "factor",
            Operation::Expand => "expand",
            Operation::SolveOrEvaluate => "solve_or_evaluate",
        }
    }

    /// Trigger pattern, `None` for the default operation.
    fn trigger_pattern(&self) -> Option<&'static str> {
        match self {
            Operation::Derivative => Some(r"(?i)\b(?:derivative|differentiate|d/dx)\b"),
            Operation::Integral => Some(r"(?i)\b(?:integral|integrate|antiderivative)\b"),
            Operation::Simplify => Some(r"(?i)\b(?:simplify|simplification)\b"),
            Operation::Factor => Some(r"(?i)\b(?:factor|factorize)\b"),
            Operation::Expand => Some(r"(?i)\bexpand\b"),
            Operation::SolveOrEvaluate => None,
        }
    }
}

/// Result of operation classification
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classification {
    pub operation: Operation,
    /// Expression text handed to the dispatcher
    pub expression: String,
    /// Trigger text that selected the operation, if any
    pub trigger: Option<String>,
}

struct OperationPattern {
    operation: Operation,
    regex: Regex,
}

static OPERATION_PATTERNS: LazyLock<Vec<OperationPattern>> = LazyLock::new(|| {
    Operation::PRECEDENCE
        .iter()
        .filter_map(|op| {
            op.trigger_pattern().map(|pattern| OperationPattern {
                operation: *op,
                regex: Regex::new(pattern).expect("Invalid regex: operation trigger"),
            })
        })
        .collect()
});

/// Operation classifier
pub struct OperationClassifier;

impl OperationClassifier {
    pub fn classify(query: &str) -> Operation {
        Self::classify_detailed(query).operation
    }

    /// Classify and work out which text the operation applies to.
    ///
    /// For keyword operations the trigger words are removed from the lowercased
    /// query before re-extracting, so "Find the derivative of x^2" applies to
    /// `x^2`. If nothing remains, the plain extraction is used.
    pub fn classify_detailed(query: &str) -> Classification {
        let extracted = extract(query);

        for pattern in OPERATION_PATTERNS.iter() {
            let Some(hit) = pattern.regex.find(query) else {
                continue;
            };
            let lowered = query.to_lowercase();
            let stripped = pattern.regex.replace_all(&lowered, " ");
            let remainder = stripped.trim();
            let expression = if remainder.is_empty() {
                extracted
            } else {
                extract(remainder)
            };
            return Classification {
                operation: pattern.operation,
                expression,
                trigger: Some(hit.as_str().to_string()),
            };
        }

        Classification {
            operation: Operation::SolveOrEvaluate,
            expression: extracted,
            trigger: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_precedence_table_order() {
        assert_eq!(Operation::PRECEDENCE[0], Operation::Derivative);
        assert_eq!(
            Operation::PRECEDENCE.last(),
            Some(&Operation::SolveOrEvaluate)
        );
        assert_eq!(OPERATION_PATTERNS.len(), 5);
    }

    #[test]
    fn test_higher_precedence_wins() {
        assert_eq!(
            OperationClassifier::classify("simplify derivative of x^2"),
            Operation::Derivative
        );
        assert_eq!(
            OperationClassifier::classify("expand then factor x^2 - 1"),
            Operation::Factor
        );
        assert_eq!(
            OperationClassifier::classify("integrate and simplify x"),
            Operation::Integral
        );
    }

    #[test]
    fn test_triggers_stripped_from_expression() {
        let c = OperationClassifier::classify_detailed("Find the derivative of x^2 + 3x");
        assert_eq!(c.operation, Operation::Derivative);
        assert_eq!(c.expression, "x^2 + 3x");
        assert_eq!(c.trigger.as_deref(), Some("derivative"));

        let c = OperationClassifier::classify_detailed("d/dx x^3");
        assert_eq!(c.expression, "x^3");
    }

    #[test]
    fn test_default_operation() {
        let c = OperationClassifier::classify_detailed("Solve x + 2 = 5");
        assert_eq!(c.operation, Operation::SolveOrEvaluate);
        assert_eq!(c.expression, "x + 2 = 5");
        assert_eq!(c.trigger, None);
    }

    #[test]
    fn test_word_boundaries() {
        // "factorial" is not "factor"
        assert_eq!(
            OperationClassifier::classify("factorial of 5"),
            Operation::SolveOrEvaluate
        );
    }
}
