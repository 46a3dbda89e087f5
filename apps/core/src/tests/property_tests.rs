//! Property-Based Testing
//!
//! Uses quickcheck to check that the resolver:
//! - never panics on arbitrary text
//! - always answers with a non-empty reply
//! - keeps `handled = false` for gate rejections only

use quickcheck::{Arbitrary, Gen, QuickCheck, TestResult};

use crate::resolver::facade::NOT_MATH_REPLY;
use crate::resolver::{is_math_query, MathQueryResolver};

// ============================================================
// QUERY GENERATORS
// ============================================================

/// Small expression over x, y, z with every operator the parser knows.
fn gen_expr_string(g: &mut Gen, depth: usize) -> String {
    if depth == 0 {
        return match u8::arbitrary(g) % 5 {
            0 => "x".to_string(),
            1 => "y".to_string(),
            2 => "z".to_string(),
            3 => format!("{}.5", u8::arbitrary(g) % 10),
            _ => (u8::arbitrary(g) % 10).to_string(),
        };
    }
    match u8::arbitrary(g) % 8 {
        0..=3 => {
            let ops = ["+", "-", "*", "/", "^"];
            let op = ops[usize::arbitrary(g) % ops.len()];
            let left = gen_expr_string(g, depth - 1);
            let right = gen_expr_string(g, depth - 1);
            format!("({} {} {})", left, op, right)
        }
        4 => format!("-{}", gen_expr_string(g, depth - 1)),
        5 => {
            // implicit multiplication
            let left = gen_expr_string(g, depth - 1);
            let right = gen_expr_string(g, depth - 1);
            format!("{}{}", left, right)
        }
        _ => gen_expr_string(g, depth - 1),
    }
}

fn gen_query(g: &mut Gen) -> String {
    let prefixes = [
        "",
        "what is ",
        "derivative of ",
        "integrate ",
        "simplify ",
        "factor ",
        "expand ",
        "solve ",
    ];
    let prefix = prefixes[usize::arbitrary(g) % prefixes.len()];
    let expr = gen_expr_string(g, 3);
    if bool::arbitrary(g) {
        format!("{}{} = {}", prefix, expr, gen_expr_string(g, 2))
    } else {
        format!("{}{}", prefix, expr)
    }
}

#[cfg(test)]
mod resolver_property_tests {
    use super::*;

    /// Property: arbitrary text never panics and always gets a reply
    #[test]
    fn test_never_panics_on_random_text() {
        fn prop_reply_non_empty(input: String) -> TestResult {
            let reply = MathQueryResolver::new().handle_math_query(&input);
            TestResult::from_bool(!reply.reply.is_empty())
        }
        QuickCheck::new()
            .tests(1000)
            .max_tests(2000)
            .quickcheck(prop_reply_non_empty as fn(String) -> TestResult);
    }

    /// Property: generated math queries are always handled
    #[test]
    fn test_generated_queries_are_handled() {
        fn prop_generated_handled() -> bool {
            let mut g = Gen::new(10);
            let query = gen_query(&mut g);
            let reply = MathQueryResolver::new().handle_math_query(&query);
            reply.handled && !reply.reply.is_empty()
        }
        QuickCheck::new()
            .tests(300)
            .quickcheck(prop_generated_handled as fn() -> bool);
    }

    /// Property: `handled = false` exactly when the gate rejects non-blank text
    #[test]
    fn test_unhandled_only_from_gate() {
        fn prop_unhandled_means_not_math(input: String) -> TestResult {
            if input.trim().is_empty() || input.chars().count() > 2000 {
                return TestResult::discard();
            }
            let reply = MathQueryResolver::new().handle_math_query(&input);
            if reply.handled {
                TestResult::passed()
            } else {
                TestResult::from_bool(!is_math_query(&input) && reply.reply == NOT_MATH_REPLY)
            }
        }
        QuickCheck::new()
            .tests(500)
            .quickcheck(prop_unhandled_means_not_math as fn(String) -> TestResult);
    }
}
