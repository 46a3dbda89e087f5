//! Math-relevance gate.
//!
//! Permissive: a single digit, operator or variable letter is
//! enough to send the query down the math pipeline.

use regex::Regex;
use std::sync::LazyLock;

/// Words that mark a query as math even without symbols.
pub const MATH_KEYWORDS: [&str; 10] = [
    "solve",
    "equation",
    "derivative",
    "differentiate",
    "integral",
    "integrate",
    "simplify",
    "factor",
    "expand",
    "root",
];

static MATH_CHARACTER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[0-9xXyYzZ+\-*/^=]").expect("Invalid regex: math character class")
});

pub fn is_math_query(text: &str) -> bool {
    let lower = text.to_lowercase();
    MATH_KEYWORDS.iter().any(|k| lower.contains(k)) || MATH_CHARACTER.is_match(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keywords_and_symbols() {
        assert!(is_math_query("Please SIMPLIFY this"));
        assert!(is_math_query("what are the roots"));
        assert!(is_math_query("2 apples"));
        assert!(is_math_query("a = b"));
        assert!(is_math_query("Zebra"));
    }

    #[test]
    fn test_plain_prose_rejected() {
        assert!(!is_math_query("Hello there"));
        assert!(!is_math_query("what is the capital of france"));
        assert!(!is_math_query(""));
    }
}
