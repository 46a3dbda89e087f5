//! Candidate-expression extraction from noisy prose.
//!
//! Maximal runs of expression characters lose their leading and trailing
//! natural-language words (any alphabetic word with a letter other than `x`,
//! `y`, `z` that is not a function name), so "Solve x + 2 = 5" yields
//! `x + 2 = 5`. A word with math on both sides stays in place and the parser
//! reports it.

use regex::Regex;
use std::sync::LazyLock;

static CANDIDATE_RUN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[0-9A-Za-z+\-*/^().,=\s]+").expect("Invalid regex: candidate run")
});

static WORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[A-Za-z]+").expect("Invalid regex: alphabetic word"));

static QUALIFIER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[0-9+\-*/^=xXyYzZ]").expect("Invalid regex: candidate qualifier")
});

/// Function names kept as part of the expression even though the parser
/// rejects them, so the reply names the function.
const FUNCTION_NAMES: [&str; 17] = [
    "sin", "cos", "tan", "cot", "sec", "csc", "asin", "acos", "atan", "sinh", "cosh", "tanh",
    "log", "ln", "exp", "sqrt", "abs",
];

fn is_variable_word(word: &str) -> bool {
    word.chars()
        .all(|c| matches!(c.to_ascii_lowercase(), 'x' | 'y' | 'z'))
}

fn is_function_name(word: &str) -> bool {
    let lowered = word.to_ascii_lowercase();
    FUNCTION_NAMES.contains(&lowered.as_str())
}

fn is_prose_word(word: &str) -> bool {
    !is_variable_word(word) && !is_function_name(word)
}

/// Span from the first to the last qualifying piece between prose words.
fn trim_prose(run: &str) -> Option<&str> {
    let mut bounds: Option<(usize, usize)> = None;
    let mut start = 0;
    let prose_ends = WORD
        .find_iter(run)
        .filter(|word| is_prose_word(word.as_str()))
        .map(|word| (word.start(), word.end()))
        .chain(std::iter::once((run.len(), run.len())));

    for (word_start, word_end) in prose_ends {
        let piece = &run[start..word_start];
        if QUALIFIER.is_match(piece) {
            bounds = Some(match bounds {
                Some((first, _)) => (first, word_start),
                None => (start, word_start),
            });
        }
        start = word_end;
    }

    bounds
        .map(|(first, last)| run[first..last].trim())
        .filter(|candidate| !candidate.is_empty())
}

/// Qualifying candidates in order of appearance, trimmed.
pub fn candidates(text: &str) -> Vec<&str> {
    CANDIDATE_RUN
        .find_iter(text)
        .filter_map(|run| trim_prose(run.as_str()))
        .collect()
}

/// Longest candidate (first one on ties), or `text` unchanged when none qualifies.
pub fn extract(text: &str) -> String {
    candidates(text)
        .into_iter()
        .fold(None, |best: Option<&str>, candidate| match best {
            Some(b) if b.len() >= candidate.len() => Some(b),
            _ => Some(candidate),
        })
        .unwrap_or(text)
        .to_string()
}
