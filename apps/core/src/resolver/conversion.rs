//! Unit conversion short-circuit.
//!
//! Temperature (°C ↔ °F) and length (km ↔ m) phrases are answered directly,
//! before any math detection runs. First matching pattern wins.

use crate::error::MathError;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::LazyLock;

/// Units the converter understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Unit {
    Celsius,
    Fahrenheit,
    Kilometre,
    Metre,
}

impl Unit {
    /// Suffix written after a value, e.g. `100.0°C` or `5.0 km`.
    pub fn suffix(&self) -> &'static str {
        match self {
            Unit::Celsius => "°C",
            Unit::Fahrenheit => "°F",
            Unit::Kilometre => " km",
            Unit::Metre => " m",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Unit::Celsius => "celsius",
            Unit::Fahrenheit => "fahrenheit",
            Unit::Kilometre => "kilometre",
            Unit::Metre => "metre",
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// A recognised conversion request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConversionMatch {
    pub source: Unit,
    pub target: Unit,
    pub value: f64,
}

impl ConversionMatch {
    pub fn converted(&self) -> f64 {
        let v = self.value;
        match (self.source, self.target) {
            (Unit::Celsius, Unit::Fahrenheit) => v * 9.0 / 5.0 + 32.0,
            (Unit::Fahrenheit, Unit::Celsius) => (v - 32.0) * 5.0 / 9.0,
            (Unit::Kilometre, Unit::Metre) => v * 1000.0,
            (Unit::Metre, Unit::Kilometre) => v / 1000.0,
            _ => v,
        }
    }

    /// `{input}{unit} = {output}{unit}` with shortest round-trip floats.
    pub fn reply(&self) -> String {
        format!(
            "{:?}{} = {:?}{}",
            self.value,
            self.source.suffix(),
            self.converted(),
            self.target.suffix()
        )
    }
}

/// Outcome of the conversion check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversionResult {
    /// Whether a conversion phrase was recognised (even if its number was bad).
    pub handled: bool,
    pub reply: Option<String>,
}

impl ConversionResult {
    fn unhandled() -> Self {
        Self {
            handled: false,
            reply: None,
        }
    }
}

struct ConversionPattern {
    source: Unit,
    target: Unit,
    regex: Regex,
}

// Order matters: first match wins.
static CONVERSION_PATTERNS: LazyLock<Vec<ConversionPattern>> = LazyLock::new(|| {
    vec![
        ConversionPattern {
            source: Unit::Celsius,
            target: Unit::Fahrenheit,
            regex: Regex::new(r"(?i)([0-9.]+)\s*°?\s*c\s*(?:to|in)\s*f")
                .expect("Invalid regex: celsius to fahrenheit"),
        },
        ConversionPattern {
            source: Unit::Fahrenheit,
            target: Unit::Celsius,
            regex: Regex::new(r"(?i)([0-9.]+)\s*°?\s*f\s*(?:to|in)\s*c")
                .expect("Invalid regex: fahrenheit to celsius"),
        },
        ConversionPattern {
            source: Unit::Kilometre,
            target: Unit::Metre,
            regex: Regex::new(r"(?i)([0-9.]+)\s*km\s*(?:to|in)\s*m")
                .expect("Invalid regex: kilometres to metres"),
        },
        ConversionPattern {
            source: Unit::Metre,
            target: Unit::Kilometre,
            regex: Regex::new(r"(?i)([0-9.]+)\s*m\s*(?:to|in)\s*km")
                .expect("Invalid regex: metres to kilometres"),
        },
    ]
});

/// Find the first conversion phrase in `text`.
///
/// `Ok(None)` when nothing matches; `Err` when a phrase matched but its number
/// is not a valid literal (e.g. `1.2.3 km to m`).
pub fn detect(text: &str) -> Result<Option<ConversionMatch>, MathError> {
    for pattern in CONVERSION_PATTERNS.iter() {
        let Some(caps) = pattern.regex.captures(text) else {
            continue;
        };
        let literal = caps.get(1).map_or("", |m| m.as_str());
        let value: f64 = literal.parse().map_err(|_| {
            MathError::Conversion(format!("could not read '{}' as a number", literal))
        })?;
        return Ok(Some(ConversionMatch {
            source: pattern.source,
            target: pattern.target,
            value,
        }));
    }
    Ok(None)
}

pub fn convert(text: &str) -> ConversionResult {
    match detect(text) {
        Ok(Some(found)) => ConversionResult {
            handled: true,
            reply: Some(found.reply()),
        },
        Ok(None) => ConversionResult::unhandled(),
        Err(err) => ConversionResult {
            handled: true,
            reply: Some(err.to_reply()),
        },
    }
}
