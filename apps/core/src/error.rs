use std::io;
use thiserror::Error;

/// Application-wide error type for the shell around the resolver (configuration,
/// logging setup, I/O and the caller-side time budget).
#[derive(Debug, Error)]
pub enum AppError {
    /// Represents standard input/output errors.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Represents data validation errors (e.g., a config value out of range).
    #[error("Validation error: {0}")]
    Validation(String),

    /// Represents configuration-related errors (e.g., malformed environment variables).
    #[error("Configuration error: {0}")]
    Config(String),

    /// Represents unexpected internal errors that indicate a bug.
    #[error("Internal error: {0}")]
    Internal(String),

    /// Represents errors from operations that did not complete in time.
    #[error("Operation timed out: {0}")]
    Timeout(String),
}

impl From<tokio::time::error::Elapsed> for AppError {
    fn from(err: tokio::time::error::Elapsed) -> Self {
        AppError::Timeout(format!("Operation timed out: {}", err))
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Validation(format!("JSON error: {}", err))
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::Validation(format!("Validation errors: {}", err))
    }
}

/// Failures raised while turning untrusted text into a symbolic expression.
///
/// Positions are 1-indexed character offsets into the preprocessed input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("empty expression")]
    Empty,

    #[error("invalid character '{ch}' at position {position}")]
    InvalidCharacter { ch: char, position: usize },

    #[error("invalid number '{value}' at position {position}")]
    InvalidNumber { value: String, position: usize },

    /// Any name outside the parser's symbol table, including function names.
    #[error("unknown identifier '{name}' at position {position}")]
    UnknownIdentifier { name: String, position: usize },

    #[error("expected {expected}, found {found}")]
    UnexpectedToken { expected: String, found: String },

    #[error("unexpected end of input")]
    UnexpectedEndOfInput,

    #[error("expression nested deeper than {0} levels")]
    MaxDepthExceeded(usize),

    #[error("input exceeds {limit} characters")]
    TooLong { limit: usize },
}

/// Every failure the math pipeline can produce below the resolver façade.
///
/// The façade renders each variant exactly once through [`MathError::to_reply`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MathError {
    /// A unit-conversion phrase matched but its number could not be read.
    #[error("{0}")]
    Conversion(String),

    #[error("{0}")]
    Parse(#[from] ParseError),

    /// The symbolic engine could not carry out the requested operation.
    #[error("{0}")]
    Computation(String),

    /// Numeric evaluation was asked of something that is not a finite real number.
    #[error("{0}")]
    NotNumeric(String),
}

impl MathError {
    pub fn division_by_zero() -> Self {
        MathError::Computation("division by zero".to_string())
    }

    /// Category prefix shown to the user.
    pub fn reply_prefix(&self) -> &'static str {
        match self {
            MathError::Conversion(_) => "Error in conversion",
            MathError::Parse(_) | MathError::Computation(_) | MathError::NotNumeric(_) => {
                "Error parsing math expression"
            }
        }
    }

    /// Human-readable reply for this failure.
    pub fn to_reply(&self) -> String {
        format!("{}: {}", self.reply_prefix(), self)
    }
}
