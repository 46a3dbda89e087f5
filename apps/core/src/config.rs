//! Runtime configuration.
//!
//! Values come from the process environment (after loading a `.env` file if
//! one exists) or from an explicit env file, fall back to defaults, and are
//! validated before use.

use crate::error::AppError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;
use validator::Validate;

pub const ENV_MAX_QUERY_CHARS: &str = "MATHQUERY_MAX_QUERY_CHARS";
pub const ENV_QUERY_TIMEOUT_MS: &str = "MATHQUERY_QUERY_TIMEOUT_MS";
pub const ENV_LOG_FORMAT: &str = "MATHQUERY_LOG_FORMAT";

/// Output format of the tracing subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable lines
    #[default]
    Pretty,
    /// One JSON object per event
    Json,
    /// Bunyan-compatible JSON
    Bunyan,
}

impl LogFormat {
    pub fn label(&self) -> &'static str {
        match self {
            LogFormat::Pretty => "pretty",
            LogFormat::Json => "json",
            LogFormat::Bunyan => "bunyan",
        }
    }
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for LogFormat {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pretty" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            "bunyan" => Ok(LogFormat::Bunyan),
            other => Err(AppError::Config(format!(
                "unknown log format '{}' (expected pretty, json or bunyan)",
                other
            ))),
        }
    }
}

/// Settings for the resolver and its CLI driver.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct ResolverConfig {
    /// Longer queries are rejected before any regex or parsing work.
    #[validate(range(min = 1, max = 20000))]
    pub max_query_chars: usize,
    /// Wall-clock budget per query in the CLI driver.
    #[validate(range(min = 1, max = 600000))]
    pub query_timeout_ms: u64,
    pub log_format: LogFormat,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            max_query_chars: 2000,
            query_timeout_ms: 5000,
            log_format: LogFormat::Pretty,
        }
    }
}

impl ResolverConfig {
    /// Load from the environment, reading `.env` in the working directory first
    /// if present.
    pub fn from_env() -> Result<Self, AppError> {
        dotenv::dotenv().ok();
        Self::from_vars()
    }

    /// Load `path` into the environment, then read the configuration from it.
    /// Variables already set in the process take precedence.
    pub fn from_env_file(path: &Path) -> Result<Self, AppError> {
        dotenv::from_path(path).map_err(|e| {
            AppError::Config(format!("cannot load env file {}: {}", path.display(), e))
        })?;
        Self::from_vars()
    }

    fn from_vars() -> Result<Self, AppError> {
        let mut config = Self::default();
        if let Some(value) = read_var(ENV_MAX_QUERY_CHARS) {
            config.max_query_chars = parse_var(ENV_MAX_QUERY_CHARS, &value)?;
        }
        if let Some(value) = read_var(ENV_QUERY_TIMEOUT_MS) {
            config.query_timeout_ms = parse_var(ENV_QUERY_TIMEOUT_MS, &value)?;
        }
        if let Some(value) = read_var(ENV_LOG_FORMAT) {
            config.log_format = value.parse()?;
        }
        config.validate()?;
        Ok(config)
    }

    pub fn query_timeout(&self) -> Duration {
        Duration::from_millis(self.query_timeout_ms)
    }
}

fn read_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn parse_var<T>(name: &str, value: &str) -> Result<T, AppError>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    value
        .trim()
        .parse()
        .map_err(|e| AppError::Config(format!("{} must be a number, got '{}': {}", name, value, e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = ResolverConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.query_timeout(), Duration::from_millis(5000));
    }

    #[test]
    fn test_log_format_parsing() {
        assert_eq!("JSON".parse::<LogFormat>().unwrap(), LogFormat::Json);
        assert_eq!(" bunyan ".parse::<LogFormat>().unwrap(), LogFormat::Bunyan);
        assert!(matches!(
            "xml".parse::<LogFormat>(),
            Err(AppError::Config(_))
        ));
    }

    #[test]
    fn test_out_of_range_rejected() {
        let config = ResolverConfig {
            max_query_chars: 0,
            ..ResolverConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
