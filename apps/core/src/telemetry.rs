//! Tracing subscriber setup for the CLI.

use crate::config::LogFormat;
use crate::error::AppError;
use tracing_bunyan_formatter::{BunyanFormattingLayer, JsonStorageLayer};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

pub const APP_NAME: &str = "mathquery";

/// `RUST_LOG` filter, `info` when unset or invalid.
pub fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Install the global subscriber. All output goes to stderr so stdout stays
/// reserved for replies.
pub fn init_tracing(format: LogFormat) -> Result<(), AppError> {
    let pretty = (format == LogFormat::Pretty)
        .then(|| fmt::layer().with_writer(std::io::stderr).with_target(false));
    let json = (format == LogFormat::Json).then(|| {
        fmt::layer()
            .json()
            .with_current_span(true)
            .with_writer(std::io::stderr)
    });
    let bunyan = (format == LogFormat::Bunyan).then(|| {
        (
            JsonStorageLayer,
            BunyanFormattingLayer::new(APP_NAME.to_string(), std::io::stderr),
        )
    });
    let (storage, bunyan) = match bunyan {
        Some((storage, layer)) => (Some(storage), Some(layer)),
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(env_filter())
        .with(pretty)
        .with(json)
        .with(storage)
        .with(bunyan)
        .try_init()
        .map_err(|e| AppError::Internal(format!("failed to install tracing subscriber: {}", e)))
}
