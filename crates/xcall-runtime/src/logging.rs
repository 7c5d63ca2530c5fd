//! Logging bootstrap
//!
//! Installs a global `tracing` subscriber. The `XCALL_LOG` environment
//! variable, when set, takes precedence over the configured level.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use crate::config::{LogFormat, LoggingConfig};
use crate::error::RuntimeError;

/// Environment variable holding filter directives
pub const LOG_ENV: &str = "XCALL_LOG";

/// Build the filter for `config`, preferring `XCALL_LOG`.
pub fn build_filter(config: &LoggingConfig) -> Result<EnvFilter, RuntimeError> {
    match std::env::var(LOG_ENV) {
        Ok(directives) if !directives.trim().is_empty() => EnvFilter::try_new(directives)
            .map_err(|e| RuntimeError::Logging(format!("{}: {}", LOG_ENV, e))),
        _ => EnvFilter::try_new(&config.level)
            .map_err(|e| RuntimeError::Logging(format!("logging.level: {}", e))),
    }
}

/// Install the global subscriber.
///
/// Fails if the filter is invalid or a subscriber is already installed.
pub fn init_logging(config: &LoggingConfig) -> Result<(), RuntimeError> {
    let filter = build_filter(config)?;
    let layer = match config.format {
        LogFormat::Pretty => fmt::layer()
            .with_writer(std::io::stderr)
            .pretty()
            .with_filter(filter)
            .boxed(),
        LogFormat::Compact => fmt::layer()
            .with_writer(std::io::stderr)
            .compact()
            .with_filter(filter)
            .boxed(),
        LogFormat::Json => fmt::layer()
            .with_writer(std::io::stderr)
            .json()
            .with_filter(filter)
            .boxed(),
    };

    tracing_subscriber::registry()
        .with(layer)
        .try_init()
        .map_err(|e| RuntimeError::Logging(e.to_string()))
}
