//! # Observability
//!
//! Structured logging for the generator.
//!
//! Events go to stderr because stdout carries the generated documents.
//! The filter is taken from, in order: the configured log level, `RUST_LOG`,
//! then [`DEFAULT_LOG_FILTER`].

use crate::config::{GeneratorConfig, LogFormat};
use crate::constants::DEFAULT_LOG_FILTER;
use anyhow::{anyhow, Context, Result};
use tracing_subscriber::EnvFilter;

/// Install the global tracing subscriber
///
/// # Errors
///
/// Returns an error if the configured filter is invalid or a subscriber is
/// already installed.
pub fn init_logging(config: &GeneratorConfig) -> Result<()> {
    let filter = log_filter(config)?;

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false);

    match config.log_format {
        LogFormat::Text => builder.try_init(),
        LogFormat::Json => builder.json().try_init(),
    }
    .map_err(|e| anyhow!("Failed to initialize logging: {e}"))
}

fn log_filter(config: &GeneratorConfig) -> Result<EnvFilter> {
    match config.log_level.as_deref() {
        Some(directives) => EnvFilter::try_new(directives)
            .with_context(|| format!("Invalid log level \"{directives}\"")),
        None => Ok(EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER))),
    }
}
