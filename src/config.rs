//! # Generator Configuration
//!
//! Process-level settings loaded from environment variables.
//!
//! The CLI exposes the same settings as flags; a flag wins over the
//! environment, the environment wins over the defaults below.

use crate::constants::DEFAULT_SOPS_BINARY;
use std::fmt;
use std::str::FromStr;

/// Log output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// Human readable lines
    #[default]
    Text,
    /// One JSON object per event
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "text" => Ok(LogFormat::Text),
            "json" => Ok(LogFormat::Json),
            other => Err(format!("unknown log format \"{other}\", use text or json")),
        }
    }
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogFormat::Text => f.write_str("text"),
            LogFormat::Json => f.write_str("json"),
        }
    }
}

/// Generator-level configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorConfig {
    /// Program used to decrypt sources, looked up on PATH unless it is a path
    pub sops_binary: String,
    /// Tracing filter directive (e.g. `debug`, `sops_secret_generator=trace`)
    /// When unset, `RUST_LOG` and then the built-in default apply
    pub log_level: Option<String>,
    /// Log format (text, json)
    pub log_format: LogFormat,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            sops_binary: DEFAULT_SOPS_BINARY.to_string(),
            log_level: None,
            log_format: LogFormat::Text,
        }
    }
}

impl GeneratorConfig {
    /// Load configuration from environment variables with defaults
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            sops_binary: env_var_or_default_str(
                "SOPS_SECRET_GENERATOR_SOPS_BINARY",
                DEFAULT_SOPS_BINARY,
            ),
            log_level: std::env::var("SOPS_SECRET_GENERATOR_LOG")
                .ok()
                .filter(|v| !v.trim().is_empty()),
            log_format: env_var_or_default("SOPS_SECRET_GENERATOR_LOG_FORMAT", LogFormat::Text),
        }
    }
}

/// Read environment variable and parse it, or return default
fn env_var_or_default<T: FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

/// Read environment variable as string or return default
fn env_var_or_default_str(key: &str, default: &str) -> String {
    std::env::var(key)
        .ok()
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| default.to_string())
}
