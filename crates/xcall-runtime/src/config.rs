//! Runtime configuration (xcall.toml)
//!
//! ```toml
//! [boundary]
//! max_call_depth = 32
//! max_marshal_bytes = 67108864
//! trace_calls = false
//!
//! [logging]
//! level = "info"
//! format = "compact"
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::RuntimeError;

/// Whole configuration file
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct RuntimeConfig {
    /// Boundary limits
    #[serde(default)]
    pub boundary: BoundaryConfig,

    /// Logging setup
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl RuntimeConfig {
    /// Parse and validate TOML text
    pub fn from_toml_str(text: &str) -> Result<Self, RuntimeError> {
        let config: RuntimeConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a configuration file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, RuntimeError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Reject configurations the boundary cannot run with
    pub fn validate(&self) -> Result<(), RuntimeError> {
        if self.boundary.max_call_depth == 0 {
            return Err(RuntimeError::InvalidConfig(
                "boundary.max_call_depth must be at least 1".to_string(),
            ));
        }
        if self.boundary.max_marshal_bytes == 0 {
            return Err(RuntimeError::InvalidConfig(
                "boundary.max_marshal_bytes must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Limits applied to every boundary call
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BoundaryConfig {
    /// Deepest allowed nesting of forward and reverse calls
    #[serde(default = "default_max_call_depth")]
    pub max_call_depth: usize,

    /// Largest string or array payload a single value may carry
    #[serde(default = "default_max_marshal_bytes")]
    pub max_marshal_bytes: usize,

    /// Emit a trace event with arguments and results of every call
    #[serde(default)]
    pub trace_calls: bool,
}

fn default_max_call_depth() -> usize {
    32
}

fn default_max_marshal_bytes() -> usize {
    64 * 1024 * 1024
}

impl Default for BoundaryConfig {
    fn default() -> Self {
        Self {
            max_call_depth: default_max_call_depth(),
            max_marshal_bytes: default_max_marshal_bytes(),
            trace_calls: false,
        }
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Multi-line human-readable output
    Pretty,
    /// Single-line output
    #[default]
    Compact,
    /// One JSON object per event
    Json,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoggingConfig {
    /// Default level or filter directives (e.g. "info,xcall_runtime=debug")
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Output format
    #[serde(default)]
    pub format: LogFormat,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
        }
    }
}
