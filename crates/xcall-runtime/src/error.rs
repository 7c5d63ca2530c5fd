//! Runtime error types

use xcall_sdk::BoundaryError;

/// Errors raised while configuring or bootstrapping a boundary.
#[derive(Debug, thiserror::Error)]
pub enum RuntimeError {
    /// Failed to read a configuration file
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to parse TOML
    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    /// Configuration parsed but is unusable
    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    /// Logging could not be initialized
    #[error("Logging error: {0}")]
    Logging(String),

    /// Boundary fault during startup
    #[error("{0}")]
    Boundary(#[from] BoundaryError),
}
