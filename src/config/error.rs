//! Configuration error types

use thiserror::Error;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),
}

/// Errors that can occur during configuration validation
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Required configuration missing: {0}")]
    MissingRequired(&'static str),

    #[error("Invalid port number")]
    InvalidPort,

    #[error("Invalid broker URL format")]
    InvalidBrokerUrl,

    #[error("Event channel name cannot be empty")]
    EmptyChannelName,

    #[error("Ingest and storage channels must differ")]
    ChannelNameCollision,

    #[error("Audit rotation threshold must be positive")]
    InvalidAuditMaxSize,

    #[error("Audit verbosity must be between -4 and 8")]
    InvalidAuditVerbosity,

    #[error("Monitor buffer size must be positive")]
    InvalidBufferSize,

    #[error("Monitor periods must be positive")]
    InvalidMonitorPeriod,
}
