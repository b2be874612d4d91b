//! Simulation Error Types

use thiserror::Error;

/// Errors that stop the simulation before its tasks start
#[derive(Debug, Error)]
pub enum SimError {
    /// Configuration source could not be read or deserialized
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// Configuration values are inconsistent
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Unknown log level name
    #[error("Invalid log level: {0}")]
    InvalidLogLevel(String),

    /// A global tracing subscriber was already installed
    #[error("Failed to set tracing subscriber: {0}")]
    Logging(#[from] tracing::subscriber::SetGlobalDefaultError),

    /// A simulated task panicked or was cancelled
    #[error("Task failed: {0}")]
    TaskFailed(#[from] tokio::task::JoinError),
}
