//! CLI error type.

use hedge_core::types::PricingError;
use thiserror::Error;

use crate::config::ConfigError;

/// Everything a command can fail with.
#[derive(Debug, Error)]
pub enum CliError {
    /// Input file missing.
    #[error("File not found: {0}")]
    FileNotFound(String),

    /// Bad command-line value.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Configuration file or environment problem.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Engine rejected the inputs or failed.
    #[error("Pricing error: {0}")]
    Pricing(#[from] PricingError),

    /// Input JSON malformed or output not serialisable.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Reading or writing a file failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result alias for CLI commands.
pub type Result<T> = std::result::Result<T, CliError>;
