//! Error types for Blox

use thiserror::Error;

/// Main error type for Blox
#[derive(Error, Debug)]
pub enum BloxError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for Blox operations
pub type Result<T> = std::result::Result<T, BloxError>;
