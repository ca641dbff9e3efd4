//! Error types for carbook

use thiserror::Error;

/// Configuration-related errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration directory not found")]
    NotFound,

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Failed to save configuration: {0}")]
    SaveError(String),
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The durable slot rejected a write; the in-memory view was not updated.
    #[error("Persistence error: {0}")]
    Persistence(String),

    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("Import failed: {0}")]
    Import(String),

    #[error("Excel export error: {0}")]
    Excel(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Ambiguous id: {0}")]
    Ambiguous(String),
}

pub type Result<T> = std::result::Result<T, Error>;
