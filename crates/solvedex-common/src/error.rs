//! Error types for solvedex

use thiserror::Error;

/// Result type alias for solvedex operations
pub type Result<T> = std::result::Result<T, SolvedexError>;

/// Main error type for solvedex
#[derive(Error, Debug)]
pub enum SolvedexError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Lookup request failed with status {status}")]
    HttpStatus { status: u16 },

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Record {row} is missing required field '{field}'")]
    MissingField { row: usize, field: String },

    #[error("Configuration error: {0}")]
    Config(String),
}

impl SolvedexError {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a network error
    pub fn network(msg: impl Into<String>) -> Self {
        Self::Network(msg.into())
    }

    /// Create a parse error
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }
}
