//! Parser error types

use thiserror::Error;

/// Parser error
///
/// Only raised by the ingestion helpers that turn response text into JSON.
/// Reconciliation itself never fails.
#[derive(Error, Debug)]
pub enum ParseError {
    /// JSON parsing error
    #[error("JSON parsing error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Response carried no JSON payload
    #[error("No JSON content found in response")]
    NoJsonFound,

    /// Payload parsed but is not an object
    #[error("Expected a JSON object, got {0}")]
    NotAnObject(String),
}

/// Result type for parser operations
pub type Result<T> = std::result::Result<T, ParseError>;
