//! SDK error types

use thiserror::Error;

/// SDK error type
#[derive(Error, Debug)]
pub enum SdkError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Invalid amount format or other core value
    #[error("Core error: {0}")]
    CoreError(#[from] tender_core::CoreError),

    /// Response text could not be turned into JSON
    #[error("Parser error: {0}")]
    ParseError(#[from] tender_parser::ParseError),

    /// Configuration document is not valid YAML
    #[error("YAML error: {0}")]
    YamlError(#[from] serde_yaml::Error),
}

/// Result type for SDK operations
pub type Result<T> = std::result::Result<T, SdkError>;
