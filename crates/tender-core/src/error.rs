//! Error types for Tender Core

use thiserror::Error;

/// Core error type
#[derive(Error, Debug, PartialEq)]
pub enum CoreError {
    #[error("Invalid amount format: {0}")]
    InvalidFormat(String),

    #[error("Invalid value: {0}")]
    InvalidValue(String),
}

pub type Result<T> = std::result::Result<T, CoreError>;
