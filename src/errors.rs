use std::result::Result as StdResult;

use thiserror::Error;

/// Unified error type for domain, storage and configuration layers.
#[derive(Debug, Error)]
pub enum DojoError {
    #[error("Persistence error: {0}")]
    Storage(String),
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Record not found: {0}")]
    NotFound(String),
    #[error("Schedule entry incomplete: {0}")]
    IncompleteEntry(String),
}

pub type Result<T> = StdResult<T, DojoError>;

impl From<std::io::Error> for DojoError {
    fn from(err: std::io::Error) -> Self {
        DojoError::Storage(err.to_string())
    }
}

impl From<serde_json::Error> for DojoError {
    fn from(err: serde_json::Error) -> Self {
        DojoError::Storage(err.to_string())
    }
}
