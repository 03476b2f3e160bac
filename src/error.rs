//! Error types for sqlscout
//!
//! This module provides the error taxonomy for all sqlscout operations:
//! schema retrieval, SQL synthesis, execution, and agent orchestration.

use thiserror::Error;

/// Main error type for sqlscout operations
#[derive(Error, Debug)]
pub enum SqlScoutError {
    /// Model output contained no SQL-shaped text
    #[error("SQL parse error: {0}")]
    Parse(String),

    /// The database rejected the generated statement
    #[error("SQL execution error: {0}")]
    Execution(String),

    /// Model or database call exceeded its time bound
    #[error("Timeout after {0:?}")]
    Timeout(std::time::Duration),

    /// Exact-match catalog lookup miss
    #[error("Not found in schema catalog: {0}")]
    NotFound(String),

    /// Orchestrator step budget exhausted without a confident answer
    #[error("Could not determine an answer: {0}")]
    Inconclusive(String),

    /// Connection-level, non-retryable failure
    #[error("Infrastructure error: {0}")]
    Infrastructure(String),

    /// Language model API errors
    #[error("Completion error: {0}")]
    Completion(String),

    /// Embedding/index build errors
    #[error("Embedding error: {0}")]
    Embedding(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic errors
    #[error("Generic error: {0}")]
    Generic(String),
}

/// Result type alias for sqlscout operations
pub type Result<T> = std::result::Result<T, SqlScoutError>;

impl SqlScoutError {
    /// Whether the execution and correction loop may recover from this error
    /// by synthesizing a corrected statement. Infrastructure failures abort
    /// the session immediately instead.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            SqlScoutError::Parse(_) | SqlScoutError::Execution(_) | SqlScoutError::Timeout(_)
        )
    }
}

// Statement-level SQLite failures are retryable execution errors; anything
// below the statement (open, disk, corruption) is infrastructure.
impl From<rusqlite::Error> for SqlScoutError {
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(code, message) => match code.code {
                rusqlite::ErrorCode::CannotOpen
                | rusqlite::ErrorCode::DatabaseCorrupt
                | rusqlite::ErrorCode::DiskFull
                | rusqlite::ErrorCode::SystemIoFailure
                | rusqlite::ErrorCode::NotADatabase => SqlScoutError::Infrastructure(
                    message.clone().unwrap_or_else(|| err.to_string()),
                ),
                _ => SqlScoutError::Execution(err.to_string()),
            },
            _ => SqlScoutError::Execution(err.to_string()),
        }
    }
}

impl From<anyhow::Error> for SqlScoutError {
    fn from(err: anyhow::Error) -> Self {
        SqlScoutError::Generic(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let error = SqlScoutError::Parse("no SQL in completion".to_string());
        assert_eq!(error.to_string(), "SQL parse error: no SQL in completion");
    }

    #[test]
    fn test_retryable_classification() {
        assert!(SqlScoutError::Parse("x".into()).is_retryable());
        assert!(SqlScoutError::Execution("x".into()).is_retryable());
        assert!(SqlScoutError::Timeout(std::time::Duration::from_secs(1)).is_retryable());
        assert!(!SqlScoutError::Infrastructure("gone".into()).is_retryable());
        assert!(!SqlScoutError::NotFound("orders".into()).is_retryable());
        assert!(!SqlScoutError::Inconclusive("budget".into()).is_retryable());
    }

    #[test]
    fn test_error_chain() {
        let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let error = SqlScoutError::from(io_error);

        match error {
            SqlScoutError::Io(_) => (),
            _ => panic!("Expected Io error"),
        }
    }
}
