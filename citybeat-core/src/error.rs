//! Error types for citybeat.

use thiserror::Error;

/// Errors that can occur in citybeat operations.
#[derive(Error, Debug)]
pub enum CityBeatError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Source '{source_name}' unreachable: {reason}")]
    SourceUnreachable { source_name: String, reason: String },

    #[error("Source request timed out after {0}s")]
    SourceTimeout(u64),

    #[error("Store error: {0}")]
    Store(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Invalid record: {0}")]
    InvalidRecord(String),

    #[error("Unknown date window '{0}'. Expected one of: all, today, this-weekend, this-month")]
    InvalidWindow(String),

    #[error("Unknown tag match mode '{0}'. Expected 'substring' or 'exact'")]
    InvalidTagMatch(String),
}

impl CityBeatError {
    pub fn unreachable(source_name: &str, reason: impl ToString) -> Self {
        CityBeatError::SourceUnreachable {
            source_name: source_name.to_string(),
            reason: reason.to_string(),
        }
    }
}

/// Result type alias for citybeat operations.
pub type CityBeatResult<T> = Result<T, CityBeatError>;
