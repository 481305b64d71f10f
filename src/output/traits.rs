//! Result store trait and error types

use crate::model::ArticleRecord;
use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Failed to serialize results: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// Persists the records of a finished run
///
/// Implementations replace any earlier content at their destination.
pub trait ResultStore {
    /// Writes the ordered collection of records
    fn write(&self, records: &[ArticleRecord]) -> OutputResult<()>;

    /// Human-readable destination, for log messages
    fn destination(&self) -> String;
}
