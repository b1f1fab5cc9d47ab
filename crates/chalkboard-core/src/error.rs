//! Error taxonomy.
//!
//! Every failure in chalkboard is recoverable. [`ErrorKind`] classifies them
//! so callers can decide how to report each one without string matching.

use thiserror::Error;

/// Classification of recoverable failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Input is not well-formed or misses required structure. No state change.
    ParseFailure,
    /// A write to the storage slot failed. The library keeps working in memory.
    DegradedPersistence,
    /// Stored data was unreadable on startup. The library starts empty.
    LoadCorruption,
}

/// Errors that can occur when importing a question bank.
#[derive(Debug, Error)]
pub enum ImportError {
    /// The document is not valid JSON.
    #[error("failed to parse question bank: {0}")]
    Malformed(#[from] serde_json::Error),

    /// The document parsed but is not a JSON object.
    #[error("invalid format: expected a JSON object at the top level")]
    NotAnObject,

    /// The required `items` field is absent or not an array.
    #[error("invalid format: 'items' array missing")]
    MissingItems,

    /// An entry of `items` does not have the shape of a question.
    #[error("invalid question at index {index}: {source}")]
    InvalidItem {
        index: usize,
        #[source]
        source: serde_json::Error,
    },
}

impl ImportError {
    pub fn kind(&self) -> ErrorKind {
        ErrorKind::ParseFailure
    }
}
