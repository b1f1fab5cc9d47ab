//! Storage error types.

use chalkboard_core::ErrorKind;
use thiserror::Error;

/// Errors surfaced by storage backends.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The write would exceed the capacity of the storage slot.
    #[error("storage quota exceeded: {needed} bytes needed, {quota} bytes available")]
    QuotaExceeded { needed: u64, quota: u64 },

    /// The backend failed to read or write.
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The stored library could not be decoded.
    #[error("stored library is unreadable: {0}")]
    Corrupt(String),
}

impl StoreError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            StoreError::Corrupt(_) => ErrorKind::LoadCorruption,
            StoreError::QuotaExceeded { .. } | StoreError::Io(_) => {
                ErrorKind::DegradedPersistence
            }
        }
    }

    /// Returns `true` if the write failed for lack of space.
    pub fn is_quota(&self) -> bool {
        matches!(self, StoreError::QuotaExceeded { .. })
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(e: serde_json::Error) -> Self {
        StoreError::Corrupt(e.to_string())
    }
}
