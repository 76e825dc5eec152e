//! Coaching service errors.

use gymtask_storage::StorageError;

/// Error type for coaching operations.
pub type Result<T> = std::result::Result<T, CoachError>;

/// Errors raised by coaching services.
#[derive(Debug, thiserror::Error)]
pub enum CoachError {
    /// Rejected form input
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Referenced record does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// Record is still referenced elsewhere
    #[error("In use: {0}")]
    InUse(String),

    /// Storage failure, including duplicate-day rejections
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// Export failure
    #[error("Export failed: {0}")]
    Export(String),
}

impl From<csv::Error> for CoachError {
    fn from(e: csv::Error) -> Self {
        CoachError::Export(e.to_string())
    }
}

impl From<serde_json::Error> for CoachError {
    fn from(e: serde_json::Error) -> Self {
        CoachError::Export(e.to_string())
    }
}
