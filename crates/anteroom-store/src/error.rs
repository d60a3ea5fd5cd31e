//! Store error types.

/// Errors from credential and cache operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The underlying store could not be reached or locked.
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// Serialization or deserialization of a stored value failed.
    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
