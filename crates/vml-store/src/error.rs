/// Errors from key-value store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A key the caller requires is absent.
    #[error("key not found: {0}")]
    NotFound(String),

    /// A stored value could not be decoded as the requested type.
    #[error("invalid value under {key}: {reason}")]
    InvalidValue { key: String, reason: String },

    /// Snapshot serialization or deserialization failure.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// I/O error from the underlying storage backend.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// An internal lock was poisoned by a panicking writer.
    #[error("store lock poisoned")]
    Poisoned,
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
