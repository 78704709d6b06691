use vml_store::StoreError;
use vml_types::TypeError;

/// Errors produced by ledger operations.
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    #[error("account not found: {name} (missing {key})")]
    AccountNotFound { name: String, key: String },

    #[error("global total not initialized (missing {0})")]
    TotalNotInitialized(String),

    #[error("key not found: {0}")]
    KeyNotFound(String),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("corrupt record under {key}: {reason}")]
    CorruptRecord { key: String, reason: String },

    #[error(transparent)]
    Type(#[from] TypeError),

    #[error("store error: {0}")]
    Store(StoreError),
}

impl From<StoreError> for LedgerError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(key) => LedgerError::KeyNotFound(key),
            other => LedgerError::Store(other),
        }
    }
}

/// Result alias for ledger operations.
pub type LedgerResult<T> = Result<T, LedgerError>;
