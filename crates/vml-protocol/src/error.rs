use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use vml_ledger::LedgerError;
use vml_types::TypeError;

#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("unknown operation: {0}")]
    UnknownOperation(String),

    #[error("{operation} expects {expected} argument(s), got {got}")]
    InvalidArgumentCount {
        operation: &'static str,
        expected: usize,
        got: usize,
    },

    #[error(transparent)]
    Type(#[from] TypeError),

    #[error(transparent)]
    Ledger(#[from] LedgerError),

    #[error("serialization error: {0}")]
    Serialization(String),
}

impl ProtocolError {
    /// Stable classification for transports.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::UnknownOperation(_) => ErrorKind::UnknownOperation,
            Self::InvalidArgumentCount { .. } => ErrorKind::InvalidArgumentCount,
            Self::Type(err) => type_error_kind(err),
            Self::Ledger(err) => match err {
                LedgerError::AccountNotFound { .. } => ErrorKind::AccountNotFound,
                LedgerError::TotalNotInitialized(_) | LedgerError::KeyNotFound(_) => {
                    ErrorKind::KeyNotFound
                }
                LedgerError::InvalidArgument(_) => ErrorKind::InvalidArgument,
                LedgerError::Type(err) => type_error_kind(err),
                LedgerError::CorruptRecord { .. } | LedgerError::Store(_) => ErrorKind::Store,
            },
            Self::Serialization(_) => ErrorKind::Store,
        }
    }
}

fn type_error_kind(err: &TypeError) -> ErrorKind {
    match err {
        TypeError::InvalidNumericFormat { .. } => ErrorKind::InvalidNumericFormat,
        TypeError::InvalidIdentifier { .. } | TypeError::OutOfRange { .. } => {
            ErrorKind::InvalidArgument
        }
    }
}

/// Error classes exposed to callers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    InvalidArgumentCount,
    InvalidNumericFormat,
    InvalidArgument,
    KeyNotFound,
    AccountNotFound,
    UnknownOperation,
    Store,
}

impl ErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::InvalidArgumentCount => "InvalidArgumentCount",
            Self::InvalidNumericFormat => "InvalidNumericFormat",
            Self::InvalidArgument => "InvalidArgument",
            Self::KeyNotFound => "KeyNotFound",
            Self::AccountNotFound => "AccountNotFound",
            Self::UnknownOperation => "UnknownOperation",
            Self::Store => "Store",
        }
    }

    /// Whether the caller can fix the request and retry.
    pub fn is_client_error(self) -> bool {
        !matches!(self, Self::Store)
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub type ProtocolResult<T> = Result<T, ProtocolError>;
