use thiserror::Error;

/// Errors produced while parsing or validating foundation types.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("invalid {kind} {value:?}: {reason}")]
    InvalidIdentifier {
        kind: &'static str,
        value: String,
        reason: String,
    },

    #[error("invalid numeric format for {field}: {value:?}")]
    InvalidNumericFormat { field: &'static str, value: String },

    #[error("{field} out of range: {value} ({reason})")]
    OutOfRange {
        field: &'static str,
        value: String,
        reason: String,
    },
}
