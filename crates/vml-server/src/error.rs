use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde_json::json;
use thiserror::Error;
use vml_protocol::{ErrorKind, ProtocolError};

#[derive(Debug, Error)]
pub enum ServerError {
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    #[error("store error: {0}")]
    Store(#[from] vml_store::StoreError),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("internal error: {0}")]
    Internal(String),
}

impl ServerError {
    /// Error class reported in response bodies.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Protocol(err) => err.kind().as_str(),
            Self::Store(_) | Self::Io(_) => ErrorKind::Store.as_str(),
            Self::Config(_) => "Config",
            Self::Internal(_) => "Internal",
        }
    }

    /// Whether the caller can fix the request and retry.
    pub fn is_client_error(&self) -> bool {
        match self {
            Self::Protocol(err) => err.kind().is_client_error(),
            _ => false,
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::Protocol(err) => match err.kind() {
                ErrorKind::UnknownOperation
                | ErrorKind::KeyNotFound
                | ErrorKind::AccountNotFound => StatusCode::NOT_FOUND,
                ErrorKind::InvalidArgumentCount
                | ErrorKind::InvalidNumericFormat
                | ErrorKind::InvalidArgument => StatusCode::BAD_REQUEST,
                ErrorKind::Store => StatusCode::INTERNAL_SERVER_ERROR,
            },
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status();
        if self.is_client_error() {
            tracing::debug!(error = %self, "request rejected");
        } else {
            tracing::error!(error = %self, "request failed");
        }
        let body = json!({ "error": self.kind(), "message": self.to_string() });
        (status, Json(body)).into_response()
    }
}

pub type ServerResult<T> = Result<T, ServerError>;
