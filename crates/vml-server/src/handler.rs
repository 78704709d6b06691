use axum::extract::{Path, State};
use axum::http::header;
use axum::response::{IntoResponse, Json, Response};

use vml_protocol::{schema, CallRequest, HealthResponse, OperationSchema};

use crate::error::ServerResult;
use crate::state::AppState;

/// Health check handler.
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::default())
}

/// Lists every operation with its parameters.
pub async fn operations_handler() -> Json<Vec<OperationSchema>> {
    Json(schema())
}

pub async fn invoke_handler(
    State(state): State<AppState>,
    Path(operation): Path<String>,
    Json(request): Json<CallRequest>,
) -> ServerResult<Response> {
    let dispatcher = state.dispatcher().lock().await;
    let output = dispatcher.invoke(&operation, &request.args)?;
    state.persist().await?;
    drop(dispatcher);
    tracing::info!(%operation, "invoke completed");
    Ok(payload_response(output))
}

pub async fn query_handler(
    State(state): State<AppState>,
    Path(operation): Path<String>,
    Json(request): Json<CallRequest>,
) -> ServerResult<Response> {
    let output = state
        .dispatcher()
        .lock()
        .await
        .query(&operation, &request.args)?;
    Ok(payload_response(output))
}

/// Structured results go out as JSON, stored scalars as plain text.
fn payload_response(output: Vec<u8>) -> Response {
    let content_type = match output.first() {
        Some(b'{') | Some(b'[') => "application/json",
        _ => "text/plain; charset=utf-8",
    };
    ([(header::CONTENT_TYPE, content_type)], output).into_response()
}
