use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;
use vml_protocol::endpoints;

use crate::handler;
use crate::state::AppState;

/// Build the axum router with all ledger endpoints.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(endpoints::HEALTH, get(handler::health_handler))
        .route(endpoints::OPERATIONS, get(handler::operations_handler))
        .route(endpoints::INVOKE, post(handler::invoke_handler))
        .route(endpoints::QUERY, post(handler::query_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
