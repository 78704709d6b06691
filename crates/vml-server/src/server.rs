use tokio::net::TcpListener;

use crate::config::ServerConfig;
use crate::error::{ServerError, ServerResult};
use crate::router::build_router;
use crate::state::AppState;

/// Ledger HTTP server.
pub struct VmlServer {
    state: AppState,
}

impl VmlServer {
    /// Load the configured snapshot (if any) and prepare to serve.
    pub fn new(config: ServerConfig) -> ServerResult<Self> {
        Ok(Self {
            state: AppState::load(config)?,
        })
    }

    pub fn config(&self) -> &ServerConfig {
        self.state.config()
    }

    /// Build the router (useful for testing).
    pub fn router(&self) -> axum::Router {
        build_router(self.state.clone())
    }

    /// Start serving requests.
    pub async fn serve(self) -> ServerResult<()> {
        let addr = self.config().bind_addr;
        let app = self.router();
        let listener = TcpListener::bind(addr).await?;
        tracing::info!("ledger server listening on {addr}");
        axum::serve(listener, app)
            .await
            .map_err(|e| ServerError::Internal(e.to_string()))
    }
}
