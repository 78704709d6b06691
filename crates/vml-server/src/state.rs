use std::path::Path;
use std::sync::Arc;

use tokio::sync::Mutex;
use vml_ledger::Ledger;
use vml_protocol::Dispatcher;
use vml_store::{load_snapshot, save_snapshot, InMemoryKvStore};

use crate::config::ServerConfig;
use crate::error::{ServerError, ServerResult};

/// Shared request state.
///
/// Every dispatch goes through one async mutex, so each operation sees the
/// store exactly as the previous one left it.
#[derive(Clone)]
pub struct AppState {
    dispatcher: Arc<Mutex<Dispatcher>>,
    store: Arc<InMemoryKvStore>,
    config: Arc<ServerConfig>,
}

impl AppState {
    /// Build state over `store`.
    pub fn new(store: Arc<InMemoryKvStore>, config: ServerConfig) -> Self {
        let ledger = Ledger::new(store.clone());
        Self {
            dispatcher: Arc::new(Mutex::new(Dispatcher::new(ledger))),
            store,
            config: Arc::new(config),
        }
    }

    /// Build state from the configured snapshot, or an empty store.
    pub fn load(config: ServerConfig) -> ServerResult<Self> {
        let store = match &config.state_path {
            Some(path) => load_snapshot(path)?,
            None => InMemoryKvStore::new(),
        };
        Ok(Self::new(Arc::new(store), config))
    }

    pub fn dispatcher(&self) -> &Mutex<Dispatcher> {
        &self.dispatcher
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Write the snapshot if persistence is configured.
    ///
    /// The write and fsync run on the blocking pool. Callers keep the
    /// dispatcher lock across the await so snapshots land in dispatch order.
    pub async fn persist(&self) -> ServerResult<()> {
        let Some(path) = self.config.persist_path().map(Path::to_path_buf) else {
            return Ok(());
        };
        let store = self.store.clone();
        tokio::task::spawn_blocking(move || -> ServerResult<()> {
            save_snapshot(&store, &path)?;
            tracing::debug!(path = %path.display(), "snapshot persisted");
            Ok(())
        })
        .await
        .map_err(|e| ServerError::Internal(format!("snapshot task failed: {e}")))?
    }
}
