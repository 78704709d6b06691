use std::net::{Ipv4Addr, SocketAddr};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{ServerError, ServerResult};

pub const DEFAULT_PORT: u16 = 7050;

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    /// Snapshot file loaded at startup. `None` keeps the ledger in memory only.
    pub state_path: Option<PathBuf>,
    /// Rewrite the snapshot after every successful invoke.
    pub persist_on_invoke: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from((Ipv4Addr::LOCALHOST, DEFAULT_PORT)),
            state_path: None,
            persist_on_invoke: true,
        }
    }
}

impl ServerConfig {
    pub fn from_toml_str(text: &str) -> ServerResult<Self> {
        toml::from_str(text).map_err(|e| ServerError::Config(e.to_string()))
    }

    pub fn load(path: &Path) -> ServerResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Path to persist to after an invoke, if persistence is on.
    pub fn persist_path(&self) -> Option<&Path> {
        self.state_path
            .as_deref()
            .filter(|_| self.persist_on_invoke)
    }
}
