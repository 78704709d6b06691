use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};

/// Configuration file looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "vml.toml";
/// Snapshot file used when neither a flag nor the config names one.
pub const DEFAULT_STATE_FILE: &str = "vml-state.json";

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    pub state_path: Option<PathBuf>,
    /// `error`, `warn`, `info`, `debug` or `trace`.
    pub log_level: Option<String>,
}

impl CliConfig {
    pub fn from_toml_str(text: &str) -> anyhow::Result<Self> {
        toml::from_str(text).context("invalid configuration")
    }

    /// Read `explicit`, or `vml.toml` if it exists, or fall back to defaults.
    pub fn load(explicit: Option<&Path>) -> anyhow::Result<Self> {
        let path = match explicit {
            Some(path) => path.to_path_buf(),
            None => {
                let default = PathBuf::from(DEFAULT_CONFIG_FILE);
                if !default.exists() {
                    return Ok(Self::default());
                }
                default
            }
        };
        let text = std::fs::read_to_string(&path)
            .with_context(|| format!("reading {}", path.display()))?;
        Self::from_toml_str(&text).with_context(|| format!("in {}", path.display()))
    }

    /// Snapshot path: the flag wins over the file, the file over the default.
    pub fn state_path(&self, flag: Option<&Path>) -> PathBuf {
        flag.map(Path::to_path_buf)
            .or_else(|| self.state_path.clone())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_STATE_FILE))
    }

    /// Log level: `-v` forces DEBUG, otherwise the file's level, else INFO.
    pub fn log_level(&self, verbose: bool) -> tracing::Level {
        if verbose {
            return tracing::Level::DEBUG;
        }
        self.log_level
            .as_deref()
            .and_then(|level| level.parse().ok())
            .unwrap_or(tracing::Level::INFO)
    }
}
