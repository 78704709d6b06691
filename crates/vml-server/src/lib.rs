//! HTTP server for the Vending Ledger.
//!
//! Exposes the invoke/query operation set over a small REST API and keeps the
//! ledger in a snapshot-backed in-memory store.

pub mod config;
pub mod error;
pub mod handler;
pub mod router;
pub mod server;
pub mod state;

pub use config::ServerConfig;
pub use error::{ServerError, ServerResult};
pub use server::VmlServer;
pub use state::AppState;
