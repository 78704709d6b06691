//! Ordered key-value storage for the Vending Ledger.
//!
//! The ledger overlays structured records (accounts, transactions, inventory,
//! products, SIMs) onto a flat, ordered string-keyed namespace. This crate
//! provides that namespace and nothing more: it never interprets keys.
//!
//! # Storage Backends
//!
//! All backends implement the [`KvStore`] trait:
//!
//! - [`InMemoryKvStore`] -- `BTreeMap`-based store for tests, the CLI and the
//!   server; persisted through [`snapshot`] files
//!
//! # Typed Access
//!
//! [`LedgerStore`] wraps any backend with text, decimal and integer helpers
//! and prefix scans.
//!
//! # Design Rules
//!
//! 1. Iteration order is key order; callers rely only on prefix grouping.
//! 2. Each call is atomic on its own. Multi-key sequences are not.
//! 3. Absence is reported as `None`; callers decide whether it is an error.
//! 4. All I/O errors are propagated, never silently ignored.

pub mod error;
pub mod memory;
pub mod snapshot;
pub mod traits;
pub mod typed;

pub use error::{StoreError, StoreResult};
pub use memory::InMemoryKvStore;
pub use snapshot::{load_snapshot, save_snapshot};
pub use traits::{prefix_upper_bound, KvStore};
pub use typed::LedgerStore;
