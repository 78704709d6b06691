//! Core ledger logic for the Vending Ledger.
//!
//! Vending machines report sales and stock movements; this crate turns them
//! into records on an ordered key-value store. It provides:
//! - [`KeyCodec`]: the single definition of every key the ledger touches
//! - [`AccountRegistry`]: VMC, CSP and supplier balances and percentages
//! - [`TransactionSplitEngine`]: three-way revenue split with audit snapshots
//! - [`InventoryTracker`]: stock by location and by product, with reconcile
//! - [`ProductCatalog`] and [`SimRegistry`]: flat attribute records
//! - [`Ledger`]: one handle bundling all of the above over a shared store

pub mod accounts;
pub mod catalog;
pub mod error;
pub mod inventory;
pub mod keys;
pub mod ledger;
pub mod records;
pub mod sim;
pub mod transactions;

pub use accounts::AccountRegistry;
pub use catalog::ProductCatalog;
pub use error::{LedgerError, LedgerResult};
pub use inventory::InventoryTracker;
pub use keys::{Attribute, KeyCodec, SEPARATOR, TOTAL_BALANCE_KEY};
pub use ledger::Ledger;
pub use records::{
    AccountRole, BalanceEntry, EntityStock, InventoryRow, InventoryUpdate, LocationStock, Product,
    ProductDetails, SimActivation, SimIdentity, SimStatus, SplitShares, TransactionRecord,
};
pub use sim::SimRegistry;
pub use transactions::{split, TransactionSplitEngine};
