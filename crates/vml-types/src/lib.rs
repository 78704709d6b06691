//! Foundation types for the Vending Ledger (VML).
//!
//! This crate provides the identifier and numeric types shared by every other
//! VML crate. Values arrive as strings at the dispatch boundary and are
//! validated here before anything touches the store.
//!
//! # Key Types
//!
//! - [`AccountName`], [`TransactionId`], [`EntityId`], [`LocationId`],
//!   [`ProductId`], [`SimId`] -- validated identifiers that are safe to embed
//!   in composite store keys
//! - [`Percentage`] -- a split share in `[0, 1]`
//! - [`parse_decimal`] / [`format_decimal`] -- round-trip decimal text encoding
//! - [`parse_quantity`] -- signed integer stock deltas and counts

pub mod decimal;
pub mod error;
pub mod ident;

pub use decimal::{format_decimal, parse_decimal, parse_quantity, Percentage};
pub use error::TypeError;
pub use ident::{
    validate_identifier, AccountName, EntityId, LocationId, ProductId, SimId, TransactionId,
    FORBIDDEN_CHAR,
};
