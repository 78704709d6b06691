//! Operation dispatch for the Vending Ledger.
//!
//! Callers name an operation and pass its arguments as strings. This crate
//! resolves the name, checks the argument count, parses every argument into
//! a typed request, runs it against a [`vml_ledger::Ledger`], and encodes the
//! response as bytes (JSON for structured results, raw stored text for
//! single values).

pub mod dispatch;
pub mod endpoint;
pub mod error;
pub mod operation;
pub mod request;

pub use dispatch::{Dispatcher, QuantityResponse};
pub use endpoint::{endpoints, CallRequest, HealthResponse, API_VERSION};
pub use error::{ErrorKind, ProtocolError, ProtocolResult};
pub use operation::{schema, InvokeOp, OperationKind, OperationSchema, QueryOp};
pub use request::{Invoke, Query};
