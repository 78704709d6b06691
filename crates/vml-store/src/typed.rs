//! Typed accessors over a [`KvStore`].
//!
//! Every value the ledger writes is text: identifiers, canonical decimal
//! balances, integer quantities, or JSON records. [`LedgerStore`] is the only
//! place that converts between those text encodings and Rust values.

use std::fmt;
use std::sync::Arc;

use vml_types::{format_decimal, parse_decimal, parse_quantity};

use crate::error::{StoreError, StoreResult};
use crate::traits::KvStore;

/// Cheaply cloneable handle to the ledger's key-value namespace.
#[derive(Clone)]
pub struct LedgerStore {
    inner: Arc<dyn KvStore>,
}

impl LedgerStore {
    pub fn new(inner: Arc<dyn KvStore>) -> Self {
        Self { inner }
    }

    /// Raw bytes under `key`.
    pub fn get_raw(&self, key: &str) -> StoreResult<Option<Vec<u8>>> {
        self.inner.get(key)
    }

    pub fn exists(&self, key: &str) -> StoreResult<bool> {
        self.inner.exists(key)
    }

    pub fn get_string(&self, key: &str) -> StoreResult<Option<String>> {
        self.inner.get(key)?.map(|raw| decode_text(key, raw)).transpose()
    }

    /// Read text, treating an absent key as the empty string.
    pub fn get_string_or_empty(&self, key: &str) -> StoreResult<String> {
        Ok(self.get_string(key)?.unwrap_or_default())
    }

    /// Read text, failing with [`StoreError::NotFound`] if the key is absent.
    pub fn require_string(&self, key: &str) -> StoreResult<String> {
        self.get_string(key)?
            .ok_or_else(|| StoreError::NotFound(key.to_string()))
    }

    pub fn put_string(&self, key: &str, value: &str) -> StoreResult<()> {
        self.inner.put(key, value.as_bytes())
    }

    pub fn get_decimal(&self, key: &str) -> StoreResult<Option<f64>> {
        match self.get_string(key)? {
            Some(text) => parse_decimal("stored decimal", &text)
                .map(Some)
                .map_err(|e| invalid(key, e)),
            None => Ok(None),
        }
    }

    /// Read a decimal, failing with [`StoreError::NotFound`] if absent.
    pub fn require_decimal(&self, key: &str) -> StoreResult<f64> {
        self.get_decimal(key)?
            .ok_or_else(|| StoreError::NotFound(key.to_string()))
    }

    /// Write a decimal in its canonical round-trip text form.
    pub fn put_decimal(&self, key: &str, value: f64) -> StoreResult<()> {
        if !value.is_finite() {
            return Err(StoreError::InvalidValue {
                key: key.to_string(),
                reason: format!("refusing to store non-finite decimal {value}"),
            });
        }
        self.put_string(key, &format_decimal(value))
    }

    pub fn get_int(&self, key: &str) -> StoreResult<Option<i64>> {
        match self.get_string(key)? {
            Some(text) => parse_quantity("stored quantity", &text)
                .map(Some)
                .map_err(|e| invalid(key, e)),
            None => Ok(None),
        }
    }

    pub fn put_int(&self, key: &str, value: i64) -> StoreResult<()> {
        self.put_string(key, &value.to_string())
    }

    /// Delete `key`. Returns `true` if it existed.
    pub fn delete(&self, key: &str) -> StoreResult<bool> {
        self.inner.delete(key)
    }

    /// All `(key, text)` pairs whose key starts with `prefix`, in key order.
    pub fn scan_prefix(&self, prefix: &str) -> StoreResult<Vec<(String, String)>> {
        self.inner
            .scan_prefix(prefix)?
            .into_iter()
            .map(|(key, raw)| {
                let text = decode_text(&key, raw)?;
                Ok((key, text))
            })
            .collect()
    }
}

impl fmt::Debug for LedgerStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LedgerStore").finish_non_exhaustive()
    }
}

fn decode_text(key: &str, raw: Vec<u8>) -> StoreResult<String> {
    String::from_utf8(raw).map_err(|_| StoreError::InvalidValue {
        key: key.to_string(),
        reason: "value is not valid UTF-8".into(),
    })
}

fn invalid(key: &str, err: vml_types::TypeError) -> StoreError {
    StoreError::InvalidValue {
        key: key.to_string(),
        reason: err.to_string(),
    }
}
