use std::collections::BTreeMap;
use std::ops::Bound;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::debug;

use crate::error::{StoreError, StoreResult};
use crate::traits::KvStore;

/// In-memory, `BTreeMap`-based ordered store.
///
/// Intended for tests, the CLI and the server. All entries are held in memory
/// behind a `RwLock` for safe concurrent access; values are cloned on
/// read/write. Persistence is handled separately by [`crate::snapshot`].
pub struct InMemoryKvStore {
    entries: RwLock<BTreeMap<String, Vec<u8>>>,
}

impl InMemoryKvStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(BTreeMap::new()),
        }
    }

    /// Create a store pre-populated with the given entries.
    pub fn from_entries<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (String, Vec<u8>)>,
    {
        Self {
            entries: RwLock::new(entries.into_iter().collect()),
        }
    }

    /// Number of keys currently stored.
    pub fn len(&self) -> usize {
        self.entries.read().expect("lock poisoned").len()
    }

    /// Returns `true` if the store is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.read().expect("lock poisoned").is_empty()
    }

    /// Remove all entries from the store.
    pub fn clear(&self) -> StoreResult<()> {
        self.write_map()?.clear();
        Ok(())
    }

    /// Copy of every entry, in key order.
    pub fn entries(&self) -> StoreResult<Vec<(String, Vec<u8>)>> {
        let map = self.read_map()?;
        Ok(map.iter().map(|(k, v)| (k.clone(), v.clone())).collect())
    }

    fn read_map(&self) -> StoreResult<RwLockReadGuard<'_, BTreeMap<String, Vec<u8>>>> {
        self.entries.read().map_err(|_| StoreError::Poisoned)
    }

    fn write_map(&self) -> StoreResult<RwLockWriteGuard<'_, BTreeMap<String, Vec<u8>>>> {
        self.entries.write().map_err(|_| StoreError::Poisoned)
    }
}

impl Default for InMemoryKvStore {
    fn default() -> Self {
        Self::new()
    }
}

impl KvStore for InMemoryKvStore {
    fn get(&self, key: &str) -> StoreResult<Option<Vec<u8>>> {
        Ok(self.read_map()?.get(key).cloned())
    }

    fn put(&self, key: &str, value: &[u8]) -> StoreResult<()> {
        debug!(key, len = value.len(), "put");
        self.write_map()?.insert(key.to_string(), value.to_vec());
        Ok(())
    }

    fn delete(&self, key: &str) -> StoreResult<bool> {
        debug!(key, "delete");
        Ok(self.write_map()?.remove(key).is_some())
    }

    fn scan_range(&self, start: &str, end: Option<&str>) -> StoreResult<Vec<(String, Vec<u8>)>> {
        // BTreeMap::range panics on an inverted range.
        if let Some(end) = end {
            if end <= start {
                return Ok(Vec::new());
            }
        }

        let upper = match end {
            Some(end) => Bound::Excluded(end),
            None => Bound::Unbounded,
        };
        let map = self.read_map()?;
        let hits: Vec<(String, Vec<u8>)> = map
            .range::<str, _>((Bound::Included(start), upper))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        debug!(start, ?end, hits = hits.len(), "scan");
        Ok(hits)
    }

    fn exists(&self, key: &str) -> StoreResult<bool> {
        Ok(self.read_map()?.contains_key(key))
    }
}

impl std::fmt::Debug for InMemoryKvStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryKvStore")
            .field("key_count", &self.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded() -> InMemoryKvStore {
        let store = InMemoryKvStore::new();
        for (k, v) in [
            ("Product_P1", "P1"),
            ("Product_P2", "P2"),
            ("P1_Name", "Cola"),
            ("Total_Balance", "0"),
            ("Productive", "no"),
        ] {
            store.put(k, v.as_bytes()).unwrap();
        }
        store
    }

    // -----------------------------------------------------------------------
    // Core CRUD
    // -----------------------------------------------------------------------

    #[test]
    fn put_and_get() {
        let store = InMemoryKvStore::new();
        store.put("V_Balance", b"70").unwrap();
        assert_eq!(store.get("V_Balance").unwrap().as_deref(), Some(&b"70"[..]));
    }

    #[test]
    fn put_overwrites() {
        let store = InMemoryKvStore::new();
        store.put("k", b"1").unwrap();
        store.put("k", b"2").unwrap();
        assert_eq!(store.get("k").unwrap().unwrap(), b"2");
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn get_missing_returns_none() {
        let store = InMemoryKvStore::new();
        assert!(store.get("missing").unwrap().is_none());
        assert!(!store.exists("missing").unwrap());
    }

    #[test]
    fn delete_reports_presence() {
        let store = InMemoryKvStore::new();
        store.put("k", b"v").unwrap();
        assert!(store.delete("k").unwrap());
        assert!(!store.exists("k").unwrap());
        assert!(!store.delete("k").unwrap());
    }

    // -----------------------------------------------------------------------
    // Range and prefix scans
    // -----------------------------------------------------------------------

    #[test]
    fn scan_range_is_half_open_and_ordered() {
        let store = seeded();
        let hits = store.scan_range("Product_P1", Some("Product_P2")).unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].0, "Product_P1");

        let all = store.scan_range("", None).unwrap();
        let keys: Vec<&str> = all.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(
            keys,
            ["P1_Name", "Product_P1", "Product_P2", "Productive", "Total_Balance"]
        );
    }

    #[test]
    fn scan_range_inverted_is_empty() {
        let store = seeded();
        assert!(store.scan_range("z", Some("a")).unwrap().is_empty());
        assert!(store.scan_range("a", Some("a")).unwrap().is_empty());
    }

    #[test]
    fn scan_prefix_groups_by_prefix() {
        let store = seeded();
        let hits = store.scan_prefix("Product_").unwrap();
        let keys: Vec<&str> = hits.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, ["Product_P1", "Product_P2"]);
    }

    #[test]
    fn scan_prefix_empty_returns_everything() {
        let store = seeded();
        assert_eq!(store.scan_prefix("").unwrap().len(), store.len());
    }

    // -----------------------------------------------------------------------
    // Utility methods
    // -----------------------------------------------------------------------

    #[test]
    fn len_is_empty_and_clear() {
        let store = seeded();
        assert!(!store.is_empty());
        store.clear().unwrap();
        assert!(store.is_empty());
        assert_eq!(store.len(), 0);
    }

    #[test]
    fn from_entries_and_entries_roundtrip() {
        let store = seeded();
        let copy = InMemoryKvStore::from_entries(store.entries().unwrap());
        assert_eq!(copy.entries().unwrap(), store.entries().unwrap());
    }

    #[test]
    fn concurrent_reads_are_safe() {
        use std::sync::Arc;
        use std::thread;

        let store = Arc::new(seeded());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let store = Arc::clone(&store);
                thread::spawn(move || {
                    assert_eq!(store.scan_prefix("Product_").unwrap().len(), 2);
                })
            })
            .collect();

        for h in handles {
            h.join().expect("thread should not panic");
        }
    }

    #[test]
    fn debug_format() {
        let store = seeded();
        let debug = format!("{store:?}");
        assert!(debug.contains("InMemoryKvStore"));
        assert!(debug.contains("key_count"));
    }
}
