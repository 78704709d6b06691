use crate::error::StoreResult;

/// Ordered, string-keyed key-value store.
///
/// All implementations must satisfy these invariants:
/// - Keys compare by their UTF-8 bytes; range scans return entries in that
///   order.
/// - Each individual call is atomic. There is no multi-key transaction.
/// - The store never interprets keys or values.
/// - All I/O errors are propagated, never silently ignored.
pub trait KvStore: Send + Sync {
    /// Read the value under `key`.
    ///
    /// Returns `Ok(None)` if the key does not exist.
    fn get(&self, key: &str) -> StoreResult<Option<Vec<u8>>>;

    /// Write (create or overwrite) the value under `key`.
    fn put(&self, key: &str, value: &[u8]) -> StoreResult<()>;

    /// Delete `key`. Returns `true` if the key existed.
    fn delete(&self, key: &str) -> StoreResult<bool>;

    /// All entries with `start <= key < end`, in key order.
    ///
    /// `end = None` scans to the end of the keyspace.
    fn scan_range(&self, start: &str, end: Option<&str>) -> StoreResult<Vec<(String, Vec<u8>)>>;

    /// Check whether a key exists.
    fn exists(&self, key: &str) -> StoreResult<bool> {
        Ok(self.get(key)?.is_some())
    }

    /// All entries whose key starts with `prefix`, in key order.
    ///
    /// Default implementation translates the prefix into a half-open range
    /// with [`prefix_upper_bound`].
    fn scan_prefix(&self, prefix: &str) -> StoreResult<Vec<(String, Vec<u8>)>> {
        let end = prefix_upper_bound(prefix);
        self.scan_range(prefix, end.as_deref())
    }
}

/// Smallest string greater than every string starting with `prefix`.
///
/// Returns `None` when no such bound exists (empty prefix, or a prefix made
/// only of `char::MAX`), meaning the scan is unbounded above.
///
/// # Examples
///
/// ```
/// use vml_store::prefix_upper_bound;
///
/// assert_eq!(prefix_upper_bound("Product_").as_deref(), Some("Product`"));
/// assert_eq!(prefix_upper_bound("a##").as_deref(), Some("a#$"));
/// assert_eq!(prefix_upper_bound(""), None);
/// ```
pub fn prefix_upper_bound(prefix: &str) -> Option<String> {
    let mut chars: Vec<char> = prefix.chars().collect();
    while let Some(last) = chars.pop() {
        if let Some(next) = next_char(last) {
            chars.push(next);
            return Some(chars.into_iter().collect());
        }
    }
    None
}

fn next_char(c: char) -> Option<char> {
    let mut code = c as u32 + 1;
    if (0xD800..=0xDFFF).contains(&code) {
        code = 0xE000;
    }
    char::from_u32(code)
}
