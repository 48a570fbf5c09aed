//! Secret records and sets.
//!
//! A [`SecretSet`] is the bridge between a vault folder and a local store. It
//! is built fresh for every pull or push and never persisted directly.

use std::collections::HashMap;

use tracing::warn;

use crate::core::types::SecretKey;

/// A single plaintext secret.
#[derive(Clone, PartialEq, Eq)]
pub struct SecretRecord {
    key: SecretKey,
    value: String,
}

impl SecretRecord {
    /// Create a record from a key and a plaintext value.
    pub fn new(key: impl Into<SecretKey>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }

    /// Secret's key name
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Plaintext value
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Split into key and value.
    pub fn into_parts(self) -> (SecretKey, String) {
        (self.key, self.value)
    }
}

// Values stay out of logs and panic messages.
impl std::fmt::Debug for SecretRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecretRecord")
            .field("key", &self.key)
            .field("value", &"<redacted>")
            .finish()
    }
}

impl std::fmt::Display for SecretRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.key)
    }
}

/// Unordered mapping from key to value.
///
/// Keys are case-sensitive and never empty. Inserting an existing key
/// replaces its value.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct SecretSet {
    entries: HashMap<SecretKey, String>,
}

impl SecretSet {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a record.
    ///
    /// Returns `false` and skips the record when its key is empty.
    pub fn insert(&mut self, record: SecretRecord) -> bool {
        if record.key.is_empty() {
            warn!("skipping secret with an empty key");
            return false;
        }
        let (key, value) = record.into_parts();
        self.entries.insert(key, value);
        true
    }

    /// Insert a key/value pair. See [`SecretSet::insert`].
    pub fn insert_pair(&mut self, key: impl Into<SecretKey>, value: impl Into<String>) -> bool {
        self.insert(SecretRecord::new(key, value))
    }

    /// Value for a key.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Whether the key is present.
    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Remove a key, returning its value.
    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.entries.remove(key)
    }

    /// Number of secrets
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over `(key, value)` pairs in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// All keys, sorted.
    pub fn keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.entries.keys().map(String::as_str).collect();
        keys.sort_unstable();
        keys
    }

    /// All records, sorted by key.
    pub fn sorted(&self) -> Vec<SecretRecord> {
        let mut records: Vec<SecretRecord> = self
            .entries
            .iter()
            .map(|(k, v)| SecretRecord::new(k.clone(), v.clone()))
            .collect();
        records.sort_by(|a, b| a.key.cmp(&b.key));
        records
    }

    /// Parse `Key = Value` / `Key=Value` lines.
    ///
    /// Splits on the first `=` and trims both sides. Lines without `=` and
    /// lines with an empty key are skipped.
    pub fn from_lines<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set = Self::new();
        for line in lines {
            if let Some((key, value)) = line.as_ref().split_once('=') {
                let key = key.trim();
                if key.is_empty() {
                    continue;
                }
                set.insert_pair(key, value.trim());
            }
        }
        set
    }
}

impl std::fmt::Debug for SecretSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecretSet")
            .field("keys", &self.keys())
            .finish()
    }
}

impl FromIterator<SecretRecord> for SecretSet {
    fn from_iter<T: IntoIterator<Item = SecretRecord>>(iter: T) -> Self {
        let mut set = Self::new();
        for record in iter {
            set.insert(record);
        }
        set
    }
}

impl<K: Into<SecretKey>, V: Into<String>> FromIterator<(K, V)> for SecretSet {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        iter.into_iter()
            .map(|(k, v)| SecretRecord::new(k, v))
            .collect()
    }
}

impl IntoIterator for SecretSet {
    type Item = SecretRecord;
    type IntoIter = std::iter::Map<
        std::collections::hash_map::IntoIter<SecretKey, String>,
        fn((SecretKey, String)) -> SecretRecord,
    >;

    fn into_iter(self) -> Self::IntoIter {
        self.entries
            .into_iter()
            .map((|(k, v)| SecretRecord::new(k, v)) as fn((SecretKey, String)) -> SecretRecord)
    }
}
