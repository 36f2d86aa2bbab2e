//! Key-value persistence for Caca Cliqueur.
//!
//! The engine only sees [`KeyValueStore`]: integers and string sets addressed
//! by key, every write durable as soon as the call returns.
//!
//! ## Document format
//!
//! [`MemoryStore`] serialises to one JSON document:
//!
//! ```json
//! { "version": 1, "prefs": { "ints": { "clickCount": 42 }, "string_sets": { "leaderboard": ["42"] } } }
//! ```
//!
//! - `SAVE_VERSION`: bump when fields are added.
//! - `MIN_COMPATIBLE_VERSION`: bump only on breaking changes (meaning of an
//!   existing field changes or a field is removed). Older-but-compatible
//!   documents load with missing parts defaulted; anything below it is dropped.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

/// Current document version.
const SAVE_VERSION: u32 = 1;

/// Oldest document version that can still be read.
const MIN_COMPATIBLE_VERSION: u32 = 1;

/// localStorage key of the prefs document.
pub const STORAGE_KEY: &str = "game_prefs";

/// Durable string-keyed storage supplied by the host.
pub trait KeyValueStore {
    fn get_int(&self, key: &str, default: i64) -> i64;
    fn set_int(&mut self, key: &str, value: i64);
    fn get_string_set(&self, key: &str, default: BTreeSet<String>) -> BTreeSet<String>;
    fn set_string_set(&mut self, key: &str, value: BTreeSet<String>);
}

/// In-memory store. Backs the browser store and every test.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MemoryStore {
    ints: BTreeMap<String, i64>,
    string_sets: BTreeMap<String, BTreeSet<String>>,
}

#[derive(Serialize, Deserialize)]
struct PrefsDocument {
    version: u32,
    #[serde(default)]
    prefs: MemoryStore,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.ints.is_empty() && self.string_sets.is_empty()
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&PrefsDocument {
            version: SAVE_VERSION,
            prefs: self.clone(),
        })
    }

    /// Parse a stored document. Unparseable or too-old documents yield `None`
    /// (the caller starts from an empty store).
    pub fn from_json(json: &str) -> Option<Self> {
        let doc: PrefsDocument = match serde_json::from_str(json) {
            Ok(d) => d,
            Err(e) => {
                log::warn!("prefs document is unreadable, discarding: {e}");
                return None;
            }
        };

        if doc.version < MIN_COMPATIBLE_VERSION {
            log::info!(
                "prefs document too old (saved={}, min_compatible={}), starting fresh",
                doc.version,
                MIN_COMPATIBLE_VERSION
            );
            return None;
        }

        if doc.version < SAVE_VERSION {
            log::info!(
                "migrating prefs document (saved={}, current={})",
                doc.version,
                SAVE_VERSION
            );
        }

        Some(doc.prefs)
    }
}

impl KeyValueStore for MemoryStore {
    fn get_int(&self, key: &str, default: i64) -> i64 {
        self.ints.get(key).copied().unwrap_or(default)
    }

    fn set_int(&mut self, key: &str, value: i64) {
        self.ints.insert(key.to_string(), value);
    }

    fn get_string_set(&self, key: &str, default: BTreeSet<String>) -> BTreeSet<String> {
        self.string_sets.get(key).cloned().unwrap_or(default)
    }

    fn set_string_set(&mut self, key: &str, value: BTreeSet<String>) {
        self.string_sets.insert(key.to_string(), value);
    }
}

/// Browser store: a [`MemoryStore`] mirrored to `localStorage` after every write.
/// Storage failures are logged and otherwise ignored; the game keeps running
/// from memory.
pub struct LocalStorageStore {
    inner: MemoryStore,
    key: String,
}

impl LocalStorageStore {
    /// Load the document stored under `key`, or start empty.
    pub fn open(key: &str) -> Self {
        let inner = match get_storage() {
            Some(storage) => match storage.get_item(key) {
                Ok(Some(json)) => MemoryStore::from_json(&json).unwrap_or_else(|| {
                    let _ = storage.remove_item(key);
                    MemoryStore::new()
                }),
                _ => MemoryStore::new(),
            },
            None => {
                log::warn!("localStorage unavailable, progress will not survive a reload");
                MemoryStore::new()
            }
        };
        if inner.is_empty() {
            log::info!("no saved game under '{key}', starting fresh");
        }
        Self {
            inner,
            key: key.to_string(),
        }
    }

    fn flush(&self) {
        let json = match self.inner.to_json() {
            Ok(j) => j,
            Err(e) => {
                log::warn!("failed to serialise prefs: {e}");
                return;
            }
        };
        if let Some(storage) = get_storage() {
            if let Err(e) = storage.set_item(&self.key, &json) {
                log::warn!("failed to write prefs to localStorage: {e:?}");
            }
        }
    }
}

impl KeyValueStore for LocalStorageStore {
    fn get_int(&self, key: &str, default: i64) -> i64 {
        self.inner.get_int(key, default)
    }

    fn set_int(&mut self, key: &str, value: i64) {
        self.inner.set_int(key, value);
        self.flush();
    }

    fn get_string_set(&self, key: &str, default: BTreeSet<String>) -> BTreeSet<String> {
        self.inner.get_string_set(key, default)
    }

    fn set_string_set(&mut self, key: &str, value: BTreeSet<String>) {
        self.inner.set_string_set(key, value);
        self.flush();
    }
}

fn get_storage() -> Option<web_sys::Storage> {
    web_sys::window()?.local_storage().ok()?
}

/// Store double that counts writes, for checking "no persistence" rules.
#[cfg(test)]
#[derive(Default)]
pub struct CountingStore {
    pub inner: MemoryStore,
    pub writes: usize,
}

#[cfg(test)]
impl KeyValueStore for CountingStore {
    fn get_int(&self, key: &str, default: i64) -> i64 {
        self.inner.get_int(key, default)
    }

    fn set_int(&mut self, key: &str, value: i64) {
        self.writes += 1;
        self.inner.set_int(key, value);
    }

    fn get_string_set(&self, key: &str, default: BTreeSet<String>) -> BTreeSet<String> {
        self.inner.get_string_set(key, default)
    }

    fn set_string_set(&mut self, key: &str, value: BTreeSet<String>) {
        self.writes += 1;
        self.inner.set_string_set(key, value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_keys_return_default() {
        let store = MemoryStore::new();
        assert_eq!(store.get_int("clickCount", 7), 7);
        assert!(store.get_string_set("leaderboard", BTreeSet::new()).is_empty());
    }

    #[test]
    fn set_then_get() {
        let mut store = MemoryStore::new();
        store.set_int("clickCount", 42);
        store.set_string_set("leaderboard", ["42".to_string()].into_iter().collect());
        assert_eq!(store.get_int("clickCount", 0), 42);
        assert!(store
            .get_string_set("leaderboard", BTreeSet::new())
            .contains("42"));
    }

    #[test]
    fn document_roundtrip() {
        let mut store = MemoryStore::new();
        store.set_int("multiplicateur", 3);
        store.set_string_set("leaderboard", ["10".to_string(), "5".to_string()].into_iter().collect());
        let json = store.to_json().unwrap();
        assert_eq!(MemoryStore::from_json(&json), Some(store));
    }

    #[test]
    fn garbage_document_is_discarded() {
        assert_eq!(MemoryStore::from_json("not json at all"), None);
    }

    #[test]
    fn version_below_min_compatible_is_rejected() {
        let json = r#"{ "version": 0, "prefs": { "ints": { "clickCount": 5 } } }"#;
        assert_eq!(MemoryStore::from_json(json), None);
    }

    #[test]
    fn missing_sections_default() {
        let store = MemoryStore::from_json(r#"{ "version": 1 }"#).unwrap();
        assert!(store.is_empty());

        let store = MemoryStore::from_json(r#"{ "version": 1, "prefs": { "ints": { "clickCount": 9 } } }"#)
            .unwrap();
        assert_eq!(store.get_int("clickCount", 0), 9);
    }

    #[test]
    fn unknown_fields_in_json_are_ignored() {
        let json = r#"{
            "version": 1,
            "prefs": { "ints": { "clickCount": 1 }, "string_sets": {}, "future": true },
            "future_unknown_field": "should be ignored"
        }"#;
        let store = MemoryStore::from_json(json).unwrap();
        assert_eq!(store.get_int("clickCount", 0), 1);
    }

    #[test]
    fn counting_store_counts_writes_only() {
        let mut store = CountingStore::default();
        store.get_int("a", 0);
        store.set_int("a", 1);
        store.set_string_set("b", BTreeSet::new());
        assert_eq!(store.writes, 2);
    }
}
