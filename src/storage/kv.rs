//! Key/value store abstraction
//!
//! Every collection is persisted as one serialized JSON array under its own
//! key. [`FileStore`] keeps all keys in a single JSON object on disk and
//! rewrites it atomically on each change; [`MemoryStore`] is used in tests.

use std::collections::BTreeMap;
use std::fmt;
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use serde::{de::DeserializeOwned, Serialize};

use crate::error::{BudgetbookError, BudgetbookResult};

pub const TRANSACTIONS_KEY: &str = "accounting_transactions";
pub const CATEGORIES_KEY: &str = "accounting_categories";
pub const BUDGETS_KEY: &str = "accounting_budgets";
/// Preferences written by older versions; only ever cleared
pub const SETTINGS_KEY: &str = "accounting_settings";
pub const THEME_KEY: &str = "theme";

/// Keys wiped by a full data reset. The theme survives.
pub const DATA_KEYS: [&str; 4] = [TRANSACTIONS_KEY, CATEGORIES_KEY, BUDGETS_KEY, SETTINGS_KEY];

/// A persistent string-to-string store
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> BudgetbookResult<Option<String>>;

    fn set(&self, key: &str, value: String) -> BudgetbookResult<()>;

    fn remove(&self, key: &str) -> BudgetbookResult<()>;

    fn keys(&self) -> BudgetbookResult<Vec<String>>;

    /// Remove every key
    fn clear(&self) -> BudgetbookResult<()> {
        for key in self.keys()? {
            self.remove(&key)?;
        }
        Ok(())
    }
}

fn lock_poisoned(e: impl std::fmt::Display) -> BudgetbookError {
    BudgetbookError::Storage(format!("Failed to acquire store lock: {}", e))
}

type Entries = BTreeMap<String, String>;

fn file_error(action: &str, path: &Path, e: impl fmt::Display) -> BudgetbookError {
    BudgetbookError::Storage(format!("Failed to {} {}: {}", action, path.display(), e))
}

/// Key/value store backed by one JSON file
pub struct FileStore {
    path: PathBuf,
    entries: RwLock<Entries>,
}

impl FileStore {
    /// Open the store at `path`, starting empty if the file doesn't exist
    pub fn open(path: impl AsRef<Path>) -> BudgetbookResult<Self> {
        let path = path.as_ref().to_path_buf();
        let entries = Self::load(&path)?;
        log::debug!("Opened store {} with {} keys", path.display(), entries.len());

        Ok(Self {
            path,
            entries: RwLock::new(entries),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(path: &Path) -> BudgetbookResult<Entries> {
        let raw = match fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Entries::new()),
            Err(e) => return Err(file_error("read", path, e)),
        };
        if raw.trim().is_empty() {
            return Ok(Entries::new());
        }

        serde_json::from_str(&raw).map_err(|e| {
            log::error!("Could not parse {}: {}", path.display(), e);
            file_error("parse", path, e)
        })
    }

    /// Write `entries` next to the store and rename over it
    fn flush(&self, entries: &Entries) -> BudgetbookResult<()> {
        let path = self.path.as_path();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| file_error("create", parent, e))?;
        }

        let raw = serde_json::to_vec_pretty(entries)
            .map_err(|e| BudgetbookError::Storage(format!("Failed to serialize store: {}", e)))?;

        // The rename is only atomic within one directory
        let temp = path.with_extension("json.tmp");
        let written = File::create(&temp).and_then(|mut file| {
            file.write_all(&raw)?;
            file.sync_all()
        });
        let result = match written {
            Ok(()) => fs::rename(&temp, path).map_err(|e| file_error("replace", path, e)),
            Err(e) => Err(file_error("write", &temp, e)),
        };

        if let Err(e) = &result {
            let _ = fs::remove_file(&temp);
            log::error!("Failed to write store {}: {}", path.display(), e);
        }
        result
    }

    /// Apply `change` to a copy of the entries; the copy replaces the cached
    /// entries only once it is on disk. `change` returns false for a no-op.
    fn commit(&self, change: impl FnOnce(&mut Entries) -> bool) -> BudgetbookResult<()> {
        let mut entries = self.entries.write().map_err(lock_poisoned)?;
        let mut next = entries.clone();
        if !change(&mut next) {
            return Ok(());
        }

        self.flush(&next)?;
        *entries = next;
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> BudgetbookResult<Option<String>> {
        let entries = self.entries.read().map_err(lock_poisoned)?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: String) -> BudgetbookResult<()> {
        self.commit(|entries| {
            entries.insert(key.to_string(), value);
            true
        })
    }

    fn remove(&self, key: &str) -> BudgetbookResult<()> {
        self.commit(|entries| entries.remove(key).is_some())
    }

    fn keys(&self) -> BudgetbookResult<Vec<String>> {
        let entries = self.entries.read().map_err(lock_poisoned)?;
        Ok(entries.keys().cloned().collect())
    }

    fn clear(&self) -> BudgetbookResult<()> {
        self.commit(|entries| {
            entries.clear();
            true
        })
    }
}

/// In-memory store
#[derive(Default)]
pub struct MemoryStore {
    entries: RwLock<BTreeMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> BudgetbookResult<Option<String>> {
        let entries = self.entries.read().map_err(lock_poisoned)?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: String) -> BudgetbookResult<()> {
        let mut entries = self.entries.write().map_err(lock_poisoned)?;
        entries.insert(key.to_string(), value);
        Ok(())
    }

    fn remove(&self, key: &str) -> BudgetbookResult<()> {
        let mut entries = self.entries.write().map_err(lock_poisoned)?;
        entries.remove(key);
        Ok(())
    }

    fn keys(&self) -> BudgetbookResult<Vec<String>> {
        let entries = self.entries.read().map_err(lock_poisoned)?;
        Ok(entries.keys().cloned().collect())
    }
}

/// Read the JSON array stored under `key`; a missing key is an empty list
pub fn load_array<T: DeserializeOwned>(
    store: &dyn KeyValueStore,
    key: &str,
) -> BudgetbookResult<Vec<T>> {
    match store.get(key)? {
        None => Ok(Vec::new()),
        Some(raw) if raw.trim().is_empty() => Ok(Vec::new()),
        Some(raw) => serde_json::from_str(&raw).map_err(|e| {
            log::error!("Stored data under '{}' is unreadable: {}", key, e);
            BudgetbookError::Storage(format!("Failed to parse '{}': {}", key, e))
        }),
    }
}

/// Serialize `items` as a JSON array under `key`
pub fn save_array<T: Serialize>(
    store: &dyn KeyValueStore,
    key: &str,
    items: &[T],
) -> BudgetbookResult<()> {
    let raw = serde_json::to_string(items)
        .map_err(|e| BudgetbookError::Storage(format!("Failed to serialize '{}': {}", key, e)))?;
    store.set(key, raw)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_file_store_persists_across_open() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("store.json");

        let store = FileStore::open(&path).unwrap();
        store.set("theme", "dark".into()).unwrap();
        store.set("other", "1".into()).unwrap();
        store.remove("other").unwrap();

        let reopened = FileStore::open(&path).unwrap();
        assert_eq!(reopened.get("theme").unwrap().as_deref(), Some("dark"));
        assert_eq!(reopened.get("other").unwrap(), None);
        assert_eq!(reopened.keys().unwrap(), vec!["theme".to_string()]);
    }

    #[test]
    fn test_missing_or_blank_file_opens_empty() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("store.json");
        assert!(FileStore::open(&path).unwrap().keys().unwrap().is_empty());

        let blank = temp_dir.path().join("blank.json");
        fs::write(&blank, "  ").unwrap();
        assert!(FileStore::open(&blank).unwrap().keys().unwrap().is_empty());

        let store = FileStore::open(&path).unwrap();
        store.set("theme", "dark".into()).unwrap();
        assert!(path.exists());
        assert!(!path.with_extension("json.tmp").exists());
    }

    #[test]
    fn test_corrupt_file_is_storage_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("store.json");
        fs::write(&path, "{not json").unwrap();

        assert!(matches!(FileStore::open(&path), Err(BudgetbookError::Storage(_))));
    }

    #[test]
    fn test_failed_write_keeps_previous_entries() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("store.json");

        let store = FileStore::open(&path).unwrap();
        store.set("theme", "dark".into()).unwrap();

        // A directory in place of the file makes every rename fail
        fs::remove_file(&path).unwrap();
        fs::create_dir(&path).unwrap();

        assert!(store.set("theme", "light".into()).is_err());
        assert_eq!(store.get("theme").unwrap().as_deref(), Some("dark"));

        assert!(store.clear().is_err());
        assert_eq!(store.keys().unwrap(), vec!["theme".to_string()]);
        assert!(!path.with_extension("json.tmp").exists());
    }

    #[test]
    fn test_clear_removes_everything() {
        let store = MemoryStore::new();
        store.set("a", "1".into()).unwrap();
        store.set("b", "2".into()).unwrap();

        store.clear().unwrap();
        assert!(store.keys().unwrap().is_empty());
    }

    #[test]
    fn test_arrays_round_trip() {
        let store = MemoryStore::new();
        assert!(load_array::<String>(&store, "missing").unwrap().is_empty());

        save_array(&store, "names", &["a".to_string(), "b".to_string()]).unwrap();
        let names: Vec<String> = load_array(&store, "names").unwrap();
        assert_eq!(names, vec!["a", "b"]);
    }

    #[test]
    fn test_unparseable_array_is_storage_error() {
        let store = MemoryStore::new();
        store.set(TRANSACTIONS_KEY, "[{broken".into()).unwrap();

        let result = load_array::<serde_json::Value>(&store, TRANSACTIONS_KEY);
        assert!(matches!(result, Err(BudgetbookError::Storage(_))));
    }
}
