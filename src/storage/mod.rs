use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::config::{app_config_path, config_env_dirs, ConfigPathError, APP_DIR};

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("missing HOME environment variable")]
    MissingHomeDirectory,
    #[error("failed to read preference store: {path}")]
    Read { path: PathBuf, source: io::Error },
    #[error("failed to write preference store: {path}")]
    Write { path: PathBuf, source: io::Error },
    #[error("failed to parse preference store")]
    Parse(#[from] serde_json::Error),
    #[error("preference storage unavailable: {0}")]
    Unavailable(String),
}

pub type StorageResult<T> = std::result::Result<T, StorageError>;

/// String-valued key-value storage scoped to one user.
///
/// Methods take `&self`; implementations use interior mutability the way
/// a browser's local storage is shared by every script on a page.
pub trait PreferenceStore {
    fn get(&self, key: &str) -> StorageResult<Option<String>>;
    fn set(&self, key: &str, value: &str) -> StorageResult<()>;
    fn remove(&self, key: &str) -> StorageResult<()>;
}

impl<S: PreferenceStore + ?Sized> PreferenceStore for Box<S> {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> StorageResult<()> {
        (**self).remove(key)
    }
}

impl<S: PreferenceStore + ?Sized> PreferenceStore for std::rc::Rc<S> {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> StorageResult<()> {
        (**self).remove(key)
    }
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RefCell<BTreeMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entry(key: &str, value: &str) -> Self {
        let store = Self::new();
        store
            .entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        store
    }

    pub fn snapshot(&self) -> BTreeMap<String, String> {
        self.entries.borrow().clone()
    }
}

impl PreferenceStore for MemoryStore {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> StorageResult<()> {
        self.entries.borrow_mut().remove(key);
        Ok(())
    }
}

/// A flat JSON object of string keys and values on disk.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn with_path(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn with_default_path(file_name: &str) -> StorageResult<Self> {
        let (xdg_config_home, home) = config_env_dirs();
        Self::with_config_dirs(file_name, xdg_config_home.as_deref(), home.as_deref())
    }

    fn with_config_dirs(
        file_name: &str,
        xdg_config_home: Option<&Path>,
        home: Option<&Path>,
    ) -> StorageResult<Self> {
        let path =
            app_config_path(APP_DIR, file_name, xdg_config_home, home).map_err(|error| {
                match error {
                    ConfigPathError::MissingHomeDirectory => StorageError::MissingHomeDirectory,
                }
            })?;
        Ok(Self::with_path(path))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> StorageResult<BTreeMap<String, String>> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let serialized = fs::read_to_string(&self.path).map_err(|source| StorageError::Read {
            path: self.path.clone(),
            source,
        })?;
        if serialized.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        Ok(serde_json::from_str(&serialized)?)
    }

    fn save(&self, entries: &BTreeMap<String, String>) -> StorageResult<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|source| StorageError::Write {
                path: self.path.clone(),
                source,
            })?;
        }
        let serialized = serde_json::to_string_pretty(entries)?;
        fs::write(&self.path, serialized).map_err(|source| StorageError::Write {
            path: self.path.clone(),
            source,
        })
    }
}

impl PreferenceStore for JsonFileStore {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        Ok(self.load()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        let mut entries = self.load()?;
        if entries.get(key).map(String::as_str) == Some(value) {
            return Ok(());
        }
        entries.insert(key.to_string(), value.to_string());
        self.save(&entries)
    }

    fn remove(&self, key: &str) -> StorageResult<()> {
        let mut entries = self.load()?;
        if entries.remove(key).is_some() {
            self.save(&entries)?;
        }
        Ok(())
    }
}

/// Wraps a store so that failures never escape.
///
/// Every write lands in an in-memory shadow. A key whose last write failed
/// is served from the shadow until a later write reaches the store; reads
/// that fail fall back to the shadow as well.
#[derive(Debug)]
pub struct SafeStore<S> {
    inner: S,
    shadow: RefCell<BTreeMap<String, String>>,
    unsynced: RefCell<BTreeSet<String>>,
}

impl<S: PreferenceStore> SafeStore<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            shadow: RefCell::new(BTreeMap::new()),
            unsynced: RefCell::new(BTreeSet::new()),
        }
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }

    pub fn read(&self, key: &str) -> Option<String> {
        if self.unsynced.borrow().contains(key) {
            return self.shadow.borrow().get(key).cloned();
        }
        match self.inner.get(key) {
            Ok(value) => value,
            Err(err) => {
                tracing::warn!(%err, key, "preference read failed; using in-memory value");
                self.shadow.borrow().get(key).cloned()
            }
        }
    }

    pub fn write(&self, key: &str, value: &str) {
        self.shadow
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        match self.inner.set(key, value) {
            Ok(()) => {
                self.unsynced.borrow_mut().remove(key);
            }
            Err(err) => {
                tracing::warn!(%err, key, value, "preference write failed; kept in memory only");
                self.unsynced.borrow_mut().insert(key.to_string());
            }
        }
    }
}


#[cfg(test)]
mod tests {
    use super::testing::{FailingStore, QuotaExceededStore};
    use super::*;

    fn fixture_root() -> PathBuf {
        let mut path = std::env::temp_dir();
        let nanos = std::time::SystemTime::now()
            .duration_since(std::time::SystemTime::UNIX_EPOCH)
            .map_or(0, |d| d.as_nanos());
        let pid = std::process::id();
        path.push(format!("sitetheme-storage-{pid}-{nanos}"));
        path
    }

    fn with_temp_root<F: FnOnce(&Path)>(f: F) {
        let root = fixture_root();
        fs::create_dir_all(&root).unwrap();
        f(&root);
        let _ = fs::remove_dir_all(&root);
    }

    #[test]
    fn memory_store_set_get_remove() {
        let store = MemoryStore::new();
        assert_eq!(store.get("theme").unwrap(), None);
        store.set("theme", "dark").unwrap();
        assert_eq!(store.get("theme").unwrap().as_deref(), Some("dark"));
        store.remove("theme").unwrap();
        assert_eq!(store.get("theme").unwrap(), None);
    }

    #[test]
    fn file_store_resolves_path_under_config_root() {
        let store =
            JsonFileStore::with_config_dirs("preferences.json", Some(Path::new("/tmp/cfg")), None)
                .unwrap();
        assert_eq!(
            store.path(),
            Path::new("/tmp/cfg/sitetheme/preferences.json")
        );

        let err = JsonFileStore::with_config_dirs("preferences.json", None, None).unwrap_err();
        assert!(matches!(err, StorageError::MissingHomeDirectory));
    }

    #[test]
    fn file_store_missing_file_reads_as_absent() {
        with_temp_root(|root| {
            let store = JsonFileStore::with_path(root.join("nested/preferences.json"));
            assert_eq!(store.get("theme").unwrap(), None);
        });
    }

    #[test]
    fn file_store_persists_across_instances_and_keeps_other_keys() {
        with_temp_root(|root| {
            let path = root.join("nested/preferences.json");
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(&path, r#"{ "lang": "ru" }"#).unwrap();

            JsonFileStore::with_path(path.clone())
                .set("theme", "light")
                .unwrap();

            let reopened = JsonFileStore::with_path(path.clone());
            assert_eq!(reopened.get("theme").unwrap().as_deref(), Some("light"));
            assert_eq!(reopened.get("lang").unwrap().as_deref(), Some("ru"));

            reopened.remove("theme").unwrap();
            assert_eq!(reopened.get("theme").unwrap(), None);
            assert_eq!(reopened.get("lang").unwrap().as_deref(), Some("ru"));
        });
    }

    #[test]
    fn file_store_rejects_invalid_payload() {
        with_temp_root(|root| {
            let path = root.join("preferences.json");
            fs::write(&path, "[1, 2").unwrap();
            let store = JsonFileStore::with_path(path);
            assert!(matches!(store.get("theme"), Err(StorageError::Parse(_))));
            assert!(matches!(store.set("theme", "dark"), Err(StorageError::Parse(_))));
        });
    }

    #[test]
    fn safe_store_passes_through_healthy_store() {
        let store = SafeStore::new(MemoryStore::new());
        assert_eq!(store.read("theme"), None);
        store.write("theme", "auto");
        assert_eq!(store.read("theme").as_deref(), Some("auto"));
        assert_eq!(
            store.inner().snapshot().get("theme").map(String::as_str),
            Some("auto")
        );
    }

    #[test]
    fn safe_store_degrades_to_memory_when_storage_fails() {
        let store = SafeStore::new(FailingStore::default());
        assert_eq!(store.read("theme"), None);

        store.write("theme", "dark");
        assert_eq!(store.read("theme").as_deref(), Some("dark"));
        assert_eq!(store.inner().calls.get(), 2);
    }

    #[test]
    fn safe_store_prefers_memory_when_writes_fail_but_reads_work() {
        let store = SafeStore::new(QuotaExceededStore::with_entry("theme", "light"));
        assert_eq!(store.read("theme").as_deref(), Some("light"));

        store.write("theme", "dark");
        assert_eq!(store.read("theme").as_deref(), Some("dark"));
        assert_eq!(
            store.inner().inner.snapshot().get("theme").map(String::as_str),
            Some("light")
        );
    }

    #[test]
    fn safe_store_reads_through_again_after_a_successful_write() {
        let store = SafeStore::new(QuotaExceededStore::with_entry("theme", "light"));
        store.write("theme", "dark");

        store.inner().accept_writes.set(true);
        store.write("theme", "auto");
        store.inner().inner.set("theme", "light").unwrap();
        assert_eq!(store.read("theme").as_deref(), Some("light"));
    }
}
