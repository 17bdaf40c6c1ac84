use crate::errors::StorageError;
use serde::{de::DeserializeOwned, Serialize};
use std::{
    collections::HashMap,
    fmt, fs,
    io::ErrorKind,
    path::{Path, PathBuf},
    sync::Mutex,
};
use tracing::{debug, warn};

/// The fixed slots the tracker persists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StorageKey {
    CompletedItems,
    Todos,
    ActiveDays,
}

impl StorageKey {
    pub const ALL: [StorageKey; 3] = [
        StorageKey::CompletedItems,
        StorageKey::Todos,
        StorageKey::ActiveDays,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            StorageKey::CompletedItems => "gateCompletedItems",
            StorageKey::Todos => "gateTodos",
            StorageKey::ActiveDays => "gateActiveDays",
        }
    }
}

impl fmt::Display for StorageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Local key-value medium holding one serialized value per key.
///
/// Keys are independent: there is no transaction spanning two of them, and
/// the last writer of a key wins.
pub trait Store: Send + Sync {
    fn get_item(&self, key: StorageKey) -> Result<Option<String>, StorageError>;
    fn set_item(&self, key: StorageKey, value: &str) -> Result<(), StorageError>;
}

pub fn load<T: DeserializeOwned>(store: &dyn Store, key: StorageKey) -> Result<Option<T>, StorageError> {
    let Some(raw) = store.get_item(key)? else {
        return Ok(None);
    };
    serde_json::from_str(&raw)
        .map(Some)
        .map_err(|source| StorageError::Decode { key, source })
}

/// Loads a slot, treating a missing, unreadable or undecodable value as empty.
pub fn load_or_default<T: DeserializeOwned + Default>(store: &dyn Store, key: StorageKey) -> T {
    match load(store, key) {
        Ok(Some(value)) => value,
        Ok(None) => T::default(),
        Err(err) => {
            warn!("ignoring stored {key}: {err}");
            T::default()
        }
    }
}

pub fn save<T: Serialize>(store: &dyn Store, key: StorageKey, value: &T) -> Result<(), StorageError> {
    let payload = serde_json::to_string(value).map_err(|source| StorageError::Encode { key, source })?;
    store.set_item(key, &payload)?;
    debug!(key = key.as_str(), bytes = payload.len(), "saved");
    Ok(())
}

/// Outcome of a view mutation. The in-memory change always stands; `warning`
/// carries a write-through that did not make it to the store.
#[derive(Debug)]
pub struct Applied<T> {
    pub value: T,
    pub warning: Option<StorageError>,
}

impl<T> Applied<T> {
    pub fn clean(value: T) -> Self {
        Self { value, warning: None }
    }

    pub fn with_warning(value: T, warning: Option<StorageError>) -> Self {
        Self { value, warning }
    }

    pub fn warning_message(&self) -> Option<String> {
        self.warning.as_ref().map(ToString::to_string)
    }
}

/// Saves a slot after a mutation. Failures are logged and handed back for display.
pub fn write_through<T: Serialize>(store: &dyn Store, key: StorageKey, value: &T) -> Option<StorageError> {
    match save(store, key, value) {
        Ok(()) => None,
        Err(err) => {
            warn!("keeping unsaved changes in memory: {err}");
            Some(err)
        }
    }
}

/// In-process store. The optional quota caps the total bytes held across keys.
#[derive(Debug, Default)]
pub struct MemoryStore {
    items: Mutex<HashMap<StorageKey, String>>,
    quota: Option<usize>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_quota(limit: usize) -> Self {
        Self {
            items: Mutex::default(),
            quota: Some(limit),
        }
    }

    fn items(&self) -> Result<std::sync::MutexGuard<'_, HashMap<StorageKey, String>>, StorageError> {
        self.items
            .lock()
            .map_err(|_| StorageError::Unavailable("memory store lock poisoned".into()))
    }
}

impl Store for MemoryStore {
    fn get_item(&self, key: StorageKey) -> Result<Option<String>, StorageError> {
        Ok(self.items()?.get(&key).cloned())
    }

    fn set_item(&self, key: StorageKey, value: &str) -> Result<(), StorageError> {
        let mut items = self.items()?;
        if let Some(limit) = self.quota {
            let others: usize = items
                .iter()
                .filter(|(existing, _)| **existing != key)
                .map(|(_, stored)| stored.len())
                .sum();
            let needed = others + value.len();
            if needed > limit {
                return Err(StorageError::QuotaExceeded { key, needed, limit });
            }
        }
        items.insert(key, value.to_owned());
        Ok(())
    }
}

/// Keeps each key in `<dir>/<key>.json`.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, key: StorageKey) -> PathBuf {
        self.dir.join(format!("{}.json", key.as_str()))
    }
}

impl Store for FileStore {
    fn get_item(&self, key: StorageKey) -> Result<Option<String>, StorageError> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(raw) => Ok(Some(raw)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StorageError::Read { key, source }),
        }
    }

    fn set_item(&self, key: StorageKey, value: &str) -> Result<(), StorageError> {
        fs::create_dir_all(&self.dir).map_err(|source| StorageError::Write { key, source })?;
        fs::write(self.path_for(key), value).map_err(|source| StorageError::Write { key, source })
    }
}
