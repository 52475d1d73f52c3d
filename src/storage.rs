//src/storage.rs
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::cell::RefCell;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use thiserror::Error;

const APP_DATA_DIR: &str = "workout-log";
const DATA_ENV_VAR: &str = "WORKOUT_LOG_DATA_DIR"; // Environment variable name

// Named slots, one JSON blob each.
pub const HISTORY_KEY: &str = "workout_history";
pub const SESSION_KEY: &str = "current_workout";
pub const SETTINGS_KEY: &str = "settings";
pub const LIBRARY_KEY: &str = "custom_exercises";

#[derive(Error, Debug)]
pub enum Error {
    #[error("Could not determine data directory.")]
    CannotDetermineDataDir,
    #[error("I/O error accessing storage slot: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to de/serialize storage slot (JSON): {0}")]
    Json(#[from] serde_json::Error),
}

/// Key-value persistence contract: JSON string blobs under named slots.
///
/// Writes are best-effort from the caller's point of view; the service
/// layer logs failures and keeps the in-memory state authoritative.
pub trait KeyValueStore {
    /// # Errors
    /// Returns [`Error`] if the slot exists but cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, Error>;
    /// # Errors
    /// Returns [`Error`] if the blob cannot be written.
    fn set(&mut self, key: &str, value: &str) -> Result<(), Error>;
    /// Removing an absent slot is a no-op.
    /// # Errors
    /// Returns [`Error`] if the slot exists but cannot be removed.
    fn remove(&mut self, key: &str) -> Result<(), Error>;
}

/// Loads and deserializes a slot. Absent slots yield `Ok(None)`.
/// # Errors
/// Returns [`Error`] on read failure or malformed JSON.
pub fn load_slot<T: DeserializeOwned>(
    store: &dyn KeyValueStore,
    key: &str,
) -> Result<Option<T>, Error> {
    match store.get(key)? {
        Some(blob) => Ok(Some(serde_json::from_str(&blob)?)),
        None => Ok(None),
    }
}

/// Serializes and writes a slot.
/// # Errors
/// Returns [`Error`] on serialization or write failure.
pub fn save_slot<T: Serialize>(
    store: &mut dyn KeyValueStore,
    key: &str,
    value: &T,
) -> Result<(), Error> {
    let blob = serde_json::to_string(value)?;
    store.set(key, &blob)
}

/// Determines the directory holding the storage slots.
///
/// Honors the `WORKOUT_LOG_DATA_DIR` environment variable, falling back to
/// the platform data directory. Creates the directory if needed.
/// # Errors
/// Returns [`Error`] if no directory can be determined or created.
pub fn get_data_dir() -> Result<PathBuf, Error> {
    let dir = match std::env::var(DATA_ENV_VAR).ok() {
        Some(path_str) => PathBuf::from(path_str),
        None => dirs::data_dir()
            .ok_or(Error::CannotDetermineDataDir)?
            .join(APP_DATA_DIR),
    };
    if !dir.exists() {
        fs::create_dir_all(&dir)?;
    }
    Ok(dir)
}

/// File-backed store: one `<slot>.json` file per key under a data directory.
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// # Errors
    /// Returns [`Error`] if the directory cannot be created.
    pub fn new(dir: PathBuf) -> Result<Self, Error> {
        if !dir.exists() {
            fs::create_dir_all(&dir)?;
        }
        Ok(Self { dir })
    }

    /// Opens the store at the default data directory.
    /// # Errors
    /// Returns [`Error`] if the directory cannot be determined or created.
    pub fn open_default() -> Result<Self, Error> {
        Ok(Self { dir: get_data_dir()? })
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn slot_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, Error> {
        let path = self.slot_path(key);
        if !path.exists() {
            return Ok(None);
        }
        Ok(Some(fs::read_to_string(path)?))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), Error> {
        fs::write(self.slot_path(key), value)?;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), Error> {
        let path = self.slot_path(key);
        if path.exists() {
            fs::remove_file(path)?;
        }
        Ok(())
    }
}

/// In-memory store for tests. Clones share the same map, so a test can keep
/// a handle to the data after handing the store to a service (and build a
/// second service over the same slots to exercise reload paths).
#[derive(Default, Clone)]
pub struct MemoryStore {
    map: Rc<RefCell<HashMap<String, String>>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, Error> {
        Ok(self.map.borrow().get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), Error> {
        self.map.borrow_mut().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), Error> {
        self.map.borrow_mut().remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_round_trip() {
        let mut store = MemoryStore::new();
        assert!(store.get("missing").unwrap().is_none());
        store.set(SETTINGS_KEY, "{}").unwrap();
        assert_eq!(store.get(SETTINGS_KEY).unwrap().as_deref(), Some("{}"));
        store.remove(SETTINGS_KEY).unwrap();
        assert!(store.get(SETTINGS_KEY).unwrap().is_none());
        // Removing again is a no-op.
        store.remove(SETTINGS_KEY).unwrap();
    }

    #[test]
    fn test_clones_share_slots() {
        let mut store = MemoryStore::new();
        let observer = store.clone();
        store.set(SESSION_KEY, r#"{"exercises":[]}"#).unwrap();
        assert!(observer.get(SESSION_KEY).unwrap().is_some());
    }

    #[test]
    fn test_load_slot_absent_is_none() {
        let store = MemoryStore::new();
        let loaded: Option<Vec<String>> = load_slot(&store, HISTORY_KEY).unwrap();
        assert!(loaded.is_none());
    }

    #[test]
    fn test_save_then_load_slot() {
        let mut store = MemoryStore::new();
        save_slot(&mut store, HISTORY_KEY, &vec!["a".to_string()]).unwrap();
        let loaded: Option<Vec<String>> = load_slot(&store, HISTORY_KEY).unwrap();
        assert_eq!(loaded, Some(vec!["a".to_string()]));
    }
}
