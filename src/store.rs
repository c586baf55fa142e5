//! Key-value persistence for session state.
//!
//! State is kept under four keys, each holding a JSON document. Reads treat a
//! missing or unreadable value as "no prior state"; writes are best-effort.

use crate::color::ColorMap;
use crate::error::{PrefabError, Result};
use crate::tally::MaterialTally;
use crate::types::EntityRecord;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

/// Key of the material tally.
pub const MATERIALS_KEY: &str = "materials";
/// Key of the checked-items map.
pub const CHECKED_ITEMS_KEY: &str = "checkedItems";
/// Key of the raw imported block list.
pub const BLOCKS_KEY: &str = "blocks";
/// Key of the per-name color map.
pub const BLOCK_COLORS_KEY: &str = "blockColors";

/// A string key-value store, shaped like the browser's `localStorage`.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;

    fn set(&mut self, key: &str, value: String) -> Result<()>;

    fn remove(&mut self, key: &str) -> Result<()>;
}

/// Store that lives only as long as the process.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: String) -> Result<()> {
        self.entries.insert(key.to_string(), value);
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.entries.remove(key);
        Ok(())
    }
}

/// Store backed by a single JSON object file, rewritten on every change.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl FileStore {
    /// Open the store at `path`. A missing or unreadable file opens empty.
    pub fn open<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref().to_path_buf();
        let entries: BTreeMap<String, String> = match std::fs::read_to_string(&path) {
            Ok(contents) => serde_json::from_str(&contents).unwrap_or_else(|e| {
                log::warn!("Ignoring unreadable state file {:?}: {}", path, e);
                BTreeMap::new()
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => {
                log::warn!("Could not read state file {:?}: {}", path, e);
                BTreeMap::new()
            }
        };
        Self { path, entries }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self) -> Result<()> {
        let contents = serde_json::to_string_pretty(&self.entries)?;
        std::fs::write(&self.path, contents)?;
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: String) -> Result<()> {
        self.entries.insert(key.to_string(), value);
        self.flush()
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        if self.entries.remove(key).is_some() {
            self.flush()?;
        }
        Ok(())
    }
}

/// The browser's `localStorage`.
#[cfg(feature = "wasm")]
pub struct LocalStorage {
    storage: web_sys::Storage,
}

#[cfg(feature = "wasm")]
impl LocalStorage {
    /// Get the window's `localStorage`, if the environment provides one.
    pub fn open() -> Result<Self> {
        let storage = web_sys::window()
            .ok_or_else(|| PrefabError::Store("no window".to_string()))?
            .local_storage()
            .map_err(|_| PrefabError::Store("localStorage is not accessible".to_string()))?
            .ok_or_else(|| PrefabError::Store("localStorage is not available".to_string()))?;
        Ok(Self { storage })
    }
}

#[cfg(feature = "wasm")]
impl KeyValueStore for LocalStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.storage.get_item(key).ok().flatten()
    }

    fn set(&mut self, key: &str, value: String) -> Result<()> {
        self.storage
            .set_item(key, &value)
            .map_err(|_| PrefabError::Store(format!("failed to write {}", key)))
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.storage
            .remove_item(key)
            .map_err(|_| PrefabError::Store(format!("failed to remove {}", key)))
    }
}

/// Everything persisted between sessions.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PersistedState {
    pub materials: MaterialTally,
    pub checked_items: BTreeMap<String, bool>,
    pub blocks: Vec<EntityRecord>,
    pub block_colors: ColorMap,
}

impl PersistedState {
    /// Read each key independently; absent or corrupt values come back empty.
    pub fn load<S: KeyValueStore + ?Sized>(store: &S) -> Self {
        Self {
            materials: read_value(store, MATERIALS_KEY).unwrap_or_default(),
            checked_items: read_value(store, CHECKED_ITEMS_KEY).unwrap_or_default(),
            blocks: read_value(store, BLOCKS_KEY).unwrap_or_default(),
            block_colors: read_value(store, BLOCK_COLORS_KEY).unwrap_or_default(),
        }
    }
}

/// Read and decode one key. Decode failures are logged and read as absent.
pub fn read_value<T, S>(store: &S, key: &str) -> Option<T>
where
    T: DeserializeOwned,
    S: KeyValueStore + ?Sized,
{
    let raw = store.get(key)?;
    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(e) => {
            log::warn!("Ignoring persisted {}: {}", key, e);
            None
        }
    }
}

/// Encode and write one key. Failures are logged and otherwise ignored.
pub fn write_value<T, S>(store: &mut S, key: &str, value: &T)
where
    T: Serialize + ?Sized,
    S: KeyValueStore + ?Sized,
{
    let result = serde_json::to_string(value)
        .map_err(PrefabError::from)
        .and_then(|json| store.set(key, json));
    if let Err(e) = result {
        log::warn!("Failed to persist {}: {}", key, e);
    }
}
