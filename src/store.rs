//! Persistent key-value preference storage.
//!
//! Values are JSON documents stored under application-scoped keys.  Two
//! [`PreferenceStore`] backends live here: a JSON file on disk
//! ([`JsonFileStore`]) and an in-process map ([`MemoryStore`]).

use crate::traits::PreferenceStore;
use log::debug;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Key of the serialized button grid.
pub const BUTTONS_KEY: &str = "SmartTabButtonConfigs";
/// Key of the primary hotkey chord.
pub const HOTKEY_KEY: &str = "SmartTabHotkeyConfig";
/// Key of the secondary hotkey chord (`null` when cleared).
pub const SECONDARY_HOTKEY_KEY: &str = "SmartTabSecondaryHotkeyConfig";

/// Errors from a preference store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("io error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("{0} does not contain a JSON object")]
    Corrupt(PathBuf),
}

//  In-memory store

/// A store that lives only as long as the process.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: HashMap<String, Value>,
    writes: usize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of successful [`set`](PreferenceStore::set) calls so far.
    pub fn writes(&self) -> usize {
        self.writes
    }
}

impl PreferenceStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<Value>, StoreError> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: Value) -> Result<(), StoreError> {
        self.values.insert(key.to_string(), value);
        self.writes += 1;
        Ok(())
    }
}

//  JSON file store

/// A store backed by a single JSON object file.
///
/// The whole file is read on [`open`](Self::open) and rewritten on every
/// [`set`](PreferenceStore::set), through a temporary sibling file that is
/// renamed over the original.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    values: Map<String, Value>,
}

impl JsonFileStore {
    /// Open the store at `path`.  A missing file is an empty store.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        let values = match std::fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str::<Value>(&contents)? {
                Value::Object(map) => map,
                _ => return Err(StoreError::Corrupt(path)),
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("no preferences at {}, starting empty", path.display());
                Map::new()
            }
            Err(source) => return Err(StoreError::Io { path, source }),
        };
        Ok(Self { path, values })
    }

    /// Default location: `<config dir>/smarttab/preferences.json`.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(std::env::temp_dir)
            .join("smarttab")
            .join("preferences.json")
    }

    /// The backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write `values` to disk atomically.
    fn flush(&self, values: &Map<String, Value>) -> Result<(), StoreError> {
        let io_err = |source| StoreError::Io {
            path: self.path.clone(),
            source,
        };
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(io_err)?;
        }
        let contents = serde_json::to_string_pretty(values)?;
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, contents).map_err(io_err)?;
        std::fs::rename(&tmp, &self.path).map_err(io_err)?;
        debug!("wrote {}", self.path.display());
        Ok(())
    }
}

impl PreferenceStore for JsonFileStore {
    fn get(&self, key: &str) -> Result<Option<Value>, StoreError> {
        Ok(self.values.get(key).cloned())
    }

    /// The new value is visible through `get` only once it is on disk.
    fn set(&mut self, key: &str, value: Value) -> Result<(), StoreError> {
        let mut values = self.values.clone();
        values.insert(key.to_string(), value);
        self.flush(&values)?;
        self.values = values;
        Ok(())
    }
}
