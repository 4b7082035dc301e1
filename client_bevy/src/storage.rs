//! Roster persistence: `localStorage` in the browser, a JSON file natively.

use bevy::log::warn;
use bevy::prelude::Resource;
use marble_race_core::storage::KeyValueStore;

use crate::config::ClientConfig;

#[cfg(target_arch = "wasm32")]
pub type RosterStore = BrowserStore;
#[cfg(not(target_arch = "wasm32"))]
pub type RosterStore = FileStore;

#[cfg(target_arch = "wasm32")]
pub fn open(_config: &ClientConfig) -> RosterStore {
    BrowserStore
}

#[cfg(not(target_arch = "wasm32"))]
pub fn open(config: &ClientConfig) -> RosterStore {
    FileStore::load(config.storage_path.clone())
}

/// Window `localStorage`. Looked up per call since the handle is not `Send`.
#[cfg(target_arch = "wasm32")]
#[derive(Resource, Default)]
pub struct BrowserStore;

#[cfg(target_arch = "wasm32")]
impl BrowserStore {
    fn storage() -> Option<web_sys::Storage> {
        web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
    }
}

#[cfg(target_arch = "wasm32")]
impl KeyValueStore for BrowserStore {
    fn get(&self, key: &str) -> Option<String> {
        Self::storage()?.get_item(key).ok().flatten()
    }

    fn set(&mut self, key: &str, value: &str) {
        let Some(storage) = Self::storage() else {
            warn!("localStorage unavailable, {key} not saved");
            return;
        };
        if storage.set_item(key, value).is_err() {
            warn!("localStorage rejected {key}");
        }
    }
}

/// Flat JSON object of string values.
#[cfg(not(target_arch = "wasm32"))]
#[derive(Resource, Debug)]
pub struct FileStore {
    path: std::path::PathBuf,
    entries: std::collections::BTreeMap<String, String>,
}

#[cfg(not(target_arch = "wasm32"))]
impl FileStore {
    /// Missing or unreadable files start empty.
    pub fn load(path: std::path::PathBuf) -> Self {
        let entries = std::fs::read_to_string(&path)
            .ok()
            .and_then(|json| serde_json::from_str(&json).ok())
            .unwrap_or_default();
        Self { path, entries }
    }

    fn flush(&self) -> Result<(), String> {
        let json = serde_json::to_string_pretty(&self.entries).map_err(|e| e.to_string())?;
        std::fs::write(&self.path, json).map_err(|e| e.to_string())
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) {
        self.entries.insert(key.to_string(), value.to_string());
        if let Err(e) = self.flush() {
            warn!("Failed to write {}: {}", self.path.display(), e);
        }
    }
}
