//! Persistence of the roster text between sessions.

use std::collections::HashMap;

/// Key the roster text is stored under.
pub const ROSTER_STORAGE_KEY: &str = "marble-race.players";
/// Roster used when nothing has been saved yet.
pub const DEFAULT_ROSTER: &str = "Mike*5,David*5,Steve*5";

/// Minimal string key-value store (browser `localStorage`, a file, memory).
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str);
}

#[derive(Debug, Default, Clone)]
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

    fn set(&mut self, key: &str, value: &str) {
        self.entries.insert(key.to_string(), value.to_string());
    }
}

/// Saved roster text, or [`DEFAULT_ROSTER`].
pub fn load_roster(store: &dyn KeyValueStore) -> String {
    store
        .get(ROSTER_STORAGE_KEY)
        .unwrap_or_else(|| DEFAULT_ROSTER.to_string())
}

pub fn save_roster(store: &mut dyn KeyValueStore, roster: &str) {
    store.set(ROSTER_STORAGE_KEY, roster);
}
