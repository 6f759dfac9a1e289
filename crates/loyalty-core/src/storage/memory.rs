//! In-memory key-value store.

use std::collections::HashMap;

use crate::error::StorageError;

use super::KeyStore;

/// A [`KeyStore`] that lives and dies with the process.
///
/// The default session backend: dropping it is the engine's rendition of the
/// browser session ending.
#[derive(Debug, Default)]
pub struct MemoryStore {
    map: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.map.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.map.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        self.map.remove(key);
        Ok(())
    }
}
