//! JSON-file-backed key-value store.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::error::StorageError;

use super::KeyStore;

/// A [`KeyStore`] persisted as one JSON object in a single file.
///
/// The whole map is loaded at open and rewritten on every mutation -- the
/// payloads are a handful of short strings, so read-modify-write of the full
/// file is the simplest thing that works. A payload that fails to parse is
/// replaced by the empty default rather than treated as a hard failure.
pub struct FileStore {
    path: PathBuf,
    map: BTreeMap<String, String>,
}

impl FileStore {
    /// Open the store at `path`, creating an empty one if the file is absent.
    ///
    /// # Errors
    /// Returns an error only if the file exists but cannot be read. A file
    /// that reads fine but does not parse self-heals to empty.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let path = path.into();
        let map = match std::fs::read_to_string(&path) {
            Ok(raw) => match serde_json::from_str(&raw) {
                Ok(map) => map,
                Err(_) => {
                    // Corrupt payload: overwrite with the empty default.
                    let empty = BTreeMap::new();
                    write_map(&path, &empty)?;
                    empty
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(source) => return Err(StorageError::ReadFailed { path, source }),
        };
        Ok(Self { path, map })
    }

    /// The backing file path.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn write_map(path: &Path, map: &BTreeMap<String, String>) -> Result<(), StorageError> {
    let payload = serde_json::to_string_pretty(map)?;
    std::fs::write(path, payload).map_err(|source| StorageError::WriteFailed {
        path: path.to_path_buf(),
        source,
    })
}

impl KeyStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.map.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.map.insert(key.to_string(), value.to_string());
        write_map(&self.path, &self.map)
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        if self.map.remove(key).is_some() {
            write_map(&self.path, &self.map)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_file_opens_empty() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::open(dir.path().join("store.json")).unwrap();
        assert_eq!(store.get("anything"), None);
    }

    #[test]
    fn set_get_roundtrip_across_reopen() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("store.json");

        let mut store = FileStore::open(&path).unwrap();
        store.set("guest_points", "40").unwrap();
        store.set("current_user", "ana@x.com").unwrap();

        let reopened = FileStore::open(&path).unwrap();
        assert_eq!(reopened.get("guest_points").as_deref(), Some("40"));
        assert_eq!(reopened.get("current_user").as_deref(), Some("ana@x.com"));
    }

    #[test]
    fn corrupt_payload_self_heals_to_empty() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("store.json");
        std::fs::write(&path, "{not json").unwrap();

        let store = FileStore::open(&path).unwrap();
        assert_eq!(store.get("guest_points"), None);

        // The corrupt file was overwritten, so a reopen parses cleanly.
        let raw = std::fs::read_to_string(&path).unwrap();
        assert!(serde_json::from_str::<BTreeMap<String, String>>(&raw).is_ok());
    }

    #[test]
    fn remove_deletes_key() {
        let dir = TempDir::new().unwrap();
        let mut store = FileStore::open(dir.path().join("store.json")).unwrap();
        store.set("quest_pick", "1").unwrap();
        store.remove("quest_pick").unwrap();
        assert_eq!(store.get("quest_pick"), None);
    }
}
