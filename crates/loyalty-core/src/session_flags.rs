//! Per-session reward dedupe flags.
//!
//! A reason key, once present, suppresses re-award of that key for the rest
//! of the session, whichever identity is active. The set only ever grows
//! within a session; forgetting happens by the session store going away.

use std::collections::HashSet;

use crate::error::StorageError;
use crate::storage::{keys, KeyStore};

/// Session-scoped set of reason keys that have already been paid.
///
/// Held in memory, written through to the session store on insert so a
/// mid-session reload picks it back up.
#[derive(Debug, Default)]
pub struct SessionFlagSet {
    flags: HashSet<String>,
}

impl SessionFlagSet {
    /// Load the flag set from the session store.
    ///
    /// A corrupt payload is replaced by the empty default.
    pub fn hydrate(session: &mut dyn KeyStore) -> Self {
        let flags = match session.get(keys::POINTS_FLAGS) {
            Some(raw) => match serde_json::from_str::<Vec<String>>(&raw) {
                Ok(list) => list.into_iter().collect(),
                Err(_) => {
                    let _ = session.set(keys::POINTS_FLAGS, "[]");
                    HashSet::new()
                }
            },
            None => HashSet::new(),
        };
        Self { flags }
    }

    pub fn contains(&self, reason_key: &str) -> bool {
        self.flags.contains(reason_key)
    }

    /// Insert a reason key and write the set through to the session store.
    pub fn insert(
        &mut self,
        session: &mut dyn KeyStore,
        reason_key: &str,
    ) -> Result<(), StorageError> {
        if !self.flags.insert(reason_key.to_string()) {
            return Ok(());
        }
        // Sorted for a deterministic payload.
        let mut list: Vec<&str> = self.flags.iter().map(String::as_str).collect();
        list.sort_unstable();
        let payload = serde_json::to_string(&list)?;
        session.set(keys::POINTS_FLAGS, &payload)
    }

    pub fn len(&self) -> usize {
        self.flags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.flags.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    #[test]
    fn insert_then_contains() {
        let mut session = MemoryStore::new();
        let mut flags = SessionFlagSet::hydrate(&mut session);
        assert!(!flags.contains("cta_Book"));
        flags.insert(&mut session, "cta_Book").unwrap();
        assert!(flags.contains("cta_Book"));
    }

    #[test]
    fn survives_rehydration() {
        let mut session = MemoryStore::new();
        let mut flags = SessionFlagSet::hydrate(&mut session);
        flags.insert(&mut session, "section_intro").unwrap();
        flags.insert(&mut session, "quest_complete").unwrap();

        let reloaded = SessionFlagSet::hydrate(&mut session);
        assert!(reloaded.contains("section_intro"));
        assert!(reloaded.contains("quest_complete"));
        assert_eq!(reloaded.len(), 2);
    }

    #[test]
    fn corrupt_payload_resets_to_empty() {
        let mut session = MemoryStore::new();
        session.set(keys::POINTS_FLAGS, "{oops").unwrap();
        let flags = SessionFlagSet::hydrate(&mut session);
        assert!(flags.is_empty());
        assert_eq!(session.get(keys::POINTS_FLAGS).as_deref(), Some("[]"));
    }
}
