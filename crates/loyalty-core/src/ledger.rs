//! Points and derived level for the active identity.
//!
//! The level is a pure function of points -- it is recomputed after every
//! change and on every hydrate, so a stored level that drifted (old payloads,
//! hand-edited storage) can never become authoritative.

use serde::{Deserialize, Serialize};

use crate::accounts::AccountDirectory;
use crate::consent::ConsentGate;
use crate::error::StorageError;
use crate::storage::{keys, KeyStore};

/// Points plus the level derived from them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Progress {
    pub points: u64,
    pub level: u32,
}

impl Default for Progress {
    fn default() -> Self {
        Self {
            points: 0,
            level: 1,
        }
    }
}

/// `level = floor(points / xp_per_level) + 1`.
pub fn level_for(points: u64, xp_per_level: u64) -> u32 {
    let per = xp_per_level.max(1);
    (points / per + 1).min(u64::from(u32::MAX)) as u32
}

/// The active identity's progress, hydrated from wherever that identity
/// keeps it: the account record, or the guest keys in the active backend.
#[derive(Debug)]
pub struct ProgressLedger {
    progress: Progress,
    /// Email of the account this was hydrated from; `None` means guest.
    identity: Option<String>,
}

impl ProgressLedger {
    /// Read progress for the directory's current identity.
    ///
    /// Guest keys default to `(0, 1)` when absent or unparseable; the level
    /// is always rederived from points.
    pub fn hydrate(gate: &ConsentGate, directory: &AccountDirectory, xp_per_level: u64) -> Self {
        match directory.current() {
            Some(account) => Self {
                progress: Progress {
                    points: account.points,
                    level: level_for(account.points, xp_per_level),
                },
                identity: Some(account.email.clone()),
            },
            None => {
                let points = gate
                    .active()
                    .get(keys::GUEST_POINTS)
                    .and_then(|raw| raw.parse().ok())
                    .unwrap_or(0);
                Self {
                    progress: Progress {
                        points,
                        level: level_for(points, xp_per_level),
                    },
                    identity: None,
                }
            }
        }
    }

    pub fn progress(&self) -> Progress {
        self.progress
    }

    pub fn is_guest(&self) -> bool {
        self.identity.is_none()
    }

    /// Add points and rederive the level. Returns the updated progress.
    pub fn add(&mut self, amount: u64, xp_per_level: u64) -> Progress {
        self.progress.points = self.progress.points.saturating_add(amount);
        self.progress.level = level_for(self.progress.points, xp_per_level);
        self.progress
    }

    /// Write the current progress back to where it was hydrated from.
    ///
    /// If the hydrated account has vanished from the directory in the
    /// meantime, the points are parked in the guest bucket rather than
    /// dropped.
    pub fn commit(
        &self,
        gate: &mut ConsentGate,
        directory: &mut AccountDirectory,
    ) -> Result<(), StorageError> {
        match &self.identity {
            Some(email) => {
                if directory.commit_progress(gate, email, self.progress)? {
                    Ok(())
                } else {
                    write_guest(gate, self.progress)
                }
            }
            None => write_guest(gate, self.progress),
        }
    }

    /// Zero the guest bucket. Called exactly once, when a guest's points move
    /// into a brand-new account, so they are not counted twice.
    pub fn reset_guest(gate: &mut ConsentGate) -> Result<(), StorageError> {
        write_guest(gate, Progress::default())
    }
}

fn write_guest(gate: &mut ConsentGate, progress: Progress) -> Result<(), StorageError> {
    let store = gate.active_mut();
    store.set(keys::GUEST_POINTS, &progress.points.to_string())?;
    store.set(keys::GUEST_LEVEL, &progress.level.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{KeyStore, MemoryStore};

    fn gate() -> ConsentGate {
        ConsentGate::new(
            Box::new(MemoryStore::new()),
            Box::new(MemoryStore::new()),
        )
    }

    #[test]
    fn level_boundaries() {
        assert_eq!(level_for(0, 100), 1);
        assert_eq!(level_for(99, 100), 1);
        assert_eq!(level_for(100, 100), 2);
        assert_eq!(level_for(105, 100), 2);
        assert_eq!(level_for(1000, 100), 11);
    }

    #[test]
    fn guest_defaults_when_absent() {
        let mut gate = gate();
        let dir = AccountDirectory::hydrate(&mut gate);
        let ledger = ProgressLedger::hydrate(&gate, &dir, 100);
        assert_eq!(ledger.progress(), Progress::default());
        assert!(ledger.is_guest());
    }

    #[test]
    fn guest_defaults_when_unparseable() {
        let mut gate = gate();
        gate.active_mut().set(keys::GUEST_POINTS, "forty").unwrap();
        let dir = AccountDirectory::hydrate(&mut gate);
        let ledger = ProgressLedger::hydrate(&gate, &dir, 100);
        assert_eq!(ledger.progress().points, 0);
    }

    #[test]
    fn guest_commit_roundtrip() {
        let mut gate = gate();
        let mut dir = AccountDirectory::hydrate(&mut gate);
        let mut ledger = ProgressLedger::hydrate(&gate, &dir, 100);
        ledger.add(105, 100);
        ledger.commit(&mut gate, &mut dir).unwrap();

        assert_eq!(gate.active().get(keys::GUEST_POINTS).as_deref(), Some("105"));
        assert_eq!(gate.active().get(keys::GUEST_LEVEL).as_deref(), Some("2"));

        let rehydrated = ProgressLedger::hydrate(&gate, &dir, 100);
        assert_eq!(rehydrated.progress().points, 105);
        assert_eq!(rehydrated.progress().level, 2);
    }

    #[test]
    fn stale_stored_level_is_rederived() {
        let mut gate = gate();
        gate.active_mut().set(keys::GUEST_POINTS, "250").unwrap();
        gate.active_mut().set(keys::GUEST_LEVEL, "1").unwrap();
        let dir = AccountDirectory::hydrate(&mut gate);
        let ledger = ProgressLedger::hydrate(&gate, &dir, 100);
        assert_eq!(ledger.progress().level, 3);
    }

    #[test]
    fn account_commit_writes_to_record() {
        let mut gate = gate();
        let mut dir = AccountDirectory::hydrate(&mut gate);
        dir.register("Ana", "ana@x.com", "pw12", Progress::default())
            .unwrap();
        dir.persist(&mut gate).unwrap();

        let mut ledger = ProgressLedger::hydrate(&gate, &dir, 100);
        assert!(!ledger.is_guest());
        ledger.add(30, 100);
        ledger.commit(&mut gate, &mut dir).unwrap();

        assert_eq!(dir.current().unwrap().points, 30);
        // Guest bucket untouched.
        assert_eq!(gate.active().get(keys::GUEST_POINTS), None);
    }

    #[test]
    fn commit_with_vanished_account_parks_points_in_guest_bucket() {
        let mut gate = gate();
        let mut dir = AccountDirectory::hydrate(&mut gate);
        dir.register("Ana", "ana@x.com", "pw12", Progress::default())
            .unwrap();
        dir.persist(&mut gate).unwrap();

        let mut ledger = ProgressLedger::hydrate(&gate, &dir, 100);
        ledger.add(25, 100);

        // The account disappears behind the ledger's back.
        let mut emptied = AccountDirectory::default();
        ledger.commit(&mut gate, &mut emptied).unwrap();

        assert_eq!(gate.active().get(keys::GUEST_POINTS).as_deref(), Some("25"));
    }

    #[test]
    fn reset_guest_zeroes_bucket() {
        let mut gate = gate();
        gate.active_mut().set(keys::GUEST_POINTS, "40").unwrap();
        ProgressLedger::reset_guest(&mut gate).unwrap();
        assert_eq!(gate.active().get(keys::GUEST_POINTS).as_deref(), Some("0"));
        assert_eq!(gate.active().get(keys::GUEST_LEVEL).as_deref(), Some("1"));
    }
}
