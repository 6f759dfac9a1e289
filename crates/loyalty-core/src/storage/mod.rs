//! Key-value storage backends.
//!
//! All persisted state goes through the [`KeyStore`] trait: a flat string
//! key/value map, mirroring the web storage model the engine was designed
//! around. Two implementations are provided:
//!
//! - [`FileStore`]: JSON-file-backed, for state that outlives the process
//! - [`MemoryStore`]: in-process only, for tests and throwaway sessions
//!
//! Which backend holds which piece of state is decided by
//! [`crate::consent::ConsentGate`], never by the callers directly.

mod file;
mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use std::path::PathBuf;

use crate::error::StorageError;

/// Well-known storage keys.
///
/// The value shapes match the original wire format: the account directory and
/// the session flag set are JSON, everything else is a plain string.
pub mod keys {
    /// Consent flag, `"granted"` or `"denied"`. Durable store only.
    pub const CONSENT: &str = "storage_consent";
    /// Email of the active account; empty or absent means guest.
    pub const CURRENT_USER: &str = "current_user";
    /// JSON array of account records, insertion order.
    pub const ACCOUNTS: &str = "accounts";
    /// Guest points as a numeric string.
    pub const GUEST_POINTS: &str = "guest_points";
    /// Guest level as a numeric string.
    pub const GUEST_LEVEL: &str = "guest_level";
    /// JSON array of reason keys already paid this session. Session store only.
    pub const POINTS_FLAGS: &str = "points_flags";
    /// Prefix for per-step quest flags (`quest_pick` etc.). Session store only.
    pub const QUEST_PREFIX: &str = "quest_";
}

/// A flat string key/value store.
///
/// Reads are infallible (absent is `None`); writes report failure so the
/// engine can surface it as a non-fatal notification.
pub trait KeyStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove(&mut self, key: &str) -> Result<(), StorageError>;
}

/// Returns `~/.config/loyalty[-dev]/`, creating it if needed.
///
/// Set LOYALTY_ENV=dev to keep development state apart from real state.
///
/// # Errors
/// Returns an error if creating the config directory fails.
pub fn data_dir() -> Result<PathBuf, Box<dyn std::error::Error>> {
    let app_dir = match std::env::var("LOYALTY_ENV").as_deref() {
        Ok("dev") => "loyalty-dev",
        _ => "loyalty",
    };
    let dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config")
        .join(app_dir);
    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
