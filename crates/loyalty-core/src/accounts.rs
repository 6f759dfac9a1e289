//! Locally-registered pseudo-accounts.
//!
//! Accounts live entirely in client-controlled storage; there is no server
//! and no real authentication value. Passwords are therefore stored and
//! compared as opaque plaintext on purpose -- anyone repurposing this for
//! real credentials must replace [`AccountDirectory::authenticate`] wholesale.

use serde::{Deserialize, Serialize};

use crate::consent::ConsentGate;
use crate::error::{EngineError, StorageError};
use crate::ledger::Progress;
use crate::storage::{keys, KeyStore};

/// A registered identity. Email is the natural key, stored case-folded.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Account {
    pub name: String,
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub points: u64,
    #[serde(default = "default_level")]
    pub level: u32,
}

fn default_level() -> u32 {
    1
}

/// Lower-cased, trimmed form used everywhere emails are compared.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Ordered collection of registered accounts plus the current-identity pointer.
///
/// Hydrated from the consent-selected backend once per engine instance and
/// persisted whole on every mutation.
#[derive(Debug, Default)]
pub struct AccountDirectory {
    accounts: Vec<Account>,
    current_email: Option<String>,
}

impl AccountDirectory {
    /// Load the directory from the active backend.
    ///
    /// A corrupt account payload is replaced by the empty default and
    /// overwritten in place. A stored current email that resolves to no
    /// account is kept in memory but treated as guest.
    pub fn hydrate(gate: &mut ConsentGate) -> Self {
        let accounts = match gate.active().get(keys::ACCOUNTS) {
            Some(raw) => match serde_json::from_str::<Vec<Account>>(&raw) {
                Ok(list) => list,
                Err(_) => {
                    let _ = gate.active_mut().set(keys::ACCOUNTS, "[]");
                    Vec::new()
                }
            },
            None => Vec::new(),
        };
        let current_email = gate
            .active()
            .get(keys::CURRENT_USER)
            .filter(|email| !email.is_empty());
        Self {
            accounts,
            current_email,
        }
    }

    /// All accounts, insertion order.
    pub fn list(&self) -> &[Account] {
        &self.accounts
    }

    pub fn find_by_email(&self, email: &str) -> Option<&Account> {
        let email = normalize_email(email);
        self.accounts.iter().find(|a| a.email == email)
    }

    fn find_by_email_mut(&mut self, email: &str) -> Option<&mut Account> {
        let email = normalize_email(email);
        self.accounts.iter_mut().find(|a| a.email == email)
    }

    /// The account the current-identity pointer resolves to, if any.
    ///
    /// `None` means guest -- either no pointer, or a pointer left behind by
    /// cleared/corrupted storage that matches no account.
    pub fn current(&self) -> Option<&Account> {
        self.current_email
            .as_deref()
            .and_then(|email| self.find_by_email(email))
    }

    /// Switch the current-identity pointer. In-memory only; callers persist.
    pub fn set_current(&mut self, email: Option<&str>) {
        self.current_email = email.map(normalize_email);
    }

    /// Append a new account seeded with `seed` progress and make it current.
    /// In-memory only; callers persist.
    ///
    /// # Errors
    /// `AlreadyRegistered` if the case-folded email is already taken.
    pub fn register(
        &mut self,
        name: &str,
        email: &str,
        password: &str,
        seed: Progress,
    ) -> Result<Account, EngineError> {
        let email = normalize_email(email);
        if self.find_by_email(&email).is_some() {
            return Err(EngineError::AlreadyRegistered { email });
        }
        let account = Account {
            name: name.trim().to_string(),
            email: email.clone(),
            password: password.to_string(),
            points: seed.points,
            level: seed.level,
        };
        self.accounts.push(account.clone());
        self.current_email = Some(email);
        Ok(account)
    }

    /// Exact email+password match, or absent.
    pub fn authenticate(&self, email: &str, password: &str) -> Option<&Account> {
        self.find_by_email(email).filter(|a| a.password == password)
    }

    /// Write `progress` onto the account record for `email` and persist.
    ///
    /// Returns `false` without writing anything when the email resolves to
    /// no account, so callers can notice an identity desync instead of
    /// losing the points invisibly.
    pub fn commit_progress(
        &mut self,
        gate: &mut ConsentGate,
        email: &str,
        progress: Progress,
    ) -> Result<bool, StorageError> {
        let Some(account) = self.find_by_email_mut(email) else {
            return Ok(false);
        };
        account.points = progress.points;
        account.level = progress.level;
        self.persist(gate)?;
        Ok(true)
    }

    /// Serialize the whole directory plus the current-identity pointer to the
    /// backend chosen by the gate at the time of the call.
    pub fn persist(&self, gate: &mut ConsentGate) -> Result<(), StorageError> {
        let payload = serde_json::to_string(&self.accounts)?;
        let store = gate.active_mut();
        store.set(keys::ACCOUNTS, &payload)?;
        store.set(keys::CURRENT_USER, self.current_email.as_deref().unwrap_or(""))
    }
}
