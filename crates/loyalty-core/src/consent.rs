//! Consent-aware storage selection.
//!
//! Visitors who decline persistent storage still get the full engine for the
//! lifetime of one session; their state simply is not carried across visits.
//! The [`ConsentGate`] owns both backends and is the single place that
//! decides which one is active, so a consent change takes effect on the very
//! next access instead of leaving stale backends cached elsewhere.

use serde::{Deserialize, Serialize};

use crate::error::StorageError;
use crate::storage::{keys, KeyStore};

/// The visitor's consent decision for durable storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConsentState {
    /// No decision recorded yet.
    Unset,
    Granted,
    Denied,
}

/// An explicit user choice. `Unset` is not a choice, so it is not here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsentChoice {
    Granted,
    Denied,
}

/// Which backend a piece of state lands in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageKind {
    Durable,
    Ephemeral,
}

/// Holds the two backends and resolves the active one from the consent flag.
///
/// The flag itself always lives in the durable store, whatever it says --
/// remembering "denied" across visits is the point of recording it.
pub struct ConsentGate {
    durable: Box<dyn KeyStore>,
    session: Box<dyn KeyStore>,
}

impl ConsentGate {
    pub fn new(durable: Box<dyn KeyStore>, session: Box<dyn KeyStore>) -> Self {
        Self { durable, session }
    }

    /// Read the current consent decision. Absent key means `Unset`.
    pub fn consent(&self) -> ConsentState {
        match self.durable.get(keys::CONSENT).as_deref() {
            Some("granted") => ConsentState::Granted,
            Some("denied") => ConsentState::Denied,
            _ => ConsentState::Unset,
        }
    }

    /// Record an explicit consent choice.
    ///
    /// Callers must re-persist all storage-backed state afterwards: the
    /// active backend changes out from under anything hydrated before.
    pub fn set_consent(&mut self, choice: ConsentChoice) -> Result<(), StorageError> {
        let value = match choice {
            ConsentChoice::Granted => "granted",
            ConsentChoice::Denied => "denied",
        };
        self.durable.set(keys::CONSENT, value)
    }

    /// Backend selection, re-evaluated on every call.
    pub fn active_kind(&self) -> StorageKind {
        if self.consent() == ConsentState::Granted {
            StorageKind::Durable
        } else {
            StorageKind::Ephemeral
        }
    }

    /// The consent-selected backend, for identity and progress state.
    pub fn active(&self) -> &dyn KeyStore {
        match self.active_kind() {
            StorageKind::Durable => self.durable.as_ref(),
            StorageKind::Ephemeral => self.session.as_ref(),
        }
    }

    pub fn active_mut(&mut self) -> &mut dyn KeyStore {
        match self.active_kind() {
            StorageKind::Durable => self.durable.as_mut(),
            StorageKind::Ephemeral => self.session.as_mut(),
        }
    }

    /// The session backend, for state that must never outlive the session
    /// (reward flags, quest steps) regardless of consent.
    pub fn session(&self) -> &dyn KeyStore {
        self.session.as_ref()
    }

    pub fn session_mut(&mut self) -> &mut dyn KeyStore {
        self.session.as_mut()
    }
}
