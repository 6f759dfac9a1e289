use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::consent::ConsentState;
use crate::quest::QuestStep;

/// Every user-visible state change produces an Event.
/// The presentation layer polls for events and renders them (toasts,
/// confetti, label updates); the engine itself renders nothing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    PointsAwarded {
        amount: u64,
        reason_key: String,
        at: DateTime<Utc>,
    },
    /// The award pushed the visitor over a level boundary.
    LeveledUp {
        level: u32,
        at: DateTime<Utc>,
    },
    QuestStepUpdated {
        step: QuestStep,
        done: bool,
        at: DateTime<Utc>,
    },
    /// All three quest steps done; the bonus has just been paid.
    QuestCompleted {
        at: DateTime<Utc>,
    },
    /// The active identity switched (register, login, logout) -- carries the
    /// values the presentation layer needs to redraw the whole top bar.
    IdentityChanged {
        display_name: String,
        points: u64,
        level: u32,
        at: DateTime<Utc>,
    },
    RegistrationRejected {
        reason: String,
        at: DateTime<Utc>,
    },
    LoginRejected {
        reason: String,
        at: DateTime<Utc>,
    },
    /// Consent decision recorded; storage-backed state was re-persisted
    /// through the newly active backend.
    ConsentChanged {
        state: ConsentState,
        at: DateTime<Utc>,
    },
    /// A storage write failed. Non-fatal: the in-memory state is intact and
    /// the engine keeps going.
    StorageWriteFailed {
        detail: String,
        at: DateTime<Utc>,
    },
}
