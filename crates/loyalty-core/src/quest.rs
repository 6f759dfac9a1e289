//! Three-step quest completion tracking.
//!
//! An AND-gate over three session-scoped flags. Each step is settable once;
//! the tracker itself never pays the completion bonus -- the engine does,
//! through the same dedupe-guarded award path as everything else.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, StorageError};
use crate::storage::{keys, KeyStore};

/// Dedupe key for the one-time completion bonus.
pub const QUEST_COMPLETE_KEY: &str = "quest_complete";

/// One of the three quest steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestStep {
    Pick,
    Request,
    Call,
}

impl QuestStep {
    pub const ALL: [QuestStep; 3] = [QuestStep::Pick, QuestStep::Request, QuestStep::Call];

    /// Session-store key for this step's flag.
    fn storage_key(self) -> String {
        format!("{}{}", keys::QUEST_PREFIX, self)
    }
}

impl fmt::Display for QuestStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            QuestStep::Pick => "pick",
            QuestStep::Request => "request",
            QuestStep::Call => "call",
        };
        f.write_str(name)
    }
}

impl FromStr for QuestStep {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pick" => Ok(QuestStep::Pick),
            "request" => Ok(QuestStep::Request),
            "call" => Ok(QuestStep::Call),
            other => Err(EngineError::UnknownQuestStep(other.to_string())),
        }
    }
}

/// Per-session completion state of the three steps.
///
/// Each flag is persisted individually (`quest_pick` = `"1"`), so a reload
/// mid-session keeps partial progress. Flags only ever go from unset to set.
#[derive(Debug, Default, Clone, Copy, Serialize)]
pub struct QuestTracker {
    pick: bool,
    request: bool,
    call: bool,
}

impl QuestTracker {
    /// Load step flags from the session store.
    pub fn hydrate(session: &dyn KeyStore) -> Self {
        let read = |step: QuestStep| session.get(&step.storage_key()).as_deref() == Some("1");
        Self {
            pick: read(QuestStep::Pick),
            request: read(QuestStep::Request),
            call: read(QuestStep::Call),
        }
    }

    /// Mark a step done and write its flag through.
    ///
    /// Returns `true` if the step was newly completed.
    pub fn complete(
        &mut self,
        session: &mut dyn KeyStore,
        step: QuestStep,
    ) -> Result<bool, StorageError> {
        let slot = match step {
            QuestStep::Pick => &mut self.pick,
            QuestStep::Request => &mut self.request,
            QuestStep::Call => &mut self.call,
        };
        if *slot {
            return Ok(false);
        }
        *slot = true;
        session.set(&step.storage_key(), "1")?;
        Ok(true)
    }

    pub fn is_done(&self, step: QuestStep) -> bool {
        match step {
            QuestStep::Pick => self.pick,
            QuestStep::Request => self.request,
            QuestStep::Call => self.call,
        }
    }

    /// All three steps done.
    pub fn is_complete(&self) -> bool {
        self.pick && self.request && self.call
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    #[test]
    fn parse_steps() {
        assert_eq!("pick".parse::<QuestStep>().unwrap(), QuestStep::Pick);
        assert_eq!("request".parse::<QuestStep>().unwrap(), QuestStep::Request);
        assert_eq!("call".parse::<QuestStep>().unwrap(), QuestStep::Call);
        assert!(matches!(
            "dance".parse::<QuestStep>(),
            Err(EngineError::UnknownQuestStep(_))
        ));
    }

    #[test]
    fn complete_is_monotone_and_reports_change() {
        let mut session = MemoryStore::new();
        let mut quest = QuestTracker::default();
        assert!(quest.complete(&mut session, QuestStep::Pick).unwrap());
        assert!(!quest.complete(&mut session, QuestStep::Pick).unwrap());
        assert!(quest.is_done(QuestStep::Pick));
        assert!(!quest.is_complete());
    }

    #[test]
    fn complete_when_all_three_set_any_order() {
        let mut session = MemoryStore::new();
        let mut quest = QuestTracker::default();
        quest.complete(&mut session, QuestStep::Call).unwrap();
        quest.complete(&mut session, QuestStep::Pick).unwrap();
        assert!(!quest.is_complete());
        quest.complete(&mut session, QuestStep::Request).unwrap();
        assert!(quest.is_complete());
    }

    #[test]
    fn partial_progress_survives_rehydration() {
        let mut session = MemoryStore::new();
        let mut quest = QuestTracker::default();
        quest.complete(&mut session, QuestStep::Request).unwrap();

        let reloaded = QuestTracker::hydrate(&session);
        assert!(reloaded.is_done(QuestStep::Request));
        assert!(!reloaded.is_done(QuestStep::Pick));
    }
}
