//! The engagement engine.
//!
//! One instance per page load (or CLI invocation) orchestrates everything:
//! idempotent point awards, level derivation, identity switching, consent
//! changes and quest evaluation. State flows in through [`Input`] values and
//! out through [`Event`]s drained with [`EngagementEngine::take_events`].
//!
//! ## Identity state machine
//!
//! ```text
//! Guest --register/login--> LoggedIn(email) --logout--> Guest
//!                           LoggedIn --login--> LoggedIn(other email)
//! ```
//!
//! The initial state is resolved from the persisted current email; a pointer
//! that no longer matches any account falls back to guest.

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::accounts::{Account, AccountDirectory};
use crate::config::EngineConfig;
use crate::consent::{ConsentChoice, ConsentGate, ConsentState};
use crate::error::{EngineError, Result, StorageError};
use crate::events::Event;
use crate::ledger::ProgressLedger;
use crate::quest::{QuestStep, QuestTracker, QUEST_COMPLETE_KEY};
use crate::session_flags::SessionFlagSet;
use crate::storage::KeyStore;

/// Inbound events from the presentation layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Input {
    SectionViewed { id: String },
    CtaClicked { label: String },
    FormSubmitted { path: String },
    /// Step name as the UI reported it; unknown names are ignored.
    QuestStepCompleted { step: String },
    RegisterSubmitted {
        name: String,
        email: String,
        password: String,
    },
    LoginSubmitted { email: String, password: String },
    LogoutRequested,
    ConsentChosen { granted: bool },
}

/// Read-only view for the presentation layer.
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot {
    pub points: u64,
    pub level: u32,
    /// Account name, or the configured guest label.
    pub display_name: String,
    /// Points accumulated within the current level.
    pub points_into_level: u64,
    /// Progress-bar width, 0.0 .. 100.0.
    pub progress_pct: f64,
}

/// Orchestrates consent gating, identity, the ledger and the quest.
pub struct EngagementEngine {
    config: EngineConfig,
    gate: ConsentGate,
    directory: AccountDirectory,
    ledger: ProgressLedger,
    flags: SessionFlagSet,
    quest: QuestTracker,
    pending: Vec<Event>,
}

impl EngagementEngine {
    /// Build an engine over the two backends with default reward amounts.
    pub fn new(durable: Box<dyn KeyStore>, session: Box<dyn KeyStore>) -> Self {
        Self::with_config(EngineConfig::default(), durable, session)
    }

    /// Build an engine, hydrating all state from the backends.
    pub fn with_config(
        config: EngineConfig,
        durable: Box<dyn KeyStore>,
        session: Box<dyn KeyStore>,
    ) -> Self {
        let mut gate = ConsentGate::new(durable, session);
        let directory = AccountDirectory::hydrate(&mut gate);
        let ledger = ProgressLedger::hydrate(&gate, &directory, config.xp_per_level);
        let flags = SessionFlagSet::hydrate(gate.session_mut());
        let quest = QuestTracker::hydrate(gate.session());
        Self {
            config,
            gate,
            directory,
            ledger,
            flags,
            quest,
            pending: Vec::new(),
        }
    }

    // ── Inbound surface ──────────────────────────────────────────────

    /// Feed one presentation-layer event through the engine.
    ///
    /// Identity errors are recovered here and surfaced as rejection events;
    /// nothing `apply` does is fatal.
    pub fn apply(&mut self, input: Input) {
        match input {
            Input::SectionViewed { id } => {
                let key = format!("section_{id}");
                self.award(self.config.section_points, &key, true);
            }
            Input::CtaClicked { label } => {
                let key = format!("cta_{}", label.trim());
                self.award(self.config.cta_points, &key, true);
            }
            Input::FormSubmitted { path } => {
                let key = format!("submit_{path}");
                self.award(self.config.form_points, &key, true);
            }
            Input::QuestStepCompleted { step } => {
                if let Ok(step) = step.parse::<QuestStep>() {
                    self.complete_quest_step(step);
                }
            }
            Input::RegisterSubmitted {
                name,
                email,
                password,
            } => {
                if let Err(e) = self.register(&name, &email, &password) {
                    self.emit(Event::RegistrationRejected {
                        reason: e.to_string(),
                        at: Utc::now(),
                    });
                }
            }
            Input::LoginSubmitted { email, password } => {
                if let Err(e) = self.login(&email, &password) {
                    self.emit(Event::LoginRejected {
                        reason: e.to_string(),
                        at: Utc::now(),
                    });
                }
            }
            Input::LogoutRequested => self.logout(),
            Input::ConsentChosen { granted } => self.choose_consent(if granted {
                ConsentChoice::Granted
            } else {
                ConsentChoice::Denied
            }),
        }
    }

    // ── Awards ───────────────────────────────────────────────────────

    /// Award points to the active identity.
    ///
    /// With `dedupe`, a reason key already paid this session makes this an
    /// idempotent no-op. Emits `LeveledUp` when a level boundary is crossed,
    /// `PointsAwarded` always, then re-evaluates the quest gate.
    pub fn award(&mut self, amount: u64, reason_key: &str, dedupe: bool) {
        if dedupe && self.flags.contains(reason_key) {
            return;
        }
        if dedupe {
            let inserted = self.flags.insert(self.gate.session_mut(), reason_key);
            self.note_write(inserted);
        }

        let before = self.ledger.progress();
        let after = self.ledger.add(amount, self.config.xp_per_level);
        let committed = self.ledger.commit(&mut self.gate, &mut self.directory);
        self.note_write(committed);

        if after.level > before.level {
            self.emit(Event::LeveledUp {
                level: after.level,
                at: Utc::now(),
            });
        }
        self.emit(Event::PointsAwarded {
            amount,
            reason_key: reason_key.to_string(),
            at: Utc::now(),
        });

        self.evaluate_quest();
    }

    // ── Identity ─────────────────────────────────────────────────────

    /// Create an account seeded from the current active progress and switch
    /// to it. When the prior identity was guest, the guest bucket is zeroed
    /// so the points are not counted twice.
    ///
    /// # Errors
    /// `AlreadyRegistered` when the case-folded email is taken.
    pub fn register(&mut self, name: &str, email: &str, password: &str) -> Result<Account> {
        let was_guest = self.ledger.is_guest();
        let seed = self.ledger.progress();
        let account = self.directory.register(name, email, password, seed)?;
        let persisted = self.directory.persist(&mut self.gate);
        self.note_write(persisted);
        if was_guest {
            let reset = ProgressLedger::reset_guest(&mut self.gate);
            self.note_write(reset);
        }
        self.rehydrate_identity();
        Ok(account)
    }

    /// Switch to an existing account. Guest points accrued this session are
    /// left in the guest bucket -- only registration merges them.
    ///
    /// # Errors
    /// `InvalidCredentials` when no account matches both fields.
    pub fn login(&mut self, email: &str, password: &str) -> Result<Account> {
        let account = self
            .directory
            .authenticate(email, password)
            .cloned()
            .ok_or(EngineError::InvalidCredentials)?;
        self.directory.set_current(Some(&account.email));
        let persisted = self.directory.persist(&mut self.gate);
        self.note_write(persisted);
        self.rehydrate_identity();
        Ok(account)
    }

    /// Switch back to guest.
    pub fn logout(&mut self) {
        self.directory.set_current(None);
        let persisted = self.directory.persist(&mut self.gate);
        self.note_write(persisted);
        self.rehydrate_identity();
    }

    // ── Consent ──────────────────────────────────────────────────────

    pub fn consent(&self) -> ConsentState {
        self.gate.consent()
    }

    /// Record a consent choice and re-persist all storage-backed state
    /// through the newly active backend, so granting consent mid-session
    /// carries the session's progress into durable storage.
    pub fn choose_consent(&mut self, choice: ConsentChoice) {
        let flagged = self.gate.set_consent(choice);
        self.note_write(flagged);
        let persisted = self.directory.persist(&mut self.gate);
        self.note_write(persisted);
        let committed = self.ledger.commit(&mut self.gate, &mut self.directory);
        self.note_write(committed);
        self.emit(Event::ConsentChanged {
            state: self.gate.consent(),
            at: Utc::now(),
        });
    }

    // ── Quest ────────────────────────────────────────────────────────

    /// Mark a quest step done and re-evaluate the completion gate.
    pub fn complete_quest_step(&mut self, step: QuestStep) {
        let changed = match self.quest.complete(self.gate.session_mut(), step) {
            Ok(changed) => changed,
            Err(e) => {
                // The in-memory flag is set even when the write failed.
                self.note_write(Err(e));
                true
            }
        };
        if changed {
            self.emit(Event::QuestStepUpdated {
                step,
                done: true,
                at: Utc::now(),
            });
        }
        self.evaluate_quest();
    }

    /// Pay the completion bonus the first time all three steps are done.
    ///
    /// The session flag inserted by the nested `award` keeps this from
    /// re-firing on later evaluations.
    fn evaluate_quest(&mut self) {
        if self.quest.is_complete() && !self.flags.contains(QUEST_COMPLETE_KEY) {
            self.award(self.config.quest_bonus_points, QUEST_COMPLETE_KEY, true);
            self.emit(Event::QuestCompleted { at: Utc::now() });
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn snapshot(&self) -> Snapshot {
        let progress = self.ledger.progress();
        let display_name = self
            .directory
            .current()
            .map(|a| a.name.clone())
            .unwrap_or_else(|| self.config.guest_label.clone());
        let per = self.config.xp_per_level.max(1);
        let points_into_level = progress.points % per;
        Snapshot {
            points: progress.points,
            level: progress.level,
            display_name,
            points_into_level,
            progress_pct: points_into_level as f64 / per as f64 * 100.0,
        }
    }

    pub fn accounts(&self) -> &[Account] {
        self.directory.list()
    }

    pub fn is_guest(&self) -> bool {
        self.ledger.is_guest()
    }

    pub fn quest(&self) -> &QuestTracker {
        &self.quest
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Drain the pending outbound events.
    pub fn take_events(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.pending)
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn emit(&mut self, event: Event) {
        self.pending.push(event);
    }

    /// Storage writes are non-fatal: the in-memory state already moved, the
    /// failure becomes a notification for the embedder.
    fn note_write(&mut self, result: std::result::Result<(), StorageError>) {
        if let Err(e) = result {
            self.emit(Event::StorageWriteFailed {
                detail: e.to_string(),
                at: Utc::now(),
            });
        }
    }

    /// Re-read progress for the (possibly new) current identity and tell the
    /// presentation layer to redraw.
    fn rehydrate_identity(&mut self) {
        self.ledger = ProgressLedger::hydrate(&self.gate, &self.directory, self.config.xp_per_level);
        let snapshot = self.snapshot();
        self.emit(Event::IdentityChanged {
            display_name: snapshot.display_name,
            points: snapshot.points,
            level: snapshot.level,
            at: Utc::now(),
        });
    }
}
