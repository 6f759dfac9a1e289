//! # Loyalty Core Library
//!
//! Engagement state engine for a marketing site: awards loyalty points for
//! visitor actions, derives levels from accumulated points, tracks a
//! three-step quest, and associates progress with locally-registered
//! pseudo-accounts -- all persisted through a consent-selected storage
//! backend, durable or session-only.
//!
//! The engine renders nothing. It accepts [`Input`] values from whatever
//! presentation layer embeds it and emits [`Event`] values for that layer to
//! render; the bundled `loyalty-cli` is the reference embedding.
//!
//! ## Key Components
//!
//! - [`EngagementEngine`]: orchestrates awards, identity and the quest
//! - [`ConsentGate`]: owns both storage backends and picks the active one
//! - [`AccountDirectory`]: ordered registry of client-side pseudo-accounts
//! - [`ProgressLedger`]: points plus the level derived from them
//! - [`QuestTracker`]: AND-gate over the three quest steps

pub mod accounts;
pub mod config;
pub mod consent;
pub mod engine;
pub mod error;
pub mod events;
pub mod ledger;
pub mod quest;
pub mod session_flags;
pub mod storage;

pub use accounts::{Account, AccountDirectory};
pub use config::EngineConfig;
pub use consent::{ConsentChoice, ConsentGate, ConsentState, StorageKind};
pub use engine::{EngagementEngine, Input, Snapshot};
pub use error::{EngineError, StorageError};
pub use events::Event;
pub use ledger::{level_for, Progress, ProgressLedger};
pub use quest::{QuestStep, QuestTracker};
pub use session_flags::SessionFlagSet;
pub use storage::{FileStore, KeyStore, MemoryStore};
