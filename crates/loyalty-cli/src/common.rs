//! Shared helpers: engine construction and event rendering.
//!
//! The CLI maps the browser storage model onto files under the data
//! directory: `durable.json` plays localStorage, `session.json` plays
//! sessionStorage (it lives until `session clear`), and `config.toml` holds
//! the reward amounts.

use loyalty_core::storage::data_dir;
use loyalty_core::{EngagementEngine, EngineConfig, Event, FileStore};

pub type CliResult = Result<(), Box<dyn std::error::Error>>;

pub fn config_path() -> Result<std::path::PathBuf, Box<dyn std::error::Error>> {
    Ok(data_dir()?.join("config.toml"))
}

/// Load the engine config, falling back to defaults for a missing or
/// unparseable file.
pub fn load_config() -> EngineConfig {
    let Ok(path) = config_path() else {
        return EngineConfig::default();
    };
    match std::fs::read_to_string(path) {
        Ok(raw) => toml::from_str(&raw).unwrap_or_default(),
        Err(_) => EngineConfig::default(),
    }
}

/// Build an engine over the file-backed stores.
pub fn open_engine() -> Result<EngagementEngine, Box<dyn std::error::Error>> {
    let dir = data_dir()?;
    let durable = FileStore::open(dir.join("durable.json"))?;
    let session = FileStore::open(dir.join("session.json"))?;
    Ok(EngagementEngine::with_config(
        load_config(),
        Box::new(durable),
        Box::new(session),
    ))
}

/// Drain pending events and print them as toast lines.
pub fn print_events(engine: &mut EngagementEngine) {
    for event in engine.take_events() {
        match event {
            Event::PointsAwarded { amount, .. } => println!("+{amount} points"),
            Event::LeveledUp { level, .. } => {
                println!("Badge unlocked: loyalty level {level}")
            }
            Event::QuestStepUpdated { step, done, .. } => {
                println!("Quest step '{step}' {}", if done { "done" } else { "open" })
            }
            Event::QuestCompleted { .. } => println!("Badge unlocked: quest complete"),
            Event::IdentityChanged {
                display_name,
                points,
                level,
                ..
            } => println!("{display_name} · {points} points · loyalty level {level}"),
            Event::RegistrationRejected { reason, .. } => {
                println!("registration rejected: {reason}")
            }
            Event::LoginRejected { reason, .. } => println!("login rejected: {reason}"),
            Event::ConsentChanged { state, .. } => {
                println!("consent recorded: {}", consent_label(state))
            }
            Event::StorageWriteFailed { detail, .. } => eprintln!("warning: {detail}"),
        }
    }
}

pub fn consent_label(state: loyalty_core::ConsentState) -> &'static str {
    match state {
        loyalty_core::ConsentState::Unset => "unset",
        loyalty_core::ConsentState::Granted => "granted",
        loyalty_core::ConsentState::Denied => "denied",
    }
}
