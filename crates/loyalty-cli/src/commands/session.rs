use clap::Subcommand;
use loyalty_core::storage::data_dir;

use crate::common::CliResult;

#[derive(Subcommand)]
pub enum SessionAction {
    /// End the session: forget reward flags, quest steps and ephemeral state
    Clear,
}

pub fn run(action: SessionAction) -> CliResult {
    match action {
        SessionAction::Clear => {
            let path = data_dir()?.join("session.json");
            match std::fs::remove_file(&path) {
                Ok(()) => {}
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => return Err(e.into()),
            }
            println!("session cleared");
        }
    }
    Ok(())
}
