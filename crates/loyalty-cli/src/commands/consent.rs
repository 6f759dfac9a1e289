use clap::Subcommand;
use loyalty_core::Input;

use crate::common::{self, CliResult};

#[derive(Subcommand)]
pub enum ConsentAction {
    /// Allow durable storage; in-session progress is carried over
    Grant,
    /// Decline durable storage; state lives for the session only
    Deny,
    /// Show the recorded decision
    Status,
}

pub fn run(action: ConsentAction) -> CliResult {
    let mut engine = common::open_engine()?;
    match action {
        ConsentAction::Grant => {
            engine.apply(Input::ConsentChosen { granted: true });
            common::print_events(&mut engine);
        }
        ConsentAction::Deny => {
            engine.apply(Input::ConsentChosen { granted: false });
            common::print_events(&mut engine);
        }
        ConsentAction::Status => {
            println!("{}", common::consent_label(engine.consent()));
        }
    }
    Ok(())
}
