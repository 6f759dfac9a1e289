use clap::Subcommand;
use loyalty_core::{Input, QuestStep};

use crate::common::{self, CliResult};

#[derive(Subcommand)]
pub enum QuestAction {
    /// Mark a quest step as done
    Step {
        /// One of: pick, request, call
        step: String,
    },
    /// Show quest progress
    Status {
        /// Emit machine-readable JSON
        #[arg(long)]
        json: bool,
    },
}

pub fn run(action: QuestAction) -> CliResult {
    match action {
        QuestAction::Step { step } => {
            // Validate up front so a typo is an error here, not a silent no-op.
            let parsed: QuestStep = step.parse()?;
            let mut engine = common::open_engine()?;
            engine.apply(Input::QuestStepCompleted {
                step: parsed.to_string(),
            });
            common::print_events(&mut engine);
        }
        QuestAction::Status { json } => {
            let engine = common::open_engine()?;
            let quest = engine.quest();
            if json {
                let value = serde_json::json!({
                    "steps": QuestStep::ALL
                        .iter()
                        .map(|&s| (s.to_string(), quest.is_done(s)))
                        .collect::<std::collections::BTreeMap<_, _>>(),
                    "complete": quest.is_complete(),
                });
                println!("{}", serde_json::to_string_pretty(&value)?);
            } else {
                for step in QuestStep::ALL {
                    let mark = if quest.is_done(step) { '✓' } else { '○' };
                    println!("{mark} {step}");
                }
                if quest.is_complete() {
                    println!("quest complete");
                }
            }
        }
    }
    Ok(())
}
