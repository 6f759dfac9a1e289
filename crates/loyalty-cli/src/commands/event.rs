use clap::Subcommand;
use loyalty_core::Input;

use crate::common::{self, CliResult};

#[derive(Subcommand)]
pub enum EventAction {
    /// A page section scrolled into view
    Section {
        /// Section identifier (e.g. "intro", "services")
        id: String,
    },
    /// A call-to-action was clicked
    Cta {
        /// Button label
        label: String,
    },
    /// A form was submitted successfully
    Form {
        /// Form path or route (e.g. "/contact")
        path: String,
    },
}

pub fn run(action: EventAction) -> CliResult {
    let mut engine = common::open_engine()?;
    let input = match action {
        EventAction::Section { id } => Input::SectionViewed { id },
        EventAction::Cta { label } => Input::CtaClicked { label },
        EventAction::Form { path } => Input::FormSubmitted { path },
    };
    engine.apply(input);
    common::print_events(&mut engine);
    Ok(())
}
