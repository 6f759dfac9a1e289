use clap::Subcommand;
use loyalty_core::EngineConfig;

use crate::common::{self, CliResult};

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Print the effective configuration as TOML
    Show,
    /// Print the configuration file path
    Path,
    /// Write the default configuration file
    Reset,
}

pub fn run(action: ConfigAction) -> CliResult {
    match action {
        ConfigAction::Show => {
            let config = common::load_config();
            print!("{}", toml::to_string_pretty(&config)?);
        }
        ConfigAction::Path => {
            println!("{}", common::config_path()?.display());
        }
        ConfigAction::Reset => {
            let path = common::config_path()?;
            std::fs::write(&path, toml::to_string_pretty(&EngineConfig::default())?)?;
            println!("config reset to defaults");
        }
    }
    Ok(())
}
