use clap::{Parser, Subcommand};

mod commands;
mod common;

#[derive(Parser)]
#[command(name = "loyalty-cli", version, about = "Loyalty engagement engine CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Feed a visitor event into the engine
    Event {
        #[command(subcommand)]
        action: commands::event::EventAction,
    },
    /// Quest progress
    Quest {
        #[command(subcommand)]
        action: commands::quest::QuestAction,
    },
    /// Account management
    Account {
        #[command(subcommand)]
        action: commands::account::AccountAction,
    },
    /// Storage consent decision
    Consent {
        #[command(subcommand)]
        action: commands::consent::ConsentAction,
    },
    /// Session control
    Session {
        #[command(subcommand)]
        action: commands::session::SessionAction,
    },
    /// Current points, level and identity
    Status {
        /// Emit machine-readable JSON
        #[arg(long)]
        json: bool,
    },
    /// Engine configuration
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

fn main() {
    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Event { action } => commands::event::run(action),
        Commands::Quest { action } => commands::quest::run(action),
        Commands::Account { action } => commands::account::run(action),
        Commands::Consent { action } => commands::consent::run(action),
        Commands::Session { action } => commands::session::run(action),
        Commands::Status { json } => commands::status::run(json),
        Commands::Config { action } => commands::config::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
