use clap::Subcommand;

use crate::common::{self, CliResult};

#[derive(Subcommand)]
pub enum AccountAction {
    /// Create a local account, linking the current points to it
    Register {
        name: String,
        email: String,
        password: String,
    },
    /// Sign in to an existing account
    Login { email: String, password: String },
    /// Sign out, back to guest
    Logout,
    /// List registered accounts
    List {
        /// Emit machine-readable JSON
        #[arg(long)]
        json: bool,
    },
}

pub fn run(action: AccountAction) -> CliResult {
    let mut engine = common::open_engine()?;
    match action {
        AccountAction::Register {
            name,
            email,
            password,
        } => {
            engine.register(&name, &email, &password)?;
            common::print_events(&mut engine);
        }
        AccountAction::Login { email, password } => {
            engine.login(&email, &password)?;
            common::print_events(&mut engine);
        }
        AccountAction::Logout => {
            engine.logout();
            common::print_events(&mut engine);
        }
        AccountAction::List { json } => {
            // Passwords stay out of the listing.
            let rows: Vec<serde_json::Value> = engine
                .accounts()
                .iter()
                .map(|a| {
                    serde_json::json!({
                        "name": a.name,
                        "email": a.email,
                        "points": a.points,
                        "level": a.level,
                    })
                })
                .collect();
            if json {
                println!("{}", serde_json::to_string_pretty(&rows)?);
            } else if rows.is_empty() {
                println!("no accounts registered");
            } else {
                for a in engine.accounts() {
                    println!(
                        "{} <{}> · {} points · level {}",
                        a.name, a.email, a.points, a.level
                    );
                }
            }
        }
    }
    Ok(())
}
