//! Spendscope CLI - expense analytics from the terminal
//!
//! Usage:
//!   spendscope init                         Initialize database
//!   spendscope add --user alice -a 12.5 -c Food
//!   spendscope import --user alice --file expenses.csv
//!   spendscope analyze --user alice         Full 30-day analysis
//!   spendscope report generate --user alice Monthly report snapshot

mod cli;
mod commands;


use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (warn)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .init();

    match cli.command {
        Commands::Init => commands::cmd_init(&cli.db),
        Commands::Add {
            user,
            amount,
            category,
            description,
            date,
        } => {
            let db = commands::open_db(&cli.db)?;
            let date = date.as_deref().map(commands::parse_date_arg).transpose()?;
            commands::cmd_add(&db, &user, amount, &category, &description, date)
        }
        Commands::Import { user, file } => {
            let db = commands::open_db(&cli.db)?;
            commands::cmd_import(&db, &user, &file)
        }
        Commands::List { user, limit } => {
            let db = commands::open_db(&cli.db)?;
            commands::cmd_list(&db, &user, limit)
        }
        Commands::Categories { user } => {
            let db = commands::open_db(&cli.db)?;
            commands::cmd_categories(&db, &user)
        }
        Commands::Analyze { user, json } => {
            let db = commands::open_db(&cli.db)?;
            commands::cmd_analyze(&db, &user, json)
        }
        Commands::Trends { user, days, json } => {
            let db = commands::open_db(&cli.db)?;
            commands::cmd_trends(&db, &user, days, json)
        }
        Commands::Summary { user, json } => {
            let db = commands::open_db(&cli.db)?;
            commands::cmd_summary(&db, &user, json)
        }
        Commands::Category {
            user,
            category,
            newest,
            json,
        } => {
            let db = commands::open_db(&cli.db)?;
            commands::cmd_category(&db, &user, &category, newest, json)
        }
        Commands::Report { action } => {
            let db = commands::open_db(&cli.db)?;
            match action {
                ReportAction::Generate { user, month, year } => {
                    commands::cmd_report_generate(&db, &user, month, year)
                }
                ReportAction::All { month, year } => commands::cmd_report_all(&db, month, year),
                ReportAction::List { user, limit } => {
                    commands::cmd_report_list(&db, &user, limit)
                }
            }
        }
    }
}
