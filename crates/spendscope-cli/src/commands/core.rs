//! Core command implementations and shared utilities
//!
//! This module contains:
//! - `open_db` - Shared utility to open the database
//! - `parse_date_arg` - YYYY-MM-DD argument parsing
//! - `cmd_init` - Initialize the database

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, Utc};
use spendscope_core::Database;

/// Open (and migrate) the database at the given path
pub fn open_db(db_path: &Path) -> Result<Database> {
    let path_str = db_path
        .to_str()
        .context("Database path is not valid UTF-8")?;
    Database::new(path_str).context("Failed to open database")
}

/// Parse a YYYY-MM-DD argument into a midnight-UTC timestamp
pub fn parse_date_arg(raw: &str) -> Result<DateTime<Utc>> {
    let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .context("Invalid date format (use YYYY-MM-DD)")?;
    date.and_hms_opt(0, 0, 0)
        .map(|dt| dt.and_utc())
        .context("Invalid date")
}

pub fn cmd_init(db_path: &Path) -> Result<()> {
    println!("Initializing database at {}...", db_path.display());

    let _db = open_db(db_path)?;

    println!("Database initialized.");
    println!();
    println!("Next steps:");
    println!("  1. Add an expense:      spendscope add --user alice --amount 12.50 --category Food");
    println!("  2. Import a CSV:        spendscope import --user alice --file expenses.csv");
    println!("  3. Run the analysis:    spendscope analyze --user alice");

    Ok(())
}
