//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI
//! arguments. The actual command implementations are in the `commands`
//! module.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Spendscope - expense tracking analytics
#[derive(Parser)]
#[command(name = "spendscope")]
#[command(about = "Expense analytics: category breakdowns, trends, and suggestions", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Database path
    #[arg(long, default_value = "spendscope.db", global = true)]
    pub db: PathBuf,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database
    Init,

    /// Add a single expense
    Add {
        /// User the expense belongs to
        #[arg(short, long)]
        user: String,

        /// Amount spent (must be positive)
        #[arg(short, long)]
        amount: f64,

        /// Category label
        #[arg(short, long)]
        category: String,

        /// Free-text description
        #[arg(short, long, default_value = "")]
        description: String,

        /// Business date (YYYY-MM-DD), defaults to today
        #[arg(long)]
        date: Option<String>,
    },

    /// Import expenses from CSV (date,amount,category,description)
    Import {
        /// User the expenses belong to
        #[arg(short, long)]
        user: String,

        /// CSV file to import
        #[arg(short, long)]
        file: PathBuf,
    },

    /// List recent expenses
    List {
        /// User to list expenses for
        #[arg(short, long)]
        user: String,

        /// Maximum number of expenses to show
        #[arg(short, long, default_value = "20")]
        limit: i64,
    },

    /// List the distinct category labels a user has spent in
    Categories {
        /// User whose categories to list
        #[arg(short, long)]
        user: String,
    },

    /// Run the comprehensive 30-day analysis
    Analyze {
        /// User to analyze
        #[arg(short, long)]
        user: String,

        /// Emit the full result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show weekly spending trends
    Trends {
        /// User to analyze
        #[arg(short, long)]
        user: String,

        /// Window length in days
        #[arg(short, long, default_value = "30")]
        days: u32,

        /// Emit the trend report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Spending summary over the 7/30/90-day windows
    Summary {
        /// User to summarize
        #[arg(short, long)]
        user: String,

        /// Emit the summary as JSON
        #[arg(long)]
        json: bool,
    },

    /// Detailed 30-day view of one category
    Category {
        /// User to analyze
        #[arg(short, long)]
        user: String,

        /// Category to inspect
        category: String,

        /// Report the true most recent transactions instead of the
        /// compatibility slice
        #[arg(long)]
        newest: bool,

        /// Emit the insight as JSON
        #[arg(long)]
        json: bool,
    },

    /// Monthly report snapshots
    Report {
        #[command(subcommand)]
        action: ReportAction,
    },
}

#[derive(Subcommand)]
pub enum ReportAction {
    /// Generate and save a report for one user
    Generate {
        /// User to report on
        #[arg(short, long)]
        user: String,

        /// Calendar month 1-12, defaults to last month
        #[arg(short, long)]
        month: Option<u32>,

        /// Year, defaults to last month's year
        #[arg(short, long)]
        year: Option<i32>,
    },

    /// Generate reports for every known user
    All {
        /// Calendar month 1-12, defaults to last month
        #[arg(short, long)]
        month: Option<u32>,

        /// Year, defaults to last month's year
        #[arg(short, long)]
        year: Option<i32>,
    },

    /// List a user's saved reports
    List {
        /// User whose reports to list
        #[arg(short, long)]
        user: String,

        /// Maximum number of reports to show
        #[arg(short, long, default_value = "12")]
        limit: i64,
    },
}
