//! Spendscope Core Library
//!
//! Shared functionality for the spendscope expense analytics tool:
//! - SQLite storage layer for expenses and report snapshots
//! - Expense analytics engine (category aggregation, weekly trends,
//!   suggestion rule cascade)
//! - Monthly report generation with a batch all-users entry point
//! - CSV expense import with content-hash deduplication

pub mod analysis;
pub mod db;
pub mod error;
pub mod import;
pub mod models;
pub mod reports;

pub use analysis::{
    analyze_by_category, compute_trends, generate_suggestions, rank_categories, AnalysisResult,
    CategoryInsight, CategoryStats, DaySpend, ExpenseAnalyzer, ExpenseSource, PeriodSummary,
    Priority, RecentSelection, Suggestion, SuggestionKind, TrendDirection, TrendReport,
    DEFAULT_WINDOW_DAYS,
};
pub use db::Database;
pub use error::{Error, Result};
pub use import::{import_expenses, import_expenses_from_path, ImportOutcome};
pub use models::{Expense, MonthlyReport, NewExpense};
pub use reports::{
    generate_monthly_report, generate_reports_for_all, previous_month, BatchReportOutcome,
    ReportSink,
};
