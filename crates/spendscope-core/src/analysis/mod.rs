//! Expense Analytics Engine
//!
//! Turns a time-ordered window of expense records into categorized
//! aggregates, a weekly trend signal, and a ranked list of actionable
//! suggestions. Everything here is a pure function of the loaded window;
//! the engine owns no persistent state and performs no I/O beyond the one
//! storage-collaborator call per entry point.
//!
//! ## Pipeline
//!
//! load window -> category aggregation -> trend computation -> suggestion
//! rule cascade -> one combined [`AnalysisResult`].
//!
//! ## Usage
//!
//! ```rust,ignore
//! use spendscope_core::analysis::ExpenseAnalyzer;
//!
//! let analyzer = ExpenseAnalyzer::new(&db);
//! let result = analyzer.comprehensive_analysis("user-1")?;
//! ```

pub mod categories;
pub mod engine;
pub mod suggestions;
pub mod trends;
pub mod types;

pub use categories::{analyze_by_category, rank_categories};
pub use engine::{ExpenseAnalyzer, ExpenseSource, DEFAULT_WINDOW_DAYS};
pub use suggestions::generate_suggestions;
pub use trends::compute_trends;
pub use types::{
    AnalysisResult, CategoryInsight, CategoryStats, DaySpend, PeriodSummary, Priority,
    RecentSelection, Suggestion, SuggestionKind, TrendDirection, TrendReport,
};
