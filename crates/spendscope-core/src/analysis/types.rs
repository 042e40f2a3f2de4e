//! Core types for the analytics engine

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::models::Expense;

/// Round a monetary value to 2 decimal places
pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Direction of the weekly spending trend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendDirection {
    /// Fewer than 2 distinct weeks of data
    InsufficientData,
    /// Recent weekly average more than 10% above the earlier average
    Increasing,
    /// Within the 10% band either way
    Stable,
    /// Recent weekly average more than 10% below the earlier average
    Decreasing,
}

impl TrendDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            TrendDirection::InsufficientData => "insufficient_data",
            TrendDirection::Increasing => "increasing",
            TrendDirection::Stable => "stable",
            TrendDirection::Decreasing => "decreasing",
        }
    }
}

impl fmt::Display for TrendDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for TrendDirection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "insufficient_data" => Ok(TrendDirection::InsufficientData),
            "increasing" => Ok(TrendDirection::Increasing),
            "stable" => Ok(TrendDirection::Stable),
            "decreasing" => Ok(TrendDirection::Decreasing),
            _ => Err(format!("Unknown trend direction: {}", s)),
        }
    }
}

/// What kind of suggestion a rule produced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuggestionKind {
    /// No data / neutral information
    Info,
    /// A category dominates total spending
    Warning,
    /// Budget or consolidation nudge
    Tip,
    /// Spending trend is increasing
    Alert,
    /// Spending trend is decreasing, or the balanced-spending fallback
    Positive,
    /// The monthly budget recommendation
    Budget,
    /// Suggestion generation itself failed
    Error,
}

impl SuggestionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SuggestionKind::Info => "info",
            SuggestionKind::Warning => "warning",
            SuggestionKind::Tip => "tip",
            SuggestionKind::Alert => "alert",
            SuggestionKind::Positive => "positive",
            SuggestionKind::Budget => "budget",
            SuggestionKind::Error => "error",
        }
    }
}

impl fmt::Display for SuggestionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// How urgent a suggestion is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
        }
    }

    /// Numeric rank for sorting (higher = more urgent)
    pub fn rank(&self) -> u8 {
        match self {
            Priority::Low => 1,
            Priority::Medium => 2,
            Priority::High => 3,
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low" => Ok(Priority::Low),
            "medium" => Ok(Priority::Medium),
            "high" => Ok(Priority::High),
            _ => Err(format!("Unknown priority: {}", s)),
        }
    }
}

/// A generated spending suggestion
///
/// Kind-specific numeric fields are optional and omitted from JSON when
/// absent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Suggestion {
    pub kind: SuggestionKind,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    pub priority: Priority,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_spending: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggested_reduction: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggested_budget: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transaction_count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trend: Option<TrendDirection>,
}

impl Suggestion {
    /// Create a suggestion with just the common fields
    pub fn new(kind: SuggestionKind, priority: Priority, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            category: None,
            priority,
            current_spending: None,
            suggested_reduction: None,
            suggested_budget: None,
            transaction_count: None,
            trend: None,
        }
    }

    /// Attach the category the suggestion is about
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Attach the spend the suggestion is reacting to
    pub fn with_current_spending(mut self, amount: f64) -> Self {
        self.current_spending = Some(amount);
        self
    }

    /// Attach a recommended reduction amount
    pub fn with_suggested_reduction(mut self, amount: f64) -> Self {
        self.suggested_reduction = Some(amount);
        self
    }

    /// Attach a recommended monthly budget
    pub fn with_suggested_budget(mut self, amount: f64) -> Self {
        self.suggested_budget = Some(amount);
        self
    }

    /// Attach a transaction count (high-frequency rule)
    pub fn with_transaction_count(mut self, count: usize) -> Self {
        self.transaction_count = Some(count);
        self
    }

    /// Attach the trend direction (trend rules)
    pub fn with_trend(mut self, trend: TrendDirection) -> Self {
        self.trend = Some(trend);
        self
    }
}

/// Per-category aggregate statistics for one analysis window
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryStats {
    pub category: String,
    pub total_spent: f64,
    pub transaction_count: usize,
    pub average_amount: f64,
    pub min_amount: f64,
    pub max_amount: f64,
    /// 100 * category total / window total, 2 decimal places; 0 when the
    /// window total is 0
    pub percentage_of_total: f64,
}

/// The calendar day with the highest or lowest summed spending
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DaySpend {
    pub date: NaiveDate,
    pub amount: f64,
}

/// Weekly/daily spending trend report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrendReport {
    /// ISO-week totals keyed "YYYY-Www"; zero-padded so lexicographic key
    /// order is chronological
    pub weekly_totals: BTreeMap<String, f64>,
    pub trend: TrendDirection,
    pub recent_weekly_avg: f64,
    pub earlier_weekly_avg: f64,
    /// Window total divided by the window length in days, not by the
    /// number of distinct days with records
    pub daily_average: f64,
    pub highest_spending_day: Option<DaySpend>,
    pub lowest_spending_day: Option<DaySpend>,
}

impl Default for TrendReport {
    fn default() -> Self {
        Self {
            weekly_totals: BTreeMap::new(),
            trend: TrendDirection::InsufficientData,
            recent_weekly_avg: 0.0,
            earlier_weekly_avg: 0.0,
            daily_average: 0.0,
            highest_spending_day: None,
            lowest_spending_day: None,
        }
    }
}

/// The combined result of a comprehensive analysis run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub total_expenses: f64,
    pub expense_count: usize,
    pub category_analysis: HashMap<String, CategoryStats>,
    pub trends: TrendReport,
    /// Highest priority first
    pub suggestions: Vec<Suggestion>,
    /// Human label for the window, e.g. "30 days"
    pub period: String,
    pub analyzed_at: DateTime<Utc>,
    pub average_daily_spending: f64,
    pub top_category: Option<String>,
}

/// Aggregates for one fixed lookback window
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PeriodSummary {
    pub total_spent: f64,
    pub transaction_count: usize,
    pub average_transaction: f64,
    pub top_category: Option<String>,
    pub top_category_amount: f64,
}

impl PeriodSummary {
    /// The defined all-zero result for an empty window
    pub fn empty() -> Self {
        Self {
            total_spent: 0.0,
            transaction_count: 0,
            average_transaction: 0.0,
            top_category: None,
            top_category_amount: 0.0,
        }
    }
}

/// Detailed 30-day view of a single category
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryInsight {
    pub category: String,
    pub total_spent: f64,
    pub transaction_count: usize,
    pub average_transaction: f64,
    pub highest_expense: f64,
    pub lowest_expense: f64,
    pub daily_average: f64,
    pub recent_transactions: Vec<Expense>,
    /// Set for the zero-match case instead of an error
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Which 5 transactions the category insight reports
///
/// The system this replaces took the tail of a newest-first list, which is
/// the *oldest* 5 of the window. That slice is preserved as the default for
/// compatibility; `NewestFirst` is the corrected behavior behind a flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RecentSelection {
    /// Last 5 elements of the newest-first ordering (compatibility)
    #[default]
    TailCompat,
    /// First 5 elements of the newest-first ordering
    NewestFirst,
}
