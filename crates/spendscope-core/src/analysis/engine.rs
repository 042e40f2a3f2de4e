//! Analysis engine - orchestrates the analytics pipeline
//!
//! The engine owns no state beyond a storage handle and a reference time.
//! Each entry point loads a fresh window of records and runs the pure
//! pipeline over it, so one engine instance is safe under concurrent use
//! whenever the storage collaborator is.

use std::collections::BTreeMap;

use chrono::{DateTime, Duration, Utc};
use tracing::debug;

use crate::error::{Error, Result};
use crate::models::Expense;

use super::categories::{analyze_by_category, rank_categories};
use super::suggestions::generate_suggestions;
use super::trends::compute_trends;
use super::types::{
    round2, AnalysisResult, CategoryInsight, PeriodSummary, RecentSelection, TrendReport,
};

/// Default analysis window in days
pub const DEFAULT_WINDOW_DAYS: u32 = 30;

/// How many transactions the category insight reports
const RECENT_TRANSACTION_COUNT: usize = 5;

/// The fixed lookback windows of the period summary
const SUMMARY_PERIODS: [(&str, u32); 3] =
    [("last_7_days", 7), ("last_30_days", 30), ("last_90_days", 90)];

/// Storage collaborator the engine consumes
///
/// Implementations return expenses sorted by date descending; the window
/// is [start, end) with either bound optional. An empty result is valid
/// and short-circuits to the defined empty-state results downstream.
pub trait ExpenseSource {
    fn load_expenses(
        &self,
        user_id: &str,
        start: Option<DateTime<Utc>>,
        end: Option<DateTime<Utc>>,
        category: Option<&str>,
    ) -> Result<Vec<Expense>>;
}

/// Per-user expense analytics over a storage collaborator
pub struct ExpenseAnalyzer<'a, S: ExpenseSource> {
    source: &'a S,
    /// Reference time all window boundaries are computed from
    now: DateTime<Utc>,
}

impl<'a, S: ExpenseSource> ExpenseAnalyzer<'a, S> {
    /// Create an analyzer anchored at the current wall-clock time
    pub fn new(source: &'a S) -> Self {
        Self::at(source, Utc::now())
    }

    /// Create an analyzer anchored at a fixed reference time
    ///
    /// Window boundaries derive from `now`, so results are deterministic
    /// for a given record set. Tests always construct through here.
    pub fn at(source: &'a S, now: DateTime<Utc>) -> Self {
        Self { source, now }
    }

    fn window_start(&self, days: u32) -> DateTime<Utc> {
        self.now - Duration::days(i64::from(days))
    }

    /// Full analysis over the default 30-day window: category breakdown,
    /// trend report, and the ranked suggestion list
    pub fn comprehensive_analysis(&self, user_id: &str) -> Result<AnalysisResult> {
        let start = self.window_start(DEFAULT_WINDOW_DAYS);
        let expenses = self.source.load_expenses(user_id, Some(start), None, None)?;
        debug!(user_id, count = expenses.len(), "Loaded analysis window");

        let period = format!("{} days", DEFAULT_WINDOW_DAYS);

        if expenses.is_empty() {
            return Ok(AnalysisResult {
                total_expenses: 0.0,
                expense_count: 0,
                category_analysis: Default::default(),
                trends: TrendReport::default(),
                suggestions: generate_suggestions(&Default::default(), &TrendReport::default(), 0.0),
                period,
                analyzed_at: self.now,
                average_daily_spending: 0.0,
                top_category: None,
            });
        }

        let total: f64 = expenses.iter().map(|e| e.amount).sum();
        let category_analysis = analyze_by_category(&expenses);
        let trends = compute_trends(&expenses, DEFAULT_WINDOW_DAYS);
        let suggestions = generate_suggestions(&category_analysis, &trends, total);

        let top_category = rank_categories(&category_analysis)
            .first()
            .map(|stats| stats.category.clone());

        Ok(AnalysisResult {
            total_expenses: round2(total),
            expense_count: expenses.len(),
            category_analysis,
            trends,
            suggestions,
            period,
            analyzed_at: self.now,
            average_daily_spending: round2(total / f64::from(DEFAULT_WINDOW_DAYS)),
            top_category,
        })
    }

    /// Independent aggregates for the 7/30/90-day lookback windows
    ///
    /// Each window is loaded and computed on its own; an empty window
    /// yields the all-zero summary.
    pub fn period_summary(&self, user_id: &str) -> Result<BTreeMap<String, PeriodSummary>> {
        let mut summary = BTreeMap::new();

        for (name, days) in SUMMARY_PERIODS {
            let start = self.window_start(days);
            let expenses = self.source.load_expenses(user_id, Some(start), None, None)?;

            let entry = if expenses.is_empty() {
                PeriodSummary::empty()
            } else {
                let total: f64 = expenses.iter().map(|e| e.amount).sum();

                let mut by_category: BTreeMap<&str, f64> = BTreeMap::new();
                for expense in &expenses {
                    *by_category.entry(expense.category.as_str()).or_insert(0.0) +=
                        expense.amount;
                }
                // Strict comparison: ties resolve to the first (alphabetically
                // lowest) category
                let mut top: Option<(&str, f64)> = None;
                for (&category, &amount) in &by_category {
                    if top.map_or(true, |(_, best)| amount > best) {
                        top = Some((category, amount));
                    }
                }

                PeriodSummary {
                    total_spent: round2(total),
                    transaction_count: expenses.len(),
                    average_transaction: round2(total / expenses.len() as f64),
                    top_category: top.map(|(category, _)| category.to_string()),
                    top_category_amount: top.map(|(_, amount)| round2(amount)).unwrap_or(0.0),
                }
            };

            summary.insert(name.to_string(), entry);
        }

        Ok(summary)
    }

    /// Detailed 30-day view of one category
    ///
    /// Zero matching records is a value, not an error: the insight comes
    /// back zeroed with a descriptive message.
    pub fn category_insight(
        &self,
        user_id: &str,
        category: &str,
        selection: RecentSelection,
    ) -> Result<CategoryInsight> {
        if category.trim().is_empty() {
            return Err(Error::InvalidData(
                "Category must be a non-empty string".to_string(),
            ));
        }

        let start = self.window_start(DEFAULT_WINDOW_DAYS);
        let expenses = self
            .source
            .load_expenses(user_id, Some(start), None, Some(category))?;

        if expenses.is_empty() {
            return Ok(CategoryInsight {
                category: category.to_string(),
                total_spent: 0.0,
                transaction_count: 0,
                average_transaction: 0.0,
                highest_expense: 0.0,
                lowest_expense: 0.0,
                daily_average: 0.0,
                recent_transactions: Vec::new(),
                message: Some(format!(
                    "No {} expenses found in the last 30 days.",
                    category
                )),
            });
        }

        let total: f64 = expenses.iter().map(|e| e.amount).sum();
        let highest = expenses.iter().map(|e| e.amount).fold(f64::MIN, f64::max);
        let lowest = expenses.iter().map(|e| e.amount).fold(f64::MAX, f64::min);

        // The loader returns newest first. TailCompat keeps the historical
        // tail-of-list slice (the oldest 5 of the window); NewestFirst takes
        // the head (the true most recent 5).
        let recent_transactions = match selection {
            RecentSelection::TailCompat => expenses
                [expenses.len().saturating_sub(RECENT_TRANSACTION_COUNT)..]
                .to_vec(),
            RecentSelection::NewestFirst => expenses
                .iter()
                .take(RECENT_TRANSACTION_COUNT)
                .cloned()
                .collect(),
        };

        Ok(CategoryInsight {
            category: category.to_string(),
            total_spent: round2(total),
            transaction_count: expenses.len(),
            average_transaction: round2(total / expenses.len() as f64),
            highest_expense: highest,
            lowest_expense: lowest,
            daily_average: round2(total / f64::from(DEFAULT_WINDOW_DAYS)),
            recent_transactions,
            message: None,
        })
    }

    /// Trend report alone, over a caller-supplied window length
    pub fn trends_only(&self, user_id: &str, days: u32) -> Result<TrendReport> {
        if days == 0 {
            return Err(Error::InvalidData(
                "Window length must be at least 1 day".to_string(),
            ));
        }

        let start = self.window_start(days);
        let expenses = self.source.load_expenses(user_id, Some(start), None, None)?;
        Ok(compute_trends(&expenses, days))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::types::{Priority, SuggestionKind, TrendDirection};
    use chrono::TimeZone;

    /// In-memory source mirroring the loader contract
    struct VecSource {
        expenses: Vec<Expense>,
    }

    impl ExpenseSource for VecSource {
        fn load_expenses(
            &self,
            user_id: &str,
            start: Option<DateTime<Utc>>,
            end: Option<DateTime<Utc>>,
            category: Option<&str>,
        ) -> Result<Vec<Expense>> {
            let mut matched: Vec<Expense> = self
                .expenses
                .iter()
                .filter(|e| e.user_id == user_id)
                .filter(|e| start.map_or(true, |s| e.date >= s))
                .filter(|e| end.map_or(true, |s| e.date < s))
                .filter(|e| category.map_or(true, |c| e.category == c))
                .cloned()
                .collect();
            matched.sort_by(|a, b| b.date.cmp(&a.date));
            Ok(matched)
        }
    }

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 7, 31, 12, 0, 0).unwrap()
    }

    fn expense_days_ago(days: i64, amount: f64, category: &str) -> Expense {
        let date = fixed_now() - Duration::days(days);
        Expense {
            id: days,
            user_id: "u1".to_string(),
            amount,
            category: category.to_string(),
            description: format!("{} {} days ago", category, days),
            date,
            created_at: date,
            updated_at: date,
        }
    }

    #[test]
    fn test_empty_comprehensive_analysis() {
        let source = VecSource { expenses: vec![] };
        let analyzer = ExpenseAnalyzer::at(&source, fixed_now());

        let result = analyzer.comprehensive_analysis("u1").unwrap();
        assert_eq!(result.expense_count, 0);
        assert_eq!(result.total_expenses, 0.0);
        assert!(result.category_analysis.is_empty());
        assert_eq!(result.trends.trend, TrendDirection::InsufficientData);
        assert_eq!(result.suggestions.len(), 1);
        assert_eq!(result.suggestions[0].kind, SuggestionKind::Info);
        assert_eq!(result.period, "30 days");
        assert!(result.top_category.is_none());
    }

    #[test]
    fn test_comprehensive_analysis_assembles_all_stages() {
        let source = VecSource {
            expenses: vec![
                expense_days_ago(2, 350.0, "Food"),
                expense_days_ago(5, 650.0, "Rent"),
                // Outside the 30-day window, must be ignored
                expense_days_ago(45, 9999.0, "Travel"),
            ],
        };
        let analyzer = ExpenseAnalyzer::at(&source, fixed_now());

        let result = analyzer.comprehensive_analysis("u1").unwrap();
        assert_eq!(result.expense_count, 2);
        assert_eq!(result.total_expenses, 1000.0);
        assert_eq!(result.top_category.as_deref(), Some("Rent"));
        assert_eq!(result.average_daily_spending, 33.33);
        assert!(!result.category_analysis.contains_key("Travel"));

        // Both Food (35%) and Rent (65%) dominate; budget suggestion fires
        assert!(result
            .suggestions
            .iter()
            .any(|s| s.kind == SuggestionKind::Budget && s.suggested_budget == Some(900.0)));
        // Sorted highest priority first
        assert_eq!(result.suggestions[0].priority, Priority::High);
    }

    #[test]
    fn test_comprehensive_analysis_is_idempotent_at_fixed_clock() {
        let source = VecSource {
            expenses: vec![
                expense_days_ago(2, 120.0, "Food"),
                expense_days_ago(9, 80.0, "Food"),
                expense_days_ago(16, 40.0, "Transport"),
            ],
        };
        let analyzer = ExpenseAnalyzer::at(&source, fixed_now());

        let first = analyzer.comprehensive_analysis("u1").unwrap();
        let second = analyzer.comprehensive_analysis("u1").unwrap();

        assert_eq!(
            serde_json::to_value(&first.category_analysis).unwrap(),
            serde_json::to_value(&second.category_analysis).unwrap()
        );
        assert_eq!(
            serde_json::to_value(&first.trends).unwrap(),
            serde_json::to_value(&second.trends).unwrap()
        );
    }

    #[test]
    fn test_period_summary_windows_are_independent() {
        let source = VecSource {
            expenses: vec![
                expense_days_ago(3, 100.0, "Food"),
                expense_days_ago(20, 200.0, "Rent"),
                expense_days_ago(60, 400.0, "Travel"),
            ],
        };
        let analyzer = ExpenseAnalyzer::at(&source, fixed_now());

        let summary = analyzer.period_summary("u1").unwrap();

        let week = &summary["last_7_days"];
        assert_eq!(week.total_spent, 100.0);
        assert_eq!(week.top_category.as_deref(), Some("Food"));

        let month = &summary["last_30_days"];
        assert_eq!(month.total_spent, 300.0);
        assert_eq!(month.transaction_count, 2);
        assert_eq!(month.average_transaction, 150.0);
        assert_eq!(month.top_category.as_deref(), Some("Rent"));
        assert_eq!(month.top_category_amount, 200.0);

        let quarter = &summary["last_90_days"];
        assert_eq!(quarter.total_spent, 700.0);
        assert_eq!(quarter.top_category.as_deref(), Some("Travel"));
    }

    #[test]
    fn test_period_summary_top_category_tie_takes_first_name() {
        let source = VecSource {
            expenses: vec![
                expense_days_ago(2, 100.0, "Zoo"),
                expense_days_ago(3, 100.0, "Aquarium"),
            ],
        };
        let analyzer = ExpenseAnalyzer::at(&source, fixed_now());

        let summary = analyzer.period_summary("u1").unwrap();
        let week = &summary["last_7_days"];
        assert_eq!(week.top_category.as_deref(), Some("Aquarium"));
        assert_eq!(week.top_category_amount, 100.0);
    }

    #[test]
    fn test_period_summary_empty_windows_are_zeroed() {
        let source = VecSource {
            expenses: vec![expense_days_ago(60, 400.0, "Travel")],
        };
        let analyzer = ExpenseAnalyzer::at(&source, fixed_now());

        let summary = analyzer.period_summary("u1").unwrap();
        let week = &summary["last_7_days"];
        assert_eq!(week.total_spent, 0.0);
        assert_eq!(week.transaction_count, 0);
        assert!(week.top_category.is_none());
    }

    #[test]
    fn test_category_insight_stats() {
        let source = VecSource {
            expenses: vec![
                expense_days_ago(1, 30.0, "Food"),
                expense_days_ago(2, 10.0, "Food"),
                expense_days_ago(3, 20.0, "Food"),
                expense_days_ago(4, 999.0, "Rent"),
            ],
        };
        let analyzer = ExpenseAnalyzer::at(&source, fixed_now());

        let insight = analyzer
            .category_insight("u1", "Food", RecentSelection::default())
            .unwrap();
        assert_eq!(insight.total_spent, 60.0);
        assert_eq!(insight.transaction_count, 3);
        assert_eq!(insight.average_transaction, 20.0);
        assert_eq!(insight.highest_expense, 30.0);
        assert_eq!(insight.lowest_expense, 10.0);
        assert_eq!(insight.daily_average, 2.0);
        assert!(insight.message.is_none());
    }

    #[test]
    fn test_category_insight_recent_selection_modes() {
        // 7 Food expenses, newest (days_ago=1) through oldest (days_ago=7)
        let source = VecSource {
            expenses: (1..=7)
                .map(|d| expense_days_ago(d, d as f64, "Food"))
                .collect(),
        };
        let analyzer = ExpenseAnalyzer::at(&source, fixed_now());

        // Compatibility default: tail of the newest-first list = oldest 5
        let compat = analyzer
            .category_insight("u1", "Food", RecentSelection::TailCompat)
            .unwrap();
        let compat_days: Vec<i64> = compat.recent_transactions.iter().map(|e| e.id).collect();
        assert_eq!(compat_days, vec![3, 4, 5, 6, 7]);

        // Named alternate: true most recent 5
        let newest = analyzer
            .category_insight("u1", "Food", RecentSelection::NewestFirst)
            .unwrap();
        let newest_days: Vec<i64> = newest.recent_transactions.iter().map(|e| e.id).collect();
        assert_eq!(newest_days, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_category_insight_zero_matches_is_a_value() {
        let source = VecSource { expenses: vec![] };
        let analyzer = ExpenseAnalyzer::at(&source, fixed_now());

        let insight = analyzer
            .category_insight("u1", "Gadgets", RecentSelection::default())
            .unwrap();
        assert_eq!(insight.total_spent, 0.0);
        assert_eq!(insight.transaction_count, 0);
        assert!(insight.message.unwrap().contains("Gadgets"));
    }

    #[test]
    fn test_category_insight_rejects_blank_category() {
        let source = VecSource { expenses: vec![] };
        let analyzer = ExpenseAnalyzer::at(&source, fixed_now());
        assert!(matches!(
            analyzer.category_insight("u1", "  ", RecentSelection::default()),
            Err(Error::InvalidData(_))
        ));
    }

    #[test]
    fn test_trends_only_respects_days_parameter() {
        let source = VecSource {
            expenses: vec![
                expense_days_ago(3, 70.0, "Food"),
                expense_days_ago(40, 700.0, "Food"),
            ],
        };
        let analyzer = ExpenseAnalyzer::at(&source, fixed_now());

        let month = analyzer.trends_only("u1", 30).unwrap();
        assert_eq!(month.weekly_totals.len(), 1);
        assert_eq!(month.daily_average, round2(70.0 / 30.0));

        let wide = analyzer.trends_only("u1", 60).unwrap();
        assert_eq!(wide.weekly_totals.len(), 2);

        assert!(matches!(
            analyzer.trends_only("u1", 0),
            Err(Error::InvalidData(_))
        ));
    }
}
