//! Suggestion rule engine
//!
//! A fixed, ordered cascade of rules evaluated against the category
//! analysis and trend report. Not an inference engine: the rules, their
//! thresholds, and their relative order are part of the contract.
//!
//! Generation never fails. The fallible body runs behind a `Result`
//! boundary and any error degrades to a single low-priority fallback
//! suggestion.

use std::collections::HashMap;

use tracing::{debug, warn};

use crate::error::Result;

use super::categories::rank_categories;
use super::types::{
    round2, CategoryStats, Priority, Suggestion, SuggestionKind, TrendDirection, TrendReport,
};

/// Share of total spend above which a top category draws a warning
const DOMINANT_CATEGORY_PERCENT: f64 = 30.0;
/// Share of total spend above which a top category draws a budget tip
const NOTABLE_CATEGORY_PERCENT: f64 = 20.0;
/// Suggested cut for a dominant category (midpoint of "15-20%")
const REDUCTION_FACTOR: f64 = 0.175;
/// Transactions per window above which the consolidation tip fires
const HIGH_FREQUENCY_COUNT: usize = 15;
/// Suggested monthly budget as a share of current spending
const BUDGET_FACTOR: f64 = 0.90;
/// How many top categories the share rules examine
const TOP_CATEGORIES: usize = 3;

/// Generate the suggestion list for one analysis window
///
/// Output is sorted by priority descending; ties keep rule-evaluation
/// order.
pub fn generate_suggestions(
    category_analysis: &HashMap<String, CategoryStats>,
    trends: &TrendReport,
    total_spending: f64,
) -> Vec<Suggestion> {
    // Empty-input short-circuit: exactly one informational suggestion
    if category_analysis.is_empty() {
        return vec![Suggestion::new(
            SuggestionKind::Info,
            Priority::Low,
            "No expense data found for the last 30 days. Start tracking your \
             expenses to get personalized insights!",
        )];
    }

    match try_generate(category_analysis, trends, total_spending) {
        Ok(suggestions) => {
            debug!(count = suggestions.len(), "Suggestion generation complete");
            suggestions
        }
        Err(e) => {
            warn!(error = %e, "Suggestion generation failed, emitting fallback");
            vec![Suggestion::new(
                SuggestionKind::Error,
                Priority::Low,
                "Unable to generate suggestions at this time. Please try again later.",
            )]
        }
    }
}

fn try_generate(
    category_analysis: &HashMap<String, CategoryStats>,
    trends: &TrendReport,
    total_spending: f64,
) -> Result<Vec<Suggestion>> {
    let mut suggestions = Vec::new();

    // Ranked order is reused by the share rules and the high-frequency
    // rule so output is deterministic.
    let ranked = rank_categories(category_analysis);

    // Rule: top categories with an outsized share of total spend
    for stats in ranked.iter().take(TOP_CATEGORIES) {
        if stats.percentage_of_total > DOMINANT_CATEGORY_PERCENT {
            suggestions.push(
                Suggestion::new(
                    SuggestionKind::Warning,
                    Priority::High,
                    format!(
                        "You're spending a lot on {} ({:.1}% of total). \
                         Consider reducing it by 15-20%.",
                        stats.category, stats.percentage_of_total
                    ),
                )
                .with_category(stats.category.as_str())
                .with_current_spending(stats.total_spent)
                .with_suggested_reduction(round2(stats.total_spent * REDUCTION_FACTOR)),
            );
        } else if stats.percentage_of_total > NOTABLE_CATEGORY_PERCENT {
            suggestions.push(
                Suggestion::new(
                    SuggestionKind::Tip,
                    Priority::Medium,
                    format!(
                        "{} is one of your top spending categories at ${:.2}. \
                         Consider setting a monthly budget for it.",
                        stats.category, stats.total_spent
                    ),
                )
                .with_category(stats.category.as_str())
                .with_current_spending(stats.total_spent),
            );
        }
    }

    // Rule: weekly trend direction
    match trends.trend {
        TrendDirection::Increasing => {
            suggestions.push(
                Suggestion::new(
                    SuggestionKind::Alert,
                    Priority::High,
                    format!(
                        "Your spending has increased recently. Weekly average \
                         went from ${:.2} to ${:.2}.",
                        trends.earlier_weekly_avg, trends.recent_weekly_avg
                    ),
                )
                .with_trend(TrendDirection::Increasing),
            );
        }
        TrendDirection::Decreasing => {
            suggestions.push(
                Suggestion::new(
                    SuggestionKind::Positive,
                    Priority::Low,
                    format!(
                        "Great job! Your spending has decreased. You're saving \
                         ${:.2} per week on average.",
                        trends.earlier_weekly_avg - trends.recent_weekly_avg
                    ),
                )
                .with_trend(TrendDirection::Decreasing),
            );
        }
        TrendDirection::Stable | TrendDirection::InsufficientData => {}
    }

    // Rule: high transaction frequency, every category
    for stats in &ranked {
        if stats.transaction_count > HIGH_FREQUENCY_COUNT {
            suggestions.push(
                Suggestion::new(
                    SuggestionKind::Tip,
                    Priority::Medium,
                    format!(
                        "You made {} {} transactions this month. Consider \
                         consolidating purchases to reduce impulse spending.",
                        stats.transaction_count, stats.category
                    ),
                )
                .with_category(stats.category.as_str())
                .with_transaction_count(stats.transaction_count),
            );
        }
    }

    // Rule: overall budget recommendation
    if total_spending > 0.0 {
        let suggested_budget = round2(total_spending * BUDGET_FACTOR);
        suggestions.push(
            Suggestion::new(
                SuggestionKind::Budget,
                Priority::Medium,
                format!(
                    "Based on your spending pattern, consider setting a monthly \
                     budget of ${:.2} to save 10%.",
                    suggested_budget
                ),
            )
            .with_current_spending(total_spending)
            .with_suggested_budget(suggested_budget),
        );
    }

    // Stable sort: ties preserve rule-evaluation order
    suggestions.sort_by(|a, b| b.priority.rank().cmp(&a.priority.rank()));

    // Guard: cannot stay empty while the budget rule fires for any positive
    // spend, but total_spending == 0 with non-empty input still lands here
    if suggestions.is_empty() {
        suggestions.push(Suggestion::new(
            SuggestionKind::Positive,
            Priority::Low,
            "Your spending looks well-balanced! Keep up the good work with \
             tracking your expenses.",
        ));
    }

    Ok(suggestions)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::categories::analyze_by_category;
    use crate::models::Expense;
    use chrono::{TimeZone, Utc};

    fn expense(amount: f64, category: &str) -> Expense {
        let date = Utc.with_ymd_and_hms(2026, 7, 15, 12, 0, 0).unwrap();
        Expense {
            id: 0,
            user_id: "u1".to_string(),
            amount,
            category: category.to_string(),
            description: String::new(),
            date,
            created_at: date,
            updated_at: date,
        }
    }

    #[test]
    fn test_empty_analysis_single_info_suggestion() {
        let suggestions = generate_suggestions(&HashMap::new(), &TrendReport::default(), 0.0);
        assert_eq!(suggestions.len(), 1);
        assert_eq!(suggestions[0].kind, SuggestionKind::Info);
        assert_eq!(suggestions[0].priority, Priority::Low);
    }

    #[test]
    fn test_dominant_category_warning_with_reduction() {
        // Food is 350 of 1000 total = 35%
        let expenses = vec![expense(350.0, "Food"), expense(650.0, "Rent")];
        let analysis = analyze_by_category(&expenses);
        let suggestions = generate_suggestions(&analysis, &TrendReport::default(), 1000.0);

        let warning = suggestions
            .iter()
            .find(|s| s.kind == SuggestionKind::Warning && s.category.as_deref() == Some("Food"))
            .expect("expected a warning for Food");
        assert_eq!(warning.priority, Priority::High);
        assert_eq!(warning.suggested_reduction, Some(61.25));
        assert!(warning.message.contains("35.0%"));

        // Rent at 65% also draws a warning; no tip for either
        assert!(suggestions
            .iter()
            .any(|s| s.kind == SuggestionKind::Warning && s.category.as_deref() == Some("Rent")));
    }

    #[test]
    fn test_notable_category_gets_budget_tip() {
        // Four categories at 25% each: above 20%, below 30%, top 3 only
        let expenses = vec![
            expense(25.0, "A"),
            expense(25.0, "B"),
            expense(25.0, "C"),
            expense(25.0, "D"),
        ];
        let analysis = analyze_by_category(&expenses);
        let suggestions = generate_suggestions(&analysis, &TrendReport::default(), 100.0);

        let tips: Vec<_> = suggestions
            .iter()
            .filter(|s| s.kind == SuggestionKind::Tip)
            .collect();
        assert_eq!(tips.len(), 3);
        // Ranked tiebreak by name: D is ranked last and excluded
        assert!(!tips.iter().any(|s| s.category.as_deref() == Some("D")));
    }

    #[test]
    fn test_trend_rules() {
        let expenses = vec![expense(100.0, "Food")];
        let analysis = analyze_by_category(&expenses);

        let increasing = TrendReport {
            trend: TrendDirection::Increasing,
            recent_weekly_avg: 200.0,
            earlier_weekly_avg: 100.0,
            ..TrendReport::default()
        };
        let suggestions = generate_suggestions(&analysis, &increasing, 100.0);
        let alert = suggestions
            .iter()
            .find(|s| s.kind == SuggestionKind::Alert)
            .expect("expected an alert");
        assert_eq!(alert.priority, Priority::High);
        assert!(alert.message.contains("$100.00"));
        assert!(alert.message.contains("$200.00"));

        let decreasing = TrendReport {
            trend: TrendDirection::Decreasing,
            recent_weekly_avg: 80.0,
            earlier_weekly_avg: 100.0,
            ..TrendReport::default()
        };
        let suggestions = generate_suggestions(&analysis, &decreasing, 100.0);
        let positive = suggestions
            .iter()
            .find(|s| s.kind == SuggestionKind::Positive)
            .expect("expected a positive");
        assert_eq!(positive.priority, Priority::Low);
        assert!(positive.message.contains("$20.00"));

        // Stable trend draws no trend suggestion
        let stable = TrendReport {
            trend: TrendDirection::Stable,
            ..TrendReport::default()
        };
        let suggestions = generate_suggestions(&analysis, &stable, 100.0);
        assert!(!suggestions
            .iter()
            .any(|s| s.kind == SuggestionKind::Alert || s.trend.is_some()));
    }

    #[test]
    fn test_high_frequency_applies_beyond_top_three() {
        // D is tiny by amount (outside top 3) but has 16 transactions
        let mut expenses = vec![
            expense(500.0, "A"),
            expense(400.0, "B"),
            expense(300.0, "C"),
        ];
        for _ in 0..16 {
            expenses.push(expense(0.5, "D"));
        }
        let analysis = analyze_by_category(&expenses);
        let suggestions = generate_suggestions(&analysis, &TrendReport::default(), 1208.0);

        let freq_tip = suggestions
            .iter()
            .find(|s| s.transaction_count.is_some())
            .expect("expected a consolidation tip");
        assert_eq!(freq_tip.category.as_deref(), Some("D"));
        assert_eq!(freq_tip.transaction_count, Some(16));
    }

    #[test]
    fn test_budget_suggestion_exact_amount() {
        let expenses = vec![expense(1000.0, "Food")];
        let analysis = analyze_by_category(&expenses);
        let suggestions = generate_suggestions(&analysis, &TrendReport::default(), 1000.0);

        let budget = suggestions
            .iter()
            .find(|s| s.kind == SuggestionKind::Budget)
            .expect("expected a budget suggestion");
        assert_eq!(budget.suggested_budget, Some(900.0));
        assert_eq!(budget.priority, Priority::Medium);
        assert_eq!(
            suggestions
                .iter()
                .filter(|s| s.kind == SuggestionKind::Budget)
                .count(),
            1
        );
    }

    #[test]
    fn test_sorted_by_priority_high_first() {
        let expenses = vec![expense(350.0, "Food"), expense(650.0, "Rent")];
        let analysis = analyze_by_category(&expenses);
        let trends = TrendReport {
            trend: TrendDirection::Decreasing,
            recent_weekly_avg: 80.0,
            earlier_weekly_avg: 100.0,
            ..TrendReport::default()
        };
        let suggestions = generate_suggestions(&analysis, &trends, 1000.0);

        let ranks: Vec<u8> = suggestions.iter().map(|s| s.priority.rank()).collect();
        let mut sorted = ranks.clone();
        sorted.sort_by(|a, b| b.cmp(a));
        assert_eq!(ranks, sorted);
        // Highest priority entry comes first
        assert_eq!(suggestions[0].priority, Priority::High);
    }

    #[test]
    fn test_zero_total_with_categories_gets_fallback() {
        // Impossible given the amount > 0 invariant, but the guard holds
        let expenses = vec![expense(100.0, "Food")];
        let mut analysis = analyze_by_category(&expenses);
        // Force the no-rule-fires shape
        if let Some(stats) = analysis.get_mut("Food") {
            stats.percentage_of_total = 0.0;
            stats.transaction_count = 1;
        }
        let suggestions = generate_suggestions(&analysis, &TrendReport::default(), 0.0);
        assert_eq!(suggestions.len(), 1);
        assert_eq!(suggestions[0].kind, SuggestionKind::Positive);
    }
}
