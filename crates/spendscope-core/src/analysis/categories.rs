//! Per-category aggregation
//!
//! Single pass over the window's records, grouping by exact category
//! string into a sum/count/min/max accumulator per key.

use std::collections::HashMap;

use crate::models::Expense;

use super::types::{round2, CategoryStats};

/// Running accumulator for one category
struct CategoryAccumulator {
    sum: f64,
    count: usize,
    min: f64,
    max: f64,
}

impl CategoryAccumulator {
    fn new(amount: f64) -> Self {
        Self {
            sum: amount,
            count: 1,
            min: amount,
            max: amount,
        }
    }

    fn add(&mut self, amount: f64) {
        self.sum += amount;
        self.count += 1;
        self.min = self.min.min(amount);
        self.max = self.max.max(amount);
    }
}

/// Group expenses by category and compute per-category statistics
///
/// Categories match case-sensitively. Percentages are computed against the
/// total over all input records, rounded to 2 decimal places, and 0 when
/// that total is 0. The returned map has no defined iteration order;
/// consumers sort explicitly.
pub fn analyze_by_category(expenses: &[Expense]) -> HashMap<String, CategoryStats> {
    let mut accumulators: HashMap<String, CategoryAccumulator> = HashMap::new();
    let mut total = 0.0;

    for expense in expenses {
        total += expense.amount;
        accumulators
            .entry(expense.category.clone())
            .and_modify(|acc| acc.add(expense.amount))
            .or_insert_with(|| CategoryAccumulator::new(expense.amount));
    }

    accumulators
        .into_iter()
        .map(|(category, acc)| {
            let percentage = if total > 0.0 {
                round2(acc.sum / total * 100.0)
            } else {
                0.0
            };
            let stats = CategoryStats {
                category: category.clone(),
                total_spent: round2(acc.sum),
                transaction_count: acc.count,
                average_amount: round2(acc.sum / acc.count as f64),
                min_amount: round2(acc.min),
                max_amount: round2(acc.max),
                percentage_of_total: percentage,
            };
            (category, stats)
        })
        .collect()
}

/// Rank category stats by total spent descending
///
/// Ties break by category name so the order is deterministic.
pub fn rank_categories(analysis: &HashMap<String, CategoryStats>) -> Vec<&CategoryStats> {
    let mut ranked: Vec<&CategoryStats> = analysis.values().collect();
    ranked.sort_by(|a, b| {
        b.total_spent
            .partial_cmp(&a.total_spent)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.category.cmp(&b.category))
    });
    ranked
}
