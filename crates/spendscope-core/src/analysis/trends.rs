//! Weekly and daily spending trends
//!
//! Buckets the window's records by ISO (year, week) and by calendar day,
//! then classifies the weekly direction by comparing the recent average
//! (last 2 weeks) against the earlier average (first 2 weeks, or first 1
//! when fewer than 4 weeks exist) with a 10% band.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};

use crate::models::Expense;

use super::types::{round2, DaySpend, TrendDirection, TrendReport};

/// Format an ISO (year, week) key; zero-padded so string order is
/// chronological
fn week_key(year: i32, week: u32) -> String {
    format!("{:04}-W{:02}", year, week)
}

/// Compute the trend report for a record window
///
/// `window_days` is the length of the loaded window in days and is the
/// fixed denominator for `daily_average`. Empty input returns the default
/// (insufficient data, zeroed) report.
pub fn compute_trends(expenses: &[Expense], window_days: u32) -> TrendReport {
    if expenses.is_empty() || window_days == 0 {
        return TrendReport::default();
    }

    // Weekly bucketing on ISO (year, week); the tuple keys of the BTreeMap
    // order numerically, so iteration is chronological even across a year
    // boundary.
    let mut weekly: BTreeMap<(i32, u32), f64> = BTreeMap::new();
    let mut daily: BTreeMap<NaiveDate, f64> = BTreeMap::new();
    let mut total = 0.0;

    for expense in expenses {
        let date = expense.date.date_naive();
        let iso = date.iso_week();
        *weekly.entry((iso.year(), iso.week())).or_insert(0.0) += expense.amount;
        *daily.entry(date).or_insert(0.0) += expense.amount;
        total += expense.amount;
    }

    let week_totals: Vec<f64> = weekly.values().copied().collect();

    // Classification needs at least 2 distinct weeks
    let (trend, recent_avg, earlier_avg) = if week_totals.len() >= 2 {
        let recent = &week_totals[week_totals.len() - 2..];
        let earlier = if week_totals.len() >= 4 {
            &week_totals[..2]
        } else {
            &week_totals[..1]
        };

        let recent_avg = recent.iter().sum::<f64>() / recent.len() as f64;
        let earlier_avg = earlier.iter().sum::<f64>() / earlier.len() as f64;

        let trend = if recent_avg > earlier_avg * 1.1 {
            TrendDirection::Increasing
        } else if recent_avg < earlier_avg * 0.9 {
            TrendDirection::Decreasing
        } else {
            TrendDirection::Stable
        };

        (trend, recent_avg, earlier_avg)
    } else {
        (TrendDirection::InsufficientData, 0.0, 0.0)
    };

    // Day extremes: ascending date iteration, strict comparisons, so the
    // first day reaching the extreme wins ties.
    let mut highest: Option<DaySpend> = None;
    let mut lowest: Option<DaySpend> = None;
    for (&date, &amount) in &daily {
        if highest.as_ref().map_or(true, |d| amount > d.amount) {
            highest = Some(DaySpend { date, amount });
        }
        if lowest.as_ref().map_or(true, |d| amount < d.amount) {
            lowest = Some(DaySpend { date, amount });
        }
    }

    TrendReport {
        weekly_totals: weekly
            .into_iter()
            .map(|((year, week), amount)| (week_key(year, week), round2(amount)))
            .collect(),
        trend,
        recent_weekly_avg: round2(recent_avg),
        earlier_weekly_avg: round2(earlier_avg),
        daily_average: round2(total / window_days as f64),
        highest_spending_day: highest,
        lowest_spending_day: lowest,
    }
}
