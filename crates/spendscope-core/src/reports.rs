//! Monthly report generation
//!
//! Aggregates one calendar month of a user's expenses into a snapshot
//! (total, top category, per-category breakdown, count) and hands it to a
//! persistence collaborator with (user_id, month, year) upsert semantics.
//! The batch entry point runs every known user and never aborts on a
//! single user's failure.

use std::collections::BTreeMap;

use chrono::{DateTime, Datelike, TimeZone, Utc};
use tracing::{info, warn};

use crate::analysis::types::round2;
use crate::db::Database;
use crate::error::{Error, Result};
use crate::models::MonthlyReport;

use crate::analysis::ExpenseSource;

/// Earliest year a report may target
const MIN_REPORT_YEAR: i32 = 2020;

/// Persistence collaborator for report snapshots
pub trait ReportSink {
    /// Persist a snapshot, overwriting any existing one for the same
    /// (user_id, month, year)
    fn upsert_report(&self, report: &MonthlyReport) -> Result<()>;
}

/// Outcome of a batch report run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchReportOutcome {
    pub succeeded: usize,
    pub failed: usize,
    pub total: usize,
}

/// The calendar month window [first day, first day of next month)
fn month_window(month: u32, year: i32) -> Result<(DateTime<Utc>, DateTime<Utc>)> {
    let start = Utc
        .with_ymd_and_hms(year, month, 1, 0, 0, 0)
        .single()
        .ok_or_else(|| Error::InvalidData(format!("Invalid month: {}/{}", month, year)))?;
    let end = if month == 12 {
        Utc.with_ymd_and_hms(year + 1, 1, 1, 0, 0, 0)
    } else {
        Utc.with_ymd_and_hms(year, month + 1, 1, 0, 0, 0)
    }
    .single()
    .ok_or_else(|| Error::InvalidData(format!("Invalid month: {}/{}", month, year)))?;

    Ok((start, end))
}

/// The (month, year) immediately before the given date
pub fn previous_month(today: chrono::NaiveDate) -> (u32, i32) {
    if today.month() == 1 {
        (12, today.year() - 1)
    } else {
        (today.month() - 1, today.year())
    }
}

/// Generate and persist one user's monthly report
///
/// Month and year are validated up front (InvalidData) and never retried;
/// an empty month produces a zeroed snapshot, not an error.
pub fn generate_monthly_report<S, K>(
    source: &S,
    sink: &K,
    user_id: &str,
    month: u32,
    year: i32,
) -> Result<MonthlyReport>
where
    S: ExpenseSource,
    K: ReportSink,
{
    if !(1..=12).contains(&month) {
        return Err(Error::InvalidData("Month must be between 1 and 12".to_string()));
    }
    let current_year = Utc::now().year();
    if year < MIN_REPORT_YEAR || year > current_year {
        return Err(Error::InvalidData(format!(
            "Year must be between {} and {}",
            MIN_REPORT_YEAR, current_year
        )));
    }

    let (start, end) = month_window(month, year)?;
    let expenses = source.load_expenses(user_id, Some(start), Some(end), None)?;

    let total: f64 = expenses.iter().map(|e| e.amount).sum();
    let mut breakdown: BTreeMap<String, f64> = BTreeMap::new();
    for expense in &expenses {
        *breakdown.entry(expense.category.clone()).or_insert(0.0) += expense.amount;
    }
    for amount in breakdown.values_mut() {
        *amount = round2(*amount);
    }

    // Strict comparison: ties resolve to the first (alphabetically lowest)
    // category
    let mut top: Option<(&String, f64)> = None;
    for (category, &amount) in &breakdown {
        if top.map_or(true, |(_, best)| amount > best) {
            top = Some((category, amount));
        }
    }
    let top_category = top.map(|(category, _)| category.clone());

    let report = MonthlyReport {
        user_id: user_id.to_string(),
        month,
        year,
        total_spent: round2(total),
        top_category,
        category_breakdown: breakdown,
        transaction_count: expenses.len(),
    };

    sink.upsert_report(&report)?;
    info!(user_id, month, year, total = report.total_spent, "Monthly report saved");

    Ok(report)
}

/// Generate reports for every known user for one month
///
/// Failure for one user is logged and counted; remaining users still run.
pub fn generate_reports_for_all(db: &Database, month: u32, year: i32) -> Result<BatchReportOutcome> {
    let user_ids = db.list_user_ids()?;
    let total = user_ids.len();

    info!(users = total, month, year, "Generating monthly reports");

    let mut succeeded = 0;
    let mut failed = 0;
    for user_id in &user_ids {
        match generate_monthly_report(db, db, user_id, month, year) {
            Ok(_) => succeeded += 1,
            Err(e) => {
                failed += 1;
                warn!(user_id = %user_id, error = %e, "Report generation failed");
            }
        }
    }

    info!(succeeded, total, "Monthly report batch complete");

    Ok(BatchReportOutcome {
        succeeded,
        failed,
        total,
    })
}
