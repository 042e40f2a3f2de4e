//! Monthly report command implementations

use anyhow::{Context, Result};
use chrono::Utc;
use spendscope_core::{
    generate_monthly_report, generate_reports_for_all, previous_month, Database,
};
use tracing::debug;

/// Resolve optional month/year arguments, defaulting to last month
fn resolve_month(month: Option<u32>, year: Option<i32>) -> (u32, i32) {
    let (default_month, default_year) = previous_month(Utc::now().date_naive());
    (month.unwrap_or(default_month), year.unwrap_or(default_year))
}

pub fn cmd_report_generate(
    db: &Database,
    user: &str,
    month: Option<u32>,
    year: Option<i32>,
) -> Result<()> {
    let (month, year) = resolve_month(month, year);

    let report = generate_monthly_report(db, db, user, month, year)
        .with_context(|| format!("Failed to generate report for {}/{}", month, year))?;

    println!("Report for {} {}/{}:", user, month, year);
    println!(
        "  Total ${:.2} across {} transactions",
        report.total_spent, report.transaction_count
    );
    match &report.top_category {
        Some(top) => println!("  Top category: {}", top),
        None => println!("  No expenses in this month."),
    }
    for (category, amount) in &report.category_breakdown {
        println!("    {:<20} ${:.2}", category, amount);
    }

    Ok(())
}

pub fn cmd_report_all(db: &Database, month: Option<u32>, year: Option<i32>) -> Result<()> {
    let (month, year) = resolve_month(month, year);
    debug!(month, year, "Running batch report generation");

    let outcome =
        generate_reports_for_all(db, month, year).context("Batch report generation failed")?;

    println!(
        "Generated {}/{} reports for {}/{} ({} failed)",
        outcome.succeeded, outcome.total, month, year, outcome.failed
    );

    Ok(())
}

pub fn cmd_report_list(db: &Database, user: &str, limit: i64) -> Result<()> {
    let reports = db.list_reports(user, limit)?;

    if reports.is_empty() {
        println!("No saved reports for {}.", user);
        return Ok(());
    }

    println!(
        "{:<9} {:>12} {:>7}  {}",
        "MONTH", "TOTAL", "COUNT", "TOP CATEGORY"
    );
    for report in &reports {
        println!(
            "{:>4}-{:02} {:>12.2} {:>7}  {}",
            report.year,
            report.month,
            report.total_spent,
            report.transaction_count,
            report.top_category.as_deref().unwrap_or("-")
        );
    }

    Ok(())
}
