//! Persisted monthly report snapshots

use rusqlite::{params, OptionalExtension, Row};

use super::Database;
use crate::error::{Error, Result};
use crate::models::MonthlyReport;
use crate::reports::ReportSink;

fn report_from_row(row: &Row<'_>) -> rusqlite::Result<MonthlyReport> {
    let breakdown_json: String = row.get(5)?;
    Ok(MonthlyReport {
        user_id: row.get(0)?,
        month: row.get(1)?,
        year: row.get(2)?,
        total_spent: row.get(3)?,
        top_category: row.get(4)?,
        category_breakdown: serde_json::from_str(&breakdown_json).unwrap_or_default(),
        transaction_count: row.get::<_, i64>(6)? as usize,
    })
}

const REPORT_COLUMNS: &str =
    "user_id, month, year, total_spent, top_category, category_breakdown, transaction_count";

impl Database {
    /// Fetch one saved report
    pub fn get_report(&self, user_id: &str, month: u32, year: i32) -> Result<MonthlyReport> {
        let conn = self.conn()?;
        conn.query_row(
            &format!(
                "SELECT {} FROM monthly_reports WHERE user_id = ? AND month = ? AND year = ?",
                REPORT_COLUMNS
            ),
            params![user_id, month, year],
            report_from_row,
        )
        .optional()?
        .ok_or_else(|| Error::NotFound(format!("report for {}/{}", month, year)))
    }

    /// List a user's saved reports, most recent month first
    pub fn list_reports(&self, user_id: &str, limit: i64) -> Result<Vec<MonthlyReport>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM monthly_reports WHERE user_id = ? ORDER BY year DESC, month DESC LIMIT ?",
            REPORT_COLUMNS
        ))?;

        let rows = stmt.query_map(params![user_id, limit], report_from_row)?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }
}

impl ReportSink for Database {
    /// Upsert a report snapshot keyed by (user_id, month, year)
    fn upsert_report(&self, report: &MonthlyReport) -> Result<()> {
        let conn = self.conn()?;
        let breakdown_json = serde_json::to_string(&report.category_breakdown)?;

        conn.execute(
            r#"
            INSERT INTO monthly_reports
                (user_id, month, year, total_spent, top_category, category_breakdown, transaction_count)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT (user_id, month, year) DO UPDATE SET
                total_spent = excluded.total_spent,
                top_category = excluded.top_category,
                category_breakdown = excluded.category_breakdown,
                transaction_count = excluded.transaction_count,
                created_at = CURRENT_TIMESTAMP
            "#,
            params![
                report.user_id,
                report.month,
                report.year,
                report.total_spent,
                report.top_category,
                breakdown_json,
                report.transaction_count as i64,
            ],
        )?;

        Ok(())
    }
}
