//! Expense CSV import
//!
//! Reads `date,amount,category,description` rows for one user. Each row is
//! validated (amount > 0, non-empty category); invalid rows are counted
//! and logged rather than failing the file. Rows are deduplicated by a
//! content hash so re-importing the same file is a no-op.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;
use sha2::{Digest, Sha256};
use tracing::{info, warn};

use crate::db::Database;
use crate::error::Result;
use crate::models::NewExpense;

/// Counts for one import run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportOutcome {
    pub imported: usize,
    pub skipped_duplicates: usize,
    pub skipped_invalid: usize,
}

#[derive(Debug, Deserialize)]
struct CsvRow {
    date: String,
    amount: f64,
    category: String,
    #[serde(default)]
    description: String,
}

/// Parse a row date: plain `YYYY-MM-DD` (midnight UTC) or RFC 3339
fn parse_row_date(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0).map(|dt| dt.and_utc());
    }
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Content hash used for dedup: stable across re-imports of the same row
fn import_hash(user_id: &str, expense: &NewExpense) -> String {
    let mut hasher = Sha256::new();
    hasher.update(user_id.as_bytes());
    hasher.update(b"|");
    hasher.update(expense.date.to_rfc3339().as_bytes());
    hasher.update(b"|");
    hasher.update(format!("{:.2}", expense.amount).as_bytes());
    hasher.update(b"|");
    hasher.update(expense.category.as_bytes());
    hasher.update(b"|");
    hasher.update(expense.description.as_bytes());
    hex::encode(hasher.finalize())
}

/// Import expenses for one user from CSV data
pub fn import_expenses<R: Read>(db: &Database, user_id: &str, reader: R) -> Result<ImportOutcome> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let mut outcome = ImportOutcome::default();

    for (index, row) in csv_reader.deserialize::<CsvRow>().enumerate() {
        let line = index + 2; // header is line 1
        let row = match row {
            Ok(row) => row,
            Err(e) => {
                warn!(line, error = %e, "Skipping unparseable row");
                outcome.skipped_invalid += 1;
                continue;
            }
        };

        let Some(date) = parse_row_date(row.date.trim()) else {
            warn!(line, date = %row.date, "Skipping row with invalid date");
            outcome.skipped_invalid += 1;
            continue;
        };

        let expense = NewExpense {
            user_id: user_id.to_string(),
            amount: row.amount,
            category: row.category.trim().to_string(),
            description: row.description.trim().to_string(),
            date,
        };

        if let Err(reason) = expense.validate() {
            warn!(line, %reason, "Skipping invalid row");
            outcome.skipped_invalid += 1;
            continue;
        }

        let hash = import_hash(user_id, &expense);
        match db.insert_expense_dedup(&expense, &hash)? {
            Some(_) => outcome.imported += 1,
            None => outcome.skipped_duplicates += 1,
        }
    }

    info!(
        user_id,
        imported = outcome.imported,
        duplicates = outcome.skipped_duplicates,
        invalid = outcome.skipped_invalid,
        "Import complete"
    );

    Ok(outcome)
}

/// Import expenses for one user from a CSV file
pub fn import_expenses_from_path(
    db: &Database,
    user_id: &str,
    path: &Path,
) -> Result<ImportOutcome> {
    let file = File::open(path)?;
    import_expenses(db, user_id, file)
}
