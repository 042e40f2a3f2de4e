//! Domain models for spendscope

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single expense transaction
///
/// `date` is the business date of the transaction, not the row's creation
/// time. `amount` is always positive; refunds are not modeled.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Expense {
    pub id: i64,
    pub user_id: String,
    pub amount: f64,
    pub category: String,
    pub description: String,
    pub date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Insert shape for an expense (no id, timestamps set by the database)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewExpense {
    pub user_id: String,
    pub amount: f64,
    pub category: String,
    pub description: String,
    pub date: DateTime<Utc>,
}

impl NewExpense {
    /// Validate the invariants the analytics engine relies on
    pub fn validate(&self) -> std::result::Result<(), String> {
        if !(self.amount > 0.0) || !self.amount.is_finite() {
            return Err("Amount must be greater than 0".to_string());
        }
        if self.category.trim().is_empty() {
            return Err("Category must be a non-empty string".to_string());
        }
        if self.user_id.trim().is_empty() {
            return Err("User id must be a non-empty string".to_string());
        }
        Ok(())
    }
}

/// A persisted monthly report snapshot
///
/// Keyed uniquely by (user_id, month, year); regenerating a report for the
/// same month overwrites the previous snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonthlyReport {
    pub user_id: String,
    /// Calendar month, 1-12
    pub month: u32,
    pub year: i32,
    pub total_spent: f64,
    pub top_category: Option<String>,
    pub category_breakdown: BTreeMap<String, f64>,
    pub transaction_count: usize,
}
