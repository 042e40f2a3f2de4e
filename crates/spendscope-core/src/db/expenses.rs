//! Expense operations

use chrono::{DateTime, Utc};
use rusqlite::{params, OptionalExtension, Row};

use super::{format_datetime, parse_datetime, Database};
use crate::analysis::ExpenseSource;
use crate::error::{Error, Result};
use crate::models::{Expense, NewExpense};

fn expense_from_row(row: &Row<'_>) -> rusqlite::Result<Expense> {
    Ok(Expense {
        id: row.get(0)?,
        user_id: row.get(1)?,
        amount: row.get(2)?,
        category: row.get(3)?,
        description: row.get(4)?,
        date: parse_datetime(&row.get::<_, String>(5)?),
        created_at: parse_datetime(&row.get::<_, String>(6)?),
        updated_at: parse_datetime(&row.get::<_, String>(7)?),
    })
}

const EXPENSE_COLUMNS: &str =
    "id, user_id, amount, category, description, date, created_at, updated_at";

impl Database {
    /// Insert an expense, returning the new row id
    pub fn insert_expense(&self, expense: &NewExpense) -> Result<i64> {
        expense.validate().map_err(Error::InvalidData)?;

        let conn = self.conn()?;
        conn.execute(
            r#"
            INSERT INTO expenses (user_id, amount, category, description, date)
            VALUES (?, ?, ?, ?, ?)
            "#,
            params![
                expense.user_id,
                expense.amount,
                expense.category,
                expense.description,
                format_datetime(expense.date),
            ],
        )?;

        Ok(conn.last_insert_rowid())
    }

    /// Insert an expense with an import hash, skipping duplicates
    ///
    /// Returns the new row id, or None when a row with the same hash
    /// already exists.
    pub fn insert_expense_dedup(
        &self,
        expense: &NewExpense,
        import_hash: &str,
    ) -> Result<Option<i64>> {
        expense.validate().map_err(Error::InvalidData)?;

        let conn = self.conn()?;
        let existing: Option<i64> = conn
            .query_row(
                "SELECT id FROM expenses WHERE import_hash = ?",
                params![import_hash],
                |row| row.get(0),
            )
            .optional()?;

        if existing.is_some() {
            return Ok(None);
        }

        conn.execute(
            r#"
            INSERT INTO expenses (user_id, amount, category, description, date, import_hash)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
            params![
                expense.user_id,
                expense.amount,
                expense.category,
                expense.description,
                format_datetime(expense.date),
                import_hash,
            ],
        )?;

        Ok(Some(conn.last_insert_rowid()))
    }

    /// Fetch one expense scoped to a user
    pub fn get_expense(&self, id: i64, user_id: &str) -> Result<Expense> {
        let conn = self.conn()?;
        conn.query_row(
            &format!(
                "SELECT {} FROM expenses WHERE id = ? AND user_id = ?",
                EXPENSE_COLUMNS
            ),
            params![id, user_id],
            expense_from_row,
        )
        .optional()?
        .ok_or_else(|| Error::NotFound(format!("expense {}", id)))
    }

    /// Update an expense's mutable fields, scoped to a user
    pub fn update_expense(
        &self,
        id: i64,
        user_id: &str,
        amount: Option<f64>,
        category: Option<&str>,
        description: Option<&str>,
        date: Option<DateTime<Utc>>,
    ) -> Result<()> {
        if let Some(a) = amount {
            if !(a > 0.0) || !a.is_finite() {
                return Err(Error::InvalidData(
                    "Amount must be greater than 0".to_string(),
                ));
            }
        }
        if let Some(c) = category {
            if c.trim().is_empty() {
                return Err(Error::InvalidData(
                    "Category must be a non-empty string".to_string(),
                ));
            }
        }

        let conn = self.conn()?;
        let updated = conn.execute(
            r#"
            UPDATE expenses SET
                amount = COALESCE(?, amount),
                category = COALESCE(?, category),
                description = COALESCE(?, description),
                date = COALESCE(?, date),
                updated_at = CURRENT_TIMESTAMP
            WHERE id = ? AND user_id = ?
            "#,
            params![
                amount,
                category,
                description,
                date.map(format_datetime),
                id,
                user_id,
            ],
        )?;

        if updated == 0 {
            return Err(Error::NotFound(format!("expense {}", id)));
        }
        Ok(())
    }

    /// Delete an expense, scoped to a user
    pub fn delete_expense(&self, id: i64, user_id: &str) -> Result<()> {
        let conn = self.conn()?;
        let deleted = conn.execute(
            "DELETE FROM expenses WHERE id = ? AND user_id = ?",
            params![id, user_id],
        )?;

        if deleted == 0 {
            return Err(Error::NotFound(format!("expense {}", id)));
        }
        Ok(())
    }

    /// List a user's expenses, newest first
    pub fn list_expenses(&self, user_id: &str, limit: i64, offset: i64) -> Result<Vec<Expense>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM expenses WHERE user_id = ? ORDER BY date DESC, id DESC LIMIT ? OFFSET ?",
            EXPENSE_COLUMNS
        ))?;

        let rows = stmt.query_map(params![user_id, limit, offset], expense_from_row)?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    /// Count a user's expenses
    pub fn count_expenses(&self, user_id: &str) -> Result<i64> {
        let conn = self.conn()?;
        Ok(conn.query_row(
            "SELECT COUNT(*) FROM expenses WHERE user_id = ?",
            params![user_id],
            |row| row.get(0),
        )?)
    }

    /// Distinct category labels a user has spent in, sorted
    pub fn list_categories(&self, user_id: &str) -> Result<Vec<String>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT DISTINCT category FROM expenses WHERE user_id = ? ORDER BY category",
        )?;
        let rows = stmt.query_map(params![user_id], |row| row.get(0))?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    /// Distinct user ids with at least one expense (for the batch report job)
    pub fn list_user_ids(&self) -> Result<Vec<String>> {
        let conn = self.conn()?;
        let mut stmt =
            conn.prepare("SELECT DISTINCT user_id FROM expenses ORDER BY user_id")?;
        let rows = stmt.query_map([], |row| row.get(0))?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }
}

impl ExpenseSource for Database {
    /// Window loader consumed by the analytics engine
    ///
    /// Returns expenses sorted by date descending. The window is
    /// [start, end); either bound may be open. An empty result is valid.
    fn load_expenses(
        &self,
        user_id: &str,
        start: Option<DateTime<Utc>>,
        end: Option<DateTime<Utc>>,
        category: Option<&str>,
    ) -> Result<Vec<Expense>> {
        let conn = self.conn()?;

        let mut sql = format!(
            "SELECT {} FROM expenses WHERE user_id = ?",
            EXPENSE_COLUMNS
        );
        let mut bindings: Vec<Box<dyn rusqlite::ToSql>> =
            vec![Box::new(user_id.to_string())];

        if let Some(start) = start {
            sql.push_str(" AND date >= ?");
            bindings.push(Box::new(format_datetime(start)));
        }
        if let Some(end) = end {
            sql.push_str(" AND date < ?");
            bindings.push(Box::new(format_datetime(end)));
        }
        if let Some(category) = category {
            sql.push_str(" AND category = ?");
            bindings.push(Box::new(category.to_string()));
        }

        sql.push_str(" ORDER BY date DESC, id DESC");

        let mut stmt = conn.prepare(&sql)?;
        let binding_refs: Vec<&dyn rusqlite::ToSql> =
            bindings.iter().map(|b| b.as_ref()).collect();
        let rows = stmt.query_map(binding_refs.as_slice(), expense_from_row)?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }
}
