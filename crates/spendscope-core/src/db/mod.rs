//! Database access layer with connection pooling and migrations
//!
//! This module is organized by domain:
//! - `expenses` - Expense CRUD and the window loader the engine consumes
//! - `reports` - Persisted monthly report snapshots

use chrono::{DateTime, Utc};
use r2d2::{Pool, PooledConnection};
use r2d2_sqlite::SqliteConnectionManager;
use tracing::info;

use crate::error::Result;

mod expenses;
mod reports;

pub type DbPool = Pool<SqliteConnectionManager>;
pub type DbConn = PooledConnection<SqliteConnectionManager>;

/// Parse a SQLite datetime string into a DateTime<Utc>
///
/// SQLite stores timestamps as "YYYY-MM-DD HH:MM:SS".
pub(crate) fn parse_datetime(s: &str) -> DateTime<Utc> {
    chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S")
        .map(|dt| dt.and_utc())
        .unwrap_or_else(|_| Utc::now())
}

/// Format a DateTime<Utc> the way the schema stores it
pub(crate) fn format_datetime(dt: DateTime<Utc>) -> String {
    dt.format("%Y-%m-%d %H:%M:%S").to_string()
}

/// Database wrapper with connection pooling
#[derive(Clone)]
pub struct Database {
    pool: DbPool,
    /// Path to the database file
    db_path: String,
}

impl Database {
    /// Create a new database connection pool and run migrations
    pub fn new(path: &str) -> Result<Self> {
        let manager = SqliteConnectionManager::file(path);
        let pool = Pool::builder().max_size(10).build(manager)?;

        let db = Self {
            pool,
            db_path: path.to_string(),
        };
        db.run_migrations()?;

        Ok(db)
    }

    /// Get the path to the database file
    pub fn path(&self) -> &str {
        &self.db_path
    }

    /// Create a throwaway database (for testing)
    ///
    /// Uses a unique temporary file rather than `:memory:` so every pooled
    /// connection sees the same database.
    pub fn in_memory() -> Result<Self> {
        use std::sync::atomic::{AtomicU64, Ordering};
        static COUNTER: AtomicU64 = AtomicU64::new(0);

        let id = COUNTER.fetch_add(1, Ordering::SeqCst);
        let path = format!(
            "{}/spendscope_test_{}_{}.db",
            std::env::temp_dir().display(),
            std::process::id(),
            id
        );

        let _ = std::fs::remove_file(&path);

        Self::new(&path)
    }

    /// Get a connection from the pool
    pub fn conn(&self) -> Result<DbConn> {
        Ok(self.pool.get()?)
    }

    /// Clear all expense and report data (configuration-free schema, so
    /// this empties every table)
    pub fn reset(&self) -> Result<()> {
        let conn = self.conn()?;
        conn.execute_batch(
            r#"
            DELETE FROM monthly_reports;
            DELETE FROM expenses;
            "#,
        )?;
        info!("Database reset complete");
        Ok(())
    }

    /// Run database migrations
    fn run_migrations(&self) -> Result<()> {
        let conn = self.conn()?;

        conn.execute_batch(
            r#"
            -- Enable foreign keys
            PRAGMA foreign_keys = ON;

            -- WAL mode: better concurrency, readers don't block writers
            PRAGMA journal_mode = WAL;

            -- Cache size: ~8MB (2000 pages * 4KB default page size)
            PRAGMA cache_size = 2000;

            -- Synchronous NORMAL: good balance of safety and performance
            PRAGMA synchronous = NORMAL;

            -- Store temp tables in memory
            PRAGMA temp_store = MEMORY;

            -- Expenses (one row per transaction)
            CREATE TABLE IF NOT EXISTS expenses (
                id INTEGER PRIMARY KEY,
                user_id TEXT NOT NULL,
                amount REAL NOT NULL CHECK (amount > 0),
                category TEXT NOT NULL,
                description TEXT NOT NULL DEFAULT '',
                date DATETIME NOT NULL,
                import_hash TEXT UNIQUE,
                created_at DATETIME DEFAULT CURRENT_TIMESTAMP,
                updated_at DATETIME DEFAULT CURRENT_TIMESTAMP
            );

            CREATE INDEX IF NOT EXISTS idx_expenses_user_date
                ON expenses(user_id, date);
            CREATE INDEX IF NOT EXISTS idx_expenses_user_category
                ON expenses(user_id, category);

            -- Monthly report snapshots, one per (user, month, year)
            CREATE TABLE IF NOT EXISTS monthly_reports (
                id INTEGER PRIMARY KEY,
                user_id TEXT NOT NULL,
                month INTEGER NOT NULL,
                year INTEGER NOT NULL,
                total_spent REAL NOT NULL,
                top_category TEXT,
                category_breakdown TEXT NOT NULL DEFAULT '{}',
                transaction_count INTEGER NOT NULL DEFAULT 0,
                created_at DATETIME DEFAULT CURRENT_TIMESTAMP,
                UNIQUE(user_id, month, year)
            );

            CREATE INDEX IF NOT EXISTS idx_reports_user
                ON monthly_reports(user_id, year, month);
            "#,
        )?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_migrations_are_idempotent() {
        let db = Database::in_memory().unwrap();
        // Re-running migrations on an initialized database must not fail
        db.run_migrations().unwrap();
    }

    #[test]
    fn test_reset_clears_expenses() {
        let db = Database::in_memory().unwrap();
        let expense = crate::models::NewExpense {
            user_id: "u1".to_string(),
            amount: 10.0,
            category: "Food".to_string(),
            description: String::new(),
            date: Utc::now(),
        };
        db.insert_expense(&expense).unwrap();
        assert_eq!(db.count_expenses("u1").unwrap(), 1);

        db.reset().unwrap();
        assert_eq!(db.count_expenses("u1").unwrap(), 0);
    }

    #[test]
    fn test_parse_datetime_round_trip() {
        let dt = parse_datetime("2026-07-15 08:30:00");
        assert_eq!(format_datetime(dt), "2026-07-15 08:30:00");
    }
}
