//! Expense command implementations (add, import, list)

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use spendscope_core::{import_expenses_from_path, Database, NewExpense};
use tracing::debug;

use super::truncate;

pub fn cmd_add(
    db: &Database,
    user: &str,
    amount: f64,
    category: &str,
    description: &str,
    date: Option<DateTime<Utc>>,
) -> Result<()> {
    let expense = NewExpense {
        user_id: user.to_string(),
        amount,
        category: category.to_string(),
        description: description.to_string(),
        date: date.unwrap_or_else(Utc::now),
    };

    let id = db
        .insert_expense(&expense)
        .context("Failed to add expense")?;

    println!(
        "Added expense #{}: ${:.2} on {} ({})",
        id,
        amount,
        expense.date.format("%Y-%m-%d"),
        category
    );

    Ok(())
}

pub fn cmd_import(db: &Database, user: &str, file: &Path) -> Result<()> {
    debug!(user, file = %file.display(), "Starting CSV import");
    println!("Importing {} for {}...", file.display(), user);

    let outcome = import_expenses_from_path(db, user, file)
        .with_context(|| format!("Failed to import {}", file.display()))?;

    println!(
        "Imported {} expenses ({} duplicates skipped, {} invalid rows skipped)",
        outcome.imported, outcome.skipped_duplicates, outcome.skipped_invalid
    );

    Ok(())
}

pub fn cmd_categories(db: &Database, user: &str) -> Result<()> {
    let categories = db.list_categories(user)?;

    if categories.is_empty() {
        println!("No categories found for {}.", user);
        return Ok(());
    }

    for category in &categories {
        println!("{}", category);
    }

    Ok(())
}

pub fn cmd_list(db: &Database, user: &str, limit: i64) -> Result<()> {
    let expenses = db.list_expenses(user, limit, 0)?;
    let total = db.count_expenses(user)?;

    if expenses.is_empty() {
        println!("No expenses found for {}.", user);
        return Ok(());
    }

    println!(
        "{:<6} {:<12} {:>10}  {:<16} {}",
        "ID", "DATE", "AMOUNT", "CATEGORY", "DESCRIPTION"
    );
    for expense in &expenses {
        println!(
            "{:<6} {:<12} {:>10.2}  {:<16} {}",
            expense.id,
            expense.date.format("%Y-%m-%d"),
            expense.amount,
            truncate(&expense.category, 16),
            truncate(&expense.description, 40)
        );
    }
    println!();
    println!("Showing {} of {} expenses", expenses.len(), total);

    Ok(())
}
