//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `core` - Init command and shared utilities (open_db, date parsing)
//! - `expenses` - Expense commands (add, import, list)
//! - `analysis` - Analytics commands (analyze, trends, summary, category)
//! - `reports` - Monthly report commands (generate, all, list)

pub mod analysis;
pub mod core;
pub mod expenses;
pub mod reports;

// Re-export command functions for main.rs
pub use analysis::*;
pub use core::*;
pub use expenses::*;
pub use reports::*;

/// Truncate a string to a maximum byte length, adding "..." if truncated
///
/// Cuts at a char boundary so multibyte text never splits mid-character.
pub fn truncate(s: &str, max: usize) -> String {
    if s.len() <= max {
        return s.to_string();
    }
    let budget = max.saturating_sub(3);
    let cut = s
        .char_indices()
        .map(|(i, _)| i)
        .take_while(|&i| i <= budget)
        .last()
        .unwrap_or(0);
    format!("{}...", &s[..cut])
}
