//! Analytics command implementations (analyze, trends, summary, category)

use anyhow::{Context, Result};
use spendscope_core::{
    rank_categories, Database, ExpenseAnalyzer, RecentSelection, TrendReport,
};

use super::truncate;

pub fn cmd_analyze(db: &Database, user: &str, json: bool) -> Result<()> {
    let analyzer = ExpenseAnalyzer::new(db);
    let result = analyzer
        .comprehensive_analysis(user)
        .context("Analysis failed")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    println!("Expense analysis for {} (last {})", user, result.period);
    println!(
        "  Total: ${:.2} across {} expenses (${:.2}/day)",
        result.total_expenses, result.expense_count, result.average_daily_spending
    );
    if let Some(top) = &result.top_category {
        println!("  Top category: {}", top);
    }

    if !result.category_analysis.is_empty() {
        println!();
        println!(
            "{:<20} {:>10} {:>7} {:>9} {:>8}",
            "CATEGORY", "TOTAL", "COUNT", "AVG", "SHARE"
        );
        for stats in rank_categories(&result.category_analysis) {
            println!(
                "{:<20} {:>10.2} {:>7} {:>9.2} {:>7.1}%",
                truncate(&stats.category, 20),
                stats.total_spent,
                stats.transaction_count,
                stats.average_amount,
                stats.percentage_of_total
            );
        }
    }

    print_trends(&result.trends);

    if !result.suggestions.is_empty() {
        println!();
        println!("Suggestions:");
        for suggestion in &result.suggestions {
            println!(
                "  [{:<6}] ({}) {}",
                suggestion.kind, suggestion.priority, suggestion.message
            );
        }
    }

    Ok(())
}

pub fn cmd_trends(db: &Database, user: &str, days: u32, json: bool) -> Result<()> {
    let analyzer = ExpenseAnalyzer::new(db);
    let trends = analyzer
        .trends_only(user, days)
        .context("Trend analysis failed")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&trends)?);
        return Ok(());
    }

    if trends.weekly_totals.is_empty() {
        println!("No expense data found for the last {} days.", days);
        return Ok(());
    }

    println!("Spending trends for {} (last {} days)", user, days);
    print_trends(&trends);

    Ok(())
}

fn print_trends(trends: &TrendReport) {
    if trends.weekly_totals.is_empty() {
        return;
    }

    println!();
    println!("Weekly totals:");
    for (week, amount) in &trends.weekly_totals {
        println!("  {}  ${:.2}", week, amount);
    }
    println!(
        "Trend: {} (recent ${:.2}/week vs earlier ${:.2}/week, ${:.2}/day)",
        trends.trend, trends.recent_weekly_avg, trends.earlier_weekly_avg, trends.daily_average
    );
    if let Some(day) = &trends.highest_spending_day {
        println!("Highest day: {} (${:.2})", day.date, day.amount);
    }
    if let Some(day) = &trends.lowest_spending_day {
        println!("Lowest day:  {} (${:.2})", day.date, day.amount);
    }
}

pub fn cmd_summary(db: &Database, user: &str, json: bool) -> Result<()> {
    let analyzer = ExpenseAnalyzer::new(db);
    let summary = analyzer.period_summary(user).context("Summary failed")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    println!("Spending summary for {}", user);
    println!(
        "{:<14} {:>10} {:>7} {:>9}  {}",
        "PERIOD", "TOTAL", "COUNT", "AVG", "TOP CATEGORY"
    );
    for (period, entry) in &summary {
        let top = match (&entry.top_category, entry.top_category_amount) {
            (Some(category), amount) => format!("{} (${:.2})", category, amount),
            (None, _) => "-".to_string(),
        };
        println!(
            "{:<14} {:>10.2} {:>7} {:>9.2}  {}",
            period, entry.total_spent, entry.transaction_count, entry.average_transaction, top
        );
    }

    Ok(())
}

pub fn cmd_category(
    db: &Database,
    user: &str,
    category: &str,
    newest: bool,
    json: bool,
) -> Result<()> {
    let selection = if newest {
        RecentSelection::NewestFirst
    } else {
        RecentSelection::TailCompat
    };

    let analyzer = ExpenseAnalyzer::new(db);
    let insight = analyzer
        .category_insight(user, category, selection)
        .context("Category insight failed")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&insight)?);
        return Ok(());
    }

    if let Some(message) = &insight.message {
        println!("{}", message);
        return Ok(());
    }

    println!("{} over the last 30 days:", insight.category);
    println!(
        "  Total ${:.2} across {} transactions (avg ${:.2}, ${:.2}/day)",
        insight.total_spent,
        insight.transaction_count,
        insight.average_transaction,
        insight.daily_average
    );
    println!(
        "  Largest ${:.2}, smallest ${:.2}",
        insight.highest_expense, insight.lowest_expense
    );

    if !insight.recent_transactions.is_empty() {
        println!();
        println!("Recent transactions:");
        for expense in &insight.recent_transactions {
            println!(
                "  {}  ${:>8.2}  {}",
                expense.date.format("%Y-%m-%d"),
                expense.amount,
                truncate(&expense.description, 40)
            );
        }
    }

    Ok(())
}
