//! End-to-end tests: storage layer -> analytics engine -> reports

use chrono::{DateTime, Duration, TimeZone, Utc};

use spendscope_core::{
    generate_reports_for_all, import_expenses, Database, ExpenseAnalyzer, NewExpense, Priority,
    RecentSelection, SuggestionKind, TrendDirection,
};

fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 7, 31, 12, 0, 0).unwrap()
}

fn seed(db: &Database, user: &str, days_ago: i64, amount: f64, category: &str) {
    db.insert_expense(&NewExpense {
        user_id: user.to_string(),
        amount,
        category: category.to_string(),
        description: format!("{} purchase", category),
        date: fixed_now() - Duration::days(days_ago),
    })
    .unwrap();
}

#[test]
fn comprehensive_analysis_over_sqlite() {
    let db = Database::in_memory().unwrap();

    // Five weeks of Food spending, most recent two weeks doubled
    for (week, amount) in [(4, 100.0), (3, 100.0), (2, 100.0), (1, 200.0), (0, 200.0)] {
        seed(&db, "u1", week * 7, amount, "Food");
    }
    seed(&db, "u1", 2, 650.0, "Rent");
    // Outside every window
    seed(&db, "u1", 200, 5000.0, "Travel");

    let analyzer = ExpenseAnalyzer::at(&db, fixed_now());
    let result = analyzer.comprehensive_analysis("u1").unwrap();

    assert_eq!(result.expense_count, 6);
    assert_eq!(result.total_expenses, 1350.0);
    assert_eq!(result.top_category.as_deref(), Some("Food"));

    // Percentages over all categories sum to ~100
    let percent_sum: f64 = result
        .category_analysis
        .values()
        .map(|s| s.percentage_of_total)
        .sum();
    assert!((percent_sum - 100.0).abs() < 0.1);

    // Per-category totals match the seeded records
    assert_eq!(result.category_analysis["Rent"].total_spent, 650.0);
    assert_eq!(result.category_analysis["Food"].total_spent, 700.0);

    // Suggestions come back highest priority first and include the budget
    assert_eq!(result.suggestions[0].priority, Priority::High);
    assert!(result
        .suggestions
        .iter()
        .any(|s| s.kind == SuggestionKind::Budget && s.suggested_budget == Some(1215.0)));
}

#[test]
fn trend_classification_over_sqlite() {
    let db = Database::in_memory().unwrap();

    // Weekly totals [100, 100, 100, 200, 200] oldest to newest, seeded on
    // consecutive Mondays so each lands in its own ISO week
    let monday = Utc.with_ymd_and_hms(2026, 6, 1, 12, 0, 0).unwrap();
    for (week, amount) in [(0, 100.0), (1, 100.0), (2, 100.0), (3, 200.0), (4, 200.0)] {
        db.insert_expense(&NewExpense {
            user_id: "u1".to_string(),
            amount,
            category: "Food".to_string(),
            description: String::new(),
            date: monday + Duration::weeks(week),
        })
        .unwrap();
    }

    let analyzer = ExpenseAnalyzer::at(&db, monday + Duration::weeks(4) + Duration::days(1));
    let trends = analyzer.trends_only("u1", 30).unwrap();

    assert_eq!(trends.recent_weekly_avg, 200.0);
    assert_eq!(trends.earlier_weekly_avg, 100.0);
    assert_eq!(trends.trend, TrendDirection::Increasing);
    assert_eq!(trends.weekly_totals.len(), 5);
}

#[test]
fn empty_user_gets_defined_empty_state() {
    let db = Database::in_memory().unwrap();
    let analyzer = ExpenseAnalyzer::at(&db, fixed_now());

    let result = analyzer.comprehensive_analysis("nobody").unwrap();
    assert_eq!(result.expense_count, 0);
    assert_eq!(result.suggestions.len(), 1);
    assert_eq!(result.suggestions[0].kind, SuggestionKind::Info);
    assert!(result.top_category.is_none());

    let insight = analyzer
        .category_insight("nobody", "Food", RecentSelection::default())
        .unwrap();
    assert_eq!(insight.transaction_count, 0);
    assert!(insight.message.is_some());
}

#[test]
fn import_then_analyze() {
    let db = Database::in_memory().unwrap();

    let csv = "\
date,amount,category,description
2026-07-20,40.00,Food,groceries
2026-07-25,60.00,Food,dinner
2026-07-26,900.00,Rent,july rent
";
    let outcome = import_expenses(&db, "u1", csv.as_bytes()).unwrap();
    assert_eq!(outcome.imported, 3);

    // Re-import must not double-count
    let again = import_expenses(&db, "u1", csv.as_bytes()).unwrap();
    assert_eq!(again.imported, 0);
    assert_eq!(again.skipped_duplicates, 3);

    let analyzer = ExpenseAnalyzer::at(&db, fixed_now());
    let result = analyzer.comprehensive_analysis("u1").unwrap();
    assert_eq!(result.expense_count, 3);
    assert_eq!(result.total_expenses, 1000.0);
    assert_eq!(result.top_category.as_deref(), Some("Rent"));
}

#[test]
fn batch_reports_cover_users_and_survive_failures() {
    let db = Database::in_memory().unwrap();
    seed(&db, "u1", 10, 100.0, "Food");
    seed(&db, "u2", 12, 300.0, "Rent");

    let outcome = generate_reports_for_all(&db, 7, 2026).unwrap();
    assert_eq!(outcome.succeeded, 2);
    assert_eq!(outcome.total, 2);

    let report = db.get_report("u1", 7, 2026).unwrap();
    assert_eq!(report.total_spent, 100.0);
    assert_eq!(report.top_category.as_deref(), Some("Food"));

    // Break the report table: per-user failures are counted, the batch
    // still completes
    db.conn()
        .unwrap()
        .execute("DROP TABLE monthly_reports", [])
        .unwrap();

    let outcome = generate_reports_for_all(&db, 7, 2026).unwrap();
    assert_eq!(outcome.succeeded, 0);
    assert_eq!(outcome.failed, 2);
    assert_eq!(outcome.total, 2);
}

#[test]
fn period_summary_over_sqlite() {
    let db = Database::in_memory().unwrap();
    seed(&db, "u1", 2, 50.0, "Food");
    seed(&db, "u1", 20, 500.0, "Rent");
    seed(&db, "u1", 70, 80.0, "Travel");

    let analyzer = ExpenseAnalyzer::at(&db, fixed_now());
    let summary = analyzer.period_summary("u1").unwrap();

    assert_eq!(summary["last_7_days"].total_spent, 50.0);
    assert_eq!(summary["last_30_days"].total_spent, 550.0);
    assert_eq!(summary["last_90_days"].total_spent, 630.0);
    assert_eq!(
        summary["last_30_days"].top_category.as_deref(),
        Some("Rent")
    );
}
