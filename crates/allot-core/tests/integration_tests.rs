//! Integration tests for allot-core
//!
//! These tests exercise the full load → tree → assign → spend → recurring workflow.

use std::fs;

use allot_core::{
    apply_category_changes, build_categories_with_assignment, build_category_hierarchy,
    find_recurring, load_budgets, load_transactions, month_range, save_budgets,
    summarize_budgets, toggle_changes, unassigned_merchants, Assignment, Budget, Error,
    DEFAULT_VARIANCE,
};
use chrono::NaiveDate;

/// Three months of transactions in the CSV import format
/// - Netflix and Spotify bill monthly at fixed amounts
/// - the gym bills a slightly different amount each month
/// - groceries vary freely across two merchants
fn transactions_csv() -> &'static str {
    r#"id,date,amount,mainCategory,subCategory,merchantName
1,2024-03-05,15.49,ENTERTAINMENT,STREAMING,Netflix
2,2024-04-05,15.49,ENTERTAINMENT,STREAMING,Netflix
3,2024-05-05,15.49,ENTERTAINMENT,STREAMING,Netflix
4,2024-04-20,10.99,ENTERTAINMENT,STREAMING,Spotify
5,2024-05-20,10.99,ENTERTAINMENT,STREAMING,Spotify
6,2024-04-01,40.00,PERSONAL_CARE,GYMS_AND_FITNESS,Planet Fitness
7,2024-05-01,41.00,PERSONAL_CARE,GYMS_AND_FITNESS,Planet Fitness
8,2024-04-12,82.17,FOOD_AND_DRINK,GROCERIES,CostCo
9,2024-05-03,$131.40,FOOD_AND_DRINK,GROCERIES,CostCo
10,2024-05-08,22.65,FOOD_AND_DRINK,GROCERIES,Trader Joes
11,2024-05-09,12.00,FOOD_AND_DRINK,RESTAURANTS,
12,2024-05-10,3.00,,,"#
}

fn budgets_json() -> &'static str {
    r#"[
        {"id": 1, "name": "Groceries", "amount": 400, "categories": ["FOOD_AND_DRINK:GROCERIES:CostCo"]},
        {"id": 2, "name": "Subscriptions", "amount": 40, "categories": ["ENTERTAINMENT:STREAMING:Netflix"]},
        {"id": 3, "name": "Health", "amount": 60}
    ]"#
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

// ============================================================================
// Full workflow
// ============================================================================

#[test]
fn test_full_assignment_workflow() {
    let dir = tempfile::tempdir().unwrap();
    let tx_path = dir.path().join("transactions.csv");
    let budgets_path = dir.path().join("budgets.json");
    fs::write(&tx_path, transactions_csv()).unwrap();
    fs::write(&budgets_path, budgets_json()).unwrap();

    let transactions = load_transactions(&tx_path).unwrap();
    let mut budgets = load_budgets(&budgets_path).unwrap();
    assert_eq!(transactions.len(), 12);
    assert_eq!(budgets.len(), 3);

    // Before: only CostCo counts toward groceries
    assert_eq!(budgets[0].spent(&transactions), 82.17 + 131.40);

    // Assign the whole groceries sub-category to budget 1
    let tree = build_categories_with_assignment(&transactions, &budgets, Some(1)).unwrap();
    let food = tree.iter().find(|c| c.id == "FOOD_AND_DRINK").unwrap();
    let groceries = &food.sub_categories[0];
    assert_eq!(groceries.assignment, Assignment::Partial);

    let changes = toggle_changes(&tree, 1, &groceries.id, groceries.assignment.is_assigned()).unwrap();
    assert_eq!(changes.additions, vec!["FOOD_AND_DRINK:GROCERIES:Trader Joes".to_string()]);

    let updated = apply_category_changes(budgets[0].categories(), &changes);
    budgets[0].categories = Some(updated);
    save_budgets(&budgets_path, &budgets).unwrap();

    // Reload and rebuild: groceries is now fully assigned
    let budgets = load_budgets(&budgets_path).unwrap();
    let tree = build_category_hierarchy(&transactions, &budgets, Some(1));
    let food = tree.iter().find(|c| c.id == "FOOD_AND_DRINK").unwrap();
    assert_eq!(food.sub_categories[0].assignment, Assignment::Assigned);
    assert_eq!(budgets[0].spent(&transactions), 82.17 + 131.40 + 22.65);

    // Restaurants has no merchant rows under it, so FOOD_AND_DRINK rolls up as assigned
    assert_eq!(food.sub_categories[1].merchant_names.len(), 0);
    assert_eq!(food.assignment, Assignment::Assigned);
}

#[test]
fn test_month_filtered_overview() {
    let dir = tempfile::tempdir().unwrap();
    let tx_path = dir.path().join("transactions.csv");
    fs::write(&tx_path, transactions_csv()).unwrap();
    let transactions = load_transactions(&tx_path).unwrap();
    let budgets: Vec<Budget> = serde_json::from_str(budgets_json()).unwrap();

    let (from, to) = month_range(date(2024, 4, 17));
    let april = allot_core::filter_by_date_range(&transactions, from, to);
    let overview = summarize_budgets(&budgets, &april);

    assert_eq!(overview.budgets[0].spent, 82.17);
    assert_eq!(overview.budgets[1].spent, 15.49);
    assert_eq!(overview.budgets[2].spent, 0.0);
    assert_eq!(overview.total_budget, 500.0);
    assert_eq!(overview.remaining, 500.0 - (82.17 + 15.49));
}

#[test]
fn test_unassigned_report() {
    let csv_budgets = "id,name,amount,categories
1,Groceries,400,FOOD_AND_DRINK:GROCERIES:CostCo
2,Subscriptions,40,ENTERTAINMENT:STREAMING:Netflix;ENTERTAINMENT:STREAMING:Spotify";
    let dir = tempfile::tempdir().unwrap();
    let budgets_path = dir.path().join("budgets.csv");
    let tx_path = dir.path().join("transactions.csv");
    fs::write(&budgets_path, csv_budgets).unwrap();
    fs::write(&tx_path, transactions_csv()).unwrap();

    let transactions = load_transactions(&tx_path).unwrap();
    let budgets = load_budgets(&budgets_path).unwrap();
    let tree = build_category_hierarchy(&transactions, &budgets, None);

    let names: Vec<String> = unassigned_merchants(&tree).into_iter().map(|m| m.name).collect();
    assert_eq!(names, vec!["Planet Fitness", "Trader Joes"]);
}

// ============================================================================
// Tree properties
// ============================================================================

#[test]
fn test_tree_is_deterministic() {
    let dir = tempfile::tempdir().unwrap();
    let tx_path = dir.path().join("transactions.csv");
    fs::write(&tx_path, transactions_csv()).unwrap();
    let transactions = load_transactions(&tx_path).unwrap();
    let budgets: Vec<Budget> = serde_json::from_str(budgets_json()).unwrap();

    let first = build_category_hierarchy(&transactions, &budgets, Some(2));
    let second = build_category_hierarchy(&transactions, &budgets, Some(2));
    assert_eq!(first, second);

    // First-seen order, and the uncategorized row is dropped
    let ids: Vec<&str> = first.iter().map(|c| c.id.as_str()).collect();
    assert_eq!(ids, vec!["ENTERTAINMENT", "PERSONAL_CARE", "FOOD_AND_DRINK"]);
    assert_eq!(first[2].display_name, "FOOD AND DRINK");
}

#[test]
fn test_merchant_owned_elsewhere_is_excluded_from_rollup() {
    let dir = tempfile::tempdir().unwrap();
    let tx_path = dir.path().join("transactions.csv");
    fs::write(&tx_path, transactions_csv()).unwrap();
    let transactions = load_transactions(&tx_path).unwrap();
    let budgets: Vec<Budget> = serde_json::from_str(budgets_json()).unwrap();

    // Budget 2 owns Netflix only; Spotify is free
    let tree = build_category_hierarchy(&transactions, &budgets, Some(2));
    let streaming = &tree[0].sub_categories[0];
    assert_eq!(streaming.assignment, Assignment::Partial);

    // From budget 1's view Netflix is locked, Spotify is free and unassigned
    let tree = build_category_hierarchy(&transactions, &budgets, Some(1));
    let streaming = &tree[0].sub_categories[0];
    assert!(streaming.merchant_names[0].is_owned_elsewhere());
    assert_eq!(streaming.assignment, Assignment::Unassigned);
    assert_eq!(streaming.assignment.partially_assigned(), Some(false));
}

#[test]
fn test_scoped_build_requires_budget() {
    let result = build_categories_with_assignment(&[], &[], None);
    assert!(matches!(result, Err(Error::InvalidArgument(_))));
}

// ============================================================================
// Recurring detection
// ============================================================================

#[test]
fn test_recurring_detection() {
    let dir = tempfile::tempdir().unwrap();
    let tx_path = dir.path().join("transactions.csv");
    fs::write(&tx_path, transactions_csv()).unwrap();
    let transactions = load_transactions(&tx_path).unwrap();
    let today = date(2024, 5, 25);

    // Window starts 2024-03-25, so the March Netflix charge is out
    let exact: Vec<i64> = find_recurring(&transactions, 0.0, today).iter().map(|t| t.id).collect();
    assert_eq!(exact, vec![2, 3, 4, 5]);

    // 41.00 is within 3% of 40.00, so the gym joins
    let fuzzy: Vec<i64> = find_recurring(&transactions, DEFAULT_VARIANCE, today)
        .iter()
        .map(|t| t.id)
        .collect();
    assert_eq!(fuzzy, vec![2, 3, 4, 5, 6, 7]);
}
