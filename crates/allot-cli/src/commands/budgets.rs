//! Budget command implementations (spend, overview, assignment, budget edits)

use std::path::Path;

use allot_core::{
    apply_category_changes, build_categories_with_assignment, save_budgets, summarize_budgets,
    toggle_changes, Budget, BudgetOverview,
};
use anyhow::{Context, Result};

use super::{truncate, Ledger};

/// Spend summary block for one budget
pub fn render_spent(ledger: &Ledger, budget: &Budget, spent: f64) -> Vec<String> {
    vec![
        String::new(),
        format!("💰 {} (ID: {})", budget.name, budget.id),
        "   ─────────────────────────────────────────────────────────────".to_string(),
        format!("   Budget:     {:>12}", ledger.money(budget.amount)),
        format!("   Spent:      {:>12}", ledger.money(spent)),
        format!(
            "   Remaining:  {:>12}",
            ledger.money((budget.amount - spent).max(0.0))
        ),
        format!("   Categories: {:>12}", budget.categories().len()),
    ]
}

pub fn cmd_spent(ledger: &Ledger, budget_id: i64) -> Result<()> {
    let budget = ledger.find_budget(budget_id)?;
    let transactions = ledger.period_transactions();
    let spent = budget.spent(&transactions);

    for line in render_spent(ledger, budget, spent) {
        println!("{}", line);
    }

    Ok(())
}

/// Per-budget table with a totals row; over-spent budgets are flagged
pub fn render_overview(ledger: &Ledger, overview: &BudgetOverview) -> Vec<String> {
    let mut lines = vec![String::new(), "📊 Budget Overview".to_string()];
    if let Some((from, to)) = ledger.period {
        lines.push(format!("   Period: {} to {}", from, to));
    }
    lines.push("   ─────────────────────────────────────────────────────────────".to_string());
    lines.push(format!("   {:30} │ {:>12} │ {:>12}", "Budget", "Amount", "Spent"));
    lines.push("   ───────────────────────────────┼──────────────┼──────────────".to_string());

    for usage in &overview.budgets {
        let flag = if usage.spent > usage.amount { " ⚠️" } else { "" };
        lines.push(format!(
            "   {:30} │ {:>12} │ {:>12}{}",
            truncate(&usage.name, 30),
            ledger.money(usage.amount),
            ledger.money(usage.spent),
            flag
        ));
    }

    lines.push("   ───────────────────────────────┼──────────────┼──────────────".to_string());
    lines.push(format!(
        "   {:30} │ {:>12} │ {:>12}",
        "Total",
        ledger.money(overview.total_budget),
        ledger.money(overview.total_spent)
    ));
    lines.push(String::new());
    lines.push(format!("   Remaining: {}", ledger.money(overview.remaining)));
    lines
}

pub fn cmd_overview(ledger: &Ledger) -> Result<()> {
    if ledger.budgets.is_empty() {
        println!("No budgets found.");
        return Ok(());
    }

    let transactions = ledger.period_transactions();
    let overview = summarize_budgets(&ledger.budgets, &transactions);

    for line in render_overview(ledger, &overview) {
        println!("{}", line);
    }

    Ok(())
}

fn budget_index(ledger: &Ledger, budget_id: i64) -> Result<usize> {
    ledger
        .budgets
        .iter()
        .position(|b| b.id == budget_id)
        .ok_or_else(|| anyhow::anyhow!("Budget not found: {}", budget_id))
}

fn check_amount(amount: f64) -> Result<()> {
    if !amount.is_finite() || amount < 0.0 {
        anyhow::bail!("Budget amount must be a non-negative number, got {}", amount);
    }
    Ok(())
}

fn save(ledger: &Ledger, budgets_path: &Path) -> Result<()> {
    save_budgets(budgets_path, &ledger.budgets)
        .with_context(|| format!("Failed to save budgets to {}", budgets_path.display()))
}

pub fn cmd_assign(
    ledger: &mut Ledger,
    budgets_path: &Path,
    budget_id: i64,
    node_path: &str,
    unassign: bool,
) -> Result<()> {
    let transactions = ledger.period_transactions();
    let index = budget_index(ledger, budget_id)?;

    let tree = build_categories_with_assignment(&transactions, &ledger.budgets, Some(budget_id))?;
    let changes = toggle_changes(&tree, budget_id, node_path, unassign)
        .with_context(|| format!("Cannot change assignment for {}", node_path))?;

    if changes.is_empty() {
        println!("Nothing to change for {}", node_path);
        return Ok(());
    }

    let budget = &mut ledger.budgets[index];
    let updated = apply_category_changes(budget.categories(), &changes);
    budget.categories = Some(updated);

    save(ledger, budgets_path)?;

    let budget = &ledger.budgets[index];
    let spent = budget.spent(&transactions);

    if unassign {
        println!(
            "✅ Removed {} merchant(s) under {} from {}",
            changes.removals.len(),
            node_path,
            budget.name
        );
    } else {
        println!(
            "✅ Assigned {} merchant(s) under {} to {}",
            changes.additions.len(),
            node_path,
            budget.name
        );
    }
    println!(
        "   Spent: {} of {}",
        ledger.money(spent),
        ledger.money(budget.amount)
    );

    Ok(())
}

/// Create a budget with no categories, returning its new ID
pub fn cmd_budget_add(
    ledger: &mut Ledger,
    budgets_path: &Path,
    name: &str,
    amount: f64,
) -> Result<i64> {
    let name = name.trim();
    if name.is_empty() {
        anyhow::bail!("Budget name cannot be empty");
    }
    check_amount(amount)?;

    let id = ledger.budgets.iter().map(|b| b.id).max().unwrap_or(0) + 1;
    ledger.budgets.push(Budget::new(id, name, amount));
    save(ledger, budgets_path)?;

    println!(
        "✅ Created budget {} (ID: {}) with {}",
        name,
        id,
        ledger.money(amount)
    );
    println!("   Assign categories with: allot assign --budget {} --path MAIN", id);

    Ok(id)
}

pub fn cmd_budget_set_amount(
    ledger: &mut Ledger,
    budgets_path: &Path,
    budget_id: i64,
    amount: f64,
) -> Result<()> {
    check_amount(amount)?;
    let index = budget_index(ledger, budget_id)?;

    let previous = ledger.budgets[index].amount;
    ledger.budgets[index].amount = amount;
    save(ledger, budgets_path)?;

    println!(
        "✅ {} amount changed from {} to {}",
        ledger.budgets[index].name,
        ledger.money(previous),
        ledger.money(amount)
    );

    Ok(())
}
