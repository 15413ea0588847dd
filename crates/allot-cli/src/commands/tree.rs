//! Category tree command implementations

use allot_core::{
    build_category_hierarchy, unassigned_merchants, Assignment, Budget, BudgetRef, CategoryNode,
    UnassignedMerchant,
};
use anyhow::Result;

use super::{truncate, Ledger};

fn assignment_icon(assignment: Assignment) -> &'static str {
    match assignment {
        Assignment::Assigned => "✅",
        Assignment::Partial => "◐",
        Assignment::Unassigned => "○",
        Assignment::Unscoped => "•",
    }
}

fn budget_names(budgets: &[BudgetRef]) -> String {
    if budgets.is_empty() {
        String::new()
    } else {
        let names: Vec<&str> = budgets.iter().map(|b| b.name.as_str()).collect();
        format!("  [{}]", names.join(", "))
    }
}

/// Indented tree lines, one per node
pub fn render_tree(tree: &[CategoryNode], budget: Option<&Budget>) -> Vec<String> {
    let mut lines = vec![
        String::new(),
        match budget {
            Some(b) => format!("🌳 Categories for budget: {} (ID: {})", b.name, b.id),
            None => "🌳 Categories".to_string(),
        },
        "   ─────────────────────────────────────────────────────────────".to_string(),
    ];

    for main in tree {
        lines.push(format!(
            "   {} {}{}",
            assignment_icon(main.assignment),
            main.display_name,
            budget_names(&main.assigned_budgets)
        ));

        for sub in &main.sub_categories {
            lines.push(format!(
                "      {} {}{}",
                assignment_icon(sub.assignment),
                sub.display_name,
                budget_names(&sub.assigned_budgets)
            ));

            for merchant in &sub.merchant_names {
                // Merchants owned by another budget are locked for this one
                let icon = if merchant.is_owned_elsewhere() {
                    "🔒"
                } else {
                    assignment_icon(merchant.assignment)
                };
                lines.push(format!(
                    "         {} {}{}",
                    icon,
                    truncate(&merchant.display_name, 40),
                    budget_names(&merchant.assigned_budgets)
                ));
            }
        }
    }

    lines
}

pub fn cmd_tree(ledger: &Ledger, budget_id: Option<i64>, json: bool) -> Result<()> {
    let budget = budget_id.map(|id| ledger.find_budget(id)).transpose()?;
    let transactions = ledger.period_transactions();
    let tree = build_category_hierarchy(&transactions, &ledger.budgets, budget_id);

    if json {
        println!("{}", serde_json::to_string_pretty(&tree)?);
        return Ok(());
    }

    if tree.is_empty() {
        println!("No categorized transactions found.");
        return Ok(());
    }

    for line in render_tree(&tree, budget) {
        println!("{}", line);
    }

    Ok(())
}

/// Table of unclaimed merchants with an assign hint
pub fn render_unassigned(unassigned: &[UnassignedMerchant]) -> Vec<String> {
    let mut lines = vec![
        String::new(),
        format!("📋 Unassigned Merchants ({})", unassigned.len()),
        "   ─────────────────────────────────────────────────────────────".to_string(),
    ];

    for merchant in unassigned {
        lines.push(format!(
            "   {:20} │ {:20} │ {}",
            truncate(&merchant.main_category, 20),
            truncate(&merchant.sub_category, 20),
            merchant.name
        ));
    }

    lines.push(String::new());
    lines.push("   Assign with: allot assign --budget ID --path MAIN:SUB:MERCHANT".to_string());
    lines
}

pub fn cmd_unassigned(ledger: &Ledger) -> Result<()> {
    let transactions = ledger.period_transactions();
    let tree = build_category_hierarchy(&transactions, &ledger.budgets, None);
    let unassigned = unassigned_merchants(&tree);

    if unassigned.is_empty() {
        println!("✅ Every merchant is assigned to a budget.");
        return Ok(());
    }

    for line in render_unassigned(&unassigned) {
        println!("{}", line);
    }

    Ok(())
}
