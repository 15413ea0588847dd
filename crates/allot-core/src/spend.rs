//! Budget spend calculation
//!
//! Spend only counts transactions carrying all three of main category,
//! sub-category and merchant, whose `main:sub:merchant` path is listed
//! literally in a budget's categories. A budget claiming `Food` alone spends
//! nothing, even though the tree lists it on the `Food` node.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::category_path::CategoryPath;
use crate::models::{Budget, Transaction};

/// Sum of amounts for transactions whose derived path is in `categories`
pub fn calculate_budget_spent(categories: Option<&[String]>, transactions: &[Transaction]) -> f64 {
    let categories = match categories {
        Some(c) if !c.is_empty() => c,
        _ => return 0.0,
    };

    transactions.iter().fold(0.0, |sum, tx| {
        // Transactions missing a sub-category or merchant never match
        match CategoryPath::from_transaction(tx) {
            Some(path) if categories.iter().any(|c| c == path.as_str()) => sum + tx.amount,
            _ => sum,
        }
    })
}

impl Budget {
    /// Spend against this budget
    pub fn spent(&self, transactions: &[Transaction]) -> f64 {
        calculate_budget_spent(self.categories.as_deref(), transactions)
    }
}

/// Spend for one budget
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetUsage {
    pub id: i64,
    pub name: String,
    pub amount: f64,
    pub spent: f64,
}

/// Totals across all budgets
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetOverview {
    pub budgets: Vec<BudgetUsage>,
    pub total_budget: f64,
    pub total_spent: f64,
    /// `total_budget - total_spent`, floored at zero
    pub remaining: f64,
}

/// Per-budget spend plus overall totals
pub fn summarize_budgets(budgets: &[Budget], transactions: &[Transaction]) -> BudgetOverview {
    let usages: Vec<BudgetUsage> = budgets
        .iter()
        .map(|b| BudgetUsage {
            id: b.id,
            name: b.name.clone(),
            amount: b.amount,
            spent: b.spent(transactions),
        })
        .collect();

    let total_budget: f64 = usages.iter().map(|u| u.amount).sum();
    let total_spent: f64 = usages.iter().map(|u| u.spent).sum();

    debug!(
        "Summarized {} budgets: {:.2} spent of {:.2}",
        usages.len(),
        total_spent,
        total_budget
    );

    BudgetOverview {
        budgets: usages,
        total_budget,
        total_spent,
        remaining: (total_budget - total_spent).max(0.0),
    }
}
