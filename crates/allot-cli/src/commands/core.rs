//! Shared command utilities
//!
//! This module contains:
//! - `Ledger` - Transactions, budgets and settings loaded for one invocation
//! - `open_ledger` - Load data files and resolve the --month window

use std::path::Path;

use allot_core::{
    filter_by_date_range, load_budgets, load_transactions, parse_month, Budget, Settings,
    Transaction,
};
use anyhow::{Context, Result};
use chrono::NaiveDate;
use tracing::debug;

/// Everything a command needs, loaded once
pub struct Ledger {
    pub transactions: Vec<Transaction>,
    pub budgets: Vec<Budget>,
    pub settings: Settings,
    /// Inclusive date window from --month
    pub period: Option<(NaiveDate, NaiveDate)>,
}

impl Ledger {
    /// Transactions inside the --month window (all of them without one)
    pub fn period_transactions(&self) -> Vec<Transaction> {
        match self.period {
            Some((from, to)) => filter_by_date_range(&self.transactions, from, to),
            None => self.transactions.clone(),
        }
    }

    pub fn find_budget(&self, id: i64) -> Result<&Budget> {
        self.budgets
            .iter()
            .find(|b| b.id == id)
            .ok_or_else(|| anyhow::anyhow!("Budget not found: {}", id))
    }

    pub fn money(&self, amount: f64) -> String {
        super::money(&self.settings.currency_symbol, amount)
    }
}

/// Load transactions, budgets and settings
///
/// A missing budgets file is treated as no budgets, so the tree can be browsed
/// before any budget exists.
pub fn open_ledger(
    transactions_path: &Path,
    budgets_path: &Path,
    config_path: Option<&Path>,
    month: Option<&str>,
) -> Result<Ledger> {
    let settings = Settings::load(config_path).context("Failed to load settings")?;

    let transactions = load_transactions(transactions_path).with_context(|| {
        format!(
            "Failed to load transactions from {}",
            transactions_path.display()
        )
    })?;

    let budgets = if budgets_path.exists() {
        load_budgets(budgets_path)
            .with_context(|| format!("Failed to load budgets from {}", budgets_path.display()))?
    } else {
        debug!("No budgets file at {}", budgets_path.display());
        Vec::new()
    };

    let period = month
        .map(parse_month)
        .transpose()
        .context("Invalid --month (use YYYY-MM)")?;

    Ok(Ledger {
        transactions,
        budgets,
        settings,
        period,
    })
}
