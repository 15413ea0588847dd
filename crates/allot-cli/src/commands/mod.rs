//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `core` - Shared utilities (open_ledger, find_budget)
//! - `tree` - Category tree and unassigned merchant commands
//! - `budgets` - Spend, overview and assignment commands
//! - `recurring` - Recurring charge detection

pub mod budgets;
pub mod core;
pub mod recurring;
pub mod tree;

// Re-export command functions for main.rs
pub use budgets::*;
pub use core::*;
pub use recurring::*;
pub use tree::*;

/// Truncate a string to a maximum length, adding "..." if truncated
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// Format an amount with the configured currency symbol
pub fn money(symbol: &str, amount: f64) -> String {
    if amount < 0.0 {
        format!("-{}{:.2}", symbol, amount.abs())
    } else {
        format!("{}{:.2}", symbol, amount)
    }
}
