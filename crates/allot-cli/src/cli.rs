//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI arguments.
//! The actual command implementations are in the `commands` module.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Allot - Assign spending categories to budgets
#[derive(Parser)]
#[command(name = "allot")]
#[command(about = "Budget category assignment and recurring charge finder", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Transactions file (.json or .csv)
    #[arg(long, default_value = "transactions.json", global = true)]
    pub transactions: PathBuf,

    /// Budgets file (.json or .csv; `assign` and `budget` write JSON)
    #[arg(long, default_value = "budgets.json", global = true)]
    pub budgets: PathBuf,

    /// Settings file (defaults to ~/.config/allot/config.toml if present)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Only use transactions from this month (YYYY-MM)
    ///
    /// Applies to tree, spent, overview, unassigned and assign.
    /// Recurring detection always looks back from today.
    #[arg(long, global = true)]
    pub month: Option<String>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show the category tree
    Tree {
        /// Budget to show assignment state for
        #[arg(short, long)]
        budget: Option<i64>,

        /// Print the tree as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show spend for one budget
    Spent {
        /// Budget ID
        #[arg(short, long)]
        budget: i64,
    },

    /// Show spend and totals across all budgets
    Overview,

    /// List merchants no budget claims
    Unassigned,

    /// Find recurring charges in recent history
    Recurring {
        /// Relative amount tolerance (0 for exact amounts)
        #[arg(long)]
        variance: Option<f64>,

        /// Print matches as JSON
        #[arg(long)]
        json: bool,
    },

    /// Assign a category node to a budget (or remove it)
    Assign {
        /// Budget ID
        #[arg(short, long)]
        budget: i64,

        /// Node path: `Main`, `Main:Sub` or `Main:Sub:Merchant`
        #[arg(short, long)]
        path: String,

        /// Remove the node's merchants from the budget instead
        #[arg(long)]
        unassign: bool,
    },

    /// Create budgets and change their amounts
    Budget {
        #[command(subcommand)]
        action: BudgetAction,
    },
}

#[derive(Subcommand)]
pub enum BudgetAction {
    /// Create a new budget with no categories
    Add {
        /// Budget name
        #[arg(short, long)]
        name: String,

        /// Budget ceiling for the period
        #[arg(short, long)]
        amount: f64,
    },

    /// Change a budget's amount
    SetAmount {
        /// Budget ID
        #[arg(short, long)]
        budget: i64,

        /// New budget ceiling
        #[arg(short, long)]
        amount: f64,
    },
}
