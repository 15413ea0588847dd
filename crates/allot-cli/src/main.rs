//! Allot CLI - Budget category assignment
//!
//! Usage:
//!   allot tree --budget 1                      Show the category tree for a budget
//!   allot assign --budget 1 --path Food:Groceries
//!                                              Assign a sub-category's merchants
//!   allot overview --month 2024-05             Spend across all budgets
//!   allot recurring                            Find recurring charges
//!   allot budget add --name Dining --amount 150
//!                                              Create a budget

mod cli;
mod commands;


use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .init();

    let ledger = commands::open_ledger(
        &cli.transactions,
        &cli.budgets,
        cli.config.as_deref(),
        cli.month.as_deref(),
    )?;

    match cli.command {
        Commands::Tree { budget, json } => commands::cmd_tree(&ledger, budget, json),
        Commands::Spent { budget } => commands::cmd_spent(&ledger, budget),
        Commands::Overview => commands::cmd_overview(&ledger),
        Commands::Unassigned => commands::cmd_unassigned(&ledger),
        Commands::Recurring { variance, json } => {
            commands::cmd_recurring(&ledger, variance, None, json)
        }
        Commands::Assign {
            budget,
            path,
            unassign,
        } => {
            let mut ledger = ledger;
            commands::cmd_assign(&mut ledger, &cli.budgets, budget, &path, unassign)
        }
        Commands::Budget { action } => {
            let mut ledger = ledger;
            match action {
                BudgetAction::Add { name, amount } => {
                    commands::cmd_budget_add(&mut ledger, &cli.budgets, &name, amount).map(|_| ())
                }
                BudgetAction::SetAmount { budget, amount } => {
                    commands::cmd_budget_set_amount(&mut ledger, &cli.budgets, budget, amount)
                }
            }
        }
    }
}
