//! Allot Core Library
//!
//! Budgeting engine for the Allot personal finance tool:
//! - Category hierarchy builder with per-budget assignment state
//! - Exact-match budget spend calculation and overview totals
//! - Recurring transaction detection
//! - Category assignment changes (toggle, apply)
//! - Month windows for budget periods
//! - JSON/CSV loading of transactions and budgets
//! - Settings with embedded defaults and user overrides

pub mod assignment;
pub mod category_path;
pub mod config;
pub mod detect;
pub mod error;
pub mod hierarchy;
pub mod import;
pub mod models;
pub mod period;
pub mod spend;

pub use assignment::{apply_category_changes, toggle_changes, CategoryChanges};
pub use category_path::CategoryPath;
pub use config::{DetectionConfig, Settings};
pub use detect::{find_recurring, find_recurring_now, RecurringDetector, DEFAULT_VARIANCE};
pub use error::{Error, Result};
pub use hierarchy::{
    build_categories_with_assignment, build_category_hierarchy, unassigned_merchants,
};
pub use import::{load_budgets, load_transactions, save_budgets};
pub use models::{
    Assignment, Budget, BudgetRef, CategoryNode, MerchantNode, SubCategoryNode, Transaction,
    UnassignedMerchant,
};
pub use period::{filter_by_date_range, month_range, parse_month};
pub use spend::{calculate_budget_spent, summarize_budgets, BudgetOverview, BudgetUsage};
