//! Category hierarchy builder
//!
//! Folds a flat transaction list into a Category → SubCategory → Merchant
//! tree and annotates every node with its assignment state relative to one
//! current budget. Without a current budget every node is `Unscoped`, which
//! is what the budget-independent overview uses.
//!
//! Lookup rules:
//! - main/sub nodes list every budget holding a path that *starts with* the
//!   node path (literal string prefix)
//! - merchant nodes list only budgets holding the exact merchant path
//! - merchants owned by another budget are shown but left out of their
//!   parents' rollup

use std::collections::HashMap;

use tracing::debug;

use crate::category_path::{display_name, CategoryPath};
use crate::error::{Error, Result};
use crate::models::{
    Assignment, Budget, BudgetRef, CategoryNode, MerchantNode, SubCategoryNode, Transaction,
    UnassignedMerchant,
};

/// Sub-category bucket with its distinct merchants in first-seen order
struct SubGroup<'a> {
    name: &'a str,
    merchants: Vec<&'a str>,
}

/// Main-category bucket with its sub-categories in first-seen order
struct MainGroup<'a> {
    name: &'a str,
    subs: Vec<SubGroup<'a>>,
    sub_index: HashMap<&'a str, usize>,
}

/// Group transactions into main → sub → merchants, preserving first occurrence
fn group_transactions(transactions: &[Transaction]) -> Vec<MainGroup<'_>> {
    let mut mains: Vec<MainGroup<'_>> = Vec::new();
    let mut main_index: HashMap<&str, usize> = HashMap::new();

    for tx in transactions {
        let Some(main) = tx.main_category() else {
            debug!("Skipping transaction {} - no main category", tx.id);
            continue;
        };

        let main_pos = *main_index.entry(main).or_insert_with(|| {
            mains.push(MainGroup {
                name: main,
                subs: Vec::new(),
                sub_index: HashMap::new(),
            });
            mains.len() - 1
        });
        let group = &mut mains[main_pos];

        let Some(sub) = tx.sub_category() else {
            continue;
        };

        let subs = &mut group.subs;
        let sub_pos = *group.sub_index.entry(sub).or_insert_with(|| {
            subs.push(SubGroup {
                name: sub,
                merchants: Vec::new(),
            });
            subs.len() - 1
        });
        let sub_group = &mut subs[sub_pos];

        if let Some(merchant) = tx.merchant() {
            if !sub_group.merchants.contains(&merchant) {
                sub_group.merchants.push(merchant);
            }
        }
    }

    mains
}

fn prefix_budgets(budgets: &[Budget], path: &CategoryPath) -> Vec<BudgetRef> {
    budgets
        .iter()
        .filter(|b| b.claims_prefix(path))
        .map(Budget::to_ref)
        .collect()
}

fn build_merchant(
    main: &str,
    sub: &str,
    merchant: &str,
    budgets: &[Budget],
    current_budget_id: Option<i64>,
) -> MerchantNode {
    let id = CategoryPath::merchant(main, sub, merchant);
    let claiming: Vec<&Budget> = budgets
        .iter()
        .filter(|b| b.claims_exact(id.as_str()))
        .collect();

    let (assignment, assigned_other_budget) = match current_budget_id {
        Some(current) => {
            let assigned = claiming.iter().any(|b| b.id == current);
            let other = claiming.iter().any(|b| b.id != current);
            let assignment = if assigned {
                Assignment::Assigned
            } else {
                Assignment::Unassigned
            };
            (assignment, Some(other))
        }
        None => (Assignment::Unscoped, None),
    };

    MerchantNode {
        id: id.into_string(),
        name: merchant.to_string(),
        display_name: merchant.to_string(),
        assignment,
        assigned_other_budget,
        assigned_budgets: claiming.into_iter().map(Budget::to_ref).collect(),
    }
}

/// Merchants that count toward a parent's rollup
fn eligible(merchant: &MerchantNode) -> bool {
    !merchant.is_owned_elsewhere()
}

/// Assignment of a parent node over its eligible merchants
fn rollup<'m>(
    merchants: impl Iterator<Item = &'m MerchantNode>,
    current_budget_id: Option<i64>,
) -> Assignment {
    if current_budget_id.is_none() {
        return Assignment::Unscoped;
    }

    let mut all_assigned = true;
    let mut some_assigned = false;
    for merchant in merchants.filter(|m| eligible(m)) {
        if merchant.assignment.is_assigned() {
            some_assigned = true;
        } else {
            all_assigned = false;
        }
    }
    Assignment::from_rollup(all_assigned, some_assigned)
}

/// Build the category tree for `current_budget_id`, or unscoped when `None`
pub fn build_category_hierarchy(
    transactions: &[Transaction],
    budgets: &[Budget],
    current_budget_id: Option<i64>,
) -> Vec<CategoryNode> {
    let groups = group_transactions(transactions);

    let tree: Vec<CategoryNode> = groups
        .into_iter()
        .map(|group| {
            let main_id = CategoryPath::main(group.name);

            let sub_categories: Vec<SubCategoryNode> = group
                .subs
                .iter()
                .map(|sub| {
                    let sub_id = CategoryPath::sub(group.name, sub.name);
                    let merchant_names: Vec<MerchantNode> = sub
                        .merchants
                        .iter()
                        .map(|m| build_merchant(group.name, sub.name, m, budgets, current_budget_id))
                        .collect();

                    SubCategoryNode {
                        assignment: rollup(merchant_names.iter(), current_budget_id),
                        assigned_budgets: prefix_budgets(budgets, &sub_id),
                        id: sub_id.into_string(),
                        name: sub.name.to_string(),
                        display_name: display_name(sub.name),
                        merchant_names,
                    }
                })
                .collect();

            let assignment = rollup(
                sub_categories.iter().flat_map(|s| s.merchant_names.iter()),
                current_budget_id,
            );

            CategoryNode {
                assigned_budgets: prefix_budgets(budgets, &main_id),
                id: main_id.into_string(),
                name: group.name.to_string(),
                display_name: display_name(group.name),
                assignment,
                sub_categories,
            }
        })
        .collect();

    debug!(
        "Built category tree: {} categories from {} transactions (budget: {:?})",
        tree.len(),
        transactions.len(),
        current_budget_id
    );

    tree
}

/// Scoped variant of [`build_category_hierarchy`]; a current budget is required
pub fn build_categories_with_assignment(
    transactions: &[Transaction],
    budgets: &[Budget],
    current_budget_id: Option<i64>,
) -> Result<Vec<CategoryNode>> {
    let current = current_budget_id
        .ok_or_else(|| Error::InvalidArgument("Current budget ID is required".into()))?;
    Ok(build_category_hierarchy(transactions, budgets, Some(current)))
}

/// Merchants no budget claims, in tree order
pub fn unassigned_merchants(tree: &[CategoryNode]) -> Vec<UnassignedMerchant> {
    tree.iter()
        .flat_map(|main| {
            main.sub_categories.iter().flat_map(move |sub| {
                sub.merchant_names
                    .iter()
                    .filter(|m| m.assigned_budgets.is_empty())
                    .map(move |m| UnassignedMerchant {
                        id: m.id.clone(),
                        name: m.display_name.clone(),
                        main_category: main.display_name.clone(),
                        sub_category: sub.display_name.clone(),
                    })
            })
        })
        .collect()
}
