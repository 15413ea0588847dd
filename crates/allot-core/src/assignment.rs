//! Category assignment changes
//!
//! Budgets persist a flat list of category paths. Toggling a node in the
//! assignment tree turns into a set of merchant-level additions and removals,
//! which are then applied to the stored list.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::category_path::CategoryPath;
use crate::error::{Error, Result};
use crate::models::{CategoryNode, MerchantNode};

/// Paths to add to and remove from a budget's category list
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryChanges {
    pub additions: Vec<String>,
    pub removals: Vec<String>,
}

impl CategoryChanges {
    pub fn is_empty(&self) -> bool {
        self.additions.is_empty() && self.removals.is_empty()
    }
}

/// Changes produced by clicking `node_id` in the tree built for `budget_id`
///
/// - main category: assigning adds every merchant under it not yet assigned
///   here (including merchants owned by other budgets); unassigning removes
///   every merchant under it
/// - sub-category: only merchants that are free or already claimed by this
///   budget are touched
/// - merchant: exactly that path
pub fn toggle_changes(
    tree: &[CategoryNode],
    budget_id: i64,
    node_id: &str,
    currently_assigned: bool,
) -> Result<CategoryChanges> {
    let assign = !currently_assigned;
    let path = CategoryPath::from(node_id);
    let (main, sub, merchant) = path.segments();

    let changes = match (sub, merchant) {
        (None, _) => {
            let category = tree
                .iter()
                .find(|c| c.id == node_id)
                .ok_or_else(|| Error::NotFound(format!("Category {}", node_id)))?;
            let merchants: Vec<&MerchantNode> = category.merchants().collect();

            if assign {
                CategoryChanges {
                    additions: ids(merchants.into_iter().filter(|m| !m.assignment.is_assigned())),
                    removals: Vec::new(),
                }
            } else {
                CategoryChanges {
                    additions: Vec::new(),
                    removals: ids(merchants.into_iter()),
                }
            }
        }
        (Some(_), None) => {
            let sub_category = tree
                .iter()
                .find(|c| c.id == main)
                .and_then(|c| c.sub_categories.iter().find(|s| s.id == node_id))
                .ok_or_else(|| Error::NotFound(format!("Sub-category {}", node_id)))?;

            let eligible: Vec<&MerchantNode> = sub_category
                .merchant_names
                .iter()
                .filter(|m| {
                    (!m.is_owned_elsewhere() && !m.assignment.is_assigned())
                        || m.is_claimed_by(budget_id)
                })
                .collect();

            if assign {
                CategoryChanges {
                    additions: ids(eligible.into_iter().filter(|m| !m.assignment.is_assigned())),
                    removals: Vec::new(),
                }
            } else {
                CategoryChanges {
                    additions: Vec::new(),
                    removals: ids(eligible.into_iter()),
                }
            }
        }
        (Some(_), Some(_)) => {
            if assign {
                CategoryChanges {
                    additions: vec![node_id.to_string()],
                    removals: Vec::new(),
                }
            } else {
                CategoryChanges {
                    additions: Vec::new(),
                    removals: vec![node_id.to_string()],
                }
            }
        }
    };

    debug!(
        "Toggle {} for budget {}: +{} -{}",
        node_id,
        budget_id,
        changes.additions.len(),
        changes.removals.len()
    );

    Ok(changes)
}

fn ids<'a>(merchants: impl Iterator<Item = &'a MerchantNode>) -> Vec<String> {
    merchants.map(|m| m.id.clone()).collect()
}

/// Drop removed paths, then union the additions (order-preserving, deduplicated)
pub fn apply_category_changes(existing: &[String], changes: &CategoryChanges) -> Vec<String> {
    let removals: HashSet<&str> = changes.removals.iter().map(String::as_str).collect();
    let mut seen: HashSet<&str> = HashSet::new();

    existing
        .iter()
        .filter(|c| !removals.contains(c.as_str()))
        .chain(changes.additions.iter())
        .filter(|c| seen.insert(c.as_str()))
        .cloned()
        .collect()
}
