//! Domain models for Allot

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::category_path::CategoryPath;

/// A categorized bank transaction, as handed over by the surrounding app
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: i64,
    /// Signed amount in currency units
    pub amount: f64,
    pub date: NaiveDate,
    #[serde(default)]
    pub main_category: Option<String>,
    #[serde(default)]
    pub sub_category: Option<String>,
    #[serde(default)]
    pub merchant_name: Option<String>,
}

impl Transaction {
    /// Top-level category label, `None` when absent or empty
    pub fn main_category(&self) -> Option<&str> {
        non_empty(self.main_category.as_deref())
    }

    /// Second-level category label, `None` when absent or empty
    pub fn sub_category(&self) -> Option<&str> {
        non_empty(self.sub_category.as_deref())
    }

    /// Merchant label, `None` when absent or empty
    pub fn merchant(&self) -> Option<&str> {
        non_empty(self.merchant_name.as_deref())
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|s| !s.is_empty())
}

/// A budget and the category paths it claims
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Budget {
    pub id: i64,
    pub name: String,
    /// Budget ceiling for the period
    #[serde(default)]
    pub amount: f64,
    /// Claimed category paths (`main`, `main:sub` or `main:sub:merchant`)
    #[serde(default)]
    pub categories: Option<Vec<String>>,
}

impl Budget {
    pub fn new(id: i64, name: impl Into<String>, amount: f64) -> Self {
        Self {
            id,
            name: name.into(),
            amount,
            categories: None,
        }
    }

    pub fn with_categories<I, S>(mut self, categories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.categories = Some(categories.into_iter().map(Into::into).collect());
        self
    }

    /// Claimed paths, empty when the budget has none
    pub fn categories(&self) -> &[String] {
        self.categories.as_deref().unwrap_or(&[])
    }

    /// True if any claimed path starts with `path`
    pub fn claims_prefix(&self, path: &CategoryPath) -> bool {
        self.categories().iter().any(|c| path.is_prefix_of(c))
    }

    /// True if `path` is claimed literally
    pub fn claims_exact(&self, path: &str) -> bool {
        self.categories().iter().any(|c| c == path)
    }

    pub fn to_ref(&self) -> BudgetRef {
        BudgetRef {
            id: self.id,
            name: self.name.clone(),
        }
    }
}

/// Budget identity shown next to a tree node
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BudgetRef {
    pub id: i64,
    pub name: String,
}

/// Assignment state of a tree node relative to the current budget
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Assignment {
    /// Every eligible descendant merchant is assigned to the current budget
    Assigned,
    /// Some, but not all, eligible descendant merchants are assigned
    Partial,
    /// No eligible descendant merchant is assigned
    Unassigned,
    /// No current budget was given
    Unscoped,
}

impl Assignment {
    /// Rollup over the eligible merchants of a node
    pub fn from_rollup(all_assigned: bool, some_assigned: bool) -> Self {
        if all_assigned {
            Self::Assigned
        } else if some_assigned {
            Self::Partial
        } else {
            Self::Unassigned
        }
    }

    /// Tri-state "fully assigned" flag; `None` when unscoped
    pub fn assigned(&self) -> Option<bool> {
        match self {
            Self::Assigned => Some(true),
            Self::Partial | Self::Unassigned => Some(false),
            Self::Unscoped => None,
        }
    }

    /// Tri-state "partially assigned" flag; `None` when unscoped
    pub fn partially_assigned(&self) -> Option<bool> {
        match self {
            Self::Partial => Some(true),
            Self::Assigned | Self::Unassigned => Some(false),
            Self::Unscoped => None,
        }
    }

    pub fn is_assigned(&self) -> bool {
        matches!(self, Self::Assigned)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Assigned => "assigned",
            Self::Partial => "partial",
            Self::Unassigned => "unassigned",
            Self::Unscoped => "unscoped",
        }
    }
}

impl std::fmt::Display for Assignment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Top level of the category tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", into = "CategoryNodeWire")]
pub struct CategoryNode {
    pub id: String,
    pub name: String,
    pub display_name: String,
    pub assignment: Assignment,
    pub assigned_budgets: Vec<BudgetRef>,
    pub sub_categories: Vec<SubCategoryNode>,
}

impl CategoryNode {
    /// All merchants under this category, in tree order
    pub fn merchants(&self) -> impl Iterator<Item = &MerchantNode> {
        self.sub_categories
            .iter()
            .flat_map(|sub| sub.merchant_names.iter())
    }
}

/// Second level of the category tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", into = "SubCategoryNodeWire")]
pub struct SubCategoryNode {
    pub id: String,
    pub name: String,
    pub display_name: String,
    pub assignment: Assignment,
    pub assigned_budgets: Vec<BudgetRef>,
    pub merchant_names: Vec<MerchantNode>,
}

/// Leaf of the category tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", into = "MerchantNodeWire")]
pub struct MerchantNode {
    pub id: String,
    pub name: String,
    pub display_name: String,
    /// `Assigned`, `Unassigned` or `Unscoped`
    pub assignment: Assignment,
    /// Claimed by some budget other than the current one; `None` when unscoped
    pub assigned_other_budget: Option<bool>,
    pub assigned_budgets: Vec<BudgetRef>,
}

impl MerchantNode {
    /// Owned by another budget and left out of parent rollups
    pub fn is_owned_elsewhere(&self) -> bool {
        self.assigned_other_budget == Some(true)
    }

    pub fn is_claimed_by(&self, budget_id: i64) -> bool {
        self.assigned_budgets.iter().any(|b| b.id == budget_id)
    }
}

// Serialized forms carry the `assigned` / `partiallyAssigned` tri-state
// flags next to `assignment`. Deserializing ignores those keys.

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CategoryNodeWire {
    id: String,
    name: String,
    display_name: String,
    assignment: Assignment,
    assigned: Option<bool>,
    partially_assigned: Option<bool>,
    assigned_budgets: Vec<BudgetRef>,
    sub_categories: Vec<SubCategoryNode>,
}

impl From<CategoryNode> for CategoryNodeWire {
    fn from(node: CategoryNode) -> Self {
        Self {
            assigned: node.assignment.assigned(),
            partially_assigned: node.assignment.partially_assigned(),
            id: node.id,
            name: node.name,
            display_name: node.display_name,
            assignment: node.assignment,
            assigned_budgets: node.assigned_budgets,
            sub_categories: node.sub_categories,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SubCategoryNodeWire {
    id: String,
    name: String,
    display_name: String,
    assignment: Assignment,
    assigned: Option<bool>,
    partially_assigned: Option<bool>,
    assigned_budgets: Vec<BudgetRef>,
    merchant_names: Vec<MerchantNode>,
}

impl From<SubCategoryNode> for SubCategoryNodeWire {
    fn from(node: SubCategoryNode) -> Self {
        Self {
            assigned: node.assignment.assigned(),
            partially_assigned: node.assignment.partially_assigned(),
            id: node.id,
            name: node.name,
            display_name: node.display_name,
            assignment: node.assignment,
            assigned_budgets: node.assigned_budgets,
            merchant_names: node.merchant_names,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct MerchantNodeWire {
    id: String,
    name: String,
    display_name: String,
    assignment: Assignment,
    assigned: Option<bool>,
    partially_assigned: Option<bool>,
    assigned_other_budget: Option<bool>,
    assigned_budgets: Vec<BudgetRef>,
}

impl From<MerchantNode> for MerchantNodeWire {
    fn from(node: MerchantNode) -> Self {
        Self {
            assigned: node.assignment.assigned(),
            partially_assigned: node.assignment.partially_assigned(),
            id: node.id,
            name: node.name,
            display_name: node.display_name,
            assignment: node.assignment,
            assigned_other_budget: node.assigned_other_budget,
            assigned_budgets: node.assigned_budgets,
        }
    }
}

/// A merchant no budget claims, for the unassigned categories report
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnassignedMerchant {
    pub id: String,
    pub name: String,
    pub main_category: String,
    pub sub_category: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transaction_serde_camel_case() {
        let json = r#"{
            "id": 7,
            "amount": 12.5,
            "date": "2024-03-02",
            "mainCategory": "FOOD_AND_DRINK",
            "subCategory": "GROCERIES",
            "merchantName": null
        }"#;
        let tx: Transaction = serde_json::from_str(json).unwrap();
        assert_eq!(tx.id, 7);
        assert_eq!(tx.date, NaiveDate::from_ymd_opt(2024, 3, 2).unwrap());
        assert_eq!(tx.main_category(), Some("FOOD_AND_DRINK"));
        assert_eq!(tx.merchant(), None);
    }

    #[test]
    fn test_transaction_missing_fields_and_empty_strings() {
        let json = r#"{"id": 1, "amount": -3.0, "date": "2024-01-01", "subCategory": ""}"#;
        let tx: Transaction = serde_json::from_str(json).unwrap();
        assert_eq!(tx.main_category(), None);
        assert_eq!(tx.sub_category(), None);
    }

    #[test]
    fn test_budget_null_categories() {
        let json = r#"{"id": 3, "name": "Fun", "categories": null}"#;
        let budget: Budget = serde_json::from_str(json).unwrap();
        assert!(budget.categories().is_empty());
        assert_eq!(budget.amount, 0.0);
        assert!(!budget.claims_prefix(&CategoryPath::main("Food")));
    }

    #[test]
    fn test_budget_claims() {
        let budget = Budget::new(1, "Food", 400.0).with_categories(["Food:Groceries:CostCo"]);
        assert!(budget.claims_prefix(&CategoryPath::main("Food")));
        assert!(budget.claims_prefix(&CategoryPath::sub("Food", "Groceries")));
        assert!(!budget.claims_prefix(&CategoryPath::sub("Food", "Restaurants")));
        assert!(budget.claims_exact("Food:Groceries:CostCo"));
        assert!(!budget.claims_exact("Food:Groceries"));
    }

    #[test]
    fn test_assignment_tri_state() {
        assert_eq!(Assignment::Assigned.assigned(), Some(true));
        assert_eq!(Assignment::Assigned.partially_assigned(), Some(false));
        assert_eq!(Assignment::Partial.assigned(), Some(false));
        assert_eq!(Assignment::Partial.partially_assigned(), Some(true));
        assert_eq!(Assignment::Unassigned.partially_assigned(), Some(false));
        assert_eq!(Assignment::Unscoped.assigned(), None);
        assert_eq!(Assignment::Unscoped.partially_assigned(), None);
    }

    #[test]
    fn test_assignment_from_rollup() {
        assert_eq!(Assignment::from_rollup(true, true), Assignment::Assigned);
        assert_eq!(Assignment::from_rollup(true, false), Assignment::Assigned);
        assert_eq!(Assignment::from_rollup(false, true), Assignment::Partial);
        assert_eq!(Assignment::from_rollup(false, false), Assignment::Unassigned);
    }

    #[test]
    fn test_merchant_node_serde() {
        let node = MerchantNode {
            id: "Food:Groceries:CostCo".to_string(),
            name: "CostCo".to_string(),
            display_name: "CostCo".to_string(),
            assignment: Assignment::Assigned,
            assigned_other_budget: Some(false),
            assigned_budgets: vec![BudgetRef {
                id: 1,
                name: "Groceries".to_string(),
            }],
        };
        let json = serde_json::to_string(&node).unwrap();
        assert!(json.contains("\"assignment\":\"assigned\""));
        assert!(json.contains("\"assignedOtherBudget\":false"));
        assert!(json.contains("\"displayName\":\"CostCo\""));
        assert!(json.contains("\"assigned\":true"));
        assert!(json.contains("\"partiallyAssigned\":false"));
    }

    #[test]
    fn test_tree_serde_tri_state_flags() {
        let merchant = MerchantNode {
            id: "Food:Groceries:CostCo".to_string(),
            name: "CostCo".to_string(),
            display_name: "CostCo".to_string(),
            assignment: Assignment::Unscoped,
            assigned_other_budget: None,
            assigned_budgets: Vec::new(),
        };
        let node = CategoryNode {
            id: "Food".to_string(),
            name: "Food".to_string(),
            display_name: "Food".to_string(),
            assignment: Assignment::Partial,
            assigned_budgets: Vec::new(),
            sub_categories: vec![SubCategoryNode {
                id: "Food:Groceries".to_string(),
                name: "Groceries".to_string(),
                display_name: "Groceries".to_string(),
                assignment: Assignment::Unscoped,
                assigned_budgets: Vec::new(),
                merchant_names: vec![merchant],
            }],
        };

        let value = serde_json::to_value(&node).unwrap();
        assert_eq!(value["assigned"], serde_json::json!(false));
        assert_eq!(value["partiallyAssigned"], serde_json::json!(true));

        let sub = &value["subCategories"][0];
        assert!(sub["assigned"].is_null());
        assert!(sub["partiallyAssigned"].is_null());
        assert!(sub["merchantNames"][0]["assignedOtherBudget"].is_null());

        // The extra keys are ignored on the way back in
        let back: CategoryNode = serde_json::from_value(value).unwrap();
        assert_eq!(back, node);
    }
}
