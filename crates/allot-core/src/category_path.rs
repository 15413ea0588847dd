//! Colon-joined category paths
//!
//! A path is built from up to three segments (`main`, `main:sub`,
//! `main:sub:merchant`). Empty or missing segments are skipped when joining,
//! so the same string identifies a tree node and a budget claim.

use serde::{Deserialize, Serialize};

use crate::models::Transaction;

/// Segment separator
pub const SEPARATOR: char = ':';

/// A category path such as `Food:Groceries:CostCo`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryPath(String);

impl CategoryPath {
    /// Join the non-empty segments with `:`
    pub fn new(main: &str, sub: Option<&str>, merchant: Option<&str>) -> Self {
        let joined = [Some(main), sub, merchant]
            .into_iter()
            .flatten()
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(":");
        Self(joined)
    }

    pub fn main(main: &str) -> Self {
        Self::new(main, None, None)
    }

    pub fn sub(main: &str, sub: &str) -> Self {
        Self::new(main, Some(sub), None)
    }

    pub fn merchant(main: &str, sub: &str, merchant: &str) -> Self {
        Self::new(main, Some(sub), Some(merchant))
    }

    /// Merchant-level path of a transaction; `None` unless all three fields are set
    pub fn from_transaction(tx: &Transaction) -> Option<Self> {
        match (tx.main_category(), tx.sub_category(), tx.merchant()) {
            (Some(main), Some(sub), Some(merchant)) => Some(Self::merchant(main, sub, merchant)),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }

    /// Split back into `(main, sub, merchant)`; extra separators stay in the merchant
    pub fn segments(&self) -> (&str, Option<&str>, Option<&str>) {
        let mut parts = self.0.splitn(3, SEPARATOR);
        let main = parts.next().unwrap_or_default();
        (main, parts.next(), parts.next())
    }

    /// Literal string prefix test, as used for main/sub assignment lookups
    pub fn is_prefix_of(&self, other: &str) -> bool {
        other.starts_with(self.0.as_str())
    }
}

impl std::fmt::Display for CategoryPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for CategoryPath {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for CategoryPath {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<CategoryPath> for String {
    fn from(path: CategoryPath) -> Self {
        path.0
    }
}

/// Label with underscores shown as spaces (`FOOD_AND_DRINK` -> `FOOD AND DRINK`)
pub fn display_name(label: &str) -> String {
    label.replace('_', " ")
}
