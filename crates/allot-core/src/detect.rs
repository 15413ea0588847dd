//! Recurring transaction detection
//!
//! Finds charges that repeat within a short lookback window (two calendar
//! months by default):
//! - `variance == 0`: groups by exact merchant and amount
//! - `variance > 0`: greedy grouping by merchant with amounts within
//!   `variance` of each group's founding transaction
//!
//! Only groups with at least two members are returned, flattened in group
//! creation order.

use std::collections::HashMap;

use chrono::{Months, NaiveDate, Utc};
use tracing::debug;

use crate::config::DetectionConfig;
use crate::models::Transaction;

/// Default relative amount tolerance (3%)
pub const DEFAULT_VARIANCE: f64 = 0.03;

/// Minimum group size for a charge to count as recurring
const MIN_OCCURRENCES: usize = 2;

/// Detector carrying its lookback and tolerance settings
#[derive(Debug, Clone, Default)]
pub struct RecurringDetector {
    config: DetectionConfig,
}

impl RecurringDetector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: DetectionConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &DetectionConfig {
        &self.config
    }

    /// Earliest date still inside the lookback window ending at `today`
    pub fn cutoff(&self, today: NaiveDate) -> NaiveDate {
        today
            .checked_sub_months(Months::new(self.config.lookback_months))
            .unwrap_or(NaiveDate::MIN)
    }

    /// Recurring transactions as of `today`
    pub fn detect<'a>(
        &self,
        transactions: &'a [Transaction],
        today: NaiveDate,
    ) -> Vec<&'a Transaction> {
        let cutoff = self.cutoff(today);
        let recent: Vec<&Transaction> = transactions.iter().filter(|tx| tx.date >= cutoff).collect();

        debug!(
            "Recurring detection: {} of {} transactions on or after {}",
            recent.len(),
            transactions.len(),
            cutoff
        );

        let groups = if self.config.variance > 0.0 {
            group_fuzzy(&recent, self.config.variance)
        } else {
            group_exact(&recent)
        };

        let recurring: Vec<&Transaction> = groups
            .into_iter()
            .filter(|group| group.len() >= MIN_OCCURRENCES)
            .flatten()
            .collect();

        debug!("Found {} recurring transactions", recurring.len());
        recurring
    }

    /// Recurring transactions as of the current UTC date
    pub fn detect_now<'a>(&self, transactions: &'a [Transaction]) -> Vec<&'a Transaction> {
        self.detect(transactions, Utc::now().date_naive())
    }
}

/// Recurring transactions in the two months before `today`
pub fn find_recurring(
    transactions: &[Transaction],
    variance: f64,
    today: NaiveDate,
) -> Vec<&Transaction> {
    RecurringDetector::with_config(DetectionConfig {
        variance,
        ..Default::default()
    })
    .detect(transactions, today)
}

/// [`find_recurring`] as of the current UTC date
pub fn find_recurring_now(transactions: &[Transaction], variance: f64) -> Vec<&Transaction> {
    RecurringDetector::with_config(DetectionConfig {
        variance,
        ..Default::default()
    })
    .detect_now(transactions)
}

/// True if `b` is within `variance` of `a`, relative to the larger magnitude
fn within_variance(a: f64, b: f64, variance: f64) -> bool {
    let allowed = variance * a.abs().max(b.abs());
    (a - b).abs() <= allowed
}

/// Hashable amount key; `-0.0` and `0.0` share a group
fn amount_key(amount: f64) -> u64 {
    if amount == 0.0 {
        0.0f64.to_bits()
    } else {
        amount.to_bits()
    }
}

fn group_exact<'a>(transactions: &[&'a Transaction]) -> Vec<Vec<&'a Transaction>> {
    let mut groups: Vec<Vec<&'a Transaction>> = Vec::new();
    let mut index: HashMap<(Option<&'a str>, u64), usize> = HashMap::new();

    for &tx in transactions {
        let key = (tx.merchant_name.as_deref(), amount_key(tx.amount));
        match index.get(&key) {
            Some(&pos) => groups[pos].push(tx),
            None => {
                index.insert(key, groups.len());
                groups.push(vec![tx]);
            }
        }
    }

    groups
}

fn group_fuzzy<'a>(transactions: &[&'a Transaction], variance: f64) -> Vec<Vec<&'a Transaction>> {
    let mut groups: Vec<Vec<&'a Transaction>> = Vec::new();

    for &tx in transactions {
        // Only the founding member anchors the tolerance window
        let target = groups.iter_mut().find(|group| {
            let founder = group[0];
            founder.merchant_name == tx.merchant_name
                && within_variance(founder.amount, tx.amount, variance)
        });

        match target {
            Some(group) => group.push(tx),
            None => groups.push(vec![tx]),
        }
    }

    groups
}
