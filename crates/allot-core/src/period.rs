//! Month windows for filtering transactions

use chrono::{Datelike, Months, NaiveDate};

use crate::error::{Error, Result};
use crate::models::Transaction;

/// First and last day of the month containing `date`
pub fn month_range(date: NaiveDate) -> (NaiveDate, NaiveDate) {
    let first = date.with_day(1).unwrap_or(date);
    let last = first
        .checked_add_months(Months::new(1))
        .and_then(|next| next.pred_opt())
        .unwrap_or(NaiveDate::MAX);
    (first, last)
}

/// Parse `YYYY-MM` into that month's date range
pub fn parse_month(s: &str) -> Result<(NaiveDate, NaiveDate)> {
    let s = s.trim();
    let first = NaiveDate::parse_from_str(&format!("{}-01", s), "%Y-%m-%d")
        .map_err(|_| Error::InvalidArgument(format!("Invalid month '{}', expected YYYY-MM", s)))?;
    Ok(month_range(first))
}

/// Transactions dated within `from..=to`, preserving order
pub fn filter_by_date_range(
    transactions: &[Transaction],
    from: NaiveDate,
    to: NaiveDate,
) -> Vec<Transaction> {
    transactions
        .iter()
        .filter(|tx| tx.date >= from && tx.date <= to)
        .cloned()
        .collect()
}
