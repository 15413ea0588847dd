//! Loading transactions and budgets from JSON or CSV files
//!
//! The format is chosen by file extension. CSV transactions use the columns
//! `id,date,amount,mainCategory,subCategory,merchantName`; CSV budgets use
//! `id,name,amount,categories` with categories separated by `;`.

use std::collections::HashSet;
use std::fs;
use std::io::Read;
use std::path::Path;

use chrono::NaiveDate;
use csv::{ReaderBuilder, StringRecord};
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::models::{Budget, Transaction};

/// Separator between category paths in a CSV budget row
const CATEGORY_LIST_SEPARATOR: char = ';';

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Json,
    Csv,
}

fn detect_format(path: &Path) -> Result<Format> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());

    match ext.as_deref() {
        Some("json") => Ok(Format::Json),
        Some("csv") => Ok(Format::Csv),
        _ => Err(Error::Import(format!(
            "Unsupported file type: {} (expected .json or .csv)",
            path.display()
        ))),
    }
}

/// Load transactions from a `.json` array or `.csv` file
pub fn load_transactions(path: &Path) -> Result<Vec<Transaction>> {
    let transactions: Vec<Transaction> = match detect_format(path)? {
        Format::Json => serde_json::from_str(&fs::read_to_string(path)?)?,
        Format::Csv => parse_transactions_csv(fs::File::open(path)?)?,
    };

    info!(
        "Loaded {} transactions from {}",
        transactions.len(),
        path.display()
    );
    Ok(transactions)
}

/// Load budgets from a `.json` array or `.csv` file
pub fn load_budgets(path: &Path) -> Result<Vec<Budget>> {
    let budgets: Vec<Budget> = match detect_format(path)? {
        Format::Json => serde_json::from_str(&fs::read_to_string(path)?)?,
        Format::Csv => parse_budgets_csv(fs::File::open(path)?)?,
    };

    check_unique_ids(&budgets)?;

    info!("Loaded {} budgets from {}", budgets.len(), path.display());
    Ok(budgets)
}

/// Write budgets back as pretty-printed JSON
pub fn save_budgets(path: &Path, budgets: &[Budget]) -> Result<()> {
    if detect_format(path)? != Format::Json {
        return Err(Error::Import(format!(
            "Budgets can only be saved as JSON: {}",
            path.display()
        )));
    }

    let json = serde_json::to_string_pretty(budgets)?;
    fs::write(path, json)?;
    debug!("Saved {} budgets to {}", budgets.len(), path.display());
    Ok(())
}

/// Column positions looked up by header name
struct Columns {
    headers: StringRecord,
}

impl Columns {
    fn index(&self, name: &str) -> Option<usize> {
        self.headers
            .iter()
            .position(|h| h.trim().eq_ignore_ascii_case(name))
    }

    fn require(&self, name: &str) -> Result<usize> {
        self.index(name)
            .ok_or_else(|| Error::Import(format!("Missing column: {}", name)))
    }
}

/// Optional text field; blank cells become `None`
fn optional_field(record: &StringRecord, col: Option<usize>) -> Option<String> {
    col.and_then(|i| record.get(i))
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(String::from)
}

fn required_field<'r>(record: &'r StringRecord, col: usize, name: &str) -> Result<&'r str> {
    record
        .get(col)
        .map(|s| s.trim())
        .ok_or_else(|| Error::Import(format!("Missing {}", name)))
}

fn parse_id(s: &str) -> Result<i64> {
    s.parse::<i64>()
        .map_err(|_| Error::Import(format!("Unable to parse id: {}", s)))
}

/// Parse transaction CSV with a header row
pub fn parse_transactions_csv<R: Read>(reader: R) -> Result<Vec<Transaction>> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let columns = Columns {
        headers: rdr.headers()?.clone(),
    };
    let id_col = columns.require("id")?;
    let date_col = columns.require("date")?;
    let amount_col = columns.require("amount")?;
    let main_col = columns.index("mainCategory");
    let sub_col = columns.index("subCategory");
    let merchant_col = columns.index("merchantName");

    let mut transactions = Vec::new();

    for result in rdr.records() {
        let record = result?;

        let id = parse_id(required_field(&record, id_col, "id")?)?;
        let date = parse_date(required_field(&record, date_col, "date")?)?;
        let amount = parse_amount(required_field(&record, amount_col, "amount")?)?;

        transactions.push(Transaction {
            id,
            amount,
            date,
            main_category: optional_field(&record, main_col),
            sub_category: optional_field(&record, sub_col),
            merchant_name: optional_field(&record, merchant_col),
        });
    }

    debug!("Parsed {} CSV transactions", transactions.len());
    Ok(transactions)
}

/// Parse budget CSV with a header row
pub fn parse_budgets_csv<R: Read>(reader: R) -> Result<Vec<Budget>> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let columns = Columns {
        headers: rdr.headers()?.clone(),
    };
    let id_col = columns.require("id")?;
    let name_col = columns.require("name")?;
    let amount_col = columns.index("amount");
    let categories_col = columns.index("categories");

    let mut budgets = Vec::new();

    for result in rdr.records() {
        let record = result?;

        let id = parse_id(required_field(&record, id_col, "id")?)?;
        let name = required_field(&record, name_col, "name")?.to_string();
        let amount = match optional_field(&record, amount_col) {
            Some(s) => parse_amount(&s)?,
            None => 0.0,
        };
        // A blank cell means the budget has never been assigned anything
        let categories = optional_field(&record, categories_col).map(|list| {
            list.split(CATEGORY_LIST_SEPARATOR)
                .map(str::trim)
                .filter(|c| !c.is_empty())
                .map(String::from)
                .collect()
        });

        budgets.push(Budget {
            id,
            name,
            amount,
            categories,
        });
    }

    debug!("Parsed {} CSV budgets", budgets.len());
    Ok(budgets)
}

/// Date layouts accepted in CSV files, tried in order (ISO first, then US)
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%Y", "%m/%d/%y", "%m-%d-%Y", "%d/%m/%Y"];

fn parse_date(s: &str) -> Result<NaiveDate> {
    let s = s.trim();
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
        .ok_or_else(|| Error::Import(format!("Unable to parse date: {}", s)))
}

/// Amount cell such as `12.50`, `-$1,200.00` or accounting-style `(40.00)`
fn parse_amount(s: &str) -> Result<f64> {
    let trimmed = s.trim();
    let (negated, body) = match trimmed
        .strip_prefix('(')
        .and_then(|rest| rest.strip_suffix(')'))
    {
        Some(inner) => (true, inner),
        None => (false, trimmed),
    };

    let digits: String = body
        .chars()
        .filter(|c| !matches!(c, '$' | ',') && !c.is_whitespace())
        .collect();

    match digits.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(if negated { -value } else { value }),
        _ => Err(Error::Import(format!("Unable to parse amount: {}", s))),
    }
}

/// Budget ids must be unique within a file
fn check_unique_ids(budgets: &[Budget]) -> Result<()> {
    let mut seen = HashSet::new();
    match budgets.iter().find(|b| !seen.insert(b.id)) {
        Some(dup) => Err(Error::InvalidData(format!("Duplicate budget id: {}", dup.id))),
        None => Ok(()),
    }
}
