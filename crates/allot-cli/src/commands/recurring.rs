//! Recurring charge command implementation

use allot_core::{DetectionConfig, RecurringDetector, Transaction};
use anyhow::Result;
use chrono::{NaiveDate, Utc};

use super::{truncate, Ledger};

/// Header plus one row per recurring charge
pub fn render_recurring(
    ledger: &Ledger,
    detector: &RecurringDetector,
    cutoff: NaiveDate,
    recurring: &[&Transaction],
) -> Vec<String> {
    let mut lines = vec![
        String::new(),
        format!(
            "🔁 Recurring Charges (since {}, tolerance {:.1}%)",
            cutoff,
            detector.config().variance * 100.0
        ),
        "   ─────────────────────────────────────────────────────────────".to_string(),
    ];

    for tx in recurring {
        lines.push(format!(
            "   {} │ {:24} │ {:>10} │ #{}",
            tx.date,
            truncate(tx.merchant().unwrap_or("(no merchant)"), 24),
            ledger.money(tx.amount),
            tx.id
        ));
    }

    lines
}

/// Detect as of `today`, or the current UTC date when `None`
pub fn cmd_recurring(
    ledger: &Ledger,
    variance: Option<f64>,
    today: Option<NaiveDate>,
    json: bool,
) -> Result<()> {
    let config = DetectionConfig {
        variance: variance.unwrap_or(ledger.settings.detection.variance),
        ..ledger.settings.detection.clone()
    };
    if !config.variance.is_finite() || config.variance < 0.0 {
        anyhow::bail!("--variance must be a non-negative number");
    }

    let detector = RecurringDetector::with_config(config);
    let recurring = match today {
        Some(date) => detector.detect(&ledger.transactions, date),
        None => detector.detect_now(&ledger.transactions),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&recurring)?);
        return Ok(());
    }

    let cutoff = detector.cutoff(today.unwrap_or_else(|| Utc::now().date_naive()));

    if recurring.is_empty() {
        println!("No recurring charges found since {}.", cutoff);
        return Ok(());
    }

    for line in render_recurring(ledger, &detector, cutoff, &recurring) {
        println!("{}", line);
    }

    Ok(())
}
