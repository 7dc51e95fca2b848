//! Dashboard statistics over the transaction dataset.
//!
//! A reporting convenience for the frontend, independent of the scoring
//! path: aggregate counts and rates over the CSV dataset plus a small random
//! sample of rows presented as "recent" activity. An unreadable dataset is
//! not an error to the client; a fixed fallback payload is returned instead.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::Utc;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Dataset columns the dashboard needs; other columns are ignored.
#[derive(Debug, Clone, Deserialize)]
struct DatasetRow {
    transaction_id: u32,
    user_id: u32,
    amount: f64,
    category: String,
    payment_method: String,
    is_fraud: u8,
}

impl DatasetRow {
    fn is_fraud(&self) -> bool {
        self.is_fraud != 0
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RecentTransaction {
    pub id: String,
    pub amount: f64,
    pub status: &'static str,
    pub confidence: f64,
    pub time: String,
    pub user: String,
    pub category: String,
    #[serde(rename = "paymentMethod")]
    pub payment_method: String,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PaymentMethodStats {
    pub method: String,
    pub total: u64,
    pub fraud: u64,
    pub fraud_rate: f64,
}

/// Wire format of `GET /api/stats`, matching the dashboard client.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_transactions: u64,
    pub fraud_detected: u64,
    pub legitimate_transactions: u64,
    pub total_saved: String,
    pub fraud_rate: f64,
    pub avg_transaction_amount: String,
    pub recent_transactions: Vec<RecentTransaction>,
    pub payment_method_stats: Vec<PaymentMethodStats>,
    pub last_updated: String,
}

impl DashboardStats {
    /// Fixed payload served when the dataset cannot be read.
    pub fn fallback() -> Self {
        Self {
            total_transactions: 0,
            fraud_detected: 0,
            legitimate_transactions: 0,
            total_saved: format_inr(0.0),
            fraud_rate: 0.0,
            avg_transaction_amount: format_inr(0.0),
            recent_transactions: Vec::new(),
            payment_method_stats: Vec::new(),
            last_updated: Utc::now().to_rfc3339(),
        }
    }
}

/// Compute dashboard statistics, swallowing dataset errors into the fallback
/// payload.
pub fn dashboard_stats(dataset_path: &str) -> DashboardStats {
    match compute(Path::new(dataset_path)) {
        Ok(stats) => stats,
        Err(err) => {
            warn!(path = dataset_path, error = %err, "Dataset unavailable, serving fallback stats");
            DashboardStats::fallback()
        }
    }
}

fn compute(path: &Path) -> Result<DashboardStats> {
    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("opening dataset {}", path.display()))?;

    let rows: Vec<DatasetRow> = reader
        .deserialize()
        .collect::<std::result::Result<_, csv::Error>>()
        .context("parsing dataset rows")?;

    let total = rows.len() as u64;
    let fraud_rows: Vec<&DatasetRow> = rows.iter().filter(|r| r.is_fraud()).collect();
    let legit_rows: Vec<&DatasetRow> = rows.iter().filter(|r| !r.is_fraud()).collect();
    let fraud = fraud_rows.len() as u64;
    let legitimate = total - fraud;

    let total_saved: f64 = fraud_rows.iter().map(|r| r.amount).sum();
    let avg_amount = if total == 0 {
        0.0
    } else {
        rows.iter().map(|r| r.amount).sum::<f64>() / total as f64
    };
    let fraud_rate = if total == 0 {
        0.0
    } else {
        round2(fraud as f64 / total as f64 * 100.0)
    };

    Ok(DashboardStats {
        total_transactions: total,
        fraud_detected: fraud,
        legitimate_transactions: legitimate,
        total_saved: format_inr(total_saved),
        fraud_rate,
        avg_transaction_amount: format_inr(avg_amount),
        recent_transactions: sample_recent(&fraud_rows, &legit_rows),
        payment_method_stats: payment_breakdown(&rows),
        last_updated: Utc::now().to_rfc3339(),
    })
}

/// Up to 3 fraud + 3 legitimate rows, shuffled, capped at 6 entries.
fn sample_recent(fraud: &[&DatasetRow], legit: &[&DatasetRow]) -> Vec<RecentTransaction> {
    let mut rng = rand::thread_rng();
    let mut recent = Vec::with_capacity(6);

    for row in fraud.choose_multiple(&mut rng, 3) {
        recent.push(RecentTransaction {
            id: format!("TXN{:04}", row.transaction_id),
            amount: row.amount,
            status: "fraud",
            confidence: round2(rng.gen_range(85.0..95.0)),
            time: format!("{} hours ago", rng.gen_range(1..24)),
            user: format!("user_{}@email.com", row.user_id),
            category: row.category.clone(),
            payment_method: row.payment_method.clone(),
        });
    }
    for row in legit.choose_multiple(&mut rng, 3) {
        recent.push(RecentTransaction {
            id: format!("TXN{:04}", row.transaction_id),
            amount: row.amount,
            status: "legitimate",
            confidence: round2(rng.gen_range(88.0..98.0)),
            time: format!("{} hours ago", rng.gen_range(1..12)),
            user: format!("user_{}@email.com", row.user_id),
            category: row.category.clone(),
            payment_method: row.payment_method.clone(),
        });
    }

    recent.shuffle(&mut rng);
    recent.truncate(6);
    recent
}

fn payment_breakdown(rows: &[DatasetRow]) -> Vec<PaymentMethodStats> {
    // First-appearance order keeps the table stable for a given dataset.
    let mut stats: Vec<PaymentMethodStats> = Vec::new();
    for row in rows {
        match stats.iter_mut().find(|s| s.method == row.payment_method) {
            Some(entry) => {
                entry.total += 1;
                entry.fraud += u64::from(row.is_fraud());
            }
            None => stats.push(PaymentMethodStats {
                method: row.payment_method.clone(),
                total: 1,
                fraud: u64::from(row.is_fraud()),
                fraud_rate: 0.0,
            }),
        }
    }
    for entry in &mut stats {
        entry.fraud_rate = round2(entry.fraud as f64 / entry.total as f64 * 100.0);
    }
    stats
}

fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

/// Rupee formatting with thousands separators, two decimals.
fn format_inr(amount: f64) -> String {
    let cents = (amount * 100.0).round() as i64;
    let rupees = cents / 100;
    let fraction = (cents % 100).abs();

    let digits = rupees.abs().to_string();
    let mut grouped = String::new();
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    let sign = if rupees < 0 { "-" } else { "" };
    format!("₹{sign}{grouped}.{fraction:02}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const HEADER: &str =
        "transaction_id,user_id,amount,category,payment_method,is_fraud\n";

    fn write_dataset(rows: &[&str]) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{HEADER}").unwrap();
        for row in rows {
            writeln!(file, "{row}").unwrap();
        }
        file.flush().unwrap();
        file
    }

    #[test]
    fn counts_reconcile_with_total() {
        let file = write_dataset(&[
            "1,101,1000.0,groceries,upi,0",
            "2,102,250000.0,electronics,wallet,1",
            "3,103,500.0,books,upi,0",
            "4,104,90000.0,electronics,wallet,1",
            "5,105,40.0,groceries,debit_card,0",
        ]);
        let stats = dashboard_stats(file.path().to_str().unwrap());
        assert_eq!(stats.total_transactions, 5);
        assert_eq!(stats.fraud_detected, 2);
        assert_eq!(stats.legitimate_transactions, 3);
        assert_eq!(
            stats.fraud_detected + stats.legitimate_transactions,
            stats.total_transactions
        );
        assert_eq!(stats.fraud_rate, 40.0);
        assert_eq!(stats.total_saved, "₹340,000.00");
    }

    #[test]
    fn payment_breakdown_rates() {
        let file = write_dataset(&[
            "1,101,1000.0,groceries,upi,0",
            "2,102,250000.0,electronics,wallet,1",
            "3,103,500.0,books,upi,0",
            "4,104,90000.0,electronics,wallet,1",
        ]);
        let stats = dashboard_stats(file.path().to_str().unwrap());
        let wallet = stats
            .payment_method_stats
            .iter()
            .find(|s| s.method == "wallet")
            .unwrap();
        assert_eq!(wallet.total, 2);
        assert_eq!(wallet.fraud, 2);
        assert_eq!(wallet.fraud_rate, 100.0);
        let upi = stats
            .payment_method_stats
            .iter()
            .find(|s| s.method == "upi")
            .unwrap();
        assert_eq!(upi.fraud_rate, 0.0);
    }

    #[test]
    fn recent_sample_is_capped_at_six() {
        let rows: Vec<String> = (1..=40)
            .map(|i| {
                let fraud = u8::from(i % 2 == 0);
                format!("{i},{},{}.0,groceries,upi,{fraud}", 100 + i, 100 * i)
            })
            .collect();
        let refs: Vec<&str> = rows.iter().map(String::as_str).collect();
        let file = write_dataset(&refs);
        let stats = dashboard_stats(file.path().to_str().unwrap());
        assert_eq!(stats.recent_transactions.len(), 6);
        let fraud_count = stats
            .recent_transactions
            .iter()
            .filter(|t| t.status == "fraud")
            .count();
        assert_eq!(fraud_count, 3);
    }

    #[test]
    fn missing_dataset_serves_fallback() {
        let stats = dashboard_stats("/nonexistent/dataset.csv");
        assert_eq!(stats.total_transactions, 0);
        assert_eq!(stats.total_saved, "₹0.00");
        assert!(stats.recent_transactions.is_empty());
        assert!(stats.payment_method_stats.is_empty());
    }

    #[test]
    fn small_dataset_samples_what_exists() {
        let file = write_dataset(&["1,101,1000.0,groceries,upi,0"]);
        let stats = dashboard_stats(file.path().to_str().unwrap());
        assert_eq!(stats.recent_transactions.len(), 1);
        assert_eq!(stats.recent_transactions[0].status, "legitimate");
        assert_eq!(stats.recent_transactions[0].user, "user_101@email.com");
    }

    #[test]
    fn inr_formatting() {
        assert_eq!(format_inr(0.0), "₹0.00");
        assert_eq!(format_inr(1234567.891), "₹1,234,567.89");
        assert_eq!(format_inr(42.5), "₹42.50");
    }
}
