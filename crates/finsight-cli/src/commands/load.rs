//! Snapshot file loaders
//!
//! Files ending in `.csv` are read as CSV with a header row; anything else is
//! parsed as JSON in the engine's own request shapes.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use finsight_core::{Account, AssetClass, Budget, Transaction, TransactionKind};
use serde::de::DeserializeOwned;
use serde::Deserialize;

fn is_csv(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("csv"))
}

fn read_file(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("Failed to read file: {}", path.display()))
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = read_file(path)?;
    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse {} as JSON", path.display()))
}

fn read_csv<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)
        .with_context(|| format!("Failed to open file: {}", path.display()))?;

    let rows = reader
        .deserialize()
        .enumerate()
        .map(|(i, row)| row.with_context(|| format!("{}: bad CSV row {}", path.display(), i + 2)))
        .collect::<Result<Vec<T>>>()?;
    Ok(rows)
}

/// One line of a transactions CSV
#[derive(Debug, Deserialize)]
struct TransactionRow {
    date: String,
    amount: f64,
    category: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    kind: Option<String>,
}

impl TransactionRow {
    fn into_transaction(self) -> Result<Transaction> {
        let date = NaiveDate::parse_from_str(&self.date, "%Y-%m-%d")
            .with_context(|| format!("Invalid date '{}' (use YYYY-MM-DD)", self.date))?;

        let mut tx = Transaction::new(date, self.amount, self.category);
        if let Some(description) = self.description.filter(|d| !d.is_empty()) {
            tx = tx.with_description(description);
        }
        if let Some(kind) = self.kind.filter(|k| !k.is_empty()) {
            let kind: TransactionKind = kind.parse().map_err(|e: String| anyhow::anyhow!(e))?;
            tx = tx.with_kind(kind);
        }
        Ok(tx)
    }
}

pub fn load_transactions(path: &Path) -> Result<Vec<Transaction>> {
    let transactions = if is_csv(path) {
        read_csv::<TransactionRow>(path)?
            .into_iter()
            .enumerate()
            .map(|(i, row)| {
                row.into_transaction()
                    .with_context(|| format!("{}: row {}", path.display(), i + 2))
            })
            .collect::<Result<Vec<_>>>()?
    } else {
        read_json(path)?
    };

    tracing::debug!(count = transactions.len(), path = %path.display(), "Loaded transactions");
    Ok(transactions)
}

pub fn load_budgets(path: &Path) -> Result<Vec<Budget>> {
    if is_csv(path) {
        read_csv(path)
    } else {
        read_json(path)
    }
}

pub fn load_accounts(path: &Path) -> Result<Vec<Account>> {
    if is_csv(path) {
        read_csv(path)
    } else {
        read_json(path)
    }
}

/// Asset class names accept the same aliases as the command line ("equities", "fixed income")
fn parse_class_map<V>(raw: BTreeMap<String, V>) -> Result<BTreeMap<AssetClass, V>> {
    raw.into_iter()
        .map(|(name, value)| {
            let class: AssetClass = name.parse().map_err(|e: String| anyhow::anyhow!(e))?;
            Ok((class, value))
        })
        .collect()
}

/// Target allocation: `{"stocks": 60, "bonds": 30, "cash": 10}`
pub fn load_targets(path: &Path) -> Result<BTreeMap<AssetClass, f64>> {
    let raw: BTreeMap<String, f64> = read_json(path)?;
    parse_class_map(raw).with_context(|| format!("Invalid target allocation in {}", path.display()))
}

/// Periodic returns per asset class plus an optional benchmark
#[derive(Debug, Default, Deserialize)]
pub struct ReturnsFile {
    #[serde(default)]
    pub series: BTreeMap<String, Vec<f64>>,
    #[serde(default)]
    pub benchmark: Option<Vec<f64>>,
}

pub fn load_returns(path: &Path) -> Result<(BTreeMap<AssetClass, Vec<f64>>, Option<Vec<f64>>)> {
    let file: ReturnsFile = read_json(path)?;
    let series = parse_class_map(file.series)
        .with_context(|| format!("Invalid return series in {}", path.display()))?;
    Ok((series, file.benchmark))
}

/// Everything the `insights` command can analyze in one file
///
/// Sections are optional; an analysis runs only when its inputs are present.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Snapshot {
    pub current_balance: Option<f64>,
    pub horizon_months: Option<u32>,
    pub include_recurring: Option<bool>,
    pub transactions: Vec<Transaction>,
    pub budgets: Vec<Budget>,
    pub accounts: Vec<Account>,
    pub target_allocation: BTreeMap<String, f64>,
    pub historical_returns: BTreeMap<String, Vec<f64>>,
    pub benchmark_returns: Option<Vec<f64>>,
}

pub fn load_snapshot(path: &Path) -> Result<Snapshot> {
    let snapshot: Snapshot = read_json(path)?;
    tracing::debug!(
        transactions = snapshot.transactions.len(),
        budgets = snapshot.budgets.len(),
        accounts = snapshot.accounts.len(),
        "Loaded snapshot"
    );
    Ok(snapshot)
}

impl Snapshot {
    pub fn targets(&self) -> Result<BTreeMap<AssetClass, f64>> {
        parse_class_map(self.target_allocation.clone()).context("Invalid target allocation in snapshot")
    }

    pub fn returns(&self) -> Result<BTreeMap<AssetClass, Vec<f64>>> {
        parse_class_map(self.historical_returns.clone()).context("Invalid return series in snapshot")
    }
}
