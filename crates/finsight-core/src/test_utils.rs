//! Fixture builders for tests
//!
//! Available to this crate's tests and, with the `test-utils` feature, to
//! downstream crates that want realistic transaction histories without
//! hand-writing dozens of literals.

use chrono::NaiveDate;

use crate::insights::aggregator::shift_months;
use crate::models::{Account, AssetClass, Budget, Transaction, TransactionKind};

/// Shorthand for a calendar date; panics on an invalid date
pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid fixture date")
}

/// An income transaction (positive amount)
pub fn income(on: NaiveDate, amount: f64, category: &str) -> Transaction {
    Transaction::new(on, amount.abs(), category)
}

/// An expense transaction (negative amount)
pub fn expense(on: NaiveDate, amount: f64, category: &str) -> Transaction {
    Transaction::new(on, -amount.abs(), category)
}

/// `count` transactions of `amount` on the same day each month starting at `start`
///
/// The sign of `amount` decides income vs expense.
pub fn monthly_series(start: NaiveDate, count: u32, amount: f64, category: &str) -> Vec<Transaction> {
    (0..count)
        .map(|i| Transaction::new(shift_months(start, i as i32), amount, category))
        .collect()
}

/// A steady household: fixed salary and rent on the 1st of each month for
/// `months` months starting at `first_month`
pub fn steady_household(
    first_month: NaiveDate,
    months: u32,
    monthly_income: f64,
    monthly_expenses: f64,
) -> Vec<Transaction> {
    let mut txs = monthly_series(first_month, months, monthly_income.abs(), "Salary");
    txs.extend(monthly_series(first_month, months, -monthly_expenses.abs(), "Rent"));
    txs
}

/// A transaction tagged with an explicit kind and a positive amount
pub fn tagged(on: NaiveDate, amount: f64, category: &str, kind: TransactionKind) -> Transaction {
    Transaction::new(on, amount.abs(), category).with_kind(kind)
}

pub fn budget(category: &str, amount: f64) -> Budget {
    Budget::new(category, amount)
}

pub fn account(name: &str, asset_class: AssetClass, balance: f64) -> Account {
    Account::new(name, asset_class, balance)
}
