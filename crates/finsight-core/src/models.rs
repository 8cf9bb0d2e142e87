//! Input data model for Finsight
//!
//! Everything here is supplied by the caller (already fetched, already
//! authorized). The engine never mutates these values.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Direction of money movement
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Income,
    Expense,
}

impl TransactionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Expense => "expense",
        }
    }
}

impl std::str::FromStr for TransactionKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "income" | "credit" => Ok(Self::Income),
            "expense" | "debit" => Ok(Self::Expense),
            _ => Err(format!("Unknown transaction kind: {}", s)),
        }
    }
}

impl std::fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A historical transaction
///
/// `amount` is signed (income positive, expense negative) unless `kind` is
/// set, in which case `kind` decides the direction and only the magnitude
/// of `amount` is used.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub date: NaiveDate,
    pub amount: f64,
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<TransactionKind>,
}

impl Transaction {
    pub fn new(date: NaiveDate, amount: f64, category: impl Into<String>) -> Self {
        Self {
            date,
            amount,
            category: category.into(),
            description: None,
            kind: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_kind(mut self, kind: TransactionKind) -> Self {
        self.kind = Some(kind);
        self
    }

    /// Effective direction of this transaction
    pub fn kind(&self) -> TransactionKind {
        match self.kind {
            Some(kind) => kind,
            None if self.amount >= 0.0 => TransactionKind::Income,
            None => TransactionKind::Expense,
        }
    }

    /// Unsigned amount
    pub fn magnitude(&self) -> f64 {
        self.amount.abs()
    }

    /// Case-insensitive grouping key for the category
    pub fn category_key(&self) -> String {
        category_key(&self.category)
    }

    pub fn validate(&self) -> Result<()> {
        if !self.amount.is_finite() {
            return Err(Error::invalid(format!(
                "transaction on {} in '{}' has a non-finite amount",
                self.date, self.category
            )));
        }
        if self.category.trim().is_empty() {
            return Err(Error::invalid(format!(
                "transaction on {} has an empty category",
                self.date
            )));
        }
        Ok(())
    }
}

/// Normalize a category name for matching
pub fn category_key(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Validate every transaction in a slice, failing on the first bad one
pub fn validate_transactions(transactions: &[Transaction]) -> Result<()> {
    transactions.iter().try_for_each(Transaction::validate)
}

/// A monthly spending limit for one category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Budget {
    pub category: String,
    pub amount: f64,
}

impl Budget {
    pub fn new(category: impl Into<String>, amount: f64) -> Self {
        Self {
            category: category.into(),
            amount,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.category.trim().is_empty() {
            return Err(Error::invalid("budget has an empty category"));
        }
        if !self.amount.is_finite() || self.amount < 0.0 {
            return Err(Error::invalid(format!(
                "budget for '{}' must be a non-negative number, got {}",
                self.category, self.amount
            )));
        }
        Ok(())
    }
}

/// Broad asset classes used for allocation targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssetClass {
    Stocks,
    Bonds,
    Cash,
    RealEstate,
    Crypto,
    Commodities,
    Other,
}

impl AssetClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Stocks => "stocks",
            Self::Bonds => "bonds",
            Self::Cash => "cash",
            Self::RealEstate => "real_estate",
            Self::Crypto => "crypto",
            Self::Commodities => "commodities",
            Self::Other => "other",
        }
    }

    /// Display label for reports
    pub fn label(&self) -> &'static str {
        match self {
            Self::Stocks => "Stocks",
            Self::Bonds => "Bonds",
            Self::Cash => "Cash",
            Self::RealEstate => "Real Estate",
            Self::Crypto => "Crypto",
            Self::Commodities => "Commodities",
            Self::Other => "Other",
        }
    }
}

impl std::str::FromStr for AssetClass {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().replace([' ', '-'], "_").as_str() {
            "stocks" | "equities" | "stock" => Ok(Self::Stocks),
            "bonds" | "fixed_income" | "bond" => Ok(Self::Bonds),
            "cash" => Ok(Self::Cash),
            "real_estate" | "realestate" => Ok(Self::RealEstate),
            "crypto" | "cryptocurrency" => Ok(Self::Crypto),
            "commodities" | "commodity" => Ok(Self::Commodities),
            "other" => Ok(Self::Other),
            _ => Err(format!("Unknown asset class: {}", s)),
        }
    }
}

impl std::fmt::Display for AssetClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An investment or cash account balance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    pub name: String,
    pub asset_class: AssetClass,
    pub balance: f64,
}

impl Account {
    pub fn new(name: impl Into<String>, asset_class: AssetClass, balance: f64) -> Self {
        Self {
            name: name.into(),
            asset_class,
            balance,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if !self.balance.is_finite() || self.balance < 0.0 {
            return Err(Error::invalid(format!(
                "account '{}' must have a non-negative balance, got {}",
                self.name, self.balance
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_kind_from_sign() {
        let income = Transaction::new(date(2026, 1, 1), 5000.0, "Salary");
        let expense = Transaction::new(date(2026, 1, 2), -42.5, "Dining");

        assert_eq!(income.kind(), TransactionKind::Income);
        assert_eq!(expense.kind(), TransactionKind::Expense);
        assert_eq!(expense.magnitude(), 42.5);
    }

    #[test]
    fn test_explicit_kind_wins_over_sign() {
        let tx = Transaction::new(date(2026, 1, 2), 42.5, "Dining").with_kind(TransactionKind::Expense);
        assert_eq!(tx.kind(), TransactionKind::Expense);
        assert_eq!(tx.magnitude(), 42.5);
    }

    #[test]
    fn test_transaction_validation() {
        assert!(Transaction::new(date(2026, 1, 1), f64::NAN, "Dining")
            .validate()
            .is_err());
        assert!(Transaction::new(date(2026, 1, 1), -10.0, "  ")
            .validate()
            .is_err());
        assert!(Transaction::new(date(2026, 1, 1), -10.0, "Dining")
            .validate()
            .is_ok());
    }

    #[test]
    fn test_budget_validation() {
        assert!(Budget::new("Dining", -1.0).validate().is_err());
        assert!(Budget::new("Dining", f64::INFINITY).validate().is_err());
        assert!(Budget::new("Dining", 0.0).validate().is_ok());
    }

    #[test]
    fn test_asset_class_parsing() {
        assert_eq!(AssetClass::from_str("Real Estate").unwrap(), AssetClass::RealEstate);
        assert_eq!(AssetClass::from_str("equities").unwrap(), AssetClass::Stocks);
        assert!(AssetClass::from_str("beanie babies").is_err());
        assert_eq!(AssetClass::RealEstate.to_string(), "real_estate");
    }

    #[test]
    fn test_category_key_normalizes() {
        assert_eq!(category_key("  Dining "), "dining");
    }
}
