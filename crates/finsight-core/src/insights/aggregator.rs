//! Transaction Aggregator
//!
//! Turns a raw transaction list into:
//! - Monthly income/expense buckets over a trailing window (zero-filled)
//! - Recurring series (same category and near-equal amount at a regular cadence)
//!
//! Recurring detection is deliberately simple pattern matching. Missing an
//! irregular bill is fine; treating a one-off repeat as recurring is not, so
//! a series needs several consistent gaps rather than just two occurrences.

use std::collections::BTreeMap;

use chrono::{Datelike, Duration, Months, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::config::AggregationConfig;
use crate::models::{Transaction, TransactionKind};
use crate::stats::median;

/// Income and expense totals for one calendar month
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyBucket {
    pub month_start: NaiveDate,
    pub total_income: f64,
    pub total_expenses: f64,
    pub transaction_count: usize,
}

impl MonthlyBucket {
    fn empty(month_start: NaiveDate) -> Self {
        Self {
            month_start,
            total_income: 0.0,
            total_expenses: 0.0,
            transaction_count: 0,
        }
    }

    pub fn net(&self) -> f64 {
        self.total_income - self.total_expenses
    }

    fn add(&mut self, tx: &Transaction) {
        match tx.kind() {
            TransactionKind::Income => self.total_income += tx.magnitude(),
            TransactionKind::Expense => self.total_expenses += tx.magnitude(),
        }
        self.transaction_count += 1;
    }
}

/// Cadence inferred from the median gap of a recurring series
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Cadence {
    Weekly,
    Biweekly,
    Monthly,
    Quarterly,
    Yearly,
    Custom,
}

impl Cadence {
    pub fn from_interval(days: i64) -> Self {
        match days {
            5..=9 => Cadence::Weekly,
            12..=16 => Cadence::Biweekly,
            26..=35 => Cadence::Monthly,
            85..=97 => Cadence::Quarterly,
            350..=380 => Cadence::Yearly,
            _ => Cadence::Custom,
        }
    }

    /// Calendar months per occurrence, for cadences billed on a day of the month
    pub fn calendar_months(&self) -> Option<u32> {
        match self {
            Cadence::Monthly => Some(1),
            Cadence::Quarterly => Some(3),
            Cadence::Yearly => Some(12),
            Cadence::Weekly | Cadence::Biweekly | Cadence::Custom => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Cadence::Weekly => "weekly",
            Cadence::Biweekly => "biweekly",
            Cadence::Monthly => "monthly",
            Cadence::Quarterly => "quarterly",
            Cadence::Yearly => "yearly",
            Cadence::Custom => "custom",
        }
    }
}

impl std::fmt::Display for Cadence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A transaction pattern repeating at a consistent interval
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecurringSeries {
    pub category: String,
    pub kind: TransactionKind,
    /// Median unsigned amount
    pub amount: f64,
    /// Median gap between occurrences, in days
    pub interval_days: i64,
    pub cadence: Cadence,
    pub first_seen: NaiveDate,
    pub last_seen: NaiveDate,
    pub occurrence_count: usize,
    #[serde(skip)]
    occurrences: Vec<NaiveDate>,
}

impl RecurringSeries {
    /// The k-th projected occurrence counting from the last one seen (k = 0 is `last_seen`)
    fn projected(&self, k: u32) -> NaiveDate {
        match self.cadence.calendar_months() {
            Some(months) => shift_months(self.last_seen, (months * k) as i32),
            None => self.last_seen + Duration::days(self.interval_days * k as i64),
        }
    }

    /// Next occurrence expected after the last one seen
    pub fn next_expected(&self) -> NaiveDate {
        self.projected(1)
    }

    /// A series that missed a full cycle before `reference` has probably stopped
    ///
    /// Being late by less than one interval is not enough: the occurrence
    /// after the next expected one must also have passed.
    pub fn is_stale(&self, reference: NaiveDate, tolerance_days: i64) -> bool {
        self.projected(2) + Duration::days(tolerance_days) < reference
    }

    /// Projected occurrences (including `last_seen` itself) in `[start, end)`
    pub fn occurrences_between(&self, start: NaiveDate, end: NaiveDate) -> usize {
        let mut count = 0;
        let mut k = 0;
        loop {
            let date = self.projected(k);
            if date >= end {
                break;
            }
            if date >= start {
                count += 1;
            }
            k += 1;
        }
        count
    }

    /// Observed occurrences in `[start, end)`
    pub fn observed_between(&self, start: NaiveDate, end: NaiveDate) -> usize {
        self.occurrences
            .iter()
            .filter(|d| **d >= start && **d < end)
            .count()
    }

    /// Average cost (or income) per month implied by the cadence
    pub fn monthly_equivalent(&self) -> f64 {
        match self.cadence.calendar_months() {
            Some(months) => self.amount / months as f64,
            None if self.interval_days > 0 => self.amount * 365.25 / 12.0 / self.interval_days as f64,
            None => 0.0,
        }
    }
}

/// Buckets and recurring series for one trailing window
#[derive(Debug, Clone)]
pub struct AggregatedHistory {
    pub buckets: Vec<MonthlyBucket>,
    pub recurring: Vec<RecurringSeries>,
    /// First day of the first month in the window
    pub window_start: NaiveDate,
    /// First day of the month after the window
    pub window_end: NaiveDate,
    /// Window months containing at least one transaction
    pub months_with_data: u32,
}

/// Buckets transactions by month and detects recurring series
pub struct TransactionAggregator {
    config: AggregationConfig,
}

impl Default for TransactionAggregator {
    fn default() -> Self {
        Self::new()
    }
}

impl TransactionAggregator {
    pub fn new() -> Self {
        Self::with_config(AggregationConfig::default())
    }

    pub fn with_config(config: AggregationConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AggregationConfig {
        &self.config
    }

    /// First day of the month after the last complete month as of `as_of`
    ///
    /// The month containing `as_of` only counts as complete on its last day.
    pub fn window_end(as_of: NaiveDate) -> NaiveDate {
        let current = month_start(as_of);
        if is_last_day_of_month(as_of) {
            shift_months(current, 1)
        } else {
            current
        }
    }

    /// Bucket, detect and summarize the trailing window ending before `as_of`'s incomplete month
    pub fn aggregate(&self, transactions: &[Transaction], as_of: NaiveDate) -> AggregatedHistory {
        let window_end = Self::window_end(as_of);
        let months = self.config.window_months;
        let window_start = shift_months(window_end, -(months as i32));

        let buckets = Self::buckets_between(transactions, window_start, months);
        let months_with_data = buckets.iter().filter(|b| b.transaction_count > 0).count() as u32;
        let recurring = self.detect_recurring(transactions, as_of);

        tracing::debug!(
            window_start = %window_start,
            months,
            months_with_data,
            recurring = recurring.len(),
            "Aggregated transaction history"
        );

        AggregatedHistory {
            buckets,
            recurring,
            window_start,
            window_end,
            months_with_data,
        }
    }

    /// Monthly buckets for the trailing window relative to `as_of`
    pub fn monthly_buckets(&self, transactions: &[Transaction], as_of: NaiveDate) -> Vec<MonthlyBucket> {
        let window_end = Self::window_end(as_of);
        let months = self.config.window_months;
        Self::buckets_between(transactions, shift_months(window_end, -(months as i32)), months)
    }

    /// Zero-filled buckets for `months` calendar months starting at `first_month`
    pub fn buckets_between(
        transactions: &[Transaction],
        first_month: NaiveDate,
        months: u32,
    ) -> Vec<MonthlyBucket> {
        let first_month = month_start(first_month);
        let mut buckets: Vec<MonthlyBucket> = (0..months)
            .map(|i| MonthlyBucket::empty(shift_months(first_month, i as i32)))
            .collect();

        for tx in transactions {
            let offset = months_between(first_month, month_start(tx.date));
            if offset >= 0 && (offset as u32) < months {
                buckets[offset as usize].add(tx);
            }
        }

        buckets
    }

    /// Detect recurring series among transactions dated on or before `as_of`
    pub fn detect_recurring(&self, transactions: &[Transaction], as_of: NaiveDate) -> Vec<RecurringSeries> {
        // Group by (category, direction, whole-unit amount)
        let mut groups: BTreeMap<(String, TransactionKind, i64), Vec<&Transaction>> = BTreeMap::new();
        for tx in transactions.iter().filter(|t| t.date <= as_of) {
            let key = (tx.category_key(), tx.kind(), tx.magnitude().round() as i64);
            groups.entry(key).or_default().push(tx);
        }

        let mut series: Vec<RecurringSeries> = groups
            .values()
            .filter_map(|group| self.detect_series(group))
            .collect();

        series.sort_by(|a, b| {
            a.category
                .to_lowercase()
                .cmp(&b.category.to_lowercase())
                .then_with(|| a.kind.cmp(&b.kind))
                .then_with(|| a.amount.total_cmp(&b.amount))
        });
        series
    }

    /// Check one (category, amount) group for a consistent cadence
    fn detect_series(&self, group: &[&Transaction]) -> Option<RecurringSeries> {
        let min_gaps = self.config.min_consistent_gaps;
        if group.len() < min_gaps + 1 {
            return None;
        }

        let mut sorted = group.to_vec();
        sorted.sort_by(|a, b| a.date.cmp(&b.date).then_with(|| a.amount.total_cmp(&b.amount)));

        let amounts: Vec<f64> = sorted.iter().map(|t| t.magnitude()).collect();
        let median_amount = median(&amounts);
        if median_amount < 0.01 {
            return None;
        }
        let amounts_consistent = amounts
            .iter()
            .all(|a| (a - median_amount).abs() / median_amount <= self.config.amount_tolerance);
        if !amounts_consistent {
            return None;
        }

        let gaps: Vec<f64> = sorted
            .windows(2)
            .map(|w| (w[1].date - w[0].date).num_days() as f64)
            .collect();
        let median_gap = median(&gaps);
        if median_gap < self.config.min_interval_days.max(1) as f64 {
            return None;
        }

        let tolerance = self.config.interval_tolerance_days as f64;
        let consistent = gaps
            .iter()
            .filter(|g| (*g - median_gap).abs() <= tolerance)
            .count();
        if consistent < min_gaps {
            return None;
        }

        let interval_days = median_gap.round() as i64;
        let first = sorted.first()?;
        let last = sorted.last()?;

        Some(RecurringSeries {
            category: first.category.trim().to_string(),
            kind: first.kind(),
            amount: median_amount,
            interval_days,
            cadence: Cadence::from_interval(interval_days),
            first_seen: first.date,
            last_seen: last.date,
            occurrence_count: sorted.len(),
            occurrences: sorted.iter().map(|t| t.date).collect(),
        })
    }
}

/// First day of the month containing `date`
pub fn month_start(date: NaiveDate) -> NaiveDate {
    date.with_day(1).expect("Day 1 always valid")
}

/// Shift a date by whole calendar months (day clamped to month length)
pub fn shift_months(date: NaiveDate, months: i32) -> NaiveDate {
    let shifted = if months >= 0 {
        date.checked_add_months(Months::new(months as u32))
    } else {
        date.checked_sub_months(Months::new(months.unsigned_abs()))
    };
    shifted.unwrap_or(date)
}

/// Whole calendar months from `from`'s month to `to`'s month
pub fn months_between(from: NaiveDate, to: NaiveDate) -> i32 {
    (to.year() - from.year()) * 12 + to.month() as i32 - from.month() as i32
}

pub fn is_last_day_of_month(date: NaiveDate) -> bool {
    (date + Duration::days(1)).month() != date.month()
}
