//! Cash Flow Forecaster
//!
//! Projects monthly income, expenses and balance from:
//! - Trailing averages of bucketed history
//! - Recurring series due in each projected month (beyond what the average
//!   already contains)
//!
//! Confidence decays with the horizon and with historical volatility, and is
//! capped low when there is not enough history to trust the averages.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::config::{AggregationConfig, ForecastConfig};
use crate::error::{Error, Result};
use crate::models::{validate_transactions, Transaction, TransactionKind};
use crate::stats::{mean, ratio, sample_std_dev};

use super::aggregator::{
    month_start, shift_months, AggregatedHistory, RecurringSeries, TransactionAggregator,
};
use super::types::{Priority, Trend};

/// Projection for one future month
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CashFlowPrediction {
    /// First day of the projected month
    pub date: NaiveDate,
    pub predicted_income: f64,
    pub predicted_expenses: f64,
    pub predicted_balance: f64,
    pub confidence: f64,
}

/// Summary statistics behind a forecast
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CashFlowInsights {
    pub avg_monthly_income: f64,
    pub avg_monthly_expenses: f64,
    pub monthly_net_change: f64,
    /// Sample standard deviation of monthly net
    pub volatility: f64,
    /// Recurring series still considered active
    pub recurring_transactions_count: usize,
    /// Window months with at least one transaction
    pub months_of_history: u32,
    /// Fraction of average income kept (0 when there is no income)
    pub savings_rate: f64,
    pub trend: Trend,
    pub lowest_projected_balance: f64,
    /// First projected month with a negative balance
    pub first_negative_month: Option<NaiveDate>,
    /// Monthly-equivalent cost of active recurring expenses
    pub recurring_monthly_expenses: f64,
}

/// A rule-based cash-flow recommendation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CashFlowRecommendation {
    /// Stable identifier (e.g., "cashflow:negative_net")
    pub key: String,
    pub title: String,
    pub description: String,
    pub priority: Priority,
    /// Monthly dollar amount the recommendation is about
    pub estimated_impact: f64,
}

impl CashFlowRecommendation {
    fn new(
        key: &str,
        priority: Priority,
        title: impl Into<String>,
        description: impl Into<String>,
        estimated_impact: f64,
    ) -> Self {
        Self {
            key: format!("cashflow:{}", key),
            title: title.into(),
            description: description.into(),
            priority,
            estimated_impact,
        }
    }
}

/// Complete forecast result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CashFlowForecast {
    pub as_of: NaiveDate,
    pub current_balance: f64,
    pub predictions: Vec<CashFlowPrediction>,
    pub insights: CashFlowInsights,
    pub recommendations: Vec<CashFlowRecommendation>,
    pub recurring: Vec<RecurringSeries>,
}

/// Projects future months from transaction history
pub struct CashFlowForecaster {
    aggregator: TransactionAggregator,
    config: ForecastConfig,
}

impl Default for CashFlowForecaster {
    fn default() -> Self {
        Self::new()
    }
}

impl CashFlowForecaster {
    pub fn new() -> Self {
        Self::with_config(AggregationConfig::default(), ForecastConfig::default())
    }

    pub fn with_config(aggregation: AggregationConfig, config: ForecastConfig) -> Self {
        Self {
            aggregator: TransactionAggregator::with_config(aggregation),
            config,
        }
    }

    /// Forecast `horizon_months` calendar months starting the month after `as_of`
    ///
    /// Averages come from the trailing window of complete months; the month
    /// containing `as_of` is already reflected in `current_balance`.
    pub fn forecast(
        &self,
        transactions: &[Transaction],
        current_balance: f64,
        horizon_months: u32,
        include_recurring: bool,
        as_of: NaiveDate,
    ) -> Result<CashFlowForecast> {
        if !current_balance.is_finite() {
            return Err(Error::invalid("current balance must be a finite number"));
        }
        if horizon_months == 0 || horizon_months > self.config.max_horizon_months {
            return Err(Error::invalid(format!(
                "horizon must be between 1 and {} months, got {}",
                self.config.max_horizon_months, horizon_months
            )));
        }
        validate_transactions(transactions)?;

        let history = self.aggregator.aggregate(transactions, as_of);
        let agg = self.aggregator.config();

        let incomes: Vec<f64> = history.buckets.iter().map(|b| b.total_income).collect();
        let expenses: Vec<f64> = history.buckets.iter().map(|b| b.total_expenses).collect();
        let nets: Vec<f64> = history.buckets.iter().map(|b| b.net()).collect();

        let avg_income = mean(&incomes);
        let avg_expenses = mean(&expenses);
        let net_change = avg_income - avg_expenses;
        let volatility = sample_std_dev(&nets);

        let insufficient_history = history.months_with_data < agg.min_history_months;
        if insufficient_history {
            tracing::warn!(
                months_with_data = history.months_with_data,
                required = agg.min_history_months,
                "Insufficient history; capping forecast confidence"
            );
        }

        let volatility_penalty = (self.config.volatility_penalty_weight * volatility
            / avg_income.max(1.0))
        .min(self.config.max_volatility_penalty);

        let horizon_start = shift_months(month_start(as_of), 1);
        let mut predictions = Vec::with_capacity(horizon_months as usize);
        let mut balance = current_balance;

        for i in 1..=horizon_months {
            let month = shift_months(horizon_start, i as i32 - 1);
            let next = shift_months(horizon_start, i as i32);

            let (income_adj, expense_adj) = if include_recurring {
                self.recurring_adjustment(&history, month, next)
            } else {
                (0.0, 0.0)
            };

            let predicted_income = (avg_income + income_adj).max(0.0);
            let predicted_expenses = (avg_expenses + expense_adj).max(0.0);
            balance += predicted_income - predicted_expenses;

            predictions.push(CashFlowPrediction {
                date: month,
                predicted_income,
                predicted_expenses,
                predicted_balance: balance,
                confidence: self.confidence(i, volatility_penalty, insufficient_history),
            });
        }

        let trend = classify_trend(&predictions, self.config.trend_threshold);
        let lowest_projected_balance = predictions
            .iter()
            .map(|p| p.predicted_balance)
            .fold(f64::INFINITY, f64::min);
        let first_negative_month = predictions
            .iter()
            .find(|p| p.predicted_balance < 0.0)
            .map(|p| p.date);

        let active: Vec<&RecurringSeries> = history
            .recurring
            .iter()
            .filter(|s| !s.is_stale(history.window_end, agg.interval_tolerance_days))
            .collect();
        let recurring_monthly_expenses = active
            .iter()
            .filter(|s| s.kind == TransactionKind::Expense)
            .map(|s| s.monthly_equivalent())
            .sum();

        let insights = CashFlowInsights {
            avg_monthly_income: avg_income,
            avg_monthly_expenses: avg_expenses,
            monthly_net_change: net_change,
            volatility,
            recurring_transactions_count: active.len(),
            months_of_history: history.months_with_data,
            savings_rate: ratio(net_change, avg_income),
            trend,
            lowest_projected_balance,
            first_negative_month,
            recurring_monthly_expenses,
        };

        let recommendations = self.recommendations(&insights, current_balance, insufficient_history);

        tracing::debug!(
            avg_income,
            avg_expenses,
            volatility,
            horizon = horizon_months,
            trend = trend.as_str(),
            "Cash flow forecast complete"
        );

        Ok(CashFlowForecast {
            as_of,
            current_balance,
            predictions,
            insights,
            recommendations,
            recurring: history.recurring,
        })
    }

    /// Confidence for horizon month `i` (1-indexed); non-increasing in `i`
    fn confidence(&self, i: u32, volatility_penalty: f64, insufficient_history: bool) -> f64 {
        let base = self.config.base_confidence;
        let raw = base - self.config.decay_per_month * (i - 1) as f64 - volatility_penalty;
        let clamped = raw.max(self.config.confidence_floor).min(base);
        if insufficient_history {
            clamped.min(self.config.low_history_confidence)
        } else {
            clamped
        }
    }

    /// Income and expense corrections for recurring series in `[month, next)`
    ///
    /// The trailing average already contains each series at its historical
    /// rate; only the difference between occurrences due and that rate is added.
    /// Staleness is judged at the end of the window the rate came from.
    fn recurring_adjustment(
        &self,
        history: &AggregatedHistory,
        month: NaiveDate,
        next: NaiveDate,
    ) -> (f64, f64) {
        let window_months = history.buckets.len().max(1) as f64;
        let tolerance = self.aggregator.config().interval_tolerance_days;

        let mut income_adj = 0.0;
        let mut expense_adj = 0.0;

        for series in &history.recurring {
            let rate =
                series.observed_between(history.window_start, history.window_end) as f64 / window_months;
            let due = if series.is_stale(history.window_end, tolerance) {
                0
            } else {
                series.occurrences_between(month, next)
            };

            let adjustment = (due as f64 - rate) * series.amount;
            match series.kind {
                TransactionKind::Income => income_adj += adjustment,
                TransactionKind::Expense => expense_adj += adjustment,
            }
        }

        (income_adj, expense_adj)
    }

    fn recommendations(
        &self,
        insights: &CashFlowInsights,
        current_balance: f64,
        insufficient_history: bool,
    ) -> Vec<CashFlowRecommendation> {
        let mut recs = Vec::new();
        let income = insights.avg_monthly_income;
        let expenses = insights.avg_monthly_expenses;
        let net = insights.monthly_net_change;

        if let Some(month) = insights.first_negative_month {
            recs.push(CashFlowRecommendation::new(
                "negative_balance",
                Priority::Critical,
                "Projected negative balance",
                format!(
                    "At the current pace your balance drops below zero in {}. \
                     Build a buffer or cut expenses before then.",
                    month.format("%B %Y")
                ),
                insights.lowest_projected_balance.abs(),
            ));
        }

        if net < 0.0 {
            recs.push(CashFlowRecommendation::new(
                "negative_net",
                Priority::High,
                "Spending exceeds income",
                format!(
                    "On average you spend ${:.0} more than you earn each month. \
                     Trim discretionary categories or add income to close the gap.",
                    net.abs()
                ),
                net.abs(),
            ));
        }

        if income > 0.0 && insights.volatility > self.config.volatility_alert_ratio * income {
            recs.push(CashFlowRecommendation::new(
                "volatile",
                Priority::Medium,
                "Irregular cash flow",
                format!(
                    "Your monthly net swings by about ${:.0}, more than {:.0}% of income. \
                     Keep at least one extra month of expenses in reserve.",
                    insights.volatility,
                    self.config.volatility_alert_ratio * 100.0
                ),
                insights.volatility,
            ));
        }

        let target = self.config.target_savings_rate;
        if net >= 0.0 && income > 0.0 && insights.savings_rate < target {
            let shortfall = target * income - net;
            recs.push(CashFlowRecommendation::new(
                "savings_rate",
                Priority::Medium,
                "Boost your savings rate",
                format!(
                    "You keep {:.0}% of income; reaching {:.0}% means saving another ${:.0} per month.",
                    insights.savings_rate * 100.0,
                    target * 100.0,
                    shortfall
                ),
                shortfall,
            ));
        }

        if expenses > 0.0 {
            let share = insights.recurring_monthly_expenses / expenses;
            if share > self.config.recurring_share_alert {
                recs.push(CashFlowRecommendation::new(
                    "recurring_share",
                    Priority::Medium,
                    "Review recurring charges",
                    format!(
                        "{} recurring series account for {:.0}% of monthly spending. \
                         Cancel or renegotiate the ones you no longer need.",
                        insights.recurring_transactions_count,
                        share * 100.0
                    ),
                    insights.recurring_monthly_expenses,
                ));
            }

            let months_covered = current_balance / expenses;
            if net > 0.0 && insights.savings_rate >= target && months_covered > self.config.idle_cash_months {
                recs.push(CashFlowRecommendation::new(
                    "idle_cash",
                    Priority::Low,
                    "Put idle cash to work",
                    format!(
                        "Your balance covers {:.1} months of expenses. Consider moving anything above \
                         a {:.0}-month emergency fund into savings or investments.",
                        months_covered, self.config.idle_cash_months
                    ),
                    current_balance - self.config.idle_cash_months * expenses,
                ));
            }
        }

        if insufficient_history {
            recs.push(CashFlowRecommendation::new(
                "limited_history",
                Priority::Low,
                "Limited history",
                format!(
                    "Only {} month(s) of transactions are available, so this forecast is rough. \
                     It will firm up as more history accumulates.",
                    insights.months_of_history
                ),
                0.0,
            ));
        }

        recs
    }
}

/// Classify the projected balance path by comparing its last and first points
fn classify_trend(predictions: &[CashFlowPrediction], threshold: f64) -> Trend {
    let (Some(first), Some(last)) = (predictions.first(), predictions.last()) else {
        return Trend::Stable;
    };
    let first = first.predicted_balance;
    let last = last.predicted_balance;
    let band = first.abs() * threshold;

    if last > first + band {
        Trend::Increasing
    } else if last < first - band {
        Trend::Decreasing
    } else {
        Trend::Stable
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{date, expense, income, monthly_series, steady_household};

    const AS_OF: (i32, u32, u32) = (2026, 6, 30);

    fn as_of() -> NaiveDate {
        date(AS_OF.0, AS_OF.1, AS_OF.2)
    }

    #[test]
    fn test_steady_household_end_to_end() {
        let txs = steady_household(date(2026, 1, 1), 6, 5000.0, 4000.0);
        let forecast = CashFlowForecaster::new()
            .forecast(&txs, 10_000.0, 3, true, as_of())
            .unwrap();

        let balances: Vec<f64> = forecast.predictions.iter().map(|p| p.predicted_balance).collect();
        assert_eq!(balances, vec![11_000.0, 12_000.0, 13_000.0]);
        assert_eq!(forecast.insights.trend, Trend::Increasing);
        assert_eq!(forecast.insights.avg_monthly_income, 5000.0);
        assert_eq!(forecast.insights.avg_monthly_expenses, 4000.0);
        assert_eq!(forecast.insights.monthly_net_change, 1000.0);
        assert_eq!(forecast.insights.volatility, 0.0);
        assert_eq!(forecast.insights.recurring_transactions_count, 2);
        assert_eq!(forecast.predictions[0].date, date(2026, 7, 1));
        assert_eq!(forecast.predictions[2].date, date(2026, 9, 1));
    }

    #[test]
    fn test_constant_net_change_is_linear() {
        let txs = steady_household(date(2026, 1, 1), 6, 3200.0, 3450.0);
        for include_recurring in [true, false] {
            let forecast = CashFlowForecaster::new()
                .forecast(&txs, 2_000.0, 12, include_recurring, as_of())
                .unwrap();
            for (i, p) in forecast.predictions.iter().enumerate() {
                let expected = 2_000.0 + (i as f64 + 1.0) * -250.0;
                assert_eq!(p.predicted_balance, expected);
            }
        }
    }

    #[test]
    fn test_constant_net_change_is_linear_days_after_month_end() {
        // Salary and rent post on the 1st; the snapshot is taken on the 5th
        let txs = steady_household(date(2026, 1, 1), 6, 5000.0, 4000.0);
        let forecast = CashFlowForecaster::new()
            .forecast(&txs, 10_000.0, 3, true, date(2026, 7, 5))
            .unwrap();

        let balances: Vec<f64> = forecast.predictions.iter().map(|p| p.predicted_balance).collect();
        assert_eq!(balances, vec![11_000.0, 12_000.0, 13_000.0]);
        assert!(forecast.predictions.iter().all(|p| p.predicted_income == 5000.0));
        assert_eq!(forecast.insights.trend, Trend::Increasing);
        assert_eq!(forecast.insights.recurring_transactions_count, 2);
    }

    #[test]
    fn test_predictions_start_after_as_of() {
        // July's salary and rent already posted and sit in the current balance
        let txs = steady_household(date(2026, 1, 1), 7, 5000.0, 4000.0);
        let as_of = date(2026, 7, 28);
        let forecast = CashFlowForecaster::new()
            .forecast(&txs, 10_000.0, 3, true, as_of)
            .unwrap();

        assert!(forecast.predictions.iter().all(|p| p.date > as_of));
        assert_eq!(forecast.predictions[0].date, date(2026, 8, 1));
        assert_eq!(forecast.predictions[0].predicted_balance, 11_000.0);
        assert_eq!(forecast.predictions[2].predicted_balance, 13_000.0);
    }

    #[test]
    fn test_confidence_non_increasing_and_bounded() {
        let mut txs = steady_household(date(2026, 1, 1), 6, 4000.0, 2500.0);
        // Lumpy months raise volatility
        txs.push(expense(date(2026, 2, 17), 1800.0, "Car repair"));
        txs.push(income(date(2026, 4, 3), 2200.0, "Bonus"));

        let config = ForecastConfig::default();
        let forecast = CashFlowForecaster::new()
            .forecast(&txs, 500.0, 24, true, as_of())
            .unwrap();

        assert!(forecast.insights.volatility > 0.0);
        let confidences: Vec<f64> = forecast.predictions.iter().map(|p| p.confidence).collect();
        for pair in confidences.windows(2) {
            assert!(pair[1] <= pair[0]);
        }
        for c in &confidences {
            assert!(*c >= config.confidence_floor && *c <= config.base_confidence);
        }
        // Long horizons bottom out at the floor
        assert_eq!(*confidences.last().unwrap(), config.confidence_floor);
    }

    #[test]
    fn test_volatility_lowers_confidence() {
        let calm = steady_household(date(2026, 1, 1), 6, 4000.0, 3000.0);
        let mut lumpy = calm.clone();
        lumpy.push(expense(date(2026, 3, 12), 2500.0, "Travel"));

        let forecaster = CashFlowForecaster::new();
        let calm_fc = forecaster.forecast(&calm, 0.0, 1, true, as_of()).unwrap();
        let lumpy_fc = forecaster.forecast(&lumpy, 0.0, 1, true, as_of()).unwrap();

        assert_eq!(calm_fc.predictions[0].confidence, 0.9);
        assert!(lumpy_fc.predictions[0].confidence < calm_fc.predictions[0].confidence);
    }

    #[test]
    fn test_insufficient_history_caps_confidence() {
        let txs = vec![
            income(date(2026, 6, 1), 3000.0, "Salary"),
            expense(date(2026, 6, 10), 1000.0, "Rent"),
        ];
        let forecast = CashFlowForecaster::new()
            .forecast(&txs, 1000.0, 3, true, as_of())
            .unwrap();

        assert_eq!(forecast.insights.months_of_history, 1);
        assert!(forecast.predictions.iter().all(|p| p.confidence <= 0.3));
        assert!(forecast
            .recommendations
            .iter()
            .any(|r| r.key == "cashflow:limited_history"));
    }

    #[test]
    fn test_zero_income_reports_zero_ratios() {
        let txs = monthly_series(date(2026, 1, 15), 6, -200.0, "Groceries");
        let forecast = CashFlowForecaster::new()
            .forecast(&txs, 0.0, 2, false, as_of())
            .unwrap();

        assert_eq!(forecast.insights.avg_monthly_income, 0.0);
        assert_eq!(forecast.insights.savings_rate, 0.0);
        assert!(forecast.predictions.iter().all(|p| p.confidence.is_finite()));
        assert_eq!(forecast.insights.first_negative_month, Some(date(2026, 7, 1)));
        assert_eq!(forecast.insights.trend, Trend::Decreasing);
    }

    #[test]
    fn test_empty_history_is_not_an_error() {
        let forecast = CashFlowForecaster::new()
            .forecast(&[], 2500.0, 2, true, as_of())
            .unwrap();
        assert_eq!(forecast.predictions.len(), 2);
        assert!(forecast.predictions.iter().all(|p| p.predicted_balance == 2500.0));
        assert_eq!(forecast.insights.trend, Trend::Stable);
    }

    #[test]
    fn test_quarterly_bill_lands_in_due_month() {
        let mut txs = steady_household(date(2026, 1, 1), 6, 5000.0, 3000.0);
        // Insurance every three months: Jan, Apr (and historically Oct)
        txs.push(expense(date(2025, 10, 20), 600.0, "Insurance"));
        txs.push(expense(date(2026, 1, 20), 600.0, "Insurance"));
        txs.push(expense(date(2026, 4, 20), 600.0, "Insurance"));

        let forecast = CashFlowForecaster::new()
            .forecast(&txs, 0.0, 3, true, as_of())
            .unwrap();

        // Two occurrences in the six-month window -> 200/month baked into the average
        assert!((forecast.insights.avg_monthly_expenses - 3200.0).abs() < 1e-9);
        let july = &forecast.predictions[0];
        let august = &forecast.predictions[1];
        assert!((july.predicted_expenses - 3600.0).abs() < 1e-9);
        assert!((august.predicted_expenses - 3000.0).abs() < 1e-9);

        let flat = CashFlowForecaster::new()
            .forecast(&txs, 0.0, 3, false, as_of())
            .unwrap();
        assert!((flat.predictions[0].predicted_expenses - 3200.0).abs() < 1e-9);
        // Over a full cycle the adjustments cancel out
        assert!(
            (flat.predictions[2].predicted_balance - forecast.predictions[2].predicted_balance).abs() < 1e-6
        );
    }

    #[test]
    fn test_stale_recurring_is_not_projected() {
        let mut txs = steady_household(date(2026, 1, 1), 6, 5000.0, 3000.0);
        // A subscription that stopped after March
        txs.extend(monthly_series(date(2026, 1, 8), 3, -60.0, "Streaming"));

        let forecast = CashFlowForecaster::new()
            .forecast(&txs, 0.0, 1, true, as_of())
            .unwrap();
        // Average contains 3 * 60 / 6 = 30/month; stale series removes it
        assert!((forecast.insights.avg_monthly_expenses - 3030.0).abs() < 1e-9);
        assert!((forecast.predictions[0].predicted_expenses - 3000.0).abs() < 1e-9);
        // Only salary and rent are still active
        assert_eq!(forecast.insights.recurring_transactions_count, 2);
        assert_eq!(forecast.recurring.len(), 3);
    }

    #[test]
    fn test_negative_net_recommendations() {
        let txs = steady_household(date(2026, 1, 1), 6, 3000.0, 3500.0);
        let forecast = CashFlowForecaster::new()
            .forecast(&txs, 800.0, 3, true, as_of())
            .unwrap();

        let keys: Vec<&str> = forecast.recommendations.iter().map(|r| r.key.as_str()).collect();
        assert!(keys.contains(&"cashflow:negative_net"));
        assert!(keys.contains(&"cashflow:negative_balance"));
        assert_eq!(forecast.insights.first_negative_month, Some(date(2026, 8, 1)));
        assert!(!keys.contains(&"cashflow:savings_rate"));
    }

    #[test]
    fn test_rejects_invalid_requests() {
        let forecaster = CashFlowForecaster::new();
        assert!(matches!(
            forecaster.forecast(&[], 0.0, 0, true, as_of()),
            Err(Error::InvalidInput(_))
        ));
        assert!(matches!(
            forecaster.forecast(&[], f64::NAN, 3, true, as_of()),
            Err(Error::InvalidInput(_))
        ));
        let bad = vec![Transaction::new(date(2026, 1, 1), f64::NAN, "Dining")];
        assert!(matches!(
            forecaster.forecast(&bad, 0.0, 3, true, as_of()),
            Err(Error::InvalidInput(_))
        ));
    }

    #[test]
    fn test_forecast_is_deterministic() {
        let mut txs = steady_household(date(2026, 1, 1), 6, 4100.0, 2900.0);
        txs.push(expense(date(2026, 5, 5), 310.55, "Dining"));
        let forecaster = CashFlowForecaster::new();
        let a = forecaster.forecast(&txs, 1234.5, 6, true, as_of()).unwrap();
        txs.reverse();
        let b = forecaster.forecast(&txs, 1234.5, 6, true, as_of()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_classify_trend_with_negative_start() {
        let path = |first: f64, last: f64| {
            vec![
                CashFlowPrediction {
                    date: date(2026, 7, 1),
                    predicted_income: 0.0,
                    predicted_expenses: 0.0,
                    predicted_balance: first,
                    confidence: 0.9,
                },
                CashFlowPrediction {
                    date: date(2026, 8, 1),
                    predicted_income: 0.0,
                    predicted_expenses: 0.0,
                    predicted_balance: last,
                    confidence: 0.85,
                },
            ]
        };
        assert_eq!(classify_trend(&path(-1000.0, -1500.0), 0.1), Trend::Decreasing);
        assert_eq!(classify_trend(&path(-1000.0, -500.0), 0.1), Trend::Increasing);
        assert_eq!(classify_trend(&path(1000.0, 1050.0), 0.1), Trend::Stable);
        assert_eq!(classify_trend(&path(1000.0, 890.0), 0.1), Trend::Decreasing);
    }
}
