//! Portfolio Advisor
//!
//! Compares held balances per asset class against a target allocation and
//! reports drift, diversification, risk and (when periodic returns are
//! supplied) performance, plus rebalancing recommendations.
//!
//! Units: allocation figures, volatility and returns are percentages; input
//! periodic returns are fractions (0.01 = 1%).

use std::collections::{BTreeMap, BTreeSet};

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::config::PortfolioConfig;
use crate::error::{Error, Result};
use crate::models::{Account, AssetClass};
use crate::stats::{mean, sample_covariance, sample_std_dev, sample_variance};

use super::types::{AllocationAction, Priority, RiskLevel};

/// Current versus target weight for one asset class
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetAllocationEntry {
    pub asset_class: AssetClass,
    pub current_value: f64,
    pub current_percentage: f64,
    pub target_percentage: f64,
    /// `current_percentage - target_percentage`
    pub variance: f64,
    pub recommendation: AllocationAction,
    /// Dollar amount to buy or sell (0 for hold)
    pub amount: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskMetrics {
    /// Annualised, percent
    pub volatility: f64,
    /// 0-100, strictly increasing in volatility
    pub risk_score: f64,
    pub risk_level: RiskLevel,
    pub beta: f64,
    /// Annualised, percent
    pub expected_return: f64,
    pub sharpe_ratio: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceSummary {
    /// Annualised mean of the weighted periodic series, percent
    pub annualized_return: f64,
    /// Compounded return of the weighted periodic series, percent
    pub cumulative_return: f64,
    pub periods: usize,
    pub best_class: Option<AssetClass>,
    pub worst_class: Option<AssetClass>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioRecommendation {
    /// Stable identifier (e.g., "portfolio:rebalance:bonds")
    pub key: String,
    pub title: String,
    pub description: String,
    pub priority: Priority,
    pub expected_benefit: String,
    pub timeframe: String,
    pub steps: Vec<String>,
    pub asset_class: Option<AssetClass>,
    pub trade_amount: Option<f64>,
    pub estimated_savings: Option<f64>,
    pub estimated_cost: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioAnalysis {
    pub as_of: NaiveDate,
    pub total_value: f64,
    pub allocation: Vec<AssetAllocationEntry>,
    /// `100 * (1 - sum of squared weights)`
    pub diversification_score: f64,
    pub risk: RiskMetrics,
    pub performance: PerformanceSummary,
    pub rebalancing_needed: bool,
    pub next_rebalance_date: Option<NaiveDate>,
    pub recommendations: Vec<PortfolioRecommendation>,
}

/// Allocation drift, risk and rebalancing advice
pub struct PortfolioAdvisor {
    config: PortfolioConfig,
}

impl Default for PortfolioAdvisor {
    fn default() -> Self {
        Self::new()
    }
}

impl PortfolioAdvisor {
    pub fn new() -> Self {
        Self::with_config(PortfolioConfig::default())
    }

    pub fn with_config(config: PortfolioConfig) -> Self {
        Self { config }
    }

    /// Analyze holdings against `targets` (percent per class)
    ///
    /// An empty target map means "no targets": every class is compared
    /// against its own current weight and no trades are suggested.
    pub fn analyze(
        &self,
        accounts: &[Account],
        targets: &BTreeMap<AssetClass, f64>,
        returns: &BTreeMap<AssetClass, Vec<f64>>,
        benchmark: Option<&[f64]>,
        as_of: NaiveDate,
    ) -> Result<PortfolioAnalysis> {
        validate(accounts, targets, returns, benchmark)?;

        let mut values: BTreeMap<AssetClass, f64> = BTreeMap::new();
        for account in accounts {
            *values.entry(account.asset_class).or_insert(0.0) += account.balance;
        }
        let total_value: f64 = values.values().sum();

        let allocation = self.allocation(&values, targets, total_value);

        if total_value <= 0.0 {
            tracing::debug!("Portfolio has no value; returning neutral analysis");
            return Ok(PortfolioAnalysis {
                as_of,
                total_value: 0.0,
                allocation,
                diversification_score: 0.0,
                risk: RiskMetrics {
                    volatility: 0.0,
                    risk_score: 0.0,
                    risk_level: RiskLevel::Low,
                    beta: 0.0,
                    expected_return: 0.0,
                    sharpe_ratio: 0.0,
                },
                performance: PerformanceSummary {
                    annualized_return: 0.0,
                    cumulative_return: 0.0,
                    periods: 0,
                    best_class: None,
                    worst_class: None,
                },
                rebalancing_needed: false,
                next_rebalance_date: None,
                recommendations: Vec::new(),
            });
        }

        let weights: BTreeMap<AssetClass, f64> = values
            .iter()
            .map(|(class, value)| (*class, value / total_value))
            .collect();

        let diversification_score = 100.0 * (1.0 - weights.values().map(|w| w * w).sum::<f64>());
        let risk = self.risk_metrics(&weights, returns, benchmark);
        let performance = self.performance(&weights, returns);

        let rebalancing_needed = allocation
            .iter()
            .any(|e| e.variance.abs() > self.config.tolerance_band);
        let next_rebalance_date =
            rebalancing_needed.then(|| as_of + Duration::days(self.config.rebalance_offset_days));

        let mut recommendations: Vec<PortfolioRecommendation> = allocation
            .iter()
            .filter(|e| e.recommendation != AllocationAction::Hold)
            .map(|e| self.rebalance_recommendation(e))
            .collect();
        recommendations.extend(self.advisories(&weights, diversification_score, &risk, returns));
        recommendations.sort_by(|a, b| {
            b.priority.cmp(&a.priority).then_with(|| {
                b.trade_amount
                    .unwrap_or(0.0)
                    .total_cmp(&a.trade_amount.unwrap_or(0.0))
            })
        });

        tracing::debug!(
            total_value,
            classes = weights.len(),
            diversification = diversification_score,
            volatility = risk.volatility,
            rebalancing_needed,
            "Portfolio analysis complete"
        );

        Ok(PortfolioAnalysis {
            as_of,
            total_value,
            allocation,
            diversification_score,
            risk,
            performance,
            rebalancing_needed,
            next_rebalance_date,
            recommendations,
        })
    }

    fn allocation(
        &self,
        values: &BTreeMap<AssetClass, f64>,
        targets: &BTreeMap<AssetClass, f64>,
        total_value: f64,
    ) -> Vec<AssetAllocationEntry> {
        let classes: BTreeSet<AssetClass> = values.keys().chain(targets.keys()).copied().collect();
        let tolerance = self.config.tolerance_band;

        classes
            .into_iter()
            .map(|class| {
                let current_value = values.get(&class).copied().unwrap_or(0.0);
                let current_percentage = if total_value > 0.0 {
                    current_value / total_value * 100.0
                } else {
                    0.0
                };
                let target_percentage = if targets.is_empty() {
                    current_percentage
                } else {
                    targets.get(&class).copied().unwrap_or(0.0)
                };

                // A portfolio with no value has nothing to drift
                let variance = if total_value > 0.0 {
                    current_percentage - target_percentage
                } else {
                    0.0
                };

                let recommendation = if variance < -tolerance {
                    AllocationAction::Buy
                } else if variance > tolerance {
                    AllocationAction::Sell
                } else {
                    AllocationAction::Hold
                };
                let amount = match recommendation {
                    AllocationAction::Hold => 0.0,
                    _ => variance.abs() / 100.0 * total_value,
                };

                AssetAllocationEntry {
                    asset_class: class,
                    current_value,
                    current_percentage,
                    target_percentage,
                    variance,
                    recommendation,
                    amount,
                }
            })
            .collect()
    }

    /// Annualised volatility of one class, percent
    fn class_volatility(&self, class: AssetClass, returns: &BTreeMap<AssetClass, Vec<f64>>) -> f64 {
        match returns.get(&class) {
            Some(series) if series.len() >= 2 => {
                sample_std_dev(series) * (self.config.periods_per_year as f64).sqrt() * 100.0
            }
            _ => self.config.default_volatility.get(class),
        }
    }

    fn class_beta(
        &self,
        class: AssetClass,
        returns: &BTreeMap<AssetClass, Vec<f64>>,
        benchmark: Option<&[f64]>,
    ) -> f64 {
        let fallback = self.config.default_beta.get(class);
        let (Some(series), Some(benchmark)) = (returns.get(&class), benchmark) else {
            return fallback;
        };
        let n = series.len().min(benchmark.len());
        if n < 2 {
            return fallback;
        }
        let benchmark_variance = sample_variance(&benchmark[..n]);
        if benchmark_variance <= 0.0 {
            return fallback;
        }
        sample_covariance(series, benchmark) / benchmark_variance
    }

    fn risk_metrics(
        &self,
        weights: &BTreeMap<AssetClass, f64>,
        returns: &BTreeMap<AssetClass, Vec<f64>>,
        benchmark: Option<&[f64]>,
    ) -> RiskMetrics {
        let volatility: f64 = weights
            .iter()
            .map(|(class, w)| w * self.class_volatility(*class, returns))
            .sum();
        let beta: f64 = weights
            .iter()
            .map(|(class, w)| w * self.class_beta(*class, returns, benchmark))
            .sum();

        let risk_score = if volatility > 0.0 {
            100.0 * volatility / (volatility + self.config.risk_half_point)
        } else {
            0.0
        };

        // Expected return over the classes that have a return history
        let periods = self.config.periods_per_year as f64;
        let (weighted, covered) = weights
            .iter()
            .filter_map(|(class, w)| {
                returns
                    .get(class)
                    .filter(|s| !s.is_empty())
                    .map(|s| (w * mean(s), *w))
            })
            .fold((0.0, 0.0), |(sum, cov), (x, w)| (sum + x, cov + w));
        let expected_return = if covered > 0.0 {
            weighted / covered * periods * 100.0
        } else {
            0.0
        };

        let sharpe_ratio = if volatility > 0.0 && covered > 0.0 {
            (expected_return / 100.0 - self.config.risk_free_rate) / (volatility / 100.0)
        } else {
            0.0
        };

        RiskMetrics {
            volatility,
            risk_score,
            risk_level: RiskLevel::from_score(risk_score),
            beta,
            expected_return,
            sharpe_ratio,
        }
    }

    fn performance(
        &self,
        weights: &BTreeMap<AssetClass, f64>,
        returns: &BTreeMap<AssetClass, Vec<f64>>,
    ) -> PerformanceSummary {
        let held: Vec<(AssetClass, f64, &Vec<f64>)> = weights
            .iter()
            .filter_map(|(class, w)| {
                returns
                    .get(class)
                    .filter(|s| !s.is_empty())
                    .map(|s| (*class, *w, s))
            })
            .collect();

        let periods = held.iter().map(|(_, _, s)| s.len()).min().unwrap_or(0);
        let covered: f64 = held.iter().map(|(_, w, _)| w).sum();
        if periods == 0 || covered <= 0.0 {
            return PerformanceSummary {
                annualized_return: 0.0,
                cumulative_return: 0.0,
                periods: 0,
                best_class: None,
                worst_class: None,
            };
        }

        let series: Vec<f64> = (0..periods)
            .map(|t| held.iter().map(|(_, w, s)| w * s[t]).sum::<f64>() / covered)
            .collect();
        let cumulative = series.iter().fold(1.0, |acc, r| acc * (1.0 + r)) - 1.0;

        let by_mean = |&(class, _, s): &(AssetClass, f64, &Vec<f64>)| (class, mean(s));
        let ranked: Vec<(AssetClass, f64)> = held.iter().map(by_mean).collect();
        let best_class = ranked
            .iter()
            .max_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(class, _)| *class);
        let worst_class = ranked
            .iter()
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(class, _)| *class);

        PerformanceSummary {
            annualized_return: mean(&series) * self.config.periods_per_year as f64 * 100.0,
            cumulative_return: cumulative * 100.0,
            periods,
            best_class,
            worst_class,
        }
    }

    fn rebalance_recommendation(&self, entry: &AssetAllocationEntry) -> PortfolioRecommendation {
        let c = &self.config;
        let drift = entry.variance.abs();
        let mut priority = if drift >= c.critical_variance {
            Priority::Critical
        } else if drift >= c.high_variance {
            Priority::High
        } else {
            Priority::Medium
        };
        if entry.amount >= c.large_trade_threshold && priority < Priority::High {
            priority = Priority::High;
        }

        let label = entry.asset_class.label();
        let buying = entry.recommendation == AllocationAction::Buy;
        let (title, trade_step, funding_step) = if buying {
            (
                format!("Increase {} allocation", label),
                format!("Buy ${:.2} of {}", entry.amount, label),
                "Fund the purchase from overweight classes or new contributions".to_string(),
            )
        } else {
            (
                format!("Reduce {} allocation", label),
                format!("Sell ${:.2} of {}", entry.amount, label),
                "Move the proceeds into underweight classes".to_string(),
            )
        };

        let timeframe = match priority {
            Priority::Critical => "Immediately",
            Priority::High => "Within 2 weeks",
            _ => "Within 1 month",
        };

        PortfolioRecommendation {
            key: format!("portfolio:rebalance:{}", entry.asset_class.as_str()),
            title,
            description: format!(
                "{} is {:.1}% of the portfolio against a {:.1}% target.",
                label, entry.current_percentage, entry.target_percentage
            ),
            priority,
            expected_benefit: format!(
                "Brings {} back within {:.0} points of target and restores the intended risk profile",
                label, c.tolerance_band
            ),
            timeframe: timeframe.to_string(),
            steps: vec![
                format!("Review {} holdings across accounts", label),
                trade_step,
                funding_step,
                "Re-check the allocation once trades settle".to_string(),
            ],
            asset_class: Some(entry.asset_class),
            trade_amount: Some(entry.amount),
            estimated_savings: None,
            estimated_cost: Some(entry.amount * c.trading_cost_rate),
        }
    }

    fn advisories(
        &self,
        weights: &BTreeMap<AssetClass, f64>,
        diversification_score: f64,
        risk: &RiskMetrics,
        returns: &BTreeMap<AssetClass, Vec<f64>>,
    ) -> Vec<PortfolioRecommendation> {
        let mut recs = Vec::new();

        if diversification_score < self.config.min_diversification {
            let dominant = weights
                .iter()
                .max_by(|a, b| a.1.total_cmp(b.1))
                .map(|(class, w)| format!("{} ({:.0}%)", class.label(), w * 100.0))
                .unwrap_or_default();
            recs.push(PortfolioRecommendation {
                key: "portfolio:diversification".to_string(),
                title: "Diversify across asset classes".to_string(),
                description: format!(
                    "Diversification score is {:.0}/100; most of the portfolio sits in {}.",
                    diversification_score, dominant
                ),
                priority: Priority::Medium,
                expected_benefit: "Lower concentration risk from any single market".to_string(),
                timeframe: "Within 3 months".to_string(),
                steps: vec![
                    "Pick one or two asset classes you hold little of".to_string(),
                    "Direct new contributions there until weights even out".to_string(),
                ],
                asset_class: None,
                trade_amount: None,
                estimated_savings: None,
                estimated_cost: None,
            });
        }

        let has_returns = weights.keys().any(|c| returns.get(c).is_some_and(|s| !s.is_empty()));
        if has_returns
            && risk.risk_level >= RiskLevel::High
            && risk.sharpe_ratio < self.config.min_sharpe_ratio
        {
            recs.push(PortfolioRecommendation {
                key: "portfolio:risk_adjusted_return".to_string(),
                title: "Improve risk-adjusted returns".to_string(),
                description: format!(
                    "Volatility of {:.1}% is high for a Sharpe ratio of {:.2}.",
                    risk.volatility, risk.sharpe_ratio
                ),
                priority: Priority::High,
                expected_benefit: "Similar returns with smaller swings".to_string(),
                timeframe: "Within 1 month".to_string(),
                steps: vec![
                    "Identify the most volatile holdings".to_string(),
                    "Shift part of them toward bonds or broad index funds".to_string(),
                ],
                asset_class: None,
                trade_amount: None,
                estimated_savings: None,
                estimated_cost: None,
            });
        }

        recs
    }
}

fn validate(
    accounts: &[Account],
    targets: &BTreeMap<AssetClass, f64>,
    returns: &BTreeMap<AssetClass, Vec<f64>>,
    benchmark: Option<&[f64]>,
) -> Result<()> {
    accounts.iter().try_for_each(Account::validate)?;

    for (class, pct) in targets {
        if !pct.is_finite() || !(0.0..=100.0).contains(pct) {
            return Err(Error::invalid(format!(
                "target for {} must be between 0 and 100, got {}",
                class, pct
            )));
        }
    }
    if !targets.is_empty() {
        let sum: f64 = targets.values().sum();
        if (sum - 100.0).abs() > 0.01 {
            return Err(Error::invalid(format!(
                "target allocation must sum to 100, got {:.2}",
                sum
            )));
        }
    }

    for (class, series) in returns {
        if series.iter().any(|r| !r.is_finite()) {
            return Err(Error::invalid(format!("non-finite return in {} series", class)));
        }
    }
    if benchmark.is_some_and(|b| b.iter().any(|r| !r.is_finite())) {
        return Err(Error::invalid("non-finite benchmark return"));
    }

    Ok(())
}
