//! Engine configuration
//!
//! All numeric policy (smoothing factors, thresholds, tolerance bands,
//! confidence decay) lives here so the analyzers stay free of magic numbers.
//!
//! ## Configuration Resolution
//!
//! Config is loaded with a layered resolution:
//! 1. Explicit path, if given (must exist)
//! 2. Override in data dir (~/.local/share/finsight/config/engine.toml)
//! 3. Embedded defaults (compiled into binary)
//!
//! Keys missing from an override file keep their defaults.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::models::AssetClass;

/// Embedded default config (compiled into binary)
const DEFAULT_CONFIG: &str = include_str!("../../../config/engine.toml");

/// Ten years
const MAX_REBALANCE_OFFSET_DAYS: i64 = 3650;

/// Monthly bucketing and recurring detection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AggregationConfig {
    pub window_months: u32,
    pub min_history_months: u32,
    pub amount_tolerance: f64,
    pub interval_tolerance_days: i64,
    pub min_consistent_gaps: usize,
    pub min_interval_days: i64,
}

impl Default for AggregationConfig {
    fn default() -> Self {
        Self {
            window_months: 6,
            min_history_months: 2,
            amount_tolerance: 0.05,
            interval_tolerance_days: 3,
            min_consistent_gaps: 2,
            min_interval_days: 5,
        }
    }
}

/// Cash-flow projection policy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForecastConfig {
    pub base_confidence: f64,
    pub decay_per_month: f64,
    pub confidence_floor: f64,
    pub volatility_penalty_weight: f64,
    pub max_volatility_penalty: f64,
    pub low_history_confidence: f64,
    pub max_horizon_months: u32,
    pub trend_threshold: f64,
    pub volatility_alert_ratio: f64,
    pub target_savings_rate: f64,
    pub idle_cash_months: f64,
    pub recurring_share_alert: f64,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            base_confidence: 0.9,
            decay_per_month: 0.05,
            confidence_floor: 0.2,
            volatility_penalty_weight: 0.5,
            max_volatility_penalty: 0.3,
            low_history_confidence: 0.3,
            max_horizon_months: 60,
            trend_threshold: 0.10,
            volatility_alert_ratio: 0.30,
            target_savings_rate: 0.20,
            idle_cash_months: 6.0,
            recurring_share_alert: 0.5,
        }
    }
}

/// Budget utilization and reallocation policy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BudgetConfig {
    pub smoothing_factor: f64,
    pub history_months: u32,
    pub critical_utilization: f64,
    pub high_utilization: f64,
    pub medium_utilization: f64,
    pub low_utilization: f64,
    pub high_savings_threshold: f64,
    pub medium_savings_threshold: f64,
    pub recommended_savings_rate: f64,
}

impl Default for BudgetConfig {
    fn default() -> Self {
        Self {
            smoothing_factor: 0.5,
            history_months: 3,
            critical_utilization: 1.0,
            high_utilization: 0.9,
            medium_utilization: 0.75,
            low_utilization: 0.5,
            high_savings_threshold: 50.0,
            medium_savings_threshold: 10.0,
            recommended_savings_rate: 0.20,
        }
    }
}

/// A value per asset class
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetClassTable {
    pub stocks: f64,
    pub bonds: f64,
    pub cash: f64,
    pub real_estate: f64,
    pub crypto: f64,
    pub commodities: f64,
    pub other: f64,
}

impl AssetClassTable {
    pub fn get(&self, class: AssetClass) -> f64 {
        match class {
            AssetClass::Stocks => self.stocks,
            AssetClass::Bonds => self.bonds,
            AssetClass::Cash => self.cash,
            AssetClass::RealEstate => self.real_estate,
            AssetClass::Crypto => self.crypto,
            AssetClass::Commodities => self.commodities,
            AssetClass::Other => self.other,
        }
    }

    fn values(&self) -> [f64; 7] {
        [
            self.stocks,
            self.bonds,
            self.cash,
            self.real_estate,
            self.crypto,
            self.commodities,
            self.other,
        ]
    }
}

/// Allocation drift and risk policy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PortfolioConfig {
    pub tolerance_band: f64,
    pub rebalance_offset_days: i64,
    pub periods_per_year: u32,
    pub risk_free_rate: f64,
    pub risk_half_point: f64,
    pub large_trade_threshold: f64,
    pub trading_cost_rate: f64,
    pub min_diversification: f64,
    pub critical_variance: f64,
    pub high_variance: f64,
    pub min_sharpe_ratio: f64,
    pub default_volatility: AssetClassTable,
    pub default_beta: AssetClassTable,
}

impl Default for PortfolioConfig {
    fn default() -> Self {
        Self {
            tolerance_band: 5.0,
            rebalance_offset_days: 30,
            periods_per_year: 12,
            risk_free_rate: 0.02,
            risk_half_point: 20.0,
            large_trade_threshold: 10_000.0,
            trading_cost_rate: 0.001,
            min_diversification: 50.0,
            critical_variance: 20.0,
            high_variance: 10.0,
            min_sharpe_ratio: 0.5,
            default_volatility: AssetClassTable {
                stocks: 16.0,
                bonds: 6.0,
                cash: 0.5,
                real_estate: 14.0,
                crypto: 70.0,
                commodities: 20.0,
                other: 15.0,
            },
            default_beta: AssetClassTable {
                stocks: 1.0,
                bonds: 0.2,
                cash: 0.0,
                real_estate: 0.8,
                crypto: 1.5,
                commodities: 0.5,
                other: 1.0,
            },
        }
    }
}

/// Complete engine configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub aggregation: AggregationConfig,
    pub forecast: ForecastConfig,
    pub budget: BudgetConfig,
    pub portfolio: PortfolioConfig,
}

impl EngineConfig {
    /// Load configuration (explicit path, then data-dir override, then embedded defaults)
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let content = match path {
            Some(path) => fs::read_to_string(path).map_err(|e| {
                Error::Config(format!("Failed to read {}: {}", path.display(), e))
            })?,
            None => match default_config_path() {
                Some(default_path) if default_path.exists() => {
                    tracing::debug!(path = %default_path.display(), "Using config override");
                    fs::read_to_string(&default_path)?
                }
                _ => DEFAULT_CONFIG.to_string(),
            },
        };

        Self::parse(&content)
    }

    /// Parse and validate config from TOML content
    pub fn parse(content: &str) -> Result<Self> {
        let config: EngineConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject inconsistent constants
    pub fn validate(&self) -> Result<()> {
        let agg = &self.aggregation;
        if agg.window_months == 0 {
            return Err(Error::Config("aggregation.window_months must be at least 1".into()));
        }
        if !(0.0..1.0).contains(&agg.amount_tolerance) {
            return Err(Error::Config("aggregation.amount_tolerance must be in [0, 1)".into()));
        }
        if agg.interval_tolerance_days < 0 || agg.min_interval_days < 1 {
            return Err(Error::Config(
                "aggregation interval settings must be positive".into(),
            ));
        }
        if agg.min_consistent_gaps == 0 {
            return Err(Error::Config(
                "aggregation.min_consistent_gaps must be at least 1".into(),
            ));
        }

        let fc = &self.forecast;
        let unit = 0.0..=1.0;
        for (name, value) in [
            ("base_confidence", fc.base_confidence),
            ("confidence_floor", fc.confidence_floor),
            ("low_history_confidence", fc.low_history_confidence),
        ] {
            if !unit.contains(&value) {
                return Err(Error::Config(format!("forecast.{} must be in [0, 1]", name)));
            }
        }
        if fc.confidence_floor > fc.base_confidence {
            return Err(Error::Config(
                "forecast.confidence_floor cannot exceed base_confidence".into(),
            ));
        }
        if fc.low_history_confidence < fc.confidence_floor {
            return Err(Error::Config(
                "forecast.low_history_confidence cannot be below confidence_floor".into(),
            ));
        }
        if fc.decay_per_month < 0.0
            || fc.volatility_penalty_weight < 0.0
            || fc.max_volatility_penalty < 0.0
        {
            return Err(Error::Config("forecast decay/penalty values must be non-negative".into()));
        }
        if fc.max_horizon_months == 0 {
            return Err(Error::Config("forecast.max_horizon_months must be at least 1".into()));
        }

        let bc = &self.budget;
        if !unit.contains(&bc.smoothing_factor) {
            return Err(Error::Config("budget.smoothing_factor must be in [0, 1]".into()));
        }
        if !(bc.low_utilization <= bc.medium_utilization
            && bc.medium_utilization <= bc.high_utilization
            && bc.high_utilization <= bc.critical_utilization)
        {
            return Err(Error::Config(
                "budget utilization thresholds must be ascending (low <= medium <= high <= critical)"
                    .into(),
            ));
        }
        if bc.medium_savings_threshold > bc.high_savings_threshold {
            return Err(Error::Config(
                "budget.medium_savings_threshold cannot exceed high_savings_threshold".into(),
            ));
        }

        let pc = &self.portfolio;
        if pc.tolerance_band < 0.0 {
            return Err(Error::Config("portfolio.tolerance_band must be non-negative".into()));
        }
        if !(0..=MAX_REBALANCE_OFFSET_DAYS).contains(&pc.rebalance_offset_days) {
            return Err(Error::Config(format!(
                "portfolio.rebalance_offset_days must be between 0 and {}",
                MAX_REBALANCE_OFFSET_DAYS
            )));
        }
        if pc.periods_per_year == 0 {
            return Err(Error::Config("portfolio.periods_per_year must be at least 1".into()));
        }
        if pc.risk_half_point <= 0.0 {
            return Err(Error::Config("portfolio.risk_half_point must be positive".into()));
        }
        if pc.high_variance > pc.critical_variance {
            return Err(Error::Config(
                "portfolio.high_variance cannot exceed critical_variance".into(),
            ));
        }
        if pc.default_volatility.values().iter().any(|v| *v < 0.0 || !v.is_finite()) {
            return Err(Error::Config(
                "portfolio.default_volatility values must be non-negative".into(),
            ));
        }

        Ok(())
    }
}

/// Default config override path
pub fn default_config_path() -> Option<PathBuf> {
    dirs::data_local_dir().map(|d| d.join("finsight").join("config").join("engine.toml"))
}
