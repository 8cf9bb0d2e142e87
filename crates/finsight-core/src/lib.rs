//! Finsight Core Library
//!
//! Deterministic financial insight computations:
//! - Monthly aggregation and recurring transaction detection
//! - Multi-month cash-flow forecasting with confidence decay
//! - Budget utilization alerts and reallocation recommendations
//! - Portfolio drift, risk metrics and rebalancing advice
//! - A composer that ranks everything into one action list
//! - Layered engine configuration (embedded defaults, TOML override)

pub mod config;
pub mod error;
pub mod insights;
pub mod models;
pub mod stats;

/// Fixture builders for transaction histories
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use config::{
    default_config_path, AggregationConfig, AssetClassTable, BudgetConfig, EngineConfig,
    ForecastConfig, PortfolioConfig,
};
pub use error::{Error, Result};
pub use insights::{
    ActionItem, BudgetAnalysis, BudgetRequest, CashFlowForecast, CashFlowRequest, InsightEngine,
    PortfolioAnalysis, PortfolioRequest, Priority, Severity,
};
pub use models::{Account, AssetClass, Budget, Transaction, TransactionKind};
