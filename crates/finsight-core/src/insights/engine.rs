//! Insight Engine - the request/response facade over the analyzers

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::config::EngineConfig;
use crate::models::{Account, AssetClass, Budget, Transaction};
use crate::Result;

use super::budget::{BudgetAnalysis, BudgetAnalyzer};
use super::cash_flow::{CashFlowForecast, CashFlowForecaster};
use super::composer::{ActionItem, InsightComposer};
use super::portfolio::{PortfolioAdvisor, PortfolioAnalysis};

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CashFlowRequest {
    pub transactions: Vec<Transaction>,
    pub current_balance: f64,
    pub horizon_months: u32,
    #[serde(default = "default_true")]
    pub include_recurring: bool,
    pub as_of: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetRequest {
    pub transactions: Vec<Transaction>,
    pub budgets: Vec<Budget>,
    pub as_of: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioRequest {
    pub accounts: Vec<Account>,
    /// Percent per asset class; empty for "no targets"
    #[serde(default)]
    pub target_allocation: BTreeMap<AssetClass, f64>,
    /// Periodic fractional returns per asset class, oldest first
    #[serde(default)]
    pub historical_returns: BTreeMap<AssetClass, Vec<f64>>,
    #[serde(default)]
    pub benchmark_returns: Option<Vec<f64>>,
    pub as_of: NaiveDate,
}

/// Stateless entry point holding only configuration
///
/// Every call is a pure function of its request and the configuration, so a
/// single engine can be shared freely across threads.
#[derive(Debug, Clone, Default)]
pub struct InsightEngine {
    config: EngineConfig,
}

impl InsightEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Engine over a caller-built configuration, rejected if inconsistent
    pub fn with_config(config: EngineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn compute_cash_flow_forecast(&self, request: &CashFlowRequest) -> Result<CashFlowForecast> {
        CashFlowForecaster::with_config(self.config.aggregation.clone(), self.config.forecast.clone())
            .forecast(
                &request.transactions,
                request.current_balance,
                request.horizon_months,
                request.include_recurring,
                request.as_of,
            )
    }

    pub fn compute_budget_analysis(&self, request: &BudgetRequest) -> Result<BudgetAnalysis> {
        BudgetAnalyzer::with_config(self.config.budget.clone()).analyze(
            &request.transactions,
            &request.budgets,
            request.as_of,
        )
    }

    pub fn compute_portfolio_analysis(&self, request: &PortfolioRequest) -> Result<PortfolioAnalysis> {
        PortfolioAdvisor::with_config(self.config.portfolio.clone()).analyze(
            &request.accounts,
            &request.target_allocation,
            &request.historical_returns,
            request.benchmark_returns.as_deref(),
            request.as_of,
        )
    }

    pub fn compose_insights(
        &self,
        cash_flow: Option<&CashFlowForecast>,
        budget: Option<&BudgetAnalysis>,
        portfolio: Option<&PortfolioAnalysis>,
    ) -> Vec<ActionItem> {
        InsightComposer::new().compose(cash_flow, budget, portfolio)
    }
}
