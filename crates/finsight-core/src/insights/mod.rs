//! Insight Engine - Financial Insights
//!
//! Turns raw transaction, budget and account snapshots into forecasts,
//! alerts and recommendations. Everything here is pure computation: callers
//! pass an explicit `as_of` date and get the same answer every time.
//!
//! ## Analyzers
//!
//! - **Transaction Aggregator** - Monthly buckets and recurring series
//! - **Cash Flow Forecaster** - Projects income, expenses and balance
//! - **Budget Analyzer** - Utilization alerts and budget reallocation
//! - **Portfolio Advisor** - Allocation drift, risk and rebalancing
//! - **Insight Composer** - One ranked list of action items
//!
//! ## Usage
//!
//! ```rust,ignore
//! use finsight_core::insights::{BudgetRequest, InsightEngine};
//!
//! let engine = InsightEngine::new();
//! let analysis = engine.compute_budget_analysis(&request)?;
//! let items = engine.compose_insights(None, Some(&analysis), None);
//! ```

pub mod aggregator;
pub mod budget;
pub mod cash_flow;
pub mod composer;
pub mod engine;
pub mod portfolio;
pub mod types;

pub use aggregator::{AggregatedHistory, Cadence, MonthlyBucket, RecurringSeries, TransactionAggregator};
pub use budget::{
    BudgetAlert, BudgetAnalysis, BudgetAnalyzer, BudgetCategory, BudgetInsights,
    BudgetRecommendation, UnbudgetedSpending,
};
pub use cash_flow::{
    CashFlowForecast, CashFlowForecaster, CashFlowInsights, CashFlowPrediction,
    CashFlowRecommendation,
};
pub use composer::{ActionItem, Actionable, InsightComposer};
pub use engine::{BudgetRequest, CashFlowRequest, InsightEngine, PortfolioRequest};
pub use portfolio::{
    AssetAllocationEntry, PerformanceSummary, PortfolioAdvisor, PortfolioAnalysis,
    PortfolioRecommendation, RiskMetrics,
};
pub use types::{AllocationAction, Priority, RiskLevel, Severity, Trend};
