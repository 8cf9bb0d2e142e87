//! Snapshot insights command

use std::path::Path;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use finsight_core::insights::{
    ActionItem, BudgetAnalysis, BudgetRequest, CashFlowForecast, CashFlowRequest, InsightComposer,
    PortfolioAnalysis, PortfolioRequest,
};
use finsight_core::InsightEngine;
use serde::Serialize;

use super::{load_snapshot, print_json, priority_marker, Snapshot};

const DEFAULT_HORIZON_MONTHS: u32 = 6;

/// Combined output of every analysis that ran
#[derive(Debug, Serialize)]
pub struct InsightsReport {
    pub as_of: NaiveDate,
    pub cash_flow: Option<CashFlowForecast>,
    pub budget: Option<BudgetAnalysis>,
    pub portfolio: Option<PortfolioAnalysis>,
    pub action_items: Vec<ActionItem>,
}

/// Run each analysis whose inputs are present in the snapshot
pub fn build_report(
    engine: &InsightEngine,
    as_of: NaiveDate,
    snapshot: Snapshot,
    limit: Option<usize>,
) -> Result<InsightsReport> {
    let cash_flow = if snapshot.transactions.is_empty() {
        None
    } else {
        let request = CashFlowRequest {
            transactions: snapshot.transactions.clone(),
            current_balance: snapshot.current_balance.unwrap_or(0.0),
            horizon_months: snapshot.horizon_months.unwrap_or(DEFAULT_HORIZON_MONTHS),
            include_recurring: snapshot.include_recurring.unwrap_or(true),
            as_of,
        };
        Some(
            engine
                .compute_cash_flow_forecast(&request)
                .context("Cash flow forecast failed")?,
        )
    };

    let budget = if snapshot.budgets.is_empty() {
        None
    } else {
        let request = BudgetRequest {
            transactions: snapshot.transactions.clone(),
            budgets: snapshot.budgets.clone(),
            as_of,
        };
        Some(
            engine
                .compute_budget_analysis(&request)
                .context("Budget analysis failed")?,
        )
    };

    let portfolio = if snapshot.accounts.is_empty() {
        None
    } else {
        let request = PortfolioRequest {
            target_allocation: snapshot.targets()?,
            historical_returns: snapshot.returns()?,
            accounts: snapshot.accounts,
            benchmark_returns: snapshot.benchmark_returns,
            as_of,
        };
        Some(
            engine
                .compute_portfolio_analysis(&request)
                .context("Portfolio analysis failed")?,
        )
    };

    let composer = match limit {
        Some(limit) => InsightComposer::with_limit(limit),
        None => InsightComposer::new(),
    };
    let action_items = composer.compose(cash_flow.as_ref(), budget.as_ref(), portfolio.as_ref());

    tracing::info!(
        cash_flow = cash_flow.is_some(),
        budget = budget.is_some(),
        portfolio = portfolio.is_some(),
        items = action_items.len(),
        "Insights computed"
    );

    Ok(InsightsReport {
        as_of,
        cash_flow,
        budget,
        portfolio,
        action_items,
    })
}

pub fn cmd_insights(
    engine: &InsightEngine,
    as_of: NaiveDate,
    snapshot: &Path,
    limit: Option<usize>,
    json: bool,
) -> Result<()> {
    let report = build_report(engine, as_of, load_snapshot(snapshot)?, limit)?;

    if json {
        return print_json(&report);
    }

    println!();
    println!("💡 Action Items (as of {})", report.as_of);
    println!("   ─────────────────────────────────────────────────────────────");

    if report.action_items.is_empty() {
        println!("   Nothing needs attention.");
    }
    for (i, item) in report.action_items.iter().enumerate() {
        println!(
            "   {:>2}. {} [{}] {}",
            i + 1,
            priority_marker(item.priority()),
            item.source(),
            item.title()
        );
        println!("       {}", item.description());
    }
    println!();
    Ok(())
}
