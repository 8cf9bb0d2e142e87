//! Portfolio analysis command

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use finsight_core::insights::{AllocationAction, PortfolioAnalysis, PortfolioRequest};
use finsight_core::InsightEngine;

use super::{load_accounts, load_returns, load_targets, print_json, priority_marker};

pub fn cmd_portfolio(
    engine: &InsightEngine,
    as_of: NaiveDate,
    accounts: &Path,
    targets: Option<&Path>,
    returns: Option<&Path>,
    json: bool,
) -> Result<()> {
    let target_allocation = match targets {
        Some(path) => load_targets(path)?,
        None => BTreeMap::new(),
    };
    let (historical_returns, benchmark_returns) = match returns {
        Some(path) => load_returns(path)?,
        None => (BTreeMap::new(), None),
    };

    let request = PortfolioRequest {
        accounts: load_accounts(accounts)?,
        target_allocation,
        historical_returns,
        benchmark_returns,
        as_of,
    };

    let analysis = engine
        .compute_portfolio_analysis(&request)
        .context("Portfolio analysis failed")?;

    if json {
        print_json(&analysis)
    } else {
        print_portfolio(&analysis);
        Ok(())
    }
}

pub fn print_portfolio(analysis: &PortfolioAnalysis) {
    println!();
    println!("📊 Portfolio");
    println!(
        "   Total value ${:.2} · diversification {:.0}/100",
        analysis.total_value, analysis.diversification_score
    );
    println!("   ─────────────────────────────────────────────────────────────");

    println!(
        "   {:12} │ {:>12} │ {:>7} │ {:>7} │ {:>7} │ {:>12}",
        "Class", "Value", "Now", "Target", "Drift", "Action"
    );
    println!("   ─────────────┼──────────────┼─────────┼─────────┼─────────┼──────────────");
    for e in &analysis.allocation {
        let action = match e.recommendation {
            AllocationAction::Hold => "hold".to_string(),
            action => format!("{} ${:.0}", action, e.amount),
        };
        println!(
            "   {:12} │ {:>12.2} │ {:>6.1}% │ {:>6.1}% │ {:>+7.1} │ {:>12}",
            e.asset_class.label(),
            e.current_value,
            e.current_percentage,
            e.target_percentage,
            e.variance,
            action
        );
    }

    let risk = &analysis.risk;
    println!();
    println!(
        "   Risk {} ({:.0}/100) · volatility {:.1}% · beta {:.2} · Sharpe {:.2}",
        risk.risk_level, risk.risk_score, risk.volatility, risk.beta, risk.sharpe_ratio
    );

    let perf = &analysis.performance;
    if perf.periods > 0 {
        println!(
            "   Return {:.1}%/yr · cumulative {:.1}% over {} periods",
            perf.annualized_return, perf.cumulative_return, perf.periods
        );
        if let (Some(best), Some(worst)) = (perf.best_class, perf.worst_class) {
            println!("   Best {} · worst {}", best.label(), worst.label());
        }
    }

    match analysis.next_rebalance_date {
        Some(date) => println!("   Rebalancing needed · next review {}", date),
        None => println!("   ✓ Allocation within tolerance"),
    }

    if !analysis.recommendations.is_empty() {
        println!();
        println!("   Recommendations:");
        for rec in &analysis.recommendations {
            println!(
                "   {} {} ({})",
                priority_marker(rec.priority),
                rec.title,
                rec.timeframe
            );
            println!("      {}", rec.description);
            for (i, step) in rec.steps.iter().enumerate() {
                println!("      {}. {}", i + 1, step);
            }
            if let Some(cost) = rec.estimated_cost {
                println!("      Estimated cost ${:.2}", cost);
            }
        }
    }
    println!();
}
