//! Cash-flow forecast command

use std::path::Path;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use finsight_core::insights::{CashFlowForecast, CashFlowRequest};
use finsight_core::{InsightEngine, TransactionKind};

use super::{load_transactions, print_json, priority_marker};

pub fn cmd_forecast(
    engine: &InsightEngine,
    as_of: NaiveDate,
    transactions: &Path,
    balance: f64,
    months: u32,
    include_recurring: bool,
    json: bool,
) -> Result<()> {
    let request = CashFlowRequest {
        transactions: load_transactions(transactions)?,
        current_balance: balance,
        horizon_months: months,
        include_recurring,
        as_of,
    };

    let forecast = engine
        .compute_cash_flow_forecast(&request)
        .context("Cash flow forecast failed")?;

    if json {
        print_json(&forecast)
    } else {
        print_forecast(&forecast);
        Ok(())
    }
}

pub fn print_forecast(forecast: &CashFlowForecast) {
    let insights = &forecast.insights;

    println!();
    println!("📈 Cash Flow Forecast");
    println!(
        "   As of {} · balance ${:.2} · {} month(s) of history",
        forecast.as_of, forecast.current_balance, insights.months_of_history
    );
    println!("   ─────────────────────────────────────────────────────────────");
    println!(
        "   Avg income ${:.2} · avg expenses ${:.2} · net ${:.2}/month",
        insights.avg_monthly_income, insights.avg_monthly_expenses, insights.monthly_net_change
    );
    println!(
        "   Volatility ${:.2} · savings rate {:.1}% · trend {}",
        insights.volatility,
        insights.savings_rate * 100.0,
        insights.trend
    );
    println!();
    println!(
        "   {:10} │ {:>11} │ {:>11} │ {:>12} │ {:>5}",
        "Month", "Income", "Expenses", "Balance", "Conf"
    );
    println!("   ───────────┼─────────────┼─────────────┼──────────────┼───────");

    for p in &forecast.predictions {
        println!(
            "   {:10} │ {:>11.2} │ {:>11.2} │ {:>12.2} │ {:>4.0}%",
            p.date.format("%Y-%m").to_string(),
            p.predicted_income,
            p.predicted_expenses,
            p.predicted_balance,
            p.confidence * 100.0
        );
    }

    if !forecast.recurring.is_empty() {
        println!();
        println!("   Recurring ({}):", forecast.recurring.len());
        for series in &forecast.recurring {
            println!(
                "     {} {:20} ${:>9.2} {} · next {}",
                if series.kind == TransactionKind::Income { "+" } else { "-" },
                super::truncate(&series.category, 20),
                series.amount,
                series.cadence,
                series.next_expected()
            );
        }
    }

    if !forecast.recommendations.is_empty() {
        println!();
        println!("   Recommendations:");
        for rec in &forecast.recommendations {
            println!("   {} {}", priority_marker(rec.priority), rec.title);
            println!("      {}", rec.description);
        }
    }
    println!();
}
