//! Budget analysis command

use std::path::Path;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use finsight_core::insights::{BudgetAnalysis, BudgetRequest};
use finsight_core::InsightEngine;

use super::{load_budgets, load_transactions, print_json, priority_marker, truncate};

pub fn cmd_budget(
    engine: &InsightEngine,
    as_of: NaiveDate,
    transactions: &Path,
    budgets: &Path,
    json: bool,
) -> Result<()> {
    let request = BudgetRequest {
        transactions: load_transactions(transactions)?,
        budgets: load_budgets(budgets)?,
        as_of,
    };

    let analysis = engine
        .compute_budget_analysis(&request)
        .context("Budget analysis failed")?;

    if json {
        print_json(&analysis)
    } else {
        print_budget(&analysis);
        Ok(())
    }
}

pub fn print_budget(analysis: &BudgetAnalysis) {
    let insights = &analysis.insights;

    println!();
    println!("💰 Budget Check ({})", analysis.as_of.format("%B %Y"));
    println!("   ─────────────────────────────────────────────────────────────");

    if analysis.categories.is_empty() {
        println!("   No budgets defined.");
    } else {
        println!(
            "   {:20} │ {:>10} │ {:>10} │ {:>6} │ {:>10}",
            "Category", "Budget", "Spent", "Used", "Recent avg"
        );
        println!("   ─────────────────────┼────────────┼────────────┼────────┼────────────");
        for c in &analysis.categories {
            println!(
                "   {:20} │ {:>10.2} │ {:>10.2} │ {:>5.0}% │ {:>10.2}",
                truncate(&c.name, 20),
                c.current_budget,
                c.current_spending,
                c.utilization * 100.0,
                c.recent_average_spend
            );
        }
    }

    println!();
    println!(
        "   Budgeted ${:.2} · spent ${:.2} · {} over budget · efficiency {:.0}/100",
        insights.total_budgeted,
        insights.total_spent,
        insights.categories_over_budget,
        insights.budget_efficiency
    );
    println!(
        "   Savings rate {:.1}% (target {:.0}%)",
        insights.savings_rate * 100.0,
        insights.recommended_savings_rate * 100.0
    );

    if !insights.unbudgeted_spending.is_empty() {
        println!();
        println!("   Unbudgeted this month:");
        for u in &insights.unbudgeted_spending {
            println!("     {:20} ${:>9.2}", truncate(&u.category, 20), u.amount);
        }
    }

    if !analysis.alerts.is_empty() {
        println!();
        println!("   Alerts:");
        for alert in &analysis.alerts {
            println!("   {} {}", priority_marker(alert.severity.priority()), alert.title);
            println!("      {}", alert.message);
            println!("      → {}", alert.suggested_action);
        }
    }

    let changes: Vec<_> = analysis
        .recommendations
        .iter()
        .filter(|r| r.recommended_budget != r.current_budget)
        .collect();
    if !changes.is_empty() {
        println!();
        println!("   Suggested budgets:");
        for rec in changes {
            println!(
                "   {} {:20} ${:>9.2} → ${:>9.2}",
                priority_marker(rec.priority),
                truncate(&rec.category, 20),
                rec.current_budget,
                rec.recommended_budget
            );
            println!("      {}", rec.reasoning);
        }
    }
    println!();
}
