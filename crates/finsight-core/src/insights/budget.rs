//! Budget Analyzer
//!
//! Compares the current month's spending against per-category budgets:
//! - Utilization and severity-ranked alerts
//! - Reallocation recommendations blending the budget with recent spend
//! - Household-level totals (savings rate, budget efficiency, unbudgeted spend)

use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::config::BudgetConfig;
use crate::error::{Error, Result};
use crate::models::{category_key, validate_transactions, Budget, Transaction, TransactionKind};
use crate::stats::{mean, ratio, round_cents};

use super::aggregator::{month_start, shift_months};
use super::composer::{ActionItem, InsightComposer};
use super::types::{Priority, Severity};

/// Budget versus spending for one category in the current month
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetCategory {
    pub name: String,
    pub current_budget: f64,
    pub current_spending: f64,
    /// `current_spending / current_budget` (0 for a zero budget)
    pub utilization: f64,
    pub recent_average_spend: f64,
    /// Spend strictly increased month over month across the history months
    pub spending_rising: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetAlert {
    /// Stable identifier: `budget:{category}:{severity}`
    pub id: String,
    pub category: String,
    pub severity: Severity,
    pub title: String,
    pub message: String,
    pub suggested_action: String,
    pub utilization: f64,
    pub current_spending: f64,
    pub current_budget: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetRecommendation {
    pub category: String,
    pub current_budget: f64,
    pub current_spending: f64,
    pub recommended_budget: f64,
    /// Never negative
    pub potential_savings: f64,
    pub priority: Priority,
    pub reasoning: String,
}

/// Current-month spending in a category that has no budget
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnbudgetedSpending {
    pub category: String,
    pub amount: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetInsights {
    pub total_budgeted: f64,
    /// Current-month spending in budgeted categories
    pub total_spent: f64,
    /// Income over the history months plus the current month
    pub total_income: f64,
    /// Expenses over the history months plus the current month
    pub total_spending: f64,
    pub savings_rate: f64,
    pub recommended_savings_rate: f64,
    /// 0-100, higher when spending tracks budgets closely
    pub budget_efficiency: f64,
    pub categories_over_budget: usize,
    /// Largest first
    pub unbudgeted_spending: Vec<UnbudgetedSpending>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetAnalysis {
    pub as_of: NaiveDate,
    pub categories: Vec<BudgetCategory>,
    pub alerts: Vec<BudgetAlert>,
    pub recommendations: Vec<BudgetRecommendation>,
    pub insights: BudgetInsights,
    /// Alerts and non-low recommendations, ranked
    pub action_items: Vec<ActionItem>,
}

/// Per-category expense totals keyed by normalized category
#[derive(Default)]
struct CategorySpend {
    totals: BTreeMap<String, (String, f64)>,
}

impl CategorySpend {
    fn collect(transactions: &[Transaction], start: NaiveDate, end: NaiveDate, as_of: NaiveDate) -> Self {
        let mut spend = Self::default();
        for tx in transactions {
            if tx.date < start || tx.date >= end || tx.date > as_of {
                continue;
            }
            if tx.kind() != TransactionKind::Expense {
                continue;
            }
            let entry = spend
                .totals
                .entry(tx.category_key())
                .or_insert_with(|| (tx.category.trim().to_string(), 0.0));
            entry.1 += tx.magnitude();
        }
        spend
    }

    fn get(&self, key: &str) -> f64 {
        self.totals.get(key).map(|(_, amount)| *amount).unwrap_or(0.0)
    }
}

/// Analyzes budgets against spending
pub struct BudgetAnalyzer {
    config: BudgetConfig,
}

impl Default for BudgetAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl BudgetAnalyzer {
    pub fn new() -> Self {
        Self::with_config(BudgetConfig::default())
    }

    pub fn with_config(config: BudgetConfig) -> Self {
        Self { config }
    }

    pub fn analyze(
        &self,
        transactions: &[Transaction],
        budgets: &[Budget],
        as_of: NaiveDate,
    ) -> Result<BudgetAnalysis> {
        validate_transactions(transactions)?;
        let mut seen = BTreeSet::new();
        for budget in budgets {
            budget.validate()?;
            if !seen.insert(category_key(&budget.category)) {
                return Err(Error::invalid(format!(
                    "duplicate budget for category '{}'",
                    budget.category.trim()
                )));
            }
        }

        let current_month = month_start(as_of);
        let next_month = shift_months(current_month, 1);
        let history_months = self.config.history_months;

        let current = CategorySpend::collect(transactions, current_month, next_month, as_of);
        // Oldest first
        let history: Vec<CategorySpend> = (1..=history_months)
            .rev()
            .map(|back| {
                let start = shift_months(current_month, -(back as i32));
                CategorySpend::collect(transactions, start, shift_months(start, 1), as_of)
            })
            .collect();

        let categories: Vec<BudgetCategory> = budgets
            .iter()
            .map(|budget| self.category_status(budget, &current, &history))
            .collect();

        let mut alerts: Vec<BudgetAlert> = categories
            .iter()
            .filter_map(|c| self.alert_for(c))
            .collect();
        alerts.sort_by(|a, b| {
            b.severity
                .rank()
                .cmp(&a.severity.rank())
                .then_with(|| b.utilization.total_cmp(&a.utilization))
                .then_with(|| a.category.cmp(&b.category))
        });

        let mut recommendations: Vec<BudgetRecommendation> = categories
            .iter()
            .map(|c| {
                let severity = alerts.iter().find(|a| a.category == c.name).map(|a| a.severity);
                self.recommend(c, severity)
            })
            .collect();
        recommendations.sort_by(|a, b| {
            b.priority
                .cmp(&a.priority)
                .then_with(|| b.potential_savings.total_cmp(&a.potential_savings))
                .then_with(|| a.category.cmp(&b.category))
        });

        let insights = self.insights(transactions, budgets, &categories, &current, as_of);

        let action_items = InsightComposer::rank(
            alerts
                .iter()
                .cloned()
                .map(ActionItem::BudgetAlert)
                .chain(
                    recommendations
                        .iter()
                        .filter(|r| r.priority != Priority::Low)
                        .cloned()
                        .map(ActionItem::Budget),
                )
                .collect(),
        );

        tracing::debug!(
            budgets = budgets.len(),
            alerts = alerts.len(),
            over_budget = insights.categories_over_budget,
            efficiency = insights.budget_efficiency,
            "Budget analysis complete"
        );

        Ok(BudgetAnalysis {
            as_of,
            categories,
            alerts,
            recommendations,
            insights,
            action_items,
        })
    }

    fn category_status(
        &self,
        budget: &Budget,
        current: &CategorySpend,
        history: &[CategorySpend],
    ) -> BudgetCategory {
        let key = category_key(&budget.category);
        let current_spending = current.get(&key);
        let monthly: Vec<f64> = history.iter().map(|month| month.get(&key)).collect();

        let recent_average_spend = if monthly.iter().any(|v| *v > 0.0) {
            mean(&monthly)
        } else {
            current_spending
        };
        let spending_rising = monthly.len() >= 2 && monthly.windows(2).all(|w| w[1] > w[0]);

        BudgetCategory {
            name: budget.category.trim().to_string(),
            current_budget: budget.amount,
            current_spending,
            utilization: ratio(current_spending, budget.amount),
            recent_average_spend,
            spending_rising,
        }
    }

    /// Severity step function over utilization
    pub fn severity(&self, utilization: f64, spending_rising: bool) -> Option<Severity> {
        let c = &self.config;
        if utilization >= c.critical_utilization {
            Some(Severity::Critical)
        } else if utilization >= c.high_utilization {
            Some(Severity::High)
        } else if utilization >= c.medium_utilization {
            Some(Severity::Medium)
        } else if utilization >= c.low_utilization && spending_rising {
            Some(Severity::Low)
        } else {
            None
        }
    }

    fn alert_for(&self, category: &BudgetCategory) -> Option<BudgetAlert> {
        let severity = self.severity(category.utilization, category.spending_rising)?;
        let name = &category.name;
        let pct = category.utilization * 100.0;

        let (title, message) = match severity {
            Severity::Critical => (
                format!("{} budget exceeded", name),
                format!(
                    "You've spent ${:.2} against a ${:.2} budget ({:.0}%).",
                    category.current_spending, category.current_budget, pct
                ),
            ),
            Severity::High => (
                format!("{} budget almost used", name),
                format!(
                    "{:.0}% of the {} budget is gone; ${:.2} left this month.",
                    pct,
                    name,
                    (category.current_budget - category.current_spending).max(0.0)
                ),
            ),
            Severity::Medium => (
                format!("{} budget {:.0}% used", name, pct),
                format!(
                    "${:.2} of ${:.2} spent so far this month.",
                    category.current_spending, category.current_budget
                ),
            ),
            Severity::Low => (
                format!("{} spending is rising", name),
                format!(
                    "Spending has grown each month and is at {:.0}% of budget already.",
                    pct
                ),
            ),
        };

        Some(BudgetAlert {
            id: format!("budget:{}:{}", category_key(name), severity.as_str()),
            category: name.clone(),
            severity,
            title,
            message,
            suggested_action: severity.suggested_action().to_string(),
            utilization: category.utilization,
            current_spending: category.current_spending,
            current_budget: category.current_budget,
        })
    }

    fn recommend(&self, category: &BudgetCategory, alert: Option<Severity>) -> BudgetRecommendation {
        let alpha = self.config.smoothing_factor;
        let budget = category.current_budget;
        let recommended_budget =
            round_cents(budget * (1.0 - alpha) + category.recent_average_spend * alpha);
        let potential_savings = round_cents((budget - recommended_budget).max(0.0));

        let priority = if potential_savings > self.config.high_savings_threshold
            || matches!(alert, Some(Severity::Critical | Severity::High))
        {
            Priority::High
        } else if potential_savings > self.config.medium_savings_threshold
            || alert == Some(Severity::Medium)
        {
            Priority::Medium
        } else {
            Priority::Low
        };

        let reasoning = if recommended_budget < budget {
            format!(
                "Recent spending averages ${:.2}/month, under the ${:.2} budget. \
                 Lowering it to ${:.2} frees ${:.2} for savings.",
                category.recent_average_spend, budget, recommended_budget, potential_savings
            )
        } else if recommended_budget > budget {
            format!(
                "Recent spending averages ${:.2}/month, above the ${:.2} budget. \
                 A limit of ${:.2} is one you can realistically hold.",
                category.recent_average_spend, budget, recommended_budget
            )
        } else {
            "The budget matches recent spending; keep it as is.".to_string()
        };

        BudgetRecommendation {
            category: category.name.clone(),
            current_budget: budget,
            current_spending: category.current_spending,
            recommended_budget,
            potential_savings,
            priority,
            reasoning,
        }
    }

    fn insights(
        &self,
        transactions: &[Transaction],
        budgets: &[Budget],
        categories: &[BudgetCategory],
        current: &CategorySpend,
        as_of: NaiveDate,
    ) -> BudgetInsights {
        let window_start = shift_months(month_start(as_of), -(self.config.history_months as i32));
        let (total_income, total_spending) = transactions
            .iter()
            .filter(|t| t.date >= window_start && t.date <= as_of)
            .fold((0.0, 0.0), |(inc, exp), t| match t.kind() {
                TransactionKind::Income => (inc + t.magnitude(), exp),
                TransactionKind::Expense => (inc, exp + t.magnitude()),
            });

        let deviations: Vec<f64> = categories
            .iter()
            .filter(|c| c.current_budget > 0.0)
            .map(|c| (c.utilization - 1.0).abs() * 100.0)
            .collect();
        let budget_efficiency = if deviations.is_empty() {
            0.0
        } else {
            (100.0 - mean(&deviations)).clamp(0.0, 100.0)
        };

        let budgeted: BTreeSet<String> = budgets.iter().map(|b| category_key(&b.category)).collect();
        let mut unbudgeted_spending: Vec<UnbudgetedSpending> = current
            .totals
            .iter()
            .filter(|(key, _)| !budgeted.contains(*key))
            .map(|(_, (name, amount))| UnbudgetedSpending {
                category: name.clone(),
                amount: *amount,
            })
            .collect();
        unbudgeted_spending.sort_by(|a, b| {
            b.amount
                .total_cmp(&a.amount)
                .then_with(|| a.category.cmp(&b.category))
        });

        BudgetInsights {
            total_budgeted: budgets.iter().map(|b| b.amount).sum(),
            total_spent: categories.iter().map(|c| c.current_spending).sum(),
            total_income,
            total_spending,
            savings_rate: ratio(total_income - total_spending, total_income),
            recommended_savings_rate: self.config.recommended_savings_rate,
            budget_efficiency,
            categories_over_budget: categories
                .iter()
                .filter(|c| c.current_spending > c.current_budget)
                .count(),
            unbudgeted_spending,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{budget, date, expense, income, tagged};

    fn as_of() -> NaiveDate {
        date(2026, 6, 20)
    }

    /// Dining at 1300 in each of the three prior months and `current` so far this month
    fn dining_history(current: f64) -> Vec<Transaction> {
        vec![
            expense(date(2026, 3, 14), 1300.0, "Dining"),
            expense(date(2026, 4, 14), 1300.0, "Dining"),
            expense(date(2026, 5, 14), 1300.0, "Dining"),
            expense(date(2026, 6, 14), current, "Dining"),
        ]
    }

    #[test]
    fn test_dining_end_to_end() {
        let analysis = BudgetAnalyzer::new()
            .analyze(&dining_history(1100.0), &[budget("Dining", 1200.0)], as_of())
            .unwrap();

        let dining = &analysis.categories[0];
        assert!((dining.utilization - 0.9167).abs() < 1e-3);
        assert_eq!(dining.recent_average_spend, 1300.0);

        assert_eq!(analysis.alerts.len(), 1);
        assert_eq!(analysis.alerts[0].severity, Severity::High);
        assert_eq!(analysis.alerts[0].id, "budget:dining:high");

        let rec = &analysis.recommendations[0];
        assert_eq!(rec.recommended_budget, 1250.0);
        assert_eq!(rec.potential_savings, 0.0);
        assert_eq!(rec.priority, Priority::High);
    }

    #[test]
    fn test_severity_step_function() {
        let analyzer = BudgetAnalyzer::new();
        assert_eq!(analyzer.severity(1.2, false), Some(Severity::Critical));
        assert_eq!(analyzer.severity(1.0, false), Some(Severity::Critical));
        assert_eq!(analyzer.severity(0.95, false), Some(Severity::High));
        assert_eq!(analyzer.severity(0.8, false), Some(Severity::Medium));
        assert_eq!(analyzer.severity(0.5, false), None);
        assert_eq!(analyzer.severity(0.5, true), Some(Severity::Low));
        assert_eq!(analyzer.severity(0.3, true), None);
    }

    #[test]
    fn test_rising_spend_raises_low_alert() {
        let txs = vec![
            expense(date(2026, 3, 2), 200.0, "Shopping"),
            expense(date(2026, 4, 2), 300.0, "Shopping"),
            expense(date(2026, 5, 2), 400.0, "Shopping"),
            expense(date(2026, 6, 2), 550.0, "Shopping"),
        ];
        let analysis = BudgetAnalyzer::new()
            .analyze(&txs, &[budget("Shopping", 1000.0)], as_of())
            .unwrap();

        assert!(analysis.categories[0].spending_rising);
        assert_eq!(analysis.alerts.len(), 1);
        assert_eq!(analysis.alerts[0].severity, Severity::Low);
    }

    #[test]
    fn test_underspent_budget_recommends_savings() {
        let txs = vec![
            expense(date(2026, 3, 5), 300.0, "Groceries"),
            expense(date(2026, 4, 5), 300.0, "Groceries"),
            expense(date(2026, 5, 5), 300.0, "Groceries"),
            expense(date(2026, 6, 5), 150.0, "Groceries"),
        ];
        let analysis = BudgetAnalyzer::new()
            .analyze(&txs, &[budget("Groceries", 500.0)], as_of())
            .unwrap();

        assert!(analysis.alerts.is_empty());
        let rec = &analysis.recommendations[0];
        assert_eq!(rec.recommended_budget, 400.0);
        assert_eq!(rec.potential_savings, 100.0);
        assert_eq!(rec.priority, Priority::High);
        assert!(rec.reasoning.contains("frees"));
    }

    #[test]
    fn test_potential_savings_never_negative() {
        let analyzer = BudgetAnalyzer::new();
        for (budget_amount, spend) in [(100.0, 900.0), (0.0, 50.0), (250.0, 250.0), (80.0, 0.0)] {
            let txs = vec![
                expense(date(2026, 5, 9), spend, "Misc"),
                expense(date(2026, 6, 9), spend, "Misc"),
            ];
            let analysis = analyzer
                .analyze(&txs, &[budget("Misc", budget_amount)], as_of())
                .unwrap();
            assert!(analysis.recommendations[0].potential_savings >= 0.0);
        }
    }

    #[test]
    fn test_no_prior_activity_falls_back_to_current() {
        let txs = vec![expense(date(2026, 6, 3), 90.0, "Pets")];
        let analysis = BudgetAnalyzer::new()
            .analyze(&txs, &[budget("Pets", 100.0)], as_of())
            .unwrap();
        let pets = &analysis.categories[0];
        assert_eq!(pets.recent_average_spend, 90.0);
        assert_eq!(analysis.recommendations[0].recommended_budget, 95.0);
    }

    #[test]
    fn test_zero_budget_has_zero_utilization() {
        let txs = vec![expense(date(2026, 6, 3), 40.0, "Gifts")];
        let analysis = BudgetAnalyzer::new()
            .analyze(&txs, &[budget("Gifts", 0.0)], as_of())
            .unwrap();
        assert_eq!(analysis.categories[0].utilization, 0.0);
        assert!(analysis.alerts.is_empty());
        assert_eq!(analysis.insights.budget_efficiency, 0.0);
        assert_eq!(analysis.insights.categories_over_budget, 1);
    }

    #[test]
    fn test_budget_efficiency() {
        let txs = vec![
            expense(date(2026, 6, 1), 1000.0, "Rent"),
            expense(date(2026, 6, 2), 250.0, "Groceries"),
        ];
        let analysis = BudgetAnalyzer::new()
            .analyze(
                &txs,
                &[budget("Rent", 1000.0), budget("Groceries", 500.0)],
                as_of(),
            )
            .unwrap();
        assert!((analysis.insights.budget_efficiency - 75.0).abs() < 1e-9);
        assert_eq!(analysis.insights.total_budgeted, 1500.0);
        assert_eq!(analysis.insights.total_spent, 1250.0);
    }

    #[test]
    fn test_household_totals_and_unbudgeted() {
        let txs = vec![
            income(date(2026, 4, 1), 4000.0, "Salary"),
            income(date(2026, 5, 1), 4000.0, "Salary"),
            income(date(2026, 6, 1), 4000.0, "Salary"),
            expense(date(2026, 6, 4), 120.0, "Hobbies"),
            expense(date(2026, 6, 6), 300.0, "Travel"),
            expense(date(2026, 6, 8), 80.0, "travel "),
            expense(date(2026, 5, 8), 2000.0, "Rent"),
            // Before the trailing window
            expense(date(2026, 2, 8), 9999.0, "Rent"),
        ];
        let analysis = BudgetAnalyzer::new()
            .analyze(&txs, &[budget("Rent", 2000.0)], as_of())
            .unwrap();

        let insights = &analysis.insights;
        assert_eq!(insights.total_income, 12_000.0);
        assert_eq!(insights.total_spending, 2500.0);
        assert!((insights.savings_rate - 9500.0 / 12_000.0).abs() < 1e-12);
        assert_eq!(insights.recommended_savings_rate, 0.20);

        let unbudgeted: Vec<(&str, f64)> = insights
            .unbudgeted_spending
            .iter()
            .map(|u| (u.category.as_str(), u.amount))
            .collect();
        assert_eq!(unbudgeted, vec![("Travel", 380.0), ("Hobbies", 120.0)]);
    }

    #[test]
    fn test_zero_income_savings_rate() {
        let txs = vec![expense(date(2026, 6, 1), 100.0, "Food")];
        let analysis = BudgetAnalyzer::new()
            .analyze(&txs, &[budget("Food", 200.0)], as_of())
            .unwrap();
        assert_eq!(analysis.insights.savings_rate, 0.0);
    }

    #[test]
    fn test_future_transactions_ignored() {
        let mut txs = dining_history(1100.0);
        txs.push(expense(date(2026, 6, 28), 500.0, "Dining"));
        let analysis = BudgetAnalyzer::new()
            .analyze(&txs, &[budget("Dining", 1200.0)], as_of())
            .unwrap();
        assert_eq!(analysis.categories[0].current_spending, 1100.0);
    }

    #[test]
    fn test_explicit_kind_decides_spending() {
        let txs = vec![
            // Card export with unsigned amounts and an explicit direction
            tagged(date(2026, 6, 3), 300.0, "Dining", TransactionKind::Expense),
            tagged(date(2026, 6, 9), 45.0, "Dining", TransactionKind::Income),
        ];
        let analysis = BudgetAnalyzer::new()
            .analyze(&txs, &[budget("Dining", 400.0)], as_of())
            .unwrap();
        assert_eq!(analysis.categories[0].current_spending, 300.0);
        assert_eq!(analysis.insights.total_income, 45.0);
    }

    #[test]
    fn test_action_items_skip_low_recommendations() {
        let txs = vec![
            expense(date(2026, 6, 1), 1250.0, "Dining"),
            expense(date(2026, 6, 1), 100.0, "Books"),
            expense(date(2026, 5, 1), 100.0, "Books"),
        ];
        let analysis = BudgetAnalyzer::new()
            .analyze(&txs, &[budget("Dining", 1000.0), budget("Books", 100.0)], as_of())
            .unwrap();

        // Books is at 100% (critical alert) and its recommendation is high priority
        assert!(analysis
            .action_items
            .iter()
            .all(|item| item.priority() != Priority::Low));
        assert!(matches!(analysis.action_items[0], ActionItem::BudgetAlert(_)));
        assert_eq!(analysis.action_items[0].priority(), Priority::Critical);
    }

    #[test]
    fn test_rejects_invalid_budgets() {
        let analyzer = BudgetAnalyzer::new();
        assert!(matches!(
            analyzer.analyze(&[], &[budget("Dining", -5.0)], as_of()),
            Err(Error::InvalidInput(_))
        ));
        assert!(matches!(
            analyzer.analyze(&[], &[budget("Dining", f64::INFINITY)], as_of()),
            Err(Error::InvalidInput(_))
        ));
        assert!(matches!(
            analyzer.analyze(&[], &[budget("Dining", 10.0), budget("dining ", 20.0)], as_of()),
            Err(Error::InvalidInput(_))
        ));
    }

    #[test]
    fn test_recommendations_sorted_by_priority_then_savings() {
        let mut txs = Vec::new();
        for month in 3..=5 {
            txs.push(expense(date(2026, month, 1), 100.0, "Alpha"));
            txs.push(expense(date(2026, month, 1), 170.0, "Beta"));
            txs.push(expense(date(2026, month, 1), 195.0, "Gamma"));
        }
        let analysis = BudgetAnalyzer::new()
            .analyze(
                &txs,
                &[budget("Gamma", 200.0), budget("Beta", 200.0), budget("Alpha", 200.0)],
                as_of(),
            )
            .unwrap();

        let order: Vec<&str> = analysis
            .recommendations
            .iter()
            .map(|r| r.category.as_str())
            .collect();
        // Alpha saves 50 (medium), Beta 15 (medium), Gamma 2.5 (low)
        assert_eq!(order, vec!["Alpha", "Beta", "Gamma"]);
        assert_eq!(analysis.recommendations[2].priority, Priority::Low);
    }
}
