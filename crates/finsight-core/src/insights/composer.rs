//! Insight Composer - merges analyzer output into one ranked action list

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use super::budget::{BudgetAlert, BudgetAnalysis, BudgetRecommendation};
use super::cash_flow::{CashFlowForecast, CashFlowRecommendation};
use super::portfolio::{PortfolioAnalysis, PortfolioRecommendation};
use super::types::Priority;

/// Shared shape of everything that can become an action item
pub trait Actionable {
    fn priority(&self) -> Priority;

    fn title(&self) -> String;

    fn description(&self) -> String;

    /// Dollar magnitude used to order items of equal priority
    fn impact(&self) -> f64;
}

impl Actionable for CashFlowRecommendation {
    fn priority(&self) -> Priority {
        self.priority
    }

    fn title(&self) -> String {
        self.title.clone()
    }

    fn description(&self) -> String {
        self.description.clone()
    }

    fn impact(&self) -> f64 {
        self.estimated_impact
    }
}

impl Actionable for BudgetAlert {
    fn priority(&self) -> Priority {
        self.severity.priority()
    }

    fn title(&self) -> String {
        self.title.clone()
    }

    fn description(&self) -> String {
        format!("{} {}", self.message, self.suggested_action)
    }

    fn impact(&self) -> f64 {
        self.current_spending
    }
}

impl Actionable for BudgetRecommendation {
    fn priority(&self) -> Priority {
        self.priority
    }

    fn title(&self) -> String {
        if self.recommended_budget < self.current_budget {
            format!("Lower {} budget to ${:.2}", self.category, self.recommended_budget)
        } else if self.recommended_budget > self.current_budget {
            format!("Raise {} budget to ${:.2}", self.category, self.recommended_budget)
        } else {
            format!("Keep {} budget", self.category)
        }
    }

    fn description(&self) -> String {
        self.reasoning.clone()
    }

    fn impact(&self) -> f64 {
        self.potential_savings
    }
}

impl Actionable for PortfolioRecommendation {
    fn priority(&self) -> Priority {
        self.priority
    }

    fn title(&self) -> String {
        self.title.clone()
    }

    fn description(&self) -> String {
        self.description.clone()
    }

    fn impact(&self) -> f64 {
        self.trade_amount
            .or(self.estimated_savings)
            .unwrap_or(0.0)
    }
}

/// One ranked item, tagged by where it came from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ActionItem {
    CashFlow(CashFlowRecommendation),
    BudgetAlert(BudgetAlert),
    Budget(BudgetRecommendation),
    Portfolio(PortfolioRecommendation),
}

impl ActionItem {
    fn inner(&self) -> &dyn Actionable {
        match self {
            ActionItem::CashFlow(r) => r,
            ActionItem::BudgetAlert(a) => a,
            ActionItem::Budget(r) => r,
            ActionItem::Portfolio(r) => r,
        }
    }

    pub fn priority(&self) -> Priority {
        self.inner().priority()
    }

    pub fn title(&self) -> String {
        self.inner().title()
    }

    pub fn description(&self) -> String {
        self.inner().description()
    }

    pub fn impact(&self) -> f64 {
        self.inner().impact()
    }

    /// Tie-break order between sources (cash flow first)
    pub fn source_rank(&self) -> u8 {
        match self {
            ActionItem::CashFlow(_) => 0,
            ActionItem::BudgetAlert(_) => 1,
            ActionItem::Budget(_) => 2,
            ActionItem::Portfolio(_) => 3,
        }
    }

    pub fn source(&self) -> &'static str {
        match self {
            ActionItem::CashFlow(_) => "cash_flow",
            ActionItem::BudgetAlert(_) => "budget_alert",
            ActionItem::Budget(_) => "budget",
            ActionItem::Portfolio(_) => "portfolio",
        }
    }
}

fn compare(a: &ActionItem, b: &ActionItem) -> Ordering {
    b.priority()
        .rank()
        .cmp(&a.priority().rank())
        .then_with(|| b.impact().total_cmp(&a.impact()))
        .then_with(|| a.source_rank().cmp(&b.source_rank()))
        .then_with(|| a.title().cmp(&b.title()))
}

/// Merges and ranks recommendations from every analyzer
#[derive(Debug, Clone, Default)]
pub struct InsightComposer {
    limit: Option<usize>,
}

impl InsightComposer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep at most `limit` items after ranking
    pub fn with_limit(limit: usize) -> Self {
        Self { limit: Some(limit) }
    }

    /// Sort by priority, impact, source and title
    pub fn rank(mut items: Vec<ActionItem>) -> Vec<ActionItem> {
        items.sort_by(compare);
        items
    }

    pub fn compose(
        &self,
        cash_flow: Option<&CashFlowForecast>,
        budget: Option<&BudgetAnalysis>,
        portfolio: Option<&PortfolioAnalysis>,
    ) -> Vec<ActionItem> {
        let mut items = Vec::new();

        if let Some(forecast) = cash_flow {
            items.extend(forecast.recommendations.iter().cloned().map(ActionItem::CashFlow));
        }
        if let Some(analysis) = budget {
            items.extend(analysis.alerts.iter().cloned().map(ActionItem::BudgetAlert));
            items.extend(analysis.recommendations.iter().cloned().map(ActionItem::Budget));
        }
        if let Some(analysis) = portfolio {
            items.extend(analysis.recommendations.iter().cloned().map(ActionItem::Portfolio));
        }

        let mut ranked = Self::rank(items);
        if let Some(limit) = self.limit {
            ranked.truncate(limit);
        }

        tracing::debug!(items = ranked.len(), limit = ?self.limit, "Composed action items");
        ranked
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::insights::budget::BudgetAnalyzer;
    use crate::insights::types::Severity;
    use crate::test_utils::{budget, date, expense};

    fn cash(title: &str, priority: Priority, impact: f64) -> ActionItem {
        ActionItem::CashFlow(CashFlowRecommendation {
            key: format!("cashflow:{}", title),
            title: title.to_string(),
            description: String::new(),
            priority,
            estimated_impact: impact,
        })
    }

    fn portfolio(title: &str, priority: Priority, amount: Option<f64>) -> ActionItem {
        ActionItem::Portfolio(PortfolioRecommendation {
            key: format!("portfolio:{}", title),
            title: title.to_string(),
            description: String::new(),
            priority,
            expected_benefit: String::new(),
            timeframe: String::new(),
            steps: Vec::new(),
            asset_class: None,
            trade_amount: amount,
            estimated_savings: None,
            estimated_cost: None,
        })
    }

    fn alert(category: &str, severity: Severity, spending: f64) -> ActionItem {
        ActionItem::BudgetAlert(BudgetAlert {
            id: format!("budget:{}:{}", category, severity),
            category: category.to_string(),
            severity,
            title: format!("{} alert", category),
            message: String::new(),
            suggested_action: severity.suggested_action().to_string(),
            utilization: 1.0,
            current_spending: spending,
            current_budget: spending,
        })
    }

    fn titles(items: &[ActionItem]) -> Vec<String> {
        items.iter().map(|i| i.title()).collect()
    }

    #[test]
    fn test_rank_by_priority_then_impact() {
        let ranked = InsightComposer::rank(vec![
            cash("small", Priority::Medium, 10.0),
            portfolio("urgent", Priority::Critical, Some(5.0)),
            cash("big", Priority::Medium, 500.0),
            alert("Dining", Severity::High, 300.0),
        ]);
        assert_eq!(titles(&ranked), vec!["urgent", "Dining alert", "big", "small"]);
    }

    #[test]
    fn test_ties_break_by_source_then_title() {
        let ranked = InsightComposer::rank(vec![
            portfolio("alpha", Priority::High, Some(100.0)),
            cash("zulu", Priority::High, 100.0),
            cash("bravo", Priority::High, 100.0),
        ]);
        assert_eq!(titles(&ranked), vec!["bravo", "zulu", "alpha"]);
    }

    #[test]
    fn test_compose_with_missing_inputs() {
        assert!(InsightComposer::new().compose(None, None, None).is_empty());

        let txs = vec![expense(date(2026, 6, 2), 900.0, "Dining")];
        let analysis = BudgetAnalyzer::new()
            .analyze(&txs, &[budget("Dining", 800.0)], date(2026, 6, 20))
            .unwrap();

        let items = InsightComposer::new().compose(None, Some(&analysis), None);
        // One alert and one recommendation, alert first
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].source(), "budget_alert");
        assert_eq!(items[0].priority(), Priority::Critical);
    }

    #[test]
    fn test_limit_truncates_after_ranking() {
        let composer = InsightComposer::with_limit(1);
        let txs = vec![expense(date(2026, 6, 2), 900.0, "Dining")];
        let analysis = BudgetAnalyzer::new()
            .analyze(&txs, &[budget("Dining", 800.0)], date(2026, 6, 20))
            .unwrap();
        let items = composer.compose(None, Some(&analysis), None);
        assert_eq!(items.len(), 1);
        assert!(matches!(items[0], ActionItem::BudgetAlert(_)));
    }

    #[test]
    fn test_serialized_items_are_tagged() {
        let item = cash("Spending exceeds income", Priority::High, 250.0);
        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["kind"], "cash_flow");
        assert_eq!(json["priority"], "high");
        assert_eq!(json["title"], "Spending exceeds income");

        let back: ActionItem = serde_json::from_value(json).unwrap();
        assert_eq!(back, item);
    }
}
