//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `budget` - Budget utilization, alerts and reallocation report
//! - `config` - Effective configuration display
//! - `forecast` - Cash-flow forecast report
//! - `insights` - Snapshot analysis and ranked action items
//! - `load` - Snapshot file loaders (JSON and CSV)
//! - `portfolio` - Allocation, risk and rebalancing report

pub mod budget;
pub mod config;
pub mod forecast;
pub mod insights;
pub mod load;
pub mod portfolio;

// Re-export command functions for main.rs
pub use budget::*;
pub use config::*;
pub use forecast::*;
pub use insights::*;
pub use load::*;
pub use portfolio::*;

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use finsight_core::{EngineConfig, InsightEngine, Priority};
use serde::Serialize;

/// Parse `--as-of`, defaulting to today's local date
pub fn resolve_as_of(as_of: Option<&str>) -> Result<NaiveDate> {
    match as_of {
        Some(s) => NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .with_context(|| format!("Invalid --as-of date '{}' (use YYYY-MM-DD)", s)),
        None => Ok(Local::now().date_naive()),
    }
}

/// Build an engine from the resolved configuration
pub fn load_engine(config: Option<&Path>) -> Result<InsightEngine> {
    let config = EngineConfig::load(config).context("Failed to load engine configuration")?;
    InsightEngine::with_config(config).context("Invalid engine configuration")
}

pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialize output as JSON")?;
    println!("{}", json);
    Ok(())
}

pub fn priority_marker(priority: Priority) -> &'static str {
    match priority {
        Priority::Critical => "🔴",
        Priority::High => "🟠",
        Priority::Medium => "🟡",
        Priority::Low => "⚪",
    }
}

/// Truncate a string to a maximum length, adding "..." if truncated
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
