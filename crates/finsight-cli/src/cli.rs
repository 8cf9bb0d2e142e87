//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI arguments.
//! The actual command implementations are in the `commands` module.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Finsight - Forecast cash flow, check budgets, rebalance portfolios
#[derive(Parser)]
#[command(name = "finsight")]
#[command(about = "Financial insights from local transaction and account snapshots", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Analysis date (YYYY-MM-DD), defaults to today
    #[arg(long, global = true)]
    pub as_of: Option<String>,

    /// Engine config file
    ///
    /// Without this flag the override in the data directory is used if it
    /// exists, otherwise the built-in defaults.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Print JSON instead of a formatted report
    #[arg(long, global = true)]
    pub json: bool,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Forecast monthly cash flow
    Forecast {
        /// Transactions file (JSON array or CSV: date,amount,category,description,kind)
        #[arg(short, long)]
        transactions: PathBuf,

        /// Current account balance
        #[arg(short, long, default_value_t = 0.0, allow_negative_numbers = true)]
        balance: f64,

        /// Months to project
        #[arg(short, long, default_value_t = 6)]
        months: u32,

        /// Ignore detected recurring transactions
        #[arg(long)]
        no_recurring: bool,
    },

    /// Compare this month's spending with budgets
    Budget {
        /// Transactions file (JSON array or CSV)
        #[arg(short, long)]
        transactions: PathBuf,

        /// Budgets file (JSON array or CSV: category,amount)
        #[arg(short, long)]
        budgets: PathBuf,
    },

    /// Analyze allocation, risk and rebalancing
    Portfolio {
        /// Accounts file (JSON array or CSV: name,asset_class,balance)
        #[arg(short, long)]
        accounts: PathBuf,

        /// Target allocation file (JSON object of asset class to percent)
        #[arg(long)]
        targets: Option<PathBuf>,

        /// Periodic returns file (JSON: {"series": {class: [..]}, "benchmark": [..]})
        #[arg(long)]
        returns: Option<PathBuf>,
    },

    /// Run every analysis in a snapshot and rank the results
    Insights {
        /// Snapshot file (JSON)
        #[arg(short, long)]
        snapshot: PathBuf,

        /// Show at most this many action items
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Show the effective engine configuration
    Config,
}
