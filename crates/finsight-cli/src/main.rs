//! Finsight CLI - Financial insight engine
//!
//! Usage:
//!   finsight forecast --transactions FILE --balance N   Project cash flow
//!   finsight budget --transactions FILE --budgets FILE  Budget alerts and advice
//!   finsight portfolio --accounts FILE --targets FILE   Rebalancing advice
//!   finsight insights --snapshot FILE                   Ranked action items

mod cli;
mod commands;


use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .init();

    let config = cli.config.as_deref();
    let as_of = cli.as_of.as_deref();

    match cli.command {
        Commands::Forecast {
            transactions,
            balance,
            months,
            no_recurring,
        } => {
            let engine = commands::load_engine(config)?;
            let as_of = commands::resolve_as_of(as_of)?;
            commands::cmd_forecast(
                &engine,
                as_of,
                &transactions,
                balance,
                months,
                !no_recurring,
                cli.json,
            )
        }
        Commands::Budget {
            transactions,
            budgets,
        } => {
            let engine = commands::load_engine(config)?;
            let as_of = commands::resolve_as_of(as_of)?;
            commands::cmd_budget(&engine, as_of, &transactions, &budgets, cli.json)
        }
        Commands::Portfolio {
            accounts,
            targets,
            returns,
        } => {
            let engine = commands::load_engine(config)?;
            let as_of = commands::resolve_as_of(as_of)?;
            commands::cmd_portfolio(
                &engine,
                as_of,
                &accounts,
                targets.as_deref(),
                returns.as_deref(),
                cli.json,
            )
        }
        Commands::Insights { snapshot, limit } => {
            let engine = commands::load_engine(config)?;
            let as_of = commands::resolve_as_of(as_of)?;
            commands::cmd_insights(&engine, as_of, &snapshot, limit, cli.json)
        }
        Commands::Config => commands::cmd_config(config, cli.json),
    }
}
