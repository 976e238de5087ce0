//! Sample data tool for the document store.
//!
//! ```bash
//! finance-tracker-seed seed                 # replace everything with sample data
//! finance-tracker-seed clear                # remove every record and the settings
//! finance-tracker-seed --data-dir /tmp/ft seed
//! ```

use anyhow::Result;
use clap::{Parser, Subcommand};
use finance_tracker_backend::config::AppConfig;
use finance_tracker_backend::domain::SampleDataService;
use finance_tracker_backend::storage::DocumentConnection;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "finance-tracker-seed")]
#[command(version, about = "Load or wipe finance tracker sample data", long_about = None)]
struct Cli {
    /// Document store root, overriding DATA_DIR
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Clear the store, then load categories, expenses, deposits and settings
    Seed,
    /// Remove all categories, expenses, deposits and settings
    Clear,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = AppConfig::from_env()?;
    if let Some(data_dir) = cli.data_dir {
        config.data_dir = data_dir;
    }

    let filter = EnvFilter::try_new(&config.log_level).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    info!("Using document store at {}", config.data_dir.display());
    let connection = Arc::new(DocumentConnection::new(&config.data_dir)?);
    let sample_data = SampleDataService::new(connection);

    match cli.command {
        Command::Seed => {
            let summary = sample_data.seed().await?;
            info!(
                "Categories: {} ({} expense + {} income)",
                summary.expense_categories + summary.income_categories,
                summary.expense_categories,
                summary.income_categories
            );
            info!("Expenses: {} (total ₹{:.2})", summary.expenses, summary.expense_total);
            info!("Deposits: {} (total ₹{:.2})", summary.deposits, summary.deposit_total);
            info!("Net income: ₹{:.2}", summary.net_income());
        }
        Command::Clear => {
            let cleared = sample_data.clear().await?;
            info!(
                "Removed {} expenses, {} deposits, {} categories{}",
                cleared.expenses,
                cleared.deposits,
                cleared.categories,
                if cleared.settings { " and the settings" } else { "" }
            );
        }
    }

    Ok(())
}
