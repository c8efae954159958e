//! BioSure command-line interface
//!
//! Batch front end over the reconciliation core: generate a synthetic
//! cohort, reconcile a portfolio snapshot against a claims feed, or print
//! the reserve-rate calibration series. Logs go to stderr; the `RUST_LOG`
//! environment variable overrides the default `info` filter.

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

use commands::forecast::ForecastArgs;
use commands::generate::GenerateArgs;
use commands::reconcile::ReconcileArgs;

#[derive(Parser)]
#[command(name = "biosure")]
#[command(version)]
#[command(about = "Revenue-reserve reconciliation for outcome-based therapy contracts", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a seeded synthetic cohort and write the pharma and claims CSVs
    Generate(GenerateArgs),

    /// Reconcile a pharma snapshot against a claims feed and write the ledger
    Reconcile(ReconcileArgs),

    /// Print the quarterly reserve-rate calibration series
    Forecast(ForecastArgs),
}

fn main() -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Generate(args) => commands::generate::execute(args),
        Commands::Reconcile(args) => commands::reconcile::execute(args),
        Commands::Forecast(args) => commands::forecast::execute(args),
    }
}
