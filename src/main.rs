//! Capacity Forecast - Main Entry Point
//!
//! Fits estimator calibration from history and reports team commit capacity.

use clap::Parser;
use capacity_forecast::cli::{cmd_fit, cmd_report, Cli, Commands};

fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "capacity_forecast=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Fit { scenario }) => {
            cmd_fit(&scenario)?;
        }
        Some(Commands::Report { scenario, samples, seed }) => {
            cmd_report(scenario.as_deref(), samples, seed)?;
        }
        None => {
            // Default: quickstart report
            cmd_report(None, 5, None)?;
        }
    }

    Ok(())
}
