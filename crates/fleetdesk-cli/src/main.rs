//! fleetdesk - fleet management console
//!
//! A CLI over the fleet backend: compliance reminders, idle vehicles,
//! notifications and record management.

mod cli;
mod commands;
mod output;

use clap::Parser;
use cli::Cli;
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Log filter variable, e.g. `FLEETDESK_LOG=fleetdesk_infra=debug`
const LOG_ENV: &str = "FLEETDESK_LOG";

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = commands::execute(cli).await {
        debug!(error = ?e, "Command failed");
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
