//! Binary crate for the `skycast` command-line front end.
//!
//! This crate focuses on:
//! - Parsing CLI arguments
//! - Interactive onboarding and settings
//! - Human-friendly output formatting
//! - The periodic rain watcher

use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod client;
mod render;
mod watch;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("skycast=warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cmd = cli::Cli::parse();
    cmd.run().await
}
