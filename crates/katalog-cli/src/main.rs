//! Katalog CLI entry point.

#![warn(clippy::all)]
#![forbid(unsafe_code)]

use anyhow::Result;
use clap::Parser;
use katalog_cli::{Cli, logging, run};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| logging::default_filter(cli.verbose).into()),
        )
        .with_writer(std::io::stderr)
        .init();
    tracing::debug!(config = ?cli.config, command = ?cli.command, "katalog starting");

    run(cli.command, cli.config.as_deref()).await?;
    Ok(())
}
