mod auth;
mod cli;
mod config;
mod error;
mod github;
mod output;
mod report;
mod triage;

use anyhow::Result;
use clap::Parser;
use cli::Cli;
use log::info;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    output::print_banner();

    let cli = Cli::parse();
    info!("Starting PRLens - Community Pull Request Reports");
    cli.execute().await?;

    Ok(())
}
