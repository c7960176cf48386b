//! ReqFinder CLI: look up regulatory requirements for a product and market.
//!
//! Runs one query against the requirements backend (or the built-in demo
//! samples), prints the result, and optionally writes an HTML page or a JSON
//! export.

mod commands;
mod ports;

use clap::Parser;
use color_eyre::eyre::Result;

use commands::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    commands::init_tracing(&cli);
    commands::run(cli).await
}
