//! ReqFinder TUI: interactive regulatory-requirements lookup in the terminal.
//!
//! A single query page with a product form, a results region with
//! structured/raw views, a data-sources panel, and JSON export, built with
//! `ratatui` + `crossterm`.

mod app;
mod ports;
mod screens;
mod widgets;

use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Mutex;

use color_eyre::eyre::{Result, WrapErr};
use reqfinder_shared::{config_dir, load_config};

const LOG_FILE_NAME: &str = "reqfinder-tui.log";

fn main() -> Result<()> {
    color_eyre::install()?;
    let log_path = init_tracing()?;
    tracing::info!(?log_path, "logging initialized");

    let config = load_config()?;
    app::run(config)
}

/// Log to a file under the config directory; the terminal belongs to the UI.
fn init_tracing() -> Result<PathBuf> {
    use tracing_subscriber::{EnvFilter, fmt};

    let dir = config_dir()?;
    std::fs::create_dir_all(&dir)
        .wrap_err_with(|| format!("failed to create {}", dir.display()))?;
    let path = dir.join(LOG_FILE_NAME);
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .wrap_err_with(|| format!("failed to open log file {}", path.display()))?;

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new("reqfinder_tui=info,reqfinder_core=info,reqfinder_client=info")
    });

    fmt()
        .with_env_filter(env_filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();

    Ok(path)
}
