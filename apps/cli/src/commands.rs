//! CLI command definitions, routing, and tracing setup.

use std::path::PathBuf;

use chrono::Utc;
use clap::{Args, Parser, Subcommand};
use color_eyre::eyre::{Result, WrapErr, bail, eyre};
use reqfinder_client::RequirementsClient;
use reqfinder_core::{ConfiguredFetcher, QueryForm, QuerySource, SubmitOutcome, ViewController};
use reqfinder_demo::QueryMatcher;
use reqfinder_render::ViewMode;
use reqfinder_render::page::standalone_page;
use reqfinder_render::text::to_terminal_text;
use reqfinder_shared::{AppConfig, init_config, load_config};
use tracing::{debug, info};

use crate::ports::CliPorts;

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// ReqFinder: regulatory requirements for a product in a target market.
#[derive(Parser)]
#[command(
    name = "reqfinder",
    version,
    about = "Look up regulatory requirements for a product in a target market.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

/// Result view selectable from the command line.
#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub(crate) enum ViewArg {
    Structured,
    Raw,
}

impl From<ViewArg> for ViewMode {
    fn from(arg: ViewArg) -> Self {
        match arg {
            ViewArg::Structured => ViewMode::Structured,
            ViewArg::Raw => ViewMode::Raw,
        }
    }
}

/// Top-level CLI subcommands.
#[derive(Subcommand)]
pub(crate) enum Command {
    /// Look up requirements for a product.
    Query(QueryArgs),

    /// Launch the interactive TUI.
    Tui,

    /// Configuration management.
    Config {
        /// Config subcommand.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Arguments of `reqfinder query`.
#[derive(Args, Debug)]
pub(crate) struct QueryArgs {
    /// Product description, e.g. "fitness band with lithium battery".
    pub description: String,

    /// Target market (defaults to `[ui] default_market`).
    #[arg(short, long)]
    pub market: Option<String>,

    /// Ask the backend for a detailed answer.
    #[arg(long)]
    pub detailed: bool,

    /// Answer from the built-in demo samples instead of the backend.
    #[arg(long)]
    pub demo: bool,

    /// How to print the result.
    #[arg(long, value_enum, default_value = "structured")]
    pub view: ViewArg,

    /// Also write the result as a standalone HTML page.
    #[arg(long)]
    pub html: Option<PathBuf>,

    /// Export the result as JSON into the export directory.
    #[arg(long)]
    pub export: bool,

    /// Export directory (defaults to `[export] dir`).
    #[arg(long)]
    pub export_dir: Option<PathBuf>,

    /// Backend base URL (overrides `[api] base_url`).
    #[arg(long, env = "REQFINDER_BASE_URL")]
    pub base_url: Option<String>,
}

/// Config subcommands.
#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Initialize config file with defaults.
    Init,
    /// Show resolved configuration.
    Show,
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing based on CLI flags. Logs go to stderr so stdout
/// carries only the result.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let level = match cli.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = ["reqfinder", "reqfinder_core", "reqfinder_client", "reqfinder_render"]
        .map(|target| format!("{target}={level}"))
        .join(",");

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .with_target(false)
                .init();
        }
        LogFormat::Json => {
            fmt()
                .json()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI command.
pub(crate) async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Query(args) => cmd_query(args).await,
        Command::Tui => cmd_tui(),
        Command::Config { action } => match action {
            ConfigAction::Init => cmd_config_init(),
            ConfigAction::Show => cmd_config_show(),
        },
    }
}

// ---------------------------------------------------------------------------
// Command handlers
// ---------------------------------------------------------------------------

async fn cmd_query(args: QueryArgs) -> Result<()> {
    let mut config = load_config()?;
    if let Some(base_url) = args.base_url {
        config.api.base_url = base_url;
    }

    let source = if args.demo || config.ui.demo {
        QuerySource::Demo
    } else {
        QuerySource::Live
    };
    let export_dir = args
        .export_dir
        .unwrap_or_else(|| PathBuf::from(&config.export.dir));
    let form = QueryForm {
        description: args.description,
        market: args
            .market
            .unwrap_or_else(|| config.ui.default_market.clone()),
        detailed: args.detailed || config.api.detailed,
    };

    let fetcher = ConfiguredFetcher::from_result(RequirementsClient::from_config(&config.api));
    match fetcher.ready() {
        Some(client) => info!(endpoint = %client.endpoint(), ?source, "running query"),
        None => info!(?source, "running query without a usable backend"),
    }

    let mut controller = ViewController::new(
        fetcher,
        QueryMatcher::default(),
        CliPorts::new(export_dir),
        source,
    );

    match controller.submit(form).await {
        SubmitOutcome::Displayed => {}
        SubmitOutcome::NoResults => return Ok(()),
        SubmitOutcome::Invalid | SubmitOutcome::Failed => {
            let reason = controller
                .ports()
                .notices()
                .last()
                .map(ToString::to_string)
                .unwrap_or_else(|| "requirements lookup failed".to_string());
            bail!(reason);
        }
    }

    let view = ViewMode::from(args.view);
    if view != controller.view() {
        controller.toggle_view(view);
    }

    {
        let ports = controller.ports();
        let results = ports.results().unwrap_or_default();
        let sources = ports.sources().unwrap_or_default();

        println!("{}", to_terminal_text(results)?);
        println!();
        debug!(view = %ports.active_view(), "printing result");
        println!("Data sources");
        println!("{}", to_terminal_text(sources)?);

        if let Some(path) = &args.html {
            let title = controller
                .current()
                .map(|r| format!("Requirements for {} in {}", r.product_type(), r.market()))
                .ok_or_else(|| eyre!("no result to write"))?;
            std::fs::write(path, standalone_page(&title, results, sources))
                .wrap_err_with(|| format!("failed to write {}", path.display()))?;
            println!("HTML page written to {}", path.display());
        }
    }

    if args.export && controller.export(Utc::now())?.is_some() {
        for path in controller.ports().exported() {
            println!("Exported to {}", path.display());
        }
    }

    Ok(())
}

fn cmd_tui() -> Result<()> {
    info!("launching TUI");

    let status = std::process::Command::new("reqfinder-tui")
        .status()
        .map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => {
                eyre!("reqfinder-tui not found on PATH. Build it with `cargo install --path apps/tui`.")
            }
            _ => eyre!("failed to launch reqfinder-tui: {e}"),
        })?;

    if !status.success() {
        bail!("reqfinder-tui exited with status: {}", status.code().unwrap_or(-1));
    }
    Ok(())
}

fn cmd_config_init() -> Result<()> {
    let path = init_config()?;
    println!("Config initialized at: {}", path.display());
    Ok(())
}

fn cmd_config_show() -> Result<()> {
    let config: AppConfig = load_config()?;
    let toml_str = toml::to_string_pretty(&config)?;
    println!("{toml_str}");
    Ok(())
}
