//! Application configuration for ReqFinder.
//!
//! User config lives at `~/.reqfinder/reqfinder.toml`.
//! CLI flags override config file values, which override defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{ReqFinderError, Result};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "reqfinder.toml";

/// Default config directory name under the user's home.
const CONFIG_DIR_NAME: &str = ".reqfinder";

// ---------------------------------------------------------------------------
// Config structs (matching reqfinder.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Backend endpoint settings.
    #[serde(default)]
    pub api: ApiConfig,

    /// Query form defaults.
    #[serde(default)]
    pub ui: UiConfig,

    /// Export destination.
    #[serde(default)]
    pub export: ExportConfig,
}

/// `[api]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Origin of the requirements backend.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Path of the requirements endpoint, relative to `base_url`.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Whether to request detailed answers by default.
    #[serde(default)]
    pub detailed: bool,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            endpoint: default_endpoint(),
            detailed: false,
        }
    }
}

impl ApiConfig {
    /// Resolve the full endpoint URL from `base_url` + `endpoint`.
    pub fn endpoint_url(&self) -> Result<Url> {
        let base = Url::parse(&self.base_url).map_err(|e| {
            ReqFinderError::config(format!("invalid base_url '{}': {e}", self.base_url))
        })?;
        if base.cannot_be_a_base() {
            return Err(ReqFinderError::config(format!(
                "base_url '{}' cannot carry a path",
                self.base_url
            )));
        }
        base.join(&self.endpoint).map_err(|e| {
            ReqFinderError::config(format!("invalid endpoint '{}': {e}", self.endpoint))
        })
    }
}

fn default_base_url() -> String {
    "http://127.0.0.1:8000".into()
}
fn default_endpoint() -> String {
    "/api/requirements".into()
}

/// `[ui]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    /// Market preselected in the query form.
    #[serde(default = "default_market")]
    pub default_market: String,

    /// Start in demo mode (canned samples, no network).
    #[serde(default)]
    pub demo: bool,

    /// Markets offered by the market selector, in display order.
    #[serde(default = "default_markets")]
    pub markets: Vec<String>,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            default_market: default_market(),
            demo: false,
            markets: default_markets(),
        }
    }
}

fn default_market() -> String {
    "all".into()
}
fn default_markets() -> Vec<String> {
    vec!["all".into(), "eu".into(), "us".into()]
}

/// `[export]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Directory exported JSON files are written to.
    #[serde(default = "default_export_dir")]
    pub dir: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            dir: default_export_dir(),
        }
    }
}

fn default_export_dir() -> String {
    ".".into()
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Get the path to the config directory (`~/.reqfinder/`).
pub fn config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| ReqFinderError::config("could not determine home directory"))?;
    Ok(home.join(CONFIG_DIR_NAME))
}

/// Get the path to the config file (`~/.reqfinder/reqfinder.toml`).
pub fn config_file_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

/// Load the application config from disk. Returns defaults if the file does not exist.
pub fn load_config() -> Result<AppConfig> {
    let path = config_file_path()?;

    if !path.exists() {
        tracing::debug!(?path, "config file not found, using defaults");
        return Ok(AppConfig::default());
    }

    load_config_from(&path)
}

/// Load the application config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| ReqFinderError::io(path, e))?;

    toml::from_str(&content).map_err(|e| {
        ReqFinderError::config(format!("failed to parse {}: {e}", path.display()))
    })
}

/// Create the config directory and write a default config file.
/// Returns the path to the created file.
pub fn init_config() -> Result<PathBuf> {
    let dir = config_dir()?;
    std::fs::create_dir_all(&dir).map_err(|e| ReqFinderError::io(&dir, e))?;

    let path = dir.join(CONFIG_FILE_NAME);
    let config = AppConfig::default();
    let content =
        toml::to_string_pretty(&config).map_err(|e| ReqFinderError::config(e.to_string()))?;

    std::fs::write(&path, content).map_err(|e| ReqFinderError::io(&path, e))?;
    tracing::info!(?path, "created default config file");

    Ok(path)
}
