//! Shared types, error model, and configuration for ReqFinder.
//!
//! This crate is the foundation depended on by all other ReqFinder crates.
//! It provides:
//! - [`ReqFinderError`]: the unified error type
//! - Domain types ([`RequirementsDocument`], [`Requirement`], [`SampleDocument`],
//!   [`QueryResult`], [`DataSource`], [`ProductQuery`])
//! - Configuration ([`AppConfig`], config loading)

pub mod config;
pub mod error;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    ApiConfig, AppConfig, ExportConfig, UiConfig, config_dir, config_file_path, init_config,
    load_config, load_config_from,
};
pub use error::{ReqFinderError, Result};
pub use types::{
    DataSource, ProductQuery, QueryResult, Requirement, RequirementsDocument, SampleDocument,
    UNKNOWN_CATEGORY,
};
