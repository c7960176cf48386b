//! Query orchestration and domain logic for ReqFinder.
//!
//! This crate ties together the requirements client, the demo matcher, and
//! HTML rendering into the query lifecycle driven by [`ViewController`].

pub mod controller;
pub mod export;
pub mod fetcher;
pub mod ports;
pub mod sources;

pub use controller::{
    LOADING_LABEL, NO_RESULTS_MESSAGE, Phase, QueryForm, QuerySource, SUBMIT_LABEL,
    SubmitOutcome, ViewController,
};
pub use export::{ExportArtifact, build_artifact, export_filename, write_artifact};
pub use fetcher::{ConfiguredFetcher, RequirementsFetcher};
pub use ports::{Notice, NoticeLevel, SubmitState, ViewPorts};
pub use sources::extract_sources;
