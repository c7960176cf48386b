//! Rendering of query results into HTML fragments.
//!
//! Three stateless modes map a result to the content of the results region:
//! - **Structured**: header, summary, one card per requirement
//! - **Raw**: header plus the whole result as escaped, indented JSON
//! - **Narrative**: canned sample prose rendered from Markdown
//!
//! All untrusted text goes through [`escape::escape_html`]. Renderers only
//! borrow the result; nothing here mutates it.

pub mod escape;
mod narrative;
pub mod page;
mod raw;
mod sources;
mod structured;
pub mod text;

use std::fmt;

use reqfinder_shared::{QueryResult, RequirementsDocument, Result, SampleDocument};
use tracing::debug;

pub use narrative::markdown_to_html;
pub use sources::{SOURCES_EMPTY_TEXT, SOURCES_IDLE_TEXT, render_sources};
pub use structured::NO_SOURCE_TEXT;

// ---------------------------------------------------------------------------
// View / render modes
// ---------------------------------------------------------------------------

/// The user-facing view toggle. Exactly one is active at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewMode {
    /// Card list (or narrative prose for samples).
    #[default]
    Structured,
    /// Indented JSON.
    Raw,
}

impl fmt::Display for ViewMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Structured => write!(f, "Structured"),
            Self::Raw => write!(f, "Raw"),
        }
    }
}

/// The concrete template used for a result under a given [`ViewMode`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderMode {
    Structured,
    Raw,
    Narrative,
}

impl RenderMode {
    /// Pick the template for `result` when `view` is active.
    pub fn select(result: &QueryResult, view: ViewMode) -> Self {
        match (result, view) {
            (_, ViewMode::Raw) => Self::Raw,
            (QueryResult::Requirements(_), ViewMode::Structured) => Self::Structured,
            (QueryResult::Sample(_), ViewMode::Structured) => Self::Narrative,
        }
    }
}

// ---------------------------------------------------------------------------
// Entry points
// ---------------------------------------------------------------------------

/// Render a result for the active view.
pub fn render_result(result: &QueryResult, view: ViewMode) -> Result<String> {
    let mode = RenderMode::select(result, view);
    debug!(?mode, product = %result.product_type(), "rendering result");

    match (mode, result) {
        (RenderMode::Structured, QueryResult::Requirements(doc)) => Ok(render_structured(doc)),
        (RenderMode::Narrative, QueryResult::Sample(sample)) => Ok(render_narrative(sample)),
        (_, QueryResult::Requirements(doc)) => render_raw(doc),
        (_, QueryResult::Sample(sample)) => {
            raw::render_raw(sample, &sample.product_type, &sample.market)
        }
    }
}

/// Structured card list for a requirements document.
pub fn render_structured(doc: &RequirementsDocument) -> String {
    structured::StructuredView::from_document(doc).to_html()
}

/// Raw JSON view of a requirements document.
pub fn render_raw(doc: &RequirementsDocument) -> Result<String> {
    raw::render_raw(doc, &doc.product_type, &doc.market)
}

/// Narrative view of a canned sample.
pub fn render_narrative(sample: &SampleDocument) -> String {
    narrative::render_narrative(sample)
}

/// Shared header naming the product and market.
pub(crate) fn header_html(product_type: &str, market: &str) -> String {
    format!(
        "<div class=\"requirements-header\">\n<h2>Requirements for {} in {}</h2>\n</div>\n",
        escape::escape_html(product_type),
        escape::escape_html(market)
    )
}
