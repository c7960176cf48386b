//! Free-text query matching against the sample registry.

use reqfinder_shared::SampleDocument;
use tracing::debug;

use crate::samples::SampleRegistry;

/// Market selection from the query form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MarketFilter {
    /// No specific market; the sample's first registered market is used.
    All,
    /// A specific market key (lower-case).
    Specific(String),
}

impl MarketFilter {
    /// Parse a selector value. `all` (any case) or blank means [`MarketFilter::All`].
    pub fn parse(value: &str) -> Self {
        let value = value.trim().to_lowercase();
        if value.is_empty() || value == "all" {
            Self::All
        } else {
            Self::Specific(value)
        }
    }
}

impl std::fmt::Display for MarketFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::All => write!(f, "all"),
            Self::Specific(market) => write!(f, "{market}"),
        }
    }
}

/// Maps free-text queries to canned sample documents.
#[derive(Debug, Clone)]
pub struct QueryMatcher {
    registry: SampleRegistry,
}

impl QueryMatcher {
    /// Create a matcher over the given registry.
    pub fn new(registry: SampleRegistry) -> Self {
        Self { registry }
    }

    /// Find the sample for `query` in `market`, or `None` when no key matches.
    ///
    /// The first registered key contained in the lower-cased query wins.
    /// `All` and markets the sample lacks both resolve to the sample's first
    /// registered market; markets are never merged.
    pub fn find(&self, query: &str, market: &MarketFilter) -> Option<&SampleDocument> {
        let normalized = query.to_lowercase();

        let entry = self
            .registry
            .entries()
            .iter()
            .find(|entry| normalized.contains(&entry.key))?;

        let doc = match market {
            MarketFilter::Specific(m) => entry.market(m).or_else(|| {
                debug!(market = %m, key = %entry.key, "market not in sample, using first");
                entry.first_market()
            }),
            MarketFilter::All => entry.first_market(),
        }?;

        debug!(key = %entry.key, market = %doc.market, "sample matched");
        Some(doc)
    }
}

impl Default for QueryMatcher {
    fn default() -> Self {
        Self::new(SampleRegistry::builtin())
    }
}
