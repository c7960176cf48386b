//! Seam between the controller and the live requirements backend.

use std::future::Future;

use reqfinder_client::RequirementsClient;
use reqfinder_shared::{ProductQuery, ReqFinderError, RequirementsDocument, Result};
use tracing::warn;

/// Something that can turn a product query into a requirements document.
pub trait RequirementsFetcher {
    /// Perform one lookup. Implementations must not retry.
    fn fetch(&self, query: &ProductQuery)
    -> impl Future<Output = Result<RequirementsDocument>> + Send;
}

impl RequirementsFetcher for RequirementsClient {
    fn fetch(
        &self,
        query: &ProductQuery,
    ) -> impl Future<Output = Result<RequirementsDocument>> + Send {
        self.fetch_requirements(query)
    }
}

// ---------------------------------------------------------------------------
// ConfiguredFetcher
// ---------------------------------------------------------------------------

/// A fetcher built from configuration that may be unusable.
///
/// A bad endpoint only matters to live lookups, so the construction error is
/// held and returned from each `fetch` instead of failing at startup.
#[derive(Debug)]
pub enum ConfiguredFetcher<F> {
    Ready(F),
    Misconfigured(String),
}

impl<F> ConfiguredFetcher<F> {
    /// Wrap the outcome of building a fetcher.
    pub fn from_result(built: Result<F>) -> Self {
        match built {
            Ok(fetcher) => Self::Ready(fetcher),
            Err(e) => {
                warn!(error = %e, "live lookups disabled until configuration is fixed");
                match e {
                    ReqFinderError::Config { message } => Self::Misconfigured(message),
                    other => Self::Misconfigured(other.to_string()),
                }
            }
        }
    }

    /// The usable fetcher, if configuration allowed building one.
    pub fn ready(&self) -> Option<&F> {
        match self {
            Self::Ready(fetcher) => Some(fetcher),
            Self::Misconfigured(_) => None,
        }
    }
}

impl<F: RequirementsFetcher + Sync> RequirementsFetcher for ConfiguredFetcher<F> {
    fn fetch(
        &self,
        query: &ProductQuery,
    ) -> impl Future<Output = Result<RequirementsDocument>> + Send {
        async move {
            match self {
                Self::Ready(fetcher) => fetcher.fetch(query).await,
                Self::Misconfigured(reason) => Err(ReqFinderError::config(reason.clone())),
            }
        }
    }
}
