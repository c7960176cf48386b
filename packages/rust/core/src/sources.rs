//! Derivation of the deduplicated data-source list from a requirements document.

use std::collections::HashSet;

use reqfinder_shared::{DataSource, RequirementsDocument};
use tracing::warn;
use url::Url;

/// Extract unique sources in first-occurrence order.
///
/// The dedup key is the raw source string, so two URLs on the same host stay
/// distinct. Sources that are not URLs (or have no host) are kept with the raw
/// string as their name.
pub fn extract_sources(doc: &RequirementsDocument) -> Vec<DataSource> {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut sources = Vec::new();

    for req in &doc.requirements {
        let Some(raw) = req.source() else {
            continue;
        };
        if !seen.insert(raw) {
            continue;
        }

        let name = match Url::parse(raw) {
            Ok(url) => match url.host_str() {
                Some(host) => host.to_string(),
                None => {
                    warn!(source = raw, "source URL has no host, using it as-is");
                    raw.to_string()
                }
            },
            Err(e) => {
                warn!(source = raw, error = %e, "invalid URL format for source");
                raw.to_string()
            }
        };

        sources.push(DataSource {
            name,
            url: raw.to_string(),
            category: req.display_category().to_string(),
        });
    }

    sources
}
