//! Core domain types for regulatory requirement lookups.

use serde::{Deserialize, Serialize};

/// Category shown when a requirement arrives with an empty one.
pub const UNKNOWN_CATEGORY: &str = "Unknown";

/// Maximum number of path characters kept in a [`DataSource::label`].
const LABEL_PATH_MAX: usize = 20;

// ---------------------------------------------------------------------------
// Requirement / RequirementsDocument
// ---------------------------------------------------------------------------

/// One named regulatory obligation within a document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Requirement {
    /// Display label (e.g. "CE Marking").
    pub name: String,
    /// Grouping / badge label (e.g. "Safety", "Labeling").
    pub category: String,
    /// Prose description.
    pub description: String,
    /// URL or free-form citation, if the backend supplied one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

impl Requirement {
    /// The source citation, treating an empty string as absent.
    pub fn source(&self) -> Option<&str> {
        self.source.as_deref().filter(|s| !s.is_empty())
    }

    /// Category for display, substituting [`UNKNOWN_CATEGORY`] when empty.
    pub fn display_category(&self) -> &str {
        if self.category.is_empty() {
            UNKNOWN_CATEGORY
        } else {
            &self.category
        }
    }
}

/// Normalized backend response describing the regulations for a product/market pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequirementsDocument {
    /// Subject of the query.
    pub product_type: String,
    /// Jurisdiction identifier.
    pub market: String,
    /// Human-readable summary.
    pub summary: String,
    /// Requirements in display order.
    pub requirements: Vec<Requirement>,
}

impl RequirementsDocument {
    /// Number of requirements carrying a non-empty source.
    pub fn sourced_count(&self) -> usize {
        self.requirements
            .iter()
            .filter(|r| r.source().is_some())
            .count()
    }
}

// ---------------------------------------------------------------------------
// SampleDocument
// ---------------------------------------------------------------------------

/// A canned demo result whose body is Markdown prose.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SampleDocument {
    /// The registry key that matched (e.g. "fitness band with lithium battery").
    pub product_type: String,
    /// Market key this sample belongs to (e.g. "eu").
    pub market: String,
    /// Heading shown above the prose.
    pub title: String,
    /// Markdown body.
    pub content: String,
}

// ---------------------------------------------------------------------------
// QueryResult
// ---------------------------------------------------------------------------

/// What a successful query produced: a live document or a canned sample.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum QueryResult {
    /// Structured document from the backend.
    Requirements(RequirementsDocument),
    /// Canned demo prose.
    Sample(SampleDocument),
}

impl QueryResult {
    /// Product the result describes.
    pub fn product_type(&self) -> &str {
        match self {
            Self::Requirements(doc) => &doc.product_type,
            Self::Sample(sample) => &sample.product_type,
        }
    }

    /// Market the result describes.
    pub fn market(&self) -> &str {
        match self {
            Self::Requirements(doc) => &doc.market,
            Self::Sample(sample) => &sample.market,
        }
    }

    /// The structured document, if this is a live result.
    pub fn as_requirements(&self) -> Option<&RequirementsDocument> {
        match self {
            Self::Requirements(doc) => Some(doc),
            Self::Sample(_) => None,
        }
    }
}

// ---------------------------------------------------------------------------
// ProductQuery
// ---------------------------------------------------------------------------

/// Request body sent to the requirements endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductQuery {
    /// Product description or type.
    pub product_type: String,
    /// Target market.
    pub market: String,
    /// Ask the backend for a detailed rather than concise answer.
    #[serde(default)]
    pub detailed: bool,
}

// ---------------------------------------------------------------------------
// DataSource
// ---------------------------------------------------------------------------

/// A deduplicated citation derived from requirement sources.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataSource {
    /// Host of the source URL, or the raw string when it is not a URL.
    pub name: String,
    /// The raw source string (also the dedup key).
    pub url: String,
    /// Category of the first requirement citing this source.
    pub category: String,
}

impl DataSource {
    /// Compact display label: host plus a truncated path, or the raw string.
    pub fn label(&self) -> String {
        match url::Url::parse(&self.url) {
            Ok(parsed) if parsed.host_str().is_some() => {
                let host = parsed.host_str().unwrap_or_default();
                let path = parsed.path();
                if path.chars().count() > LABEL_PATH_MAX {
                    let head: String = path.chars().take(LABEL_PATH_MAX).collect();
                    format!("{host}{head}...")
                } else {
                    format!("{host}{path}")
                }
            }
            _ => self.url.clone(),
        }
    }
}
