//! Offline demo lookups: canned sample documents matched by free text.
//!
//! The demo path never touches the network. A query matches a sample when
//! the sample's key appears in the lower-cased query text.

mod matcher;
mod samples;

pub use matcher::{MarketFilter, QueryMatcher};
pub use samples::{SampleEntry, SampleRegistry};
