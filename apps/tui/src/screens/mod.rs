//! TUI screen definitions.
//!
//! The app has a single query page; its form state and drawing live in
//! [`query`].

mod query;

pub(crate) use query::{Action, QueryScreen};
