//! Conversion of rendered fragments to terminal-readable Markdown.

use std::sync::LazyLock;

use regex::Regex;
use reqfinder_shared::{ReqFinderError, Result};

/// Convert an HTML fragment to Markdown text for terminal display.
pub fn to_terminal_text(html: &str) -> Result<String> {
    static BLANK_RUNS_RE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"\n{3,}").expect("valid regex"));

    let converter = htmd::HtmlToMarkdown::builder()
        .skip_tags(vec!["script", "style"])
        .build();

    let markdown = converter
        .convert(html)
        .map_err(|e| ReqFinderError::Render(format!("htmd conversion failed: {e}")))?;

    Ok(BLANK_RUNS_RE.replace_all(markdown.trim(), "\n\n").into_owned())
}
