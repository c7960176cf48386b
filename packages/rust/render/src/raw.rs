//! Raw view: the document as indented JSON, escaped for display.

use reqfinder_shared::{ReqFinderError, Result};
use serde::Serialize;

use crate::escape::escape_html;

/// Render `value` as a header plus an escaped, pretty-printed JSON block.
pub(crate) fn render_raw<T: Serialize>(value: &T, product_type: &str, market: &str) -> Result<String> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| ReqFinderError::Render(format!("failed to serialize raw view: {e}")))?;

    let mut html = crate::header_html(product_type, market);
    html.push_str("<p class=\"raw-note\">Raw JSON data format</p>\n");
    html.push_str(&format!("<pre class=\"raw-json\">{}</pre>\n", escape_html(&json)));
    Ok(html)
}
