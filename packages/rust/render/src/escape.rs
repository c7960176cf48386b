//! HTML escaping and link sanitizing. Every template routes untrusted text through here.

use url::Url;

/// Escape text for safe inclusion in HTML element content or quoted attributes.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Return the source as a link target only if it is an `http`/`https` URL.
///
/// Anything else (free-form citations, `javascript:` and friends) renders as text.
pub fn safe_href(source: &str) -> Option<Url> {
    let url = Url::parse(source.trim()).ok()?;
    matches!(url.scheme(), "http" | "https").then_some(url)
}
