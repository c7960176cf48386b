//! Data-sources side panel.

use reqfinder_shared::DataSource;

use crate::escape::{escape_html, safe_href};

/// Panel text before any search has run.
pub const SOURCES_IDLE_TEXT: &str = "Search for requirements to see source references.";

/// Panel text when the current result cites no sources.
pub const SOURCES_EMPTY_TEXT: &str = "No source references available for this search.";

/// Render the data-sources panel. `None` means no search has produced a result yet.
pub fn render_sources(sources: Option<&[DataSource]>) -> String {
    let sources = match sources {
        None => return placeholder(SOURCES_IDLE_TEXT),
        Some([]) => return placeholder(SOURCES_EMPTY_TEXT),
        Some(list) => list,
    };

    let mut html = String::from("<div class=\"data-sources\">\n");
    for source in sources {
        let category = escape_html(&source.category);
        let target = match safe_href(&source.url) {
            Some(url) => format!(
                "<a class=\"source-link\" href=\"{}\" target=\"_blank\" rel=\"noopener noreferrer\">{}</a>",
                escape_html(url.as_str()),
                escape_html(&source.label())
            ),
            None => format!(
                "<span class=\"source-citation\">{}</span>",
                escape_html(&source.url)
            ),
        };
        html.push_str(&format!(
            "<div class=\"data-source\">\n<h4>{category}</h4>\n<span class=\"category-badge\">{category}</span>\n\
             <div class=\"source-origin\">{}</div>\n<div class=\"source-target\">{target}</div>\n</div>\n",
            escape_html(&source.name)
        ));
    }
    html.push_str("</div>\n");
    html
}

fn placeholder(text: &str) -> String {
    format!("<div class=\"sources-placeholder\">\n<p>{text}</p>\n</div>\n")
}
