//! Narrative view: Markdown prose of a canned sample rendered to HTML.

use pulldown_cmark::{Event, Options, Parser, html};
use reqfinder_shared::SampleDocument;

use crate::escape::escape_html;

/// Render a sample's title and Markdown body.
pub(crate) fn render_narrative(sample: &SampleDocument) -> String {
    let mut out = format!(
        "<div class=\"narrative\">\n<h2>{}</h2>\n",
        escape_html(&sample.title)
    );
    out.push_str(&markdown_to_html(&sample.content));
    out.push_str("</div>\n");
    out
}

/// Convert Markdown to HTML. Raw HTML embedded in the Markdown is shown as text.
pub fn markdown_to_html(markdown: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);

    let events = Parser::new_ext(markdown, options).map(|event| match event {
        Event::Html(raw) | Event::InlineHtml(raw) => Event::Text(raw),
        other => other,
    });

    let mut out = String::with_capacity(markdown.len() * 3 / 2);
    html::push_html(&mut out, events);
    out
}
