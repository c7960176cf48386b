//! Structured card-list view of a requirements document.

use reqfinder_shared::{Requirement, RequirementsDocument};

use crate::escape::{escape_html, safe_href};

/// Placeholder shown on cards whose requirement carries no source.
pub const NO_SOURCE_TEXT: &str = "No source provided";

// ---------------------------------------------------------------------------
// View model
// ---------------------------------------------------------------------------

/// How a card presents its source.
#[derive(Debug, Clone, PartialEq, Eq)]
enum SourceView<'a> {
    /// A navigable web link and its display text.
    Link { href: String, text: &'a str },
    /// A citation that is not a web URL.
    Citation(&'a str),
    /// No source supplied.
    Missing,
}

/// One requirement card.
#[derive(Debug, Clone)]
struct CardView<'a> {
    name: &'a str,
    category: &'a str,
    description: &'a str,
    source: SourceView<'a>,
}

impl<'a> CardView<'a> {
    fn from_requirement(req: &'a Requirement) -> Self {
        let source = match req.source() {
            Some(raw) => match safe_href(raw) {
                Some(url) => SourceView::Link {
                    href: url.to_string(),
                    text: raw,
                },
                None => SourceView::Citation(raw),
            },
            None => SourceView::Missing,
        };
        Self {
            name: &req.name,
            category: req.display_category(),
            description: &req.description,
            source,
        }
    }
}

/// Whole structured view: header, summary, cards in document order.
#[derive(Debug, Clone)]
pub(crate) struct StructuredView<'a> {
    product_type: &'a str,
    market: &'a str,
    summary: &'a str,
    cards: Vec<CardView<'a>>,
}

impl<'a> StructuredView<'a> {
    pub(crate) fn from_document(doc: &'a RequirementsDocument) -> Self {
        Self {
            product_type: &doc.product_type,
            market: &doc.market,
            summary: &doc.summary,
            cards: doc.requirements.iter().map(CardView::from_requirement).collect(),
        }
    }

    pub(crate) fn to_html(&self) -> String {
        let mut html = String::new();
        html.push_str(&crate::header_html(self.product_type, self.market));
        html.push_str("<div class=\"requirements-summary\">\n<h3>Summary</h3>\n");
        html.push_str(&format!("<p>{}</p>\n</div>\n", escape_html(self.summary)));

        html.push_str("<h3>Detailed Requirements</h3>\n<div class=\"requirements-list\">\n");
        for card in &self.cards {
            html.push_str(&card_html(card));
        }
        html.push_str("</div>\n");
        html
    }
}

fn card_html(card: &CardView<'_>) -> String {
    let source_html = match &card.source {
        SourceView::Link { href, text } => format!(
            "<div class=\"requirement-source\">\n<p>Source:</p>\n\
             <a class=\"source-link\" href=\"{}\" target=\"_blank\" rel=\"noopener noreferrer\">{}</a>\n</div>\n",
            escape_html(href),
            escape_html(text)
        ),
        SourceView::Citation(text) => format!(
            "<div class=\"requirement-source\">\n<p>Source:</p>\n<span class=\"source-citation\">{}</span>\n</div>\n",
            escape_html(text)
        ),
        SourceView::Missing => format!("<p class=\"no-source\">{NO_SOURCE_TEXT}</p>\n"),
    };

    format!(
        "<div class=\"requirement-card\">\n\
         <div class=\"requirement-title\">\n<h4>{name}</h4>\n<span class=\"category-badge\">{category}</span>\n</div>\n\
         <p class=\"requirement-description\">{description}</p>\n{source_html}</div>\n",
        name = escape_html(card.name),
        category = escape_html(card.category),
        description = escape_html(card.description),
    )
}
