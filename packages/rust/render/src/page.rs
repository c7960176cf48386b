//! Standalone HTML page wrapping the results and sources fragments.

use crate::escape::escape_html;

const PAGE_STYLE: &str = "\
body{font-family:system-ui,sans-serif;margin:2rem;color:#111}\
main{display:flex;gap:2rem;align-items:flex-start}\
#results-content{flex:2}#data-sources-content{flex:1}\
.requirement-card{border:1px solid #e5e7eb;border-radius:.5rem;padding:1rem;margin-bottom:1rem}\
.requirement-title{display:flex;justify-content:space-between}\
.category-badge{font-size:.75rem;background:#f3f4f6;padding:.1rem .5rem;border-radius:.25rem}\
.no-source,.raw-note,.source-origin{color:#6b7280;font-size:.875rem}\
.raw-json{background:#f9fafb;padding:1rem;overflow:auto;max-height:600px}\
.source-link{color:#2563eb;word-break:break-all}";

/// Build a complete HTML document around rendered results and sources.
pub fn standalone_page(title: &str, results_html: &str, sources_html: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <title>{title}</title>\n<style>{PAGE_STYLE}</style>\n</head>\n<body>\n<main>\n\
         <section id=\"results-content\">\n{results_html}</section>\n\
         <aside id=\"data-sources-content\">\n<h3>Data Sources</h3>\n{sources_html}</aside>\n\
         </main>\n</body>\n</html>\n",
        title = escape_html(title),
    )
}
