//! Link extraction.

use crate::dom::Document;
use crate::result::LinkRecord;

/// Collect every `<a>` element of the body in document order.
///
/// The raw `href` is kept as written; resolution happens in
/// [`crate::analyze_link_hierarchy`]. Scores start at `0.0`.
#[must_use]
pub fn extract_links(doc: &Document) -> Vec<LinkRecord> {
    doc.elements_by_tags(doc.body(), &["a"])
        .into_iter()
        .map(|element| LinkRecord {
            element,
            href: doc.attr(element, "href").map(|h| h.trim().to_string()),
            text: doc.inner_text(element),
            score: 0.0,
        })
        .collect()
}
