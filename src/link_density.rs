//! Link and text density of a subtree.
//!
//! Link density is the share of an element's rendered text that sits inside
//! anchors. Navigation blocks and link lists score close to 1, prose close
//! to 0. Text density is the share of non-whitespace characters outside
//! anchors among all raw text characters.

use crate::dom::{Document, NodeData, NodeId};

/// Collect anchor text statistics below `root`.
///
/// Returns (total_link_length, num_links, num_non_empty_links).
/// Nested anchors are counted once, by their outermost anchor.
fn collect_link_info(doc: &Document, root: NodeId) -> (usize, usize, usize) {
    let mut link_length = 0;
    let mut n_links = 0;
    let mut n_non_empty = 0;

    for anchor in doc.elements_by_tags(root, &["a"]) {
        let nested = doc
            .ancestors(anchor)
            .take_while(|&a| a != root)
            .any(|a| doc.tag_name(a) == Some("a"));
        if nested {
            continue;
        }

        n_links += 1;
        let text_length = doc.text_length(anchor);
        if text_length > 0 {
            link_length += text_length;
            n_non_empty += 1;
        }
    }

    (link_length, n_links, n_non_empty)
}

/// Fraction of the rendered text of `element` that is anchor text, in `[0, 1]`.
///
/// Elements without text have a link density of 0.
#[must_use]
pub fn link_density(doc: &Document, element: NodeId) -> f64 {
    let text_length = doc.text_length(element);
    if text_length == 0 {
        return 0.0;
    }
    let (link_length, _, _) = collect_link_info(doc, element);
    (link_length as f64 / text_length as f64).clamp(0.0, 1.0)
}

/// Number of anchors below `element`, counting nested anchors once.
#[must_use]
pub fn link_count(doc: &Document, element: NodeId) -> usize {
    collect_link_info(doc, element).1
}

/// Ratio of non-whitespace characters outside anchors to all raw text
/// characters below `element`.
#[must_use]
pub fn text_density(doc: &Document, element: NodeId) -> f64 {
    let mut total = 0usize;
    let mut plain = 0usize;

    for node in doc.descendants(element) {
        let Some(NodeData::Text(text)) = doc.get(node).map(|n| &n.data) else {
            continue;
        };
        let in_anchor = doc
            .ancestors(node)
            .take_while(|&a| a != element)
            .any(|a| doc.tag_name(a) == Some("a"));
        let in_hidden = doc
            .ancestors(node)
            .take_while(|&a| a != element)
            .any(|a| doc.is_hidden(a));
        if in_hidden {
            continue;
        }

        total += text.chars().count();
        if !in_anchor {
            plain += text.chars().filter(|c| !c.is_whitespace()).count();
        }
    }

    if total == 0 {
        return 0.0;
    }
    (plain as f64 / total as f64).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn first(doc: &Document, tag: &str) -> NodeId {
        doc.elements_by_tags(doc.body(), &[tag])[0]
    }

    #[test]
    fn test_link_density_nav_menu() {
        let doc = Document::parse(
            r#"<div>
                <a href="/home">Home</a>
                <a href="/about">About</a>
                <a href="/contact">Contact</a>
            </div>"#,
        );
        let div = first(&doc, "div");

        // Only the separating spaces are outside anchors.
        assert!(link_density(&doc, div) > 0.85);
        assert_eq!(link_count(&doc, div), 3);
    }

    #[test]
    fn test_link_density_article_paragraph() {
        let doc = Document::parse(
            r#"<p>This is a long paragraph with substantial text content that discusses
            various topics. It contains a <a href="/link">single link</a> but the
            majority of the content is regular text, not links.</p>"#,
        );
        let p = first(&doc, "p");

        let density = link_density(&doc, p);
        assert!(density > 0.0);
        assert!(density < 0.1);
    }

    #[test]
    fn test_link_density_no_links_or_text() {
        let doc = Document::parse("<p>This paragraph has no links at all.</p><div></div>");

        assert_eq!(link_density(&doc, first(&doc, "p")), 0.0);
        assert_eq!(link_density(&doc, first(&doc, "div")), 0.0);
    }

    #[test]
    fn test_text_density_ignores_anchor_text() {
        let doc = Document::parse(r#"<div>abcd<a href="/x">efgh</a></div>"#);
        let div = first(&doc, "div");

        assert!((text_density(&doc, div) - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_text_density_counts_whitespace_in_total() {
        let doc = Document::parse("<div><span>ab  cd</span></div>");
        let div = first(&doc, "div");

        // 4 visible characters out of 6 raw characters
        assert!((text_density(&doc, div) - 4.0 / 6.0).abs() < 1e-9);
    }
}
