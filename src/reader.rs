//! Page reading pipeline.
//!
//! Parses markup, scans metadata, scores content candidates, classifies the
//! page and builds the accessibility tree and link buckets of the result.

use tracing::{debug, warn};
use url::Url;

use crate::aria::{build_aria_tree, compress};
use crate::classifier::classify;
use crate::dom::Document;
use crate::encoding::decode_html;
use crate::error::Result;
use crate::hierarchy::analyze_link_hierarchy;
use crate::links::extract_links;
use crate::metadata::{base_uri, scan_metadata};
use crate::options::ReadOptions;
use crate::result::{Candidate, LinkRecord, ReadResult};
use crate::scoring::score_candidates_with_table;
use crate::url_utils::{parse_url, resolve};

/// Read a page with default options.
///
/// Never fails: malformed markup is completed by the parser and a page
/// without content yields `selected_root = None`.
///
/// # Example
///
/// ```rust
/// use rs_page_reader::{read, PageType};
///
/// let html = r#"<html><body><main>
///     <p>The first paragraph of this post is long enough to count as prose.</p>
///     <p>The second paragraph keeps going with more sentences, and commas.</p>
///     <p>The third paragraph closes the post with a final thought or two.</p>
///     <p>A fourth paragraph makes sure there is plenty of text to judge by.</p>
///     <p>A fifth and last paragraph, so the post is well past the threshold.</p>
/// </main></body></html>"#;
///
/// let result = read(html);
/// assert_eq!(result.page_type, PageType::Article);
/// assert!(result.content_text().unwrap_or_default().contains("first paragraph"));
/// ```
#[must_use]
pub fn read(html: &str) -> ReadResult {
    run(Document::parse(html), &ReadOptions::default(), Vec::new())
}

/// Read a page with custom options.
///
/// # Errors
///
/// Returns an error only when `options` are invalid.
pub fn read_with_options(html: &str, options: &ReadOptions) -> Result<ReadResult> {
    options.validate()?;
    Ok(run(Document::parse(html), options, Vec::new()))
}

/// Read an already-parsed document.
///
/// A bare element of another document can be read by wrapping it with
/// [`Document::from_subtree`] first.
///
/// # Errors
///
/// Returns an error when `options` are invalid.
pub fn read_document(doc: Document, options: &ReadOptions) -> Result<ReadResult> {
    options.validate()?;
    Ok(run(doc, options, Vec::new()))
}

/// Read raw page bytes with default options, detecting their encoding.
#[must_use]
pub fn read_bytes(bytes: &[u8]) -> ReadResult {
    let (doc, warnings) = parse_bytes(bytes);
    run(doc, &ReadOptions::default(), warnings)
}

/// Read raw page bytes with custom options.
///
/// # Errors
///
/// Returns an error when `options` are invalid.
pub fn read_bytes_with_options(bytes: &[u8], options: &ReadOptions) -> Result<ReadResult> {
    options.validate()?;
    let (doc, warnings) = parse_bytes(bytes);
    Ok(run(doc, options, warnings))
}

fn parse_bytes(bytes: &[u8]) -> (Document, Vec<String>) {
    let decoded = decode_html(bytes);
    debug!(
        encoding = decoded.encoding.name(),
        source = ?decoded.source,
        "decoded page bytes"
    );
    let mut warnings = Vec::new();
    if decoded.had_errors {
        warnings.push(format!(
            "malformed {} byte sequences were replaced",
            decoded.encoding.name()
        ));
    }
    (Document::parse(&decoded.html), warnings)
}

/// The pipeline. `options` must already be validated.
fn run(mut doc: Document, options: &ReadOptions, mut warnings: Vec<String>) -> ReadResult {
    let metadata = scan_metadata(&doc, options.url.as_deref());

    // Options URL first, then whatever the document declares.
    let page_url = metadata.url.as_deref().and_then(parse_url);
    if let (Some(declared), None) = (metadata.url.as_deref(), page_url.as_ref()) {
        warn!(url = declared, "unparsable page URL");
        warnings.push(format!("unparsable page URL {declared:?}"));
    }
    if doc.base_uri().is_none() {
        let base = base_uri(&doc, page_url.as_ref());
        doc.set_base_uri(base);
    }

    let (candidates, table) = score_candidates_with_table(&doc, options.max_candidates);
    // The stand-in body candidate is kept in the result but never treated as content.
    let content: &[Candidate] = if table.is_body_fallback() {
        &[]
    } else {
        &candidates
    };

    let page_type = options.page_type.unwrap_or_else(|| {
        classify(
            &doc,
            content,
            options.char_threshold,
            page_url.as_ref().map(Url::as_str),
        )
    });

    let selected_root = if page_type.is_article() {
        content.first().map(|c| c.element)
    } else {
        None
    };

    let raw_tree = build_aria_tree(&doc, selected_root.unwrap_or_else(|| doc.body()));
    let aria_tree = if options.compress_aria {
        compress(raw_tree)
    } else {
        raw_tree
    };

    let links = extract_links(&doc);
    let link_hierarchy = analyze_link_hierarchy(&links, page_url.as_ref().map(Url::as_str));
    if let Some(url) = &page_url {
        let skipped = count_unresolvable(url, &links);
        if skipped > 0 {
            warnings.push(format!("{skipped} links could not be resolved against {url}"));
        }
    }

    debug!(
        %page_type,
        candidates = candidates.len(),
        selected = selected_root.is_some(),
        aria_nodes = aria_tree.node_count(),
        links = links.len(),
        warnings = warnings.len(),
        "read page"
    );

    ReadResult {
        document: doc,
        selected_root,
        candidates,
        page_type,
        aria_tree,
        links,
        link_hierarchy,
        metadata,
        warnings,
    }
}

fn count_unresolvable(page: &Url, links: &[LinkRecord]) -> usize {
    links
        .iter()
        .filter_map(|l| l.href.as_deref())
        .filter(|h| !h.starts_with('#') && !h.starts_with('?'))
        .filter(|h| resolve(page, h).is_none())
        .count()
}
