//! Metadata scanning.
//!
//! Reads the title, language, site name and canonical URL of a page from
//! its head: the `<title>` element, meta tags and Open Graph properties,
//! with DOM fallbacks when the head is silent.

use tracing::trace;
use url::Url;

use crate::dom::{collapse_whitespace, Document};
use crate::result::PageMetadata;
use crate::url_utils::{self, is_absolute_url};

/// Values collected from `<meta>` tags, first occurrence wins.
#[derive(Debug, Default)]
struct MetaTags {
    title: Option<String>,
    site_name: Option<String>,
    application_name: Option<String>,
    url: Option<String>,
    language: Option<String>,
}

/// Scan document metadata.
///
/// `page_url` is the caller-supplied address of the page. It takes
/// precedence over URLs declared in the document.
#[must_use]
pub fn scan_metadata(doc: &Document, page_url: Option<&str>) -> PageMetadata {
    let meta = examine_meta(doc);
    let root = doc.document_element();

    let title = first_text(doc, "title")
        .or_else(|| meta.title.clone())
        .or_else(|| {
            doc.elements_by_tags(root, &["h1"])
                .first()
                .map(|&h1| doc.inner_text(h1))
                .filter(|t| !t.is_empty())
        })
        .unwrap_or_default();

    let language = doc
        .attr(root, "lang")
        .map(normalize_language)
        .filter(|l| !l.is_empty())
        .or(meta.language.clone());

    let url = page_url
        .map(|u| u.trim().to_string())
        .filter(|u| !u.is_empty())
        .or_else(|| canonical_url(doc))
        .or(meta.url.clone());

    let site_name = meta
        .site_name
        .or(meta.application_name)
        .or_else(|| url.as_deref().and_then(url_utils::extract_hostname));

    trace!(%title, ?language, ?site_name, ?url, "scanned metadata");

    PageMetadata {
        title,
        language,
        site_name,
        url,
    }
}

/// Base URI of the document: `<base href>` resolved against the page URL,
/// or the page URL itself.
#[must_use]
pub fn base_uri(doc: &Document, page_url: Option<&Url>) -> Option<Url> {
    let declared = doc
        .elements_by_tags(doc.document_element(), &["base"])
        .into_iter()
        .find_map(|base| doc.attr(base, "href"))
        .map(str::trim)
        .filter(|href| !href.is_empty());

    match (declared, page_url) {
        (Some(href), Some(page)) => page.join(href).ok().or_else(|| Some(page.clone())),
        (Some(href), None) => Url::parse(href).ok(),
        (None, page) => page.cloned(),
    }
}

fn examine_meta(doc: &Document) -> MetaTags {
    let mut tags = MetaTags::default();

    for meta in doc.elements_by_tags(doc.document_element(), &["meta"]) {
        let name = doc
            .attr(meta, "property")
            .or_else(|| doc.attr(meta, "name"))
            .or_else(|| doc.attr(meta, "http-equiv"))
            .unwrap_or_default()
            .trim()
            .to_lowercase();
        let content = doc
            .attr(meta, "content")
            .map(collapse_whitespace)
            .unwrap_or_default();
        if name.is_empty() || content.is_empty() {
            continue;
        }

        let slot = match name.as_str() {
            "og:title" | "twitter:title" => &mut tags.title,
            "og:site_name" => &mut tags.site_name,
            "application-name" => &mut tags.application_name,
            "og:url" | "twitter:url" => &mut tags.url,
            "content-language" | "og:locale" | "language" => {
                if tags.language.is_none() {
                    tags.language = Some(normalize_language(&content));
                }
                continue;
            }
            _ => continue,
        };
        if slot.is_none() {
            *slot = Some(content);
        }
    }

    tags
}

fn first_text(doc: &Document, tag: &str) -> Option<String> {
    doc.elements_by_tags(doc.document_element(), &[tag])
        .first()
        .map(|&el| collapse_whitespace(&doc.text_content(el)))
        .filter(|t| !t.is_empty())
}

fn canonical_url(doc: &Document) -> Option<String> {
    doc.elements_by_tags(doc.document_element(), &["link"])
        .into_iter()
        .filter(|&link| {
            doc.attr(link, "rel")
                .is_some_and(|rel| rel.split_whitespace().any(|r| r.eq_ignore_ascii_case("canonical")))
        })
        .find_map(|link| doc.attr(link, "href"))
        .map(str::trim)
        .filter(|href| is_absolute_url(href).0)
        .map(str::to_string)
}

/// Primary language subtag, lower-cased: `en-US` and `en_GB` become `en`.
fn normalize_language(lang: &str) -> String {
    lang.trim()
        .split(['-', '_', ','])
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase()
}
