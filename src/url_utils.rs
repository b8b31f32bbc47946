//! URL Utility Functions
//!
//! Parsing, resolution and path-shape helpers shared by the classifier,
//! the link hierarchy analyzer and metadata scanning.

use url::Url;

use crate::patterns::ARTICLE_ID_SEGMENT;

/// Check if a string is a valid absolute http(s) URL.
///
/// # Returns
/// * `(is_absolute, parsed_url)` - Whether URL is absolute and the parsed URL if valid
#[must_use]
pub fn is_absolute_url(s: &str) -> (bool, Option<Url>) {
    let s = s.trim();

    if !s.starts_with("http://") && !s.starts_with("https://") {
        return (false, None);
    }

    match Url::parse(s) {
        Ok(url) if url.host().is_some() => (true, Some(url)),
        _ => (false, None),
    }
}

/// Parse a URL string, returning `None` on failure.
#[must_use]
pub fn parse_url(url_str: &str) -> Option<Url> {
    Url::parse(url_str.trim()).ok()
}

/// Resolve `href` against `base`, returning `None` when it cannot be resolved.
#[must_use]
pub fn resolve(base: &Url, href: &str) -> Option<Url> {
    base.join(href.trim()).ok()
}

/// Whether two URLs share scheme, host and port.
#[must_use]
pub fn same_origin(a: &Url, b: &Url) -> bool {
    a.origin() == b.origin()
}

/// Non-empty `/`-delimited segments of a URL path.
///
/// `/` yields no segments; `/a//b/` yields `["a", "b"]`.
#[must_use]
pub fn path_segments(path: &str) -> Vec<&str> {
    path.split('/').filter(|s| !s.is_empty()).collect()
}

/// Path without its trailing slash, keeping `/` for the root.
#[must_use]
pub fn trim_trailing_slash(path: &str) -> &str {
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() {
        "/"
    } else {
        trimmed
    }
}

/// Final path segment with its extension stripped.
///
/// `/posts/12345.html` yields `12345`.
#[must_use]
pub fn last_segment_stem(path: &str) -> Option<&str> {
    let last = path_segments(path).pop()?;
    let stem = match last.rfind('.') {
        Some(dot) if dot > 0 => &last[..dot],
        _ => last,
    };
    (!stem.is_empty()).then_some(stem)
}

/// Whether a path segment looks like an article identifier.
///
/// Purely numeric segments qualify, as do segments of at least five word
/// characters or dashes containing at least one digit.
#[must_use]
pub fn is_article_id_segment(segment: &str) -> bool {
    if !segment.is_empty() && segment.chars().all(|c| c.is_ascii_digit()) {
        return true;
    }
    ARTICLE_ID_SEGMENT.is_match(segment) && segment.chars().any(|c| c.is_ascii_digit())
}

/// Extract the hostname (without `www.`) from a URL string.
#[must_use]
pub fn extract_hostname(url_str: &str) -> Option<String> {
    let url = parse_url(url_str)?;
    let host = url.host_str()?;
    Some(host.strip_prefix("www.").unwrap_or(host).to_string())
}
