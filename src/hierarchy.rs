//! Link Hierarchy Analysis
//!
//! Buckets links by where their target sits relative to the current page:
//! above it (parent), next to it (sibling), below it (child) or on another
//! origin (external).

use tracing::{debug, trace};
use url::Url;

use crate::result::{LinkHierarchy, LinkRecord};
use crate::url_utils::{parse_url, path_segments, resolve, same_origin, trim_trailing_slash};

/// Where a link points relative to the current page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Relation {
    Parent,
    Sibling,
    Child,
    External,
}

/// Bucket `links` relative to `current_url`.
///
/// Returns an empty hierarchy when the URL is missing or unparsable.
/// Links without an href, query-only links, unresolvable links and links
/// to the current page are left out.
///
/// # Example
///
/// ```
/// use rs_page_reader::{analyze_link_hierarchy, Document, extract_links};
///
/// let doc = Document::parse(r#"<a href="/a/b/c">down</a><a href="/a">up</a>"#);
/// let links = extract_links(&doc);
/// let hierarchy = analyze_link_hierarchy(&links, Some("https://site.example/a/b"));
/// assert_eq!(hierarchy.child.len(), 1);
/// assert_eq!(hierarchy.parent.len(), 1);
/// ```
#[must_use]
pub fn analyze_link_hierarchy(links: &[LinkRecord], current_url: Option<&str>) -> LinkHierarchy {
    let mut hierarchy = LinkHierarchy::default();
    if links.is_empty() {
        return hierarchy;
    }
    let Some(current) = current_url.and_then(parse_url) else {
        debug!(?current_url, "no usable page URL, skipping link hierarchy");
        return hierarchy;
    };

    for link in links {
        let Some(relation) = relate(&current, link) else {
            continue;
        };
        let bucket = match relation {
            Relation::Parent => &mut hierarchy.parent,
            Relation::Sibling => &mut hierarchy.sibling,
            Relation::Child => &mut hierarchy.child,
            Relation::External => &mut hierarchy.external,
        };
        bucket.push(link.clone());
    }

    debug!(
        parent = hierarchy.parent.len(),
        sibling = hierarchy.sibling.len(),
        child = hierarchy.child.len(),
        external = hierarchy.external.len(),
        "link hierarchy"
    );
    hierarchy
}

/// Relation of one link to the current page, or `None` when it is ignored.
#[must_use]
pub fn relate(current: &Url, link: &LinkRecord) -> Option<Relation> {
    let href = link.href.as_deref()?.trim();

    if href.starts_with('#') {
        return Some(Relation::Parent);
    }
    if href.starts_with('?') {
        trace!(href, "query-only link ignored");
        return None;
    }

    let Some(target) = resolve(current, href) else {
        trace!(href, "unresolvable link ignored");
        return None;
    };

    if !same_origin(current, &target) {
        return Some(Relation::External);
    }

    let current_path = trim_trailing_slash(current.path());
    let target_path = trim_trailing_slash(target.path());
    if current_path == target_path && current.query() == target.query() {
        trace!(href, "self link ignored");
        return None;
    }

    if target_path == "/" && current_path != "/" {
        return Some(Relation::Parent);
    }

    Some(compare_paths(current_path, target_path))
}

fn compare_paths(current: &str, target: &str) -> Relation {
    let current = path_segments(current);
    let target = path_segments(target);
    let common = current
        .iter()
        .zip(&target)
        .take_while(|(a, b)| a == b)
        .count();

    if common == current.len() && target.len() > common {
        Relation::Child
    } else if common == target.len() && current.len() > common {
        Relation::Parent
    } else if !current.is_empty()
        && current.len() == target.len()
        && common + 1 == current.len()
        && current != target
    {
        Relation::Sibling
    } else {
        Relation::Parent
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::Document;

    fn record(href: Option<&str>) -> LinkRecord {
        LinkRecord {
            element: Document::new().body(),
            href: href.map(str::to_string),
            text: String::new(),
            score: 0.0,
        }
    }

    fn links(values: &[&str]) -> Vec<LinkRecord> {
        values.iter().map(|h| record(Some(*h))).collect()
    }

    fn hrefs(bucket: &[LinkRecord]) -> Vec<&str> {
        bucket.iter().filter_map(|l| l.href.as_deref()).collect()
    }

    #[test]
    fn test_buckets_relative_to_page() {
        let input = links(&[
            "#top",
            "?page=2",
            "/a/b/c",
            "/a/b",
            "/a/d",
            "https://other.example/x",
        ]);
        let h = analyze_link_hierarchy(&input, Some("https://site.example/a/b"));

        assert_eq!(hrefs(&h.parent), vec!["#top"]);
        assert_eq!(hrefs(&h.child), vec!["/a/b/c"]);
        assert_eq!(hrefs(&h.sibling), vec!["/a/d"]);
        assert_eq!(hrefs(&h.external), vec!["https://other.example/x"]);
    }

    #[test]
    fn test_deeper_path_under_page_is_child() {
        let input = links(&["/a/b/d"]);
        let h = analyze_link_hierarchy(&input, Some("https://site.example/a/b"));
        assert_eq!(hrefs(&h.child), vec!["/a/b/d"]);
    }

    #[test]
    fn test_self_link_ignores_trailing_slash() {
        let input = links(&["/a/b/", "https://site.example/a/b", "/a/b?x=1"]);
        let h = analyze_link_hierarchy(&input, Some("https://site.example/a/b"));
        // Only the link with a different query survives. Same path, so it
        // falls through to the parent fallback.
        assert_eq!(h.len(), 1);
        assert_eq!(hrefs(&h.parent), vec!["/a/b?x=1"]);
    }

    #[test]
    fn test_root_and_ancestors_are_parents() {
        let input = links(&["/", "/a", "../"]);
        let h = analyze_link_hierarchy(&input, Some("https://site.example/a/b/c"));
        assert_eq!(h.parent.len(), 3);
    }

    #[test]
    fn test_diverging_branch_defaults_to_parent() {
        let input = links(&["/x/y/z"]);
        let h = analyze_link_hierarchy(&input, Some("https://site.example/a/b"));
        assert_eq!(hrefs(&h.parent), vec!["/x/y/z"]);
    }

    #[test]
    fn test_other_scheme_or_port_is_external() {
        let input = links(&["http://site.example/a", "https://site.example:8443/a"]);
        let h = analyze_link_hierarchy(&input, Some("https://site.example/a/b"));
        assert_eq!(h.external.len(), 2);
    }

    #[test]
    fn test_missing_or_invalid_url_gives_empty_result() {
        let input = links(&["/a"]);
        assert!(analyze_link_hierarchy(&input, None).is_empty());
        assert!(analyze_link_hierarchy(&input, Some("not a url")).is_empty());
        assert!(analyze_link_hierarchy(&[], Some("https://site.example/")).is_empty());
    }

    #[test]
    fn test_links_without_href_are_ignored() {
        let mut input = links(&["/a/b/c"]);
        input.push(record(None));
        let h = analyze_link_hierarchy(&input, Some("https://site.example/a/b"));
        assert_eq!(h.len(), 1);
    }

    #[test]
    fn test_every_link_lands_in_at_most_one_bucket() {
        let input = links(&[
            "/", "/a", "/a/b", "/a/b/c", "/a/c", "/z", "#f", "?q", "mailto:x@site.example",
            "https://other.example/", "//cdn.example/x", "/a/b/c/d",
        ]);
        let h = analyze_link_hierarchy(&input, Some("https://site.example/a/b"));

        let mut seen: Vec<&str> = [&h.parent, &h.sibling, &h.child, &h.external]
            .iter()
            .flat_map(|bucket| hrefs(bucket))
            .collect();
        let total = seen.len();
        seen.sort_unstable();
        seen.dedup();
        assert_eq!(seen.len(), total);
        // "/a/b" (self) and "?q" are ignored.
        assert_eq!(total, input.len() - 2);
    }
}
