//! Result types for reading a page.
//!
//! `ReadResult` owns the parsed document so that the element ids it hands
//! out (selected root, candidates, link records, ARIA sources) stay valid
//! for as long as the result lives.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::aria::AriaNode;
use crate::dom::{Document, NodeId};

/// Page classification verdict.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageType {
    /// A single piece of content: a post, story, documentation page.
    Article,
    /// Anything else: listings, indexes, navigation hubs, home pages.
    #[default]
    Other,
}

impl PageType {
    #[must_use]
    pub fn is_article(self) -> bool {
        self == Self::Article
    }
}

impl fmt::Display for PageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Article => f.write_str("article"),
            Self::Other => f.write_str("other"),
        }
    }
}

/// An element the scorer believes may hold the main content.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub element: NodeId,
    pub score: f64,
}

/// An anchor found in the document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkRecord {
    /// The `<a>` element.
    pub element: NodeId,
    /// Raw `href` attribute, if present.
    pub href: Option<String>,
    /// Visible link text, whitespace-collapsed.
    pub text: String,
    /// Relevance assigned by consumers. Always `0.0` when extracted.
    pub score: f64,
}

/// Links bucketed by their position relative to the current page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LinkHierarchy {
    pub parent: Vec<LinkRecord>,
    pub sibling: Vec<LinkRecord>,
    pub child: Vec<LinkRecord>,
    pub external: Vec<LinkRecord>,
}

impl LinkHierarchy {
    /// Total number of bucketed links.
    #[must_use]
    pub fn len(&self) -> usize {
        self.parent.len() + self.sibling.len() + self.child.len() + self.external.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Metadata scanned from the document head.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageMetadata {
    /// Page title.
    pub title: String,
    /// Content language, from `<html lang>`.
    pub language: Option<String>,
    /// Site name (e.g., "The Example Times").
    pub site_name: Option<String>,
    /// Resolved URL of the page.
    pub url: Option<String>,
}

/// Result of reading a page.
#[derive(Debug, Clone)]
pub struct ReadResult {
    pub(crate) document: Document,

    /// Element chosen as the root of the main content. `None` when the
    /// page is not an article or no content was found.
    pub selected_root: Option<NodeId>,

    /// Ranked content candidates, highest score first.
    pub candidates: Vec<Candidate>,

    /// Classifier verdict (or the forced page type).
    pub page_type: PageType,

    /// Compressed accessibility tree of the selected root, or of the body
    /// when no root was selected.
    pub aria_tree: AriaNode,

    /// Every anchor of the body, in document order.
    pub links: Vec<LinkRecord>,

    /// `links` bucketed relative to the page URL. Empty without a URL.
    pub link_hierarchy: LinkHierarchy,

    /// Extracted metadata about the document.
    pub metadata: PageMetadata,

    /// Non-fatal issues, such as URLs that failed to parse.
    pub warnings: Vec<String>,
}

impl ReadResult {
    /// The parsed document all ids in this result refer to.
    #[must_use]
    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Rendered text of the selected root, or `None` without one.
    #[must_use]
    pub fn content_text(&self) -> Option<String> {
        self.selected_root.map(|root| self.document.inner_text(root))
    }
}
