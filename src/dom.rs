//! Arena Document Model
//!
//! Markup is parsed with `dom_query` and converted into a flat arena of
//! [`Node`]s addressed by [`NodeId`]. Parent links are plain indices, so a
//! back-reference never keeps a subtree alive, and every lookup through an
//! id returns an `Option` that is `None` for ids this document never issued.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use url::Url;

// Re-export StrTendril, the text type handed out by the parser.
pub use tendril::StrTendril;

/// Tags whose content is never rendered.
pub const NON_RENDERED_TAGS: &[&str] = &[
    "script", "style", "noscript", "template", "head", "meta", "link", "title",
];

/// Block-level tags. Inner text gets a word break at their boundaries.
pub const BLOCK_TAGS: &[&str] = &[
    "address", "article", "aside", "blockquote", "dd", "details", "dialog", "div", "dl",
    "dt", "fieldset", "figcaption", "figure", "footer", "form", "h1", "h2", "h3", "h4",
    "h5", "h6", "header", "hr", "li", "main", "nav", "ol", "p", "pre", "search", "section",
    "table", "tbody", "td", "tfoot", "th", "thead", "tr", "ul",
];

/// Index of a node inside its [`Document`] arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(u32);

impl NodeId {
    /// Position of the node in the arena.
    #[inline]
    #[must_use]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Tag and attributes of an element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementData {
    /// Lower-cased tag name.
    pub tag: String,
    /// Attribute map with lower-cased names.
    pub attrs: HashMap<String, String>,
}

/// Payload of an arena node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeData {
    Element(ElementData),
    Text(String),
}

/// A node in the arena.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    pub data: NodeData,
    /// Non-owning link to the parent element.
    pub parent: Option<NodeId>,
    /// Owned children in document order.
    pub children: Vec<NodeId>,
}

impl Node {
    #[must_use]
    pub fn as_element(&self) -> Option<&ElementData> {
        match &self.data {
            NodeData::Element(el) => Some(el),
            NodeData::Text(_) => None,
        }
    }
}

/// Parsed document: an arena of nodes plus the document element and body.
#[derive(Debug, Clone)]
pub struct Document {
    nodes: Vec<Node>,
    document_element: NodeId,
    body: NodeId,
    base_uri: Option<Url>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Create an empty `<html><head></head><body></body></html>` document.
    #[must_use]
    pub fn new() -> Self {
        let mut doc = Self {
            nodes: Vec::new(),
            document_element: NodeId(0),
            body: NodeId(0),
            base_uri: None,
        };
        let html = doc.push_node(NodeData::Element(ElementData {
            tag: "html".to_string(),
            attrs: HashMap::new(),
        }), None);
        doc.document_element = html;
        doc.append_element(html, "head", std::iter::empty::<(&str, &str)>());
        doc.body = doc.append_element(html, "body", std::iter::empty::<(&str, &str)>());
        doc
    }

    /// Parse markup into a document.
    ///
    /// Fragments are completed by the HTML5 tree builder, so the result
    /// always has a document element and a body.
    #[must_use]
    pub fn parse(html: &str) -> Self {
        let parsed = dom_query::Document::from(html);
        let mut doc = Self {
            nodes: Vec::new(),
            document_element: NodeId(0),
            body: NodeId(0),
            base_uri: None,
        };

        let html_sel = parsed.select("html");
        let Some(html_node) = html_sel.nodes().first() else {
            return Self::new();
        };

        let root = doc.push_node(NodeData::Element(ElementData {
            tag: "html".to_string(),
            attrs: collect_attrs(html_node),
        }), None);
        doc.document_element = root;

        // Explicit stack keeps deeply nested markup off the call stack.
        let mut stack: Vec<(dom_query::NodeRef, NodeId)> = html_node
            .children()
            .into_iter()
            .rev()
            .map(|child| (child, root))
            .collect();

        while let Some((node, parent)) = stack.pop() {
            if node.is_element() {
                let tag = node
                    .node_name()
                    .map(|t| t.to_ascii_lowercase())
                    .unwrap_or_default();
                let id = doc.push_node(NodeData::Element(ElementData {
                    tag,
                    attrs: collect_attrs(&node),
                }), Some(parent));
                for child in node.children().into_iter().rev() {
                    stack.push((child, id));
                }
            } else if node.is_text() {
                let text: StrTendril = node.text();
                doc.push_node(NodeData::Text(text.to_string()), Some(parent));
            }
        }

        doc.body = match doc.find_child(root, "body") {
            Some(body) => body,
            None => doc.append_element(root, "body", std::iter::empty::<(&str, &str)>()),
        };
        doc
    }

    /// Copy the subtree rooted at `element` of `source` into the body of a
    /// fresh document. Non-element ids yield an empty document.
    #[must_use]
    pub fn from_subtree(source: &Document, element: NodeId) -> Self {
        let mut doc = Self::new();
        doc.base_uri.clone_from(&source.base_uri);
        if source.element(element).is_none() {
            return doc;
        }

        let body = doc.body;
        let mut stack = vec![(element, body)];
        while let Some((src, parent)) = stack.pop() {
            let Some(node) = source.get(src) else { continue };
            let id = doc.push_node(node.data.clone(), Some(parent));
            for &child in node.children.iter().rev() {
                stack.push((child, id));
            }
        }
        doc
    }

    fn push_node(&mut self, data: NodeData, parent: Option<NodeId>) -> NodeId {
        let id = NodeId(u32::try_from(self.nodes.len()).unwrap_or(u32::MAX));
        self.nodes.push(Node {
            data,
            parent,
            children: Vec::new(),
        });
        if let Some(p) = parent {
            if let Some(parent_node) = self.nodes.get_mut(p.index()) {
                parent_node.children.push(id);
            }
        }
        id
    }

    fn find_child(&self, parent: NodeId, tag: &str) -> Option<NodeId> {
        self.children(parent)
            .iter()
            .copied()
            .find(|&c| self.tag_name(c) == Some(tag))
    }

    /// Append an element with the given attributes under `parent`.
    pub fn append_element<I, K, V>(&mut self, parent: NodeId, tag: &str, attrs: I) -> NodeId
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let attrs = attrs
            .into_iter()
            .map(|(k, v)| (k.as_ref().to_ascii_lowercase(), v.into()))
            .collect();
        self.push_node(NodeData::Element(ElementData {
            tag: tag.to_ascii_lowercase(),
            attrs,
        }), Some(parent))
    }

    /// Append a text node under `parent`.
    pub fn append_text(&mut self, parent: NodeId, text: &str) -> NodeId {
        self.push_node(NodeData::Text(text.to_string()), Some(parent))
    }

    // === Document-level accessors ===

    #[inline]
    #[must_use]
    pub fn document_element(&self) -> NodeId {
        self.document_element
    }

    #[inline]
    #[must_use]
    pub fn body(&self) -> NodeId {
        self.body
    }

    #[must_use]
    pub fn base_uri(&self) -> Option<&Url> {
        self.base_uri.as_ref()
    }

    pub fn set_base_uri(&mut self, base: Option<Url>) {
        self.base_uri = base;
    }

    /// Resolve `href` against the base URI.
    ///
    /// Absolute hrefs resolve without a base; relative hrefs need one.
    #[must_use]
    pub fn resolve_url(&self, href: &str) -> Option<Url> {
        let href = href.trim();
        match &self.base_uri {
            Some(base) => base.join(href).ok(),
            None => Url::parse(href).ok(),
        }
    }

    /// Number of nodes in the arena.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    // === Node accessors ===

    #[inline]
    #[must_use]
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index())
    }

    #[must_use]
    pub fn element(&self, id: NodeId) -> Option<&ElementData> {
        self.get(id).and_then(Node::as_element)
    }

    #[must_use]
    pub fn is_element(&self, id: NodeId) -> bool {
        self.element(id).is_some()
    }

    #[must_use]
    pub fn is_text(&self, id: NodeId) -> bool {
        matches!(self.get(id).map(|n| &n.data), Some(NodeData::Text(_)))
    }

    /// Tag name (lower-cased) of an element.
    #[must_use]
    pub fn tag_name(&self, id: NodeId) -> Option<&str> {
        self.element(id).map(|el| el.tag.as_str())
    }

    #[must_use]
    pub fn attr(&self, id: NodeId, name: &str) -> Option<&str> {
        self.element(id)
            .and_then(|el| el.attrs.get(name))
            .map(String::as_str)
    }

    #[must_use]
    pub fn has_attr(&self, id: NodeId, name: &str) -> bool {
        self.attr(id, name).is_some()
    }

    /// The `id` attribute.
    #[must_use]
    pub fn element_id(&self, id: NodeId) -> Option<&str> {
        self.attr(id, "id")
    }

    #[must_use]
    pub fn class_name(&self, id: NodeId) -> Option<&str> {
        self.attr(id, "class")
    }

    /// Class and id joined by a space, for keyword matching.
    #[must_use]
    pub fn class_and_id(&self, id: NodeId) -> String {
        let class = self.class_name(id).unwrap_or_default();
        let ident = self.element_id(id).unwrap_or_default();
        format!("{class} {ident}").trim().to_string()
    }

    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.parent)
    }

    #[must_use]
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.get(id).map_or(&[], |n| n.children.as_slice())
    }

    pub fn element_children(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.children(id)
            .iter()
            .copied()
            .filter(|&c| self.is_element(c))
    }

    /// Ancestors from the parent upwards.
    pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(self.parent(id), |&p| self.parent(p))
    }

    /// All descendants in document order, excluding `id` itself.
    #[must_use]
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.children(id).iter().rev().copied().collect();
        while let Some(node) = stack.pop() {
            out.push(node);
            stack.extend(self.children(node).iter().rev().copied());
        }
        out
    }

    /// Descendant elements whose tag is one of `tags`, in document order.
    #[must_use]
    pub fn elements_by_tags(&self, root: NodeId, tags: &[&str]) -> Vec<NodeId> {
        self.descendants(root)
            .into_iter()
            .filter(|&n| self.tag_name(n).is_some_and(|t| tags.contains(&t)))
            .collect()
    }

    // === Text content ===

    /// Raw concatenation of every descendant text node.
    #[must_use]
    pub fn text_content(&self, id: NodeId) -> String {
        match self.get(id).map(|n| &n.data) {
            Some(NodeData::Text(text)) => text.clone(),
            Some(NodeData::Element(_)) => self
                .descendants(id)
                .into_iter()
                .filter_map(|n| match self.get(n).map(|node| &node.data) {
                    Some(NodeData::Text(text)) => Some(text.as_str()),
                    _ => None,
                })
                .collect(),
            None => String::new(),
        }
    }

    /// Rendered text of a subtree with whitespace collapsed.
    ///
    /// Hidden and non-rendered subtrees are skipped and block boundaries
    /// act as word breaks.
    #[must_use]
    pub fn inner_text(&self, id: NodeId) -> String {
        if let Some(NodeData::Text(text)) = self.get(id).map(|n| &n.data) {
            return collapse_whitespace(text);
        }
        if self.is_hidden(id) {
            return String::new();
        }

        let mut out = String::new();
        let mut stack: Vec<NodeId> = self.children(id).iter().rev().copied().collect();
        while let Some(node) = stack.pop() {
            match self.get(node).map(|n| &n.data) {
                Some(NodeData::Text(text)) => out.push_str(text),
                Some(NodeData::Element(el)) => {
                    if self.is_hidden(node) {
                        continue;
                    }
                    if BLOCK_TAGS.contains(&el.tag.as_str()) || el.tag == "br" {
                        out.push(' ');
                    }
                    stack.extend(self.children(node).iter().rev().copied());
                }
                None => {}
            }
        }
        collapse_whitespace(&out)
    }

    /// Character count of [`Document::inner_text`].
    #[must_use]
    pub fn text_length(&self, id: NodeId) -> usize {
        self.inner_text(id).chars().count()
    }

    /// Whether an element is excluded from rendering.
    ///
    /// Checks non-rendered tags, the `hidden` attribute, `aria-hidden`,
    /// hidden inputs and inline `display:none` / `visibility:hidden`.
    #[must_use]
    pub fn is_hidden(&self, id: NodeId) -> bool {
        let Some(el) = self.element(id) else {
            return false;
        };
        if NON_RENDERED_TAGS.contains(&el.tag.as_str()) || el.attrs.contains_key("hidden") {
            return true;
        }
        if el
            .attrs
            .get("aria-hidden")
            .is_some_and(|v| v.trim().eq_ignore_ascii_case("true"))
        {
            return true;
        }
        if el.tag == "input"
            && el
                .attrs
                .get("type")
                .is_some_and(|t| t.trim().eq_ignore_ascii_case("hidden"))
        {
            return true;
        }
        el.attrs.get("style").is_some_and(|style| {
            let style: String = style
                .chars()
                .filter(|c| !c.is_whitespace())
                .collect::<String>()
                .to_ascii_lowercase();
            style.contains("display:none") || style.contains("visibility:hidden")
        })
    }
}

fn collect_attrs(node: &dom_query::NodeRef) -> HashMap<String, String> {
    node.attrs()
        .iter()
        .map(|attr| {
            let name = attr.name.local.to_string().to_ascii_lowercase();
            (name, attr.value.to_string())
        })
        .collect()
}

/// Collapse runs of whitespace into single spaces and trim.
#[must_use]
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_builds_html_and_body() {
        let doc = Document::parse(r#"<div id="main" class="container">content</div>"#);

        assert_eq!(doc.tag_name(doc.document_element()), Some("html"));
        assert_eq!(doc.tag_name(doc.body()), Some("body"));
        assert_eq!(doc.parent(doc.body()), Some(doc.document_element()));

        let divs = doc.elements_by_tags(doc.body(), &["div"]);
        assert_eq!(divs.len(), 1);
        assert_eq!(doc.element_id(divs[0]), Some("main"));
        assert_eq!(doc.class_name(divs[0]), Some("container"));
        assert_eq!(doc.class_and_id(divs[0]), "container main");
    }

    #[test]
    fn test_parse_collects_attributes() {
        let doc = Document::parse(r#"<a HREF="/x" Data-Kind="nav" class="c1 c2">go</a>"#);
        let a = doc.elements_by_tags(doc.body(), &["a"])[0];

        assert_eq!(doc.attr(a, "href"), Some("/x"));
        assert_eq!(doc.attr(a, "data-kind"), Some("nav"));
        assert_eq!(doc.class_name(a), Some("c1 c2"));
        assert!(doc.has_attr(a, "class"));
    }

    #[test]
    fn test_children_keep_document_order() {
        let doc = Document::parse("<ul><li>1</li><li>2</li><li>3</li></ul>");
        let ul = doc.elements_by_tags(doc.body(), &["ul"])[0];

        let texts: Vec<String> = doc
            .element_children(ul)
            .map(|li| doc.inner_text(li))
            .collect();
        assert_eq!(texts, vec!["1", "2", "3"]);
    }

    #[test]
    fn test_parent_links_are_indices() {
        let doc = Document::parse("<article><section><p>text</p></section></article>");
        let p = doc.elements_by_tags(doc.body(), &["p"])[0];

        let tags: Vec<&str> = doc
            .ancestors(p)
            .filter_map(|a| doc.tag_name(a))
            .collect();
        assert_eq!(tags, vec!["section", "article", "body", "html"]);
    }

    #[test]
    fn test_unknown_ids_are_none() {
        let doc = Document::parse("<p>x</p>");
        let small = Document::new();
        let far = doc.elements_by_tags(doc.body(), &["p"])[0];

        assert!(small.len() < doc.len());
        assert!(small.get(NodeId(u32::MAX)).is_none());
        assert!(small.tag_name(NodeId(u32::MAX)).is_none());
        assert!(small.children(NodeId(u32::MAX)).is_empty());
        assert!(doc.attr(far, "missing").is_none());
    }

    #[test]
    fn test_inner_text_skips_hidden_and_scripts() {
        let doc = Document::parse(
            r#"<div id="x">Hello <span style="display: none">secret</span>
            <script>var a = 1;</script><span aria-hidden="true">icon</span>
            <b>world</b><p hidden>gone</p></div>"#,
        );
        let div = doc.elements_by_tags(doc.body(), &["div"])[0];

        assert_eq!(doc.inner_text(div), "Hello world");
        assert!(doc.text_content(div).contains("secret"));
    }

    #[test]
    fn test_inner_text_breaks_at_blocks() {
        let doc = Document::parse("<div><p>one</p><p>two</p></div>");
        let div = doc.elements_by_tags(doc.body(), &["div"])[0];

        assert_eq!(doc.inner_text(div), "one two");
        assert_eq!(doc.text_length(div), 7);
    }

    #[test]
    fn test_builder_api() {
        let mut doc = Document::new();
        let body = doc.body();
        let a = doc.append_element(body, "A", [("HREF", "/x")]);
        doc.append_text(a, "link");

        assert_eq!(doc.tag_name(a), Some("a"));
        assert_eq!(doc.attr(a, "href"), Some("/x"));
        assert_eq!(doc.inner_text(body), "link");
    }

    #[test]
    fn test_from_subtree_wraps_element_in_body() {
        let source = Document::parse("<nav>menu</nav><article><h1>T</h1><p>Body</p></article>");
        let article = source.elements_by_tags(source.body(), &["article"])[0];

        let doc = Document::from_subtree(&source, article);
        let children: Vec<NodeId> = doc.element_children(doc.body()).collect();
        assert_eq!(children.len(), 1);
        assert_eq!(doc.tag_name(children[0]), Some("article"));
        assert_eq!(doc.inner_text(doc.body()), "T Body");
        assert!(doc.elements_by_tags(doc.body(), &["nav"]).is_empty());
    }

    #[test]
    fn test_resolve_url_uses_base() {
        let mut doc = Document::parse("<p>x</p>");
        assert!(doc.resolve_url("/relative").is_none());
        assert!(doc.resolve_url("https://a.example/x").is_some());

        doc.set_base_uri(Url::parse("https://site.example/a/b").ok());
        let resolved = doc.resolve_url("c").map(|u| u.to_string());
        assert_eq!(resolved.as_deref(), Some("https://site.example/a/c"));
    }

    #[test]
    fn test_collapse_whitespace() {
        assert_eq!(collapse_whitespace("  hello \n\t world  "), "hello world");
        assert_eq!(collapse_whitespace("   "), "");
    }
}
