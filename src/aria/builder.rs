//! Builds the raw accessibility tree of an element subtree.

use crate::dom::{collapse_whitespace, Document, NodeId, BLOCK_TAGS};

use super::{AriaNode, AriaType, AriaValue};

/// Tags whose accessible name comes from their visible text.
const NAME_FROM_CONTENT_TAGS: &[&str] = &[
    "a", "button", "h1", "h2", "h3", "h4", "h5", "h6", "label", "li", "summary", "option",
];

/// Content-derived names are cut to this many characters.
const MAX_CONTENT_NAME_CHARS: usize = 50;

/// `p` and `div` take their text as name only below this length.
const MAX_BLOCK_NAME_CHARS: usize = 100;

/// Elements nested deeper than this below the tree root are folded into
/// a single text leaf, so every walk over the tree stays shallow.
pub const MAX_TREE_DEPTH: usize = 128;

/// Build the accessibility tree rooted at `element`.
///
/// Non-element ids yield an empty generic node. The tree is at most
/// [`MAX_TREE_DEPTH`] levels deep below `element`.
///
/// # Example
///
/// ```
/// use rs_page_reader::{build_aria_tree, AriaType, Document};
///
/// let doc = Document::parse(r#"<nav><a href="/">Home</a></nav>"#);
/// let tree = build_aria_tree(&doc, doc.body());
/// assert_eq!(tree.children[0].node_type, AriaType::Navigation);
/// assert_eq!(tree.children[0].children[0].name.as_deref(), Some("Home"));
/// ```
#[must_use]
pub fn build_aria_tree(doc: &Document, element: NodeId) -> AriaNode {
    if !doc.is_element(element) {
        return AriaNode::new(AriaType::Generic);
    }
    build_node(doc, element, 0)
}

fn build_node(doc: &Document, id: NodeId, depth: usize) -> AriaNode {
    let tag = doc.tag_name(id).unwrap_or_default();

    let role = explicit_role(doc, id);
    let node_type = match role {
        Some(r) => AriaType::from_role(r),
        None => AriaType::from_role(implicit_role(doc, id, tag)),
    };

    let mut node = AriaNode::new(node_type);
    node.role = role.map(str::to_string);
    node.name = accessible_name(doc, id, tag, node_type);
    node.source = Some(id);
    copy_states(doc, id, tag, &mut node);

    if node.node_type == AriaType::Generic && has_only_text_children(doc, id) {
        node.node_type = AriaType::Text;
        if node.name.is_none() {
            node.name = Some(collapse_whitespace(&doc.text_content(id)));
        }
    }

    if depth >= MAX_TREE_DEPTH {
        if node.node_type != AriaType::Text {
            let text = doc.inner_text(id);
            if !text.is_empty() {
                let mut leaf = AriaNode::new(AriaType::Text).with_name(text);
                leaf.source = Some(id);
                node.children = vec![leaf];
            }
        }
        return node;
    }

    node.children = doc
        .element_children(id)
        .filter(|&child| !doc.is_hidden(child))
        .map(|child| build_node(doc, child, depth + 1))
        .filter(|child| {
            child.has_name() || child.node_type != AriaType::Generic || !child.children.is_empty()
        })
        .collect();

    node
}

fn explicit_role(doc: &Document, id: NodeId) -> Option<&str> {
    doc.attr(id, "role")
        .and_then(|r| r.split_whitespace().next())
}

/// Implicit role of an element by tag.
fn implicit_role(doc: &Document, id: NodeId, tag: &str) -> &'static str {
    match tag {
        "a" | "area" if doc.has_attr(id, "href") => "link",
        "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => "heading",
        "nav" => "navigation",
        "main" => "main",
        "article" => "article",
        "section" => "section",
        "header" => "banner",
        "footer" => "contentinfo",
        "aside" => "complementary",
        "form" => "form",
        "search" => "search",
        "ul" | "ol" | "menu" => "list",
        "li" => "listitem",
        "img" => "img",
        "table" => "table",
        "tr" => "row",
        "td" => "cell",
        "th" => "columnheader",
        "button" | "summary" => "button",
        "select" => "combobox",
        "datalist" => "listbox",
        "option" => "option",
        "textarea" => "textbox",
        "input" => input_role(doc.attr(id, "type")),
        "hr" => "separator",
        "progress" => "progressbar",
        "meter" => "slider",
        "dialog" => "dialog",
        "figure" => "figure",
        "figcaption" | "caption" => "caption",
        "blockquote" => "blockquote",
        "code" | "pre" => "code",
        "dl" => "list",
        "dt" => "term",
        "dd" => "definition",
        "fieldset" | "details" | "optgroup" => "group",
        _ => "generic",
    }
}

fn input_role(input_type: Option<&str>) -> &'static str {
    let input_type = input_type.map(|t| t.trim().to_ascii_lowercase());
    match input_type.as_deref() {
        Some("checkbox") => "checkbox",
        Some("radio") => "radio",
        Some("button" | "submit" | "reset" | "image") => "button",
        Some("range") => "slider",
        Some("number") => "spinbutton",
        Some("search") => "searchbox",
        _ => "textbox",
    }
}

fn accessible_name(doc: &Document, id: NodeId, tag: &str, node_type: AriaType) -> Option<String> {
    let attr_name = |name: &str| {
        doc.attr(id, name)
            .map(collapse_whitespace)
            .filter(|v| !v.is_empty())
    };

    if let Some(label) = attr_name("aria-label") {
        return Some(label);
    }
    if tag == "img" || node_type == AriaType::Img {
        if let Some(alt) = attr_name("alt") {
            return Some(alt);
        }
    }
    if let Some(title) = attr_name("title") {
        return Some(title);
    }

    if NAME_FROM_CONTENT_TAGS.contains(&tag) {
        let text = doc.inner_text(id);
        return (!text.is_empty()).then(|| truncate_name(&text));
    }

    if matches!(tag, "p" | "div") && !has_block_children(doc, id) {
        let text = doc.inner_text(id);
        if !text.is_empty() && text.chars().count() < MAX_BLOCK_NAME_CHARS {
            return Some(text);
        }
    }

    None
}

fn truncate_name(text: &str) -> String {
    if text.chars().count() <= MAX_CONTENT_NAME_CHARS {
        return text.to_string();
    }
    let mut name: String = text.chars().take(MAX_CONTENT_NAME_CHARS).collect();
    name.push_str("...");
    name
}

fn has_block_children(doc: &Document, id: NodeId) -> bool {
    doc.element_children(id)
        .any(|c| doc.tag_name(c).is_some_and(|t| BLOCK_TAGS.contains(&t)))
}

/// Every child is a text node and together they hold visible text.
fn has_only_text_children(doc: &Document, id: NodeId) -> bool {
    let children = doc.children(id);
    !children.is_empty()
        && children.iter().all(|&c| doc.is_text(c))
        && !doc.text_content(id).trim().is_empty()
}

fn copy_states(doc: &Document, id: NodeId, tag: &str, node: &mut AriaNode) {
    node.level = heading_level(tag).or_else(|| {
        doc.attr(id, "aria-level")
            .and_then(|v| v.trim().parse::<u8>().ok())
    });

    node.checked = aria_bool(doc, id, "aria-checked")
        .or_else(|| doc.has_attr(id, "checked").then_some(true));
    node.selected = aria_bool(doc, id, "aria-selected")
        .or_else(|| doc.has_attr(id, "selected").then_some(true));
    node.expanded = aria_bool(doc, id, "aria-expanded");
    node.disabled = doc.has_attr(id, "disabled") || aria_bool(doc, id, "aria-disabled") == Some(true);
    node.required = doc.has_attr(id, "required") || aria_bool(doc, id, "aria-required") == Some(true);

    let range_like = matches!(
        node.node_type,
        AriaType::Slider | AriaType::SpinButton | AriaType::ProgressBar
    );
    let number = |aria: &str, html: &str| {
        doc.attr(id, aria)
            .or_else(|| if range_like { doc.attr(id, html) } else { None })
            .and_then(|v| v.trim().parse::<f64>().ok())
    };
    let value = AriaValue {
        min: number("aria-valuemin", "min"),
        max: number("aria-valuemax", "max"),
        now: number("aria-valuenow", "value"),
        text: doc
            .attr(id, "aria-valuetext")
            .map(collapse_whitespace)
            .filter(|t| !t.is_empty()),
    };
    node.value = (!value.is_empty()).then_some(value);
}

fn heading_level(tag: &str) -> Option<u8> {
    match tag.as_bytes() {
        [b'h', digit @ b'1'..=b'6'] => Some(digit - b'0'),
        _ => None,
    }
}

/// `true`/`false` ARIA state. `mixed` and other tokens are ignored.
fn aria_bool(doc: &Document, id: NodeId, name: &str) -> Option<bool> {
    match doc.attr(id, name)?.trim().to_ascii_lowercase().as_str() {
        "true" => Some(true),
        "false" => Some(false),
        _ => None,
    }
}
