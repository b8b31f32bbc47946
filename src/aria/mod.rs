//! Accessibility tree.
//!
//! [`builder`] turns an element subtree into a raw tree of [`AriaNode`]s,
//! one node per visible, meaningful element. [`compress`] rewrites that tree
//! into a compact form with wrappers removed and repeated items grouped.

pub mod builder;
pub mod compress;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::dom::{Document, NodeId};

pub use builder::build_aria_tree;
pub use compress::compress;

/// Type of an accessibility node.
///
/// Mirrors the ARIA roles this crate understands plus the synthetic
/// `Text` and `Generic` types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AriaType {
    // Landmarks and sectioning
    Main,
    Article,
    Section,
    Navigation,
    Banner,
    ContentInfo,
    Complementary,
    Region,
    Form,
    Search,

    // Widgets
    Button,
    Checkbox,
    Radio,
    Switch,
    Combobox,
    ListBox,
    Option,
    Link,
    TextBox,
    SearchBox,
    Slider,
    SpinButton,
    ProgressBar,
    Menu,
    MenuItem,
    Tab,
    TabList,
    TabPanel,
    Dialog,

    // Document structure
    Heading,
    Paragraph,
    Img,
    Figure,
    Caption,
    List,
    ListItem,
    Table,
    Row,
    Cell,
    ColumnHeader,
    RowHeader,
    Blockquote,
    Code,
    Term,
    Definition,
    Group,
    Separator,

    // Synthetic
    Text,
    Generic,
}

impl AriaType {
    /// Parse a role string. `none`, `presentation` and unknown roles are
    /// generic.
    #[must_use]
    pub fn from_role(role: &str) -> Self {
        match role.trim().to_ascii_lowercase().as_str() {
            "main" => Self::Main,
            "article" => Self::Article,
            "section" => Self::Section,
            "navigation" => Self::Navigation,
            "banner" => Self::Banner,
            "contentinfo" => Self::ContentInfo,
            "complementary" => Self::Complementary,
            "region" => Self::Region,
            "form" => Self::Form,
            "search" => Self::Search,
            "button" => Self::Button,
            "checkbox" => Self::Checkbox,
            "radio" => Self::Radio,
            "switch" => Self::Switch,
            "combobox" => Self::Combobox,
            "listbox" => Self::ListBox,
            "option" => Self::Option,
            "link" => Self::Link,
            "textbox" => Self::TextBox,
            "searchbox" => Self::SearchBox,
            "slider" => Self::Slider,
            "spinbutton" => Self::SpinButton,
            "progressbar" => Self::ProgressBar,
            "menu" | "menubar" => Self::Menu,
            "menuitem" | "menuitemcheckbox" | "menuitemradio" => Self::MenuItem,
            "tab" => Self::Tab,
            "tablist" => Self::TabList,
            "tabpanel" => Self::TabPanel,
            "dialog" | "alertdialog" => Self::Dialog,
            "heading" => Self::Heading,
            "paragraph" => Self::Paragraph,
            "img" | "image" => Self::Img,
            "figure" => Self::Figure,
            "caption" => Self::Caption,
            "list" => Self::List,
            "listitem" => Self::ListItem,
            "table" | "grid" => Self::Table,
            "row" => Self::Row,
            "cell" | "gridcell" => Self::Cell,
            "columnheader" => Self::ColumnHeader,
            "rowheader" => Self::RowHeader,
            "blockquote" => Self::Blockquote,
            "code" => Self::Code,
            "term" => Self::Term,
            "definition" => Self::Definition,
            "group" => Self::Group,
            "separator" => Self::Separator,
            "text" => Self::Text,
            _ => Self::Generic,
        }
    }

    /// Lower-case name, as used for synthetic roles and in outlines.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Main => "main",
            Self::Article => "article",
            Self::Section => "section",
            Self::Navigation => "navigation",
            Self::Banner => "banner",
            Self::ContentInfo => "contentinfo",
            Self::Complementary => "complementary",
            Self::Region => "region",
            Self::Form => "form",
            Self::Search => "search",
            Self::Button => "button",
            Self::Checkbox => "checkbox",
            Self::Radio => "radio",
            Self::Switch => "switch",
            Self::Combobox => "combobox",
            Self::ListBox => "listbox",
            Self::Option => "option",
            Self::Link => "link",
            Self::TextBox => "textbox",
            Self::SearchBox => "searchbox",
            Self::Slider => "slider",
            Self::SpinButton => "spinbutton",
            Self::ProgressBar => "progressbar",
            Self::Menu => "menu",
            Self::MenuItem => "menuitem",
            Self::Tab => "tab",
            Self::TabList => "tablist",
            Self::TabPanel => "tabpanel",
            Self::Dialog => "dialog",
            Self::Heading => "heading",
            Self::Paragraph => "paragraph",
            Self::Img => "img",
            Self::Figure => "figure",
            Self::Caption => "caption",
            Self::List => "list",
            Self::ListItem => "listitem",
            Self::Table => "table",
            Self::Row => "row",
            Self::Cell => "cell",
            Self::ColumnHeader => "columnheader",
            Self::RowHeader => "rowheader",
            Self::Blockquote => "blockquote",
            Self::Code => "code",
            Self::Term => "term",
            Self::Definition => "definition",
            Self::Group => "group",
            Self::Separator => "separator",
            Self::Text => "text",
            Self::Generic => "generic",
        }
    }

    /// Main, article, section, navigation, banner or contentinfo.
    #[must_use]
    pub fn is_structural(self) -> bool {
        matches!(
            self,
            Self::Main
                | Self::Article
                | Self::Section
                | Self::Navigation
                | Self::Banner
                | Self::ContentInfo
        )
    }

    /// Structural types plus region, form and search.
    #[must_use]
    pub fn is_significant(self) -> bool {
        self.is_structural() || matches!(self, Self::Region | Self::Form | Self::Search)
    }
}

impl fmt::Display for AriaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Numeric value of a range widget.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AriaValue {
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub now: Option<f64>,
    pub text: Option<String>,
}

impl AriaValue {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.min.is_none() && self.max.is_none() && self.now.is_none() && self.text.is_none()
    }
}

/// A node of the accessibility tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AriaNode {
    pub node_type: AriaType,
    /// Accessible name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Explicit role string: the `role` attribute, or the type name for
    /// nodes the compressor creates.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub checked: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selected: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expanded: Option<bool>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub disabled: bool,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub required: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<AriaValue>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<AriaNode>,
    /// Originating element. Non-owning; `None` for synthetic nodes.
    #[serde(skip)]
    pub source: Option<NodeId>,
}

impl AriaNode {
    /// A bare node of the given type.
    #[must_use]
    pub fn new(node_type: AriaType) -> Self {
        Self {
            node_type,
            name: None,
            role: None,
            level: None,
            checked: None,
            selected: None,
            expanded: None,
            disabled: false,
            required: false,
            value: None,
            children: Vec::new(),
            source: None,
        }
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn with_children(mut self, children: Vec<AriaNode>) -> Self {
        self.children = children;
        self
    }

    /// Whether the node has a non-blank name.
    #[must_use]
    pub fn has_name(&self) -> bool {
        self.name.as_deref().is_some_and(|n| !n.trim().is_empty())
    }

    /// Generic, nameless and childless: carries nothing.
    #[must_use]
    pub fn is_empty_generic(&self) -> bool {
        self.node_type == AriaType::Generic && !self.has_name() && self.children.is_empty()
    }

    /// Created by the compressor rather than built from an element.
    #[must_use]
    pub fn is_synthetic(&self) -> bool {
        self.source.is_none() && self.role.as_deref() == Some(self.node_type.as_str())
    }

    /// Read an attribute of the originating element.
    ///
    /// Returns `None` when the node has no source or `doc` no longer holds
    /// that element.
    #[must_use]
    pub fn source_attr<'d>(&self, doc: &'d Document, name: &str) -> Option<&'d str> {
        self.source.and_then(|id| doc.attr(id, name))
    }

    /// Total number of nodes in this subtree.
    #[must_use]
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(AriaNode::node_count).sum::<usize>()
    }

    /// Leaf nodes in depth-first order.
    #[must_use]
    pub fn leaves(&self) -> Vec<&AriaNode> {
        let mut out = Vec::new();
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            if node.children.is_empty() {
                out.push(node);
            } else {
                stack.extend(node.children.iter().rev());
            }
        }
        out
    }

    fn write_outline(&self, f: &mut fmt::Formatter<'_>, depth: usize) -> fmt::Result {
        write!(f, "{:indent$}- {}", "", self.node_type, indent = depth * 2)?;
        if let Some(name) = &self.name {
            write!(f, " {name:?}")?;
        }

        let mut attrs = Vec::new();
        if let Some(level) = self.level {
            attrs.push(format!("level={level}"));
        }
        for (key, flag) in [
            ("checked", self.checked),
            ("selected", self.selected),
            ("expanded", self.expanded),
        ] {
            if let Some(v) = flag {
                attrs.push(format!("{key}={v}"));
            }
        }
        if self.disabled {
            attrs.push("disabled".to_string());
        }
        if self.required {
            attrs.push("required".to_string());
        }
        if let Some(value) = &self.value {
            if let Some(now) = value.now {
                attrs.push(format!("value={now}"));
            }
            if let Some(text) = &value.text {
                attrs.push(format!("valuetext={text:?}"));
            }
        }
        if !attrs.is_empty() {
            write!(f, " [{}]", attrs.join(", "))?;
        }
        writeln!(f)?;

        for child in &self.children {
            child.write_outline(f, depth + 1)?;
        }
        Ok(())
    }
}

/// Indented outline, one node per line.
impl fmt::Display for AriaNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_outline(f, 0)
    }
}

/// Join two optional names with a space. A name already contained in the
/// other is not repeated.
pub(crate) fn merge_names(first: Option<String>, second: Option<String>) -> Option<String> {
    let first = first.filter(|n| !n.trim().is_empty());
    let second = second.filter(|n| !n.trim().is_empty());
    match (first, second) {
        (Some(a), Some(b)) if a.contains(b.as_str()) => Some(a),
        (Some(a), Some(b)) if b.contains(a.as_str()) => Some(b),
        (Some(a), Some(b)) => Some(format!("{a} {b}")),
        (a, b) => a.or(b),
    }
}
