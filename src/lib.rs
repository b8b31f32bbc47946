//! # rs-page-reader
//!
//! Finds the main content of a web page and describes the page for
//! downstream consumers such as crawlers and markdown converters.
//!
//! Reading a page:
//! - scores elements that may hold the main content,
//! - classifies the page as an article or something else,
//! - builds a compact accessibility tree of the content (or the whole body),
//! - collects links and buckets them by their position relative to the page.
//!
//! ## Quick Start
//!
//! ```rust
//! use rs_page_reader::{read_with_options, ReadOptions};
//!
//! let html = r#"<html><head><title>Notes</title></head>
//! <body><nav><a href="/">Home</a></nav><article><p>Main content here.</p></article></body></html>"#;
//!
//! let options = ReadOptions {
//!     url: Some("https://example.com/notes/1".to_string()),
//!     ..ReadOptions::default()
//! };
//! let result = read_with_options(html, &options)?;
//! println!("{} {:?}", result.page_type, result.metadata.title);
//! println!("{}", result.aria_tree);
//! # Ok::<(), rs_page_reader::Error>(())
//! ```
//!
//! Every stage is also callable on its own: [`score_candidates`],
//! [`classify`], [`build_aria_tree`], [`compress`], [`extract_links`],
//! [`analyze_link_hierarchy`] and [`scan_metadata`].

mod error;
mod options;
mod reader;
mod result;

/// Arena document model built from `dom_query` parse output.
pub mod dom;

/// Compiled regex patterns for class/id and URL matching.
pub mod patterns;

/// Link and text density of element subtrees.
pub mod link_density;

/// Main-content candidate scoring.
pub mod scoring;

/// ARTICLE/OTHER page classification.
pub mod classifier;

/// Accessibility tree building, compression and outlines.
pub mod aria;

/// Anchor extraction.
pub mod links;

/// Link buckets relative to the page URL.
pub mod hierarchy;

/// Title, language, site name and URL of a page.
pub mod metadata;

/// URL utilities for parsing, resolution and path comparison.
pub mod url_utils;

/// Character encoding detection and transcoding.
pub mod encoding;

// Public API - re-exports
pub use aria::{build_aria_tree, compress, AriaNode, AriaType, AriaValue};
pub use classifier::classify;
pub use dom::{Document, NodeId};
pub use error::{Error, Result};
pub use hierarchy::analyze_link_hierarchy;
pub use links::extract_links;
pub use metadata::scan_metadata;
pub use options::ReadOptions;
pub use reader::{read, read_bytes, read_bytes_with_options, read_document, read_with_options};
pub use result::{Candidate, LinkHierarchy, LinkRecord, PageMetadata, PageType, ReadResult};
pub use scoring::{score_candidates, ContentScores};
