//! Configuration options for reading a page.
//!
//! The `ReadOptions` struct controls how many content candidates are kept,
//! how strict the article classifier is, and which URL the page lives at.

use crate::error::{Error, Result};
use crate::result::PageType;

/// Configuration options for [`crate::read_with_options`].
///
/// All fields are public for easy configuration. Use `Default::default()`
/// for standard settings.
///
/// # Example
///
/// ```rust
/// use rs_page_reader::ReadOptions;
///
/// let options = ReadOptions {
///     char_threshold: 800,
///     url: Some("https://example.com/blog/post-1".to_string()),
///     ..ReadOptions::default()
/// };
/// assert!(options.validate().is_ok());
/// ```
#[derive(Debug, Clone)]
pub struct ReadOptions {
    /// Maximum number of content candidates returned by the scorer.
    ///
    /// Default: `5`
    pub max_candidates: usize,

    /// Character count an article body is expected to reach.
    ///
    /// The classifier compares candidate text lengths against fractions and
    /// multiples of this value. Higher values make ARTICLE verdicts rarer.
    ///
    /// Default: `500`
    pub char_threshold: usize,

    /// Skip the classifier and use this page type.
    ///
    /// A forced `Article` still selects no root on a page where nothing
    /// earned a score.
    ///
    /// Default: `None`
    pub page_type: Option<PageType>,

    /// URL the document was fetched from.
    ///
    /// Used by the URL-shape classifier rules, as the base for relative
    /// links and as the reference point of the link hierarchy.
    ///
    /// Default: `None`
    pub url: Option<String>,

    /// Run the compressor over the built accessibility tree.
    ///
    /// When false, `ReadResult.aria_tree` holds the raw builder output.
    ///
    /// Default: `true`
    pub compress_aria: bool,
}

impl Default for ReadOptions {
    fn default() -> Self {
        Self {
            max_candidates: 5,
            char_threshold: 500,
            page_type: None,
            url: None,
            compress_aria: true,
        }
    }
}

impl ReadOptions {
    /// Check that the options describe a usable configuration.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidOption`] for zero limits, [`Error::InvalidUrl`] when
    /// `url` is not an absolute URL.
    pub fn validate(&self) -> Result<()> {
        if self.max_candidates == 0 {
            return Err(Error::InvalidOption(
                "max_candidates must be at least 1".to_string(),
            ));
        }
        if self.char_threshold == 0 {
            return Err(Error::InvalidOption(
                "char_threshold must be at least 1".to_string(),
            ));
        }
        if let Some(ref url) = self.url {
            url::Url::parse(url).map_err(|source| Error::InvalidUrl {
                url: url.clone(),
                source,
            })?;
        }
        Ok(())
    }
}
