//! Compiled regex patterns for content scoring and page classification.
//!
//! All patterns are compiled once at first use via `LazyLock`.

#![allow(clippy::expect_used)]

use std::sync::LazyLock;

use regex::Regex;

// =============================================================================
// Class/id weighting
// =============================================================================

/// Class/id names suggestive of the main article body.
pub static POSITIVE_CLASS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)article|body|content|entry|hentry|h-entry|main|page|pagination|post|text|blog|story")
        .expect("POSITIVE_CLASS regex")
});

/// Class/id names of sidebars, comments, footers, ads and other boilerplate.
pub static NEGATIVE_CLASS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)-ad-|\bads?\b|hidden|^hid$| hid$| hid |^hid |banner|combx|comment|com-|contact|footer|gdpr|masthead|media|meta|outbrain|promo|related|scroll|share|shoutbox|sidebar|skyscraper|sponsor|shopping|tags|widget",
    )
    .expect("NEGATIVE_CLASS regex")
});

// =============================================================================
// Classification signals
// =============================================================================

/// Class names of repeated teaser blocks on listing pages.
pub static LIST_ITEM_CLASS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)card|item|entry").expect("LIST_ITEM_CLASS regex")
});

/// Class/id names marking a content container.
pub static CONTENT_CLASS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)content").expect("CONTENT_CLASS regex")
});

/// A trailing URL segment that looks like an article id: at least five
/// word characters or dashes.
pub static ARTICLE_ID_SEGMENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9_-]{5,}$").expect("ARTICLE_ID_SEGMENT regex")
});

// =============================================================================
// Text statistics
// =============================================================================

/// ASCII comma plus the common full-width, Arabic and small-form variants.
pub static COMMAS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new("[\u{002C}\u{060C}\u{FE50}\u{FE10}\u{FE11}\u{2E41}\u{2E34}\u{2E32}\u{FF0C}]")
        .expect("COMMAS regex")
});
