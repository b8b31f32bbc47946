//! Page classification: ARTICLE or OTHER.
//!
//! The classifier is an ordered ladder of rules. Each rule looks at a
//! precomputed [`Signals`] snapshot and either returns a verdict or passes.
//! The first rule that returns a verdict wins.

use tracing::debug;
use url::Url;

use crate::dom::{Document, NodeId};
use crate::link_density::link_density;
use crate::patterns::{CONTENT_CLASS, LIST_ITEM_CLASS};
use crate::result::{Candidate, PageType};
use crate::url_utils;

/// Index-page thresholds.
const MAX_LIST_LIKE: usize = 10;
const MAX_ANCHORS_WITH_IMAGES: usize = 50;
const MAX_IMAGES_WITH_ANCHORS: usize = 20;
const MAX_HEADINGS: usize = 10;

/// Link density a long candidate may have on a shallow URL.
const SHALLOW_MAX_LINK_DENSITY: f64 = 0.3;
/// Link density above which a candidate is not prose.
const MAX_LINK_DENSITY: f64 = 0.5;
/// Candidates below this length are not articles.
const MIN_SEMANTIC_LENGTH: usize = 100;
/// Minimum top-candidate length for the fallback rule.
const MIN_FALLBACK_LENGTH: usize = 140;
/// Second-to-first candidate score ratio above which the pick is ambiguous.
const AMBIGUOUS_SCORE_RATIO: f64 = 0.8;
const AMBIGUOUS_ANCHOR_RATIO: f64 = 0.25;
const AMBIGUOUS_LINK_DENSITY: f64 = 0.3;
const LINK_HEAVY_ANCHORS: usize = 30;

/// Identifies the rule that produced a verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rule {
    ArticlesPath,
    ArticleIdSegment,
    ShallowPath,
    NoCandidates,
    IndexSignature,
    SemanticContainer,
    SubstantialText,
    AmbiguousTop,
    LinkHeavyShortPage,
    Fallback,
}

/// Whole-body element counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BodyStats {
    /// `h1`, `h2` and `h3` elements.
    pub headings: usize,
    pub images: usize,
    pub anchors: usize,
    /// `article` and `li` elements plus elements with card/item/entry classes.
    pub list_like: usize,
    /// Rendered text length of the body.
    pub text_length: usize,
}

impl BodyStats {
    #[must_use]
    pub fn collect(doc: &Document) -> Self {
        let mut stats = Self {
            text_length: doc.text_length(doc.body()),
            ..Self::default()
        };

        for node in doc.descendants(doc.body()) {
            let Some(tag) = doc.tag_name(node) else {
                continue;
            };
            match tag {
                "h1" | "h2" | "h3" => stats.headings += 1,
                "img" => stats.images += 1,
                "a" => stats.anchors += 1,
                _ => {}
            }
            let list_like = matches!(tag, "article" | "li")
                || doc
                    .class_name(node)
                    .is_some_and(|class| LIST_ITEM_CLASS.is_match(class));
            if list_like {
                stats.list_like += 1;
            }
        }
        stats
    }
}

/// Text measurements of one candidate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CandidateStats {
    pub score: f64,
    pub text_length: usize,
    pub link_density: f64,
}

impl CandidateStats {
    fn measure(doc: &Document, candidate: &Candidate) -> Self {
        Self {
            score: candidate.score,
            text_length: doc.text_length(candidate.element),
            link_density: link_density(doc, candidate.element),
        }
    }
}

/// Everything the rules look at.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Signals {
    /// Path segments of the page URL, `None` without a usable URL.
    pub url_segments: Option<Vec<String>>,
    /// Per-candidate measurements, in candidate order.
    pub candidates: Vec<CandidateStats>,
    /// Whether the top candidate is a semantic content container.
    pub top_is_semantic: bool,
    pub body: BodyStats,
    pub char_threshold: usize,
}

impl Signals {
    /// Measure a document and its ranked candidates.
    #[must_use]
    pub fn collect(
        doc: &Document,
        candidates: &[Candidate],
        char_threshold: usize,
        url: Option<&Url>,
    ) -> Self {
        Self {
            url_segments: url.map(|u| {
                url_utils::path_segments(u.path())
                    .into_iter()
                    .map(str::to_string)
                    .collect()
            }),
            candidates: candidates
                .iter()
                .map(|c| CandidateStats::measure(doc, c))
                .collect(),
            top_is_semantic: candidates
                .first()
                .is_some_and(|c| is_semantic_container(doc, c.element)),
            body: BodyStats::collect(doc),
            char_threshold,
        }
    }

    fn top(&self) -> Option<&CandidateStats> {
        self.candidates.first()
    }

    fn article_if_candidates(&self) -> PageType {
        if self.candidates.is_empty() {
            PageType::Other
        } else {
            PageType::Article
        }
    }

    fn article_unless_listing(&self) -> PageType {
        if self.body.list_like > MAX_LIST_LIKE {
            PageType::Other
        } else {
            PageType::Article
        }
    }
}

/// A rule either decides the verdict or passes.
pub type RuleFn = fn(&Signals) -> Option<PageType>;

/// The ladder, in priority order.
pub const RULES: &[(Rule, RuleFn)] = &[
    (Rule::ArticlesPath, articles_path),
    (Rule::ArticleIdSegment, article_id_segment),
    (Rule::ShallowPath, shallow_path),
    (Rule::NoCandidates, no_candidates),
    (Rule::IndexSignature, index_signature),
    (Rule::SemanticContainer, semantic_container),
    (Rule::SubstantialText, substantial_text),
    (Rule::AmbiguousTop, ambiguous_top),
    (Rule::LinkHeavyShortPage, link_heavy_short_page),
    (Rule::Fallback, fallback),
];

/// Classify a page from its ranked candidates.
///
/// `url` is the page URL; an unparsable URL disables the URL rules.
#[must_use]
pub fn classify(
    doc: &Document,
    candidates: &[Candidate],
    char_threshold: usize,
    url: Option<&str>,
) -> PageType {
    classify_with_rule(doc, candidates, char_threshold, url).0
}

/// Like [`classify`], also reporting which rule decided.
#[must_use]
pub fn classify_with_rule(
    doc: &Document,
    candidates: &[Candidate],
    char_threshold: usize,
    url: Option<&str>,
) -> (PageType, Rule) {
    let parsed = url.and_then(url_utils::parse_url);
    if url.is_some() && parsed.is_none() {
        debug!(?url, "unparsable page URL, skipping URL rules");
    }
    let signals = Signals::collect(doc, candidates, char_threshold, parsed.as_ref());
    classify_signals(&signals)
}

/// Run the ladder over precomputed signals.
#[must_use]
pub fn classify_signals(signals: &Signals) -> (PageType, Rule) {
    for (rule, check) in RULES {
        if let Some(verdict) = check(signals) {
            debug!(?rule, %verdict, "page classified");
            return (verdict, *rule);
        }
    }
    // The fallback rule always decides.
    (PageType::Other, Rule::Fallback)
}

/// `main`/`article`, a class/id containing "content", or an ancestor of one.
#[must_use]
pub fn is_semantic_container(doc: &Document, element: NodeId) -> bool {
    let matches = |node: NodeId| {
        matches!(doc.tag_name(node), Some("main" | "article"))
            || CONTENT_CLASS.is_match(&doc.class_and_id(node))
    };
    matches(element) || doc.descendants(element).into_iter().any(matches)
}

// === Rules ===

fn articles_path(s: &Signals) -> Option<PageType> {
    let segments = s.url_segments.as_ref()?;
    segments
        .iter()
        .any(|seg| seg == "articles")
        .then(|| s.article_if_candidates())
}

fn article_id_segment(s: &Signals) -> Option<PageType> {
    let segments = s.url_segments.as_ref()?;
    let last = segments.last()?;
    let stem = url_utils::last_segment_stem(last)?;
    url_utils::is_article_id_segment(stem).then(|| s.article_if_candidates())
}

fn shallow_path(s: &Signals) -> Option<PageType> {
    let segments = s.url_segments.as_ref()?;
    if segments.len() > 1 {
        return None;
    }
    let long_prose = s.candidates.iter().any(|c| {
        c.text_length > 2 * s.char_threshold && c.link_density < SHALLOW_MAX_LINK_DENSITY
    });
    Some(if long_prose {
        PageType::Article
    } else {
        PageType::Other
    })
}

fn no_candidates(s: &Signals) -> Option<PageType> {
    s.candidates.is_empty().then_some(PageType::Other)
}

fn index_signature(s: &Signals) -> Option<PageType> {
    let b = &s.body;
    let index_like = b.list_like > MAX_LIST_LIKE
        || (b.anchors > MAX_ANCHORS_WITH_IMAGES && b.images > MAX_IMAGES_WITH_ANCHORS)
        || b.headings > MAX_HEADINGS
        || (b.headings == 0 && !s.top_is_semantic);
    index_like.then_some(PageType::Other)
}

fn semantic_container(s: &Signals) -> Option<PageType> {
    if !s.top_is_semantic {
        return None;
    }
    let top = s.top()?;
    if 2 * top.text_length >= s.char_threshold && top.link_density <= MAX_LINK_DENSITY {
        return Some(s.article_unless_listing());
    }
    (top.text_length < MIN_SEMANTIC_LENGTH).then_some(PageType::Other)
}

fn substantial_text(s: &Signals) -> Option<PageType> {
    let top = s.top()?;
    let headings_ok = (1..=MAX_HEADINGS).contains(&s.body.headings);
    (top.text_length >= s.char_threshold && top.link_density <= MAX_LINK_DENSITY && headings_ok)
        .then_some(PageType::Article)
}

fn ambiguous_top(s: &Signals) -> Option<PageType> {
    let [first, second, ..] = s.candidates.as_slice() else {
        return None;
    };
    if first.score <= 0.0 || second.score / first.score <= AMBIGUOUS_SCORE_RATIO {
        return None;
    }
    let anchor_ratio = if s.body.text_length == 0 {
        0.0
    } else {
        s.body.anchors as f64 / s.body.text_length as f64
    };
    (anchor_ratio > AMBIGUOUS_ANCHOR_RATIO || first.link_density > AMBIGUOUS_LINK_DENSITY)
        .then_some(PageType::Other)
}

fn link_heavy_short_page(s: &Signals) -> Option<PageType> {
    (s.body.anchors > LINK_HEAVY_ANCHORS
        && (s.body.text_length as f64) < 1.5 * s.char_threshold as f64)
        .then_some(PageType::Other)
}

fn fallback(s: &Signals) -> Option<PageType> {
    let top = s.top()?;
    Some(
        if top.text_length >= MIN_FALLBACK_LENGTH && top.link_density <= MAX_LINK_DENSITY {
            s.article_unless_listing()
        } else {
            PageType::Other
        },
    )
}
