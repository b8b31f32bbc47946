//! Content candidate scoring.
//!
//! Text-bearing elements hand points to up to three ancestors. Ancestors
//! are biased by tag and by class/id keywords, damped by link density, and
//! finally promoted to a higher-scoring parent when one exists. The
//! highest-scoring elements are the main-content candidates.
//!
//! Scores are kept in a [`ContentScores`] side table created per call, so
//! the document itself is never mutated.

use std::collections::{HashMap, HashSet};

use tracing::{debug, trace};

use crate::dom::{Document, NodeId};
use crate::link_density::{link_density, text_density};
use crate::patterns::{COMMAS, NEGATIVE_CLASS, POSITIVE_CLASS};
use crate::result::Candidate;

/// Default number of candidates kept.
pub const DEFAULT_MAX_CANDIDATES: usize = 5;

/// Elements whose text is scored.
pub const TEXT_BEARING_TAGS: &[&str] = &[
    "p", "td", "pre", "blockquote", "section", "h2", "h3", "h4", "h5", "h6",
];

/// Texts shorter than this carry no signal.
const MIN_TEXT_LENGTH: usize = 25;

/// How many ancestor levels receive points from one text element.
const ANCESTOR_LEVELS: usize = 3;

/// Class/id keyword weight.
const CLASS_WEIGHT: f64 = 25.0;

/// Largest boost text density can add to a score.
const TEXT_DENSITY_BOOST: f64 = 0.1;

/// Per-call score side table.
///
/// Insertion order is tracked so candidate collection is deterministic.
#[derive(Debug, Clone, Default)]
pub struct ContentScores {
    scores: HashMap<NodeId, f64>,
    order: Vec<NodeId>,
    body_fallback: bool,
}

impl ContentScores {
    /// No element earned a score and the body stands in as the only
    /// candidate. Such a candidate carries no content signal.
    #[must_use]
    pub fn is_body_fallback(&self) -> bool {
        self.body_fallback
    }

    #[must_use]
    pub fn get(&self, id: NodeId) -> Option<f64> {
        self.scores.get(&id).copied()
    }

    #[must_use]
    pub fn contains(&self, id: NodeId) -> bool {
        self.scores.contains_key(&id)
    }

    /// Scored elements in the order they were first scored.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, f64)> + '_ {
        self.order
            .iter()
            .filter_map(|id| self.scores.get(id).map(|&s| (*id, s)))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    fn init(&mut self, id: NodeId, score: f64) {
        if self.scores.insert(id, score).is_none() {
            self.order.push(id);
        }
    }

    fn add(&mut self, id: NodeId, delta: f64) {
        if let Some(score) = self.scores.get_mut(&id) {
            *score += delta;
        }
    }

    fn set(&mut self, id: NodeId, score: f64) {
        if let Some(slot) = self.scores.get_mut(&id) {
            *slot = score;
        }
    }
}

/// Rank main-content candidates of `doc`, highest score first.
///
/// # Example
///
/// ```rust
/// use rs_page_reader::{score_candidates, Document};
///
/// let doc = Document::parse("<nav>menu</nav><article><p>Story text</p></article>");
/// let candidates = score_candidates(&doc, 5);
/// assert_eq!(candidates.len(), 1);
/// assert_eq!(doc.tag_name(candidates[0].element), Some("article"));
/// ```
#[must_use]
pub fn score_candidates(doc: &Document, max_candidates: usize) -> Vec<Candidate> {
    score_candidates_with_table(doc, max_candidates).0
}

/// Like [`score_candidates`], also returning the raw score table.
///
/// The table is empty when the single-semantic-tag shortcut applies, and
/// reports [`ContentScores::is_body_fallback`] when nothing was scored.
#[must_use]
pub fn score_candidates_with_table(
    doc: &Document,
    max_candidates: usize,
) -> (Vec<Candidate>, ContentScores) {
    if let Some(element) = single_semantic_element(doc) {
        debug!(tag = ?doc.tag_name(element), "single semantic element, skipping scoring");
        return (vec![Candidate { element, score: 0.0 }], ContentScores::default());
    }

    let mut scores = ContentScores::default();
    distribute_text_scores(doc, &mut scores);
    apply_density_adjustments(doc, &mut scores);

    let mut candidates = promote_to_best_ancestors(doc, &scores);
    candidates.sort_by(|a, b| b.score.total_cmp(&a.score));
    candidates.truncate(max_candidates);

    if candidates.is_empty() {
        debug!("no scored candidates, falling back to body");
        scores.body_fallback = true;
        candidates.push(Candidate {
            element: doc.body(),
            score: 0.0,
        });
    }

    debug!(
        scored = scores.len(),
        candidates = candidates.len(),
        top = ?candidates.first().map(|c| c.score),
        "scored content candidates"
    );
    (candidates, scores)
}

/// The sole `<article>`, or failing that the sole `<main>`, of the body.
fn single_semantic_element(doc: &Document) -> Option<NodeId> {
    for tag in ["article", "main"] {
        let found = doc.elements_by_tags(doc.body(), &[tag]);
        if let [only] = found.as_slice() {
            return Some(*only);
        }
    }
    None
}

/// Points a text contributes: one, plus its comma clauses, plus a bonus of
/// one per hundred characters (at most three).
#[must_use]
pub fn base_increment(text: &str) -> f64 {
    let length = text.chars().count();
    let clauses = COMMAS.split(text).count();
    1.0 + clauses as f64 + (length / 100).min(3) as f64
}

/// Initial score bias for a tag.
#[must_use]
pub fn tag_bias(tag: &str) -> f64 {
    match tag {
        "div" => 5.0,
        "pre" | "td" | "blockquote" => 3.0,
        "address" | "ol" | "ul" | "dl" | "dd" | "dt" | "li" | "form" => -3.0,
        "h1" | "h2" | "h3" | "h4" | "h5" | "h6" | "th" => -5.0,
        _ => 0.0,
    }
}

/// Keyword weight of an element's class and id.
#[must_use]
pub fn class_weight(doc: &Document, element: NodeId) -> f64 {
    let names = doc.class_and_id(element);
    if names.is_empty() {
        return 0.0;
    }

    let mut weight = 0.0;
    if POSITIVE_CLASS.is_match(&names) {
        weight += CLASS_WEIGHT;
    }
    if NEGATIVE_CLASS.is_match(&names) {
        weight -= CLASS_WEIGHT;
    }
    weight
}

fn initial_score(doc: &Document, element: NodeId) -> f64 {
    tag_bias(doc.tag_name(element).unwrap_or_default()) + class_weight(doc, element)
}

fn level_divider(level: usize) -> f64 {
    match level {
        0 => 1.0,
        1 => 2.0,
        _ => (level * 3) as f64,
    }
}

fn distribute_text_scores(doc: &Document, scores: &mut ContentScores) {
    for element in doc.elements_by_tags(doc.body(), TEXT_BEARING_TAGS) {
        let text = doc.inner_text(element);
        if text.chars().count() < MIN_TEXT_LENGTH {
            continue;
        }

        let increment = base_increment(&text);
        // The document element is never a candidate.
        let ancestors = doc
            .ancestors(element)
            .filter(|&a| doc.parent(a).is_some())
            .take(ANCESTOR_LEVELS);

        for (level, ancestor) in ancestors.enumerate() {
            if !scores.contains(ancestor) {
                scores.init(ancestor, initial_score(doc, ancestor));
            }
            scores.add(ancestor, increment / level_divider(level));
        }
    }
}

fn apply_density_adjustments(doc: &Document, scores: &mut ContentScores) {
    let scored: Vec<(NodeId, f64)> = scores.iter().collect();
    for (element, score) in scored {
        let adjusted = score
            * (1.0 - link_density(doc, element))
            * (1.0 + TEXT_DENSITY_BOOST * text_density(doc, element));
        trace!(?element, score, adjusted, "density adjustment");
        scores.set(element, adjusted);
    }
}

/// Replace each scored element by its best-scoring ancestor chain head.
fn promote_to_best_ancestors(doc: &Document, scores: &ContentScores) -> Vec<Candidate> {
    let body = doc.body();
    let mut seen = HashSet::new();
    let mut candidates = Vec::new();

    for (element, score) in scores.iter() {
        let mut current = element;
        let mut current_score = score;
        while let Some(parent) = doc.parent(current) {
            if parent == body {
                break;
            }
            match scores.get(parent) {
                Some(parent_score) if parent_score > current_score => {
                    current = parent;
                    current_score = parent_score;
                }
                _ => break,
            }
        }

        if seen.insert(current) {
            candidates.push(Candidate {
                element: current,
                score: current_score,
            });
        }
    }

    candidates
}
