//! Fuzzy text locator
//!
//! Scores candidate paragraphs against a query: exact substring containment
//! lands in the 0.9 region, case-insensitive containment in the 0.8 region
//! (both nudged by token overlap), anything else falls back to a scaled
//! token-overlap ratio that stays below the containment bands. Ties within
//! epsilon of the best score are ambiguous and must be disambiguated by
//! the caller.

use crate::error::{EditError, Result};
use doc_model::{Block, Document, ElementId};
use serde::Serialize;
use std::cmp::Ordering;

/// Which paragraphs a search considers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchScope {
    /// Top-level body paragraphs plus header/footer paragraphs
    Paragraphs,
    /// Paragraphs inside table cells
    Cells,
    /// Top-level paragraphs carrying a heading style
    Headings,
}

/// One scored search result
#[derive(Debug, Clone, Serialize)]
pub struct Match {
    pub id: ElementId,
    pub score: f64,
    pub text: String,
}

const DEFAULT_THRESHOLD: f64 = 0.4;
const AMBIGUITY_EPSILON: f64 = 0.05;

/// Borrowing search engine over one document
pub struct Locator<'a> {
    doc: &'a Document,
    threshold: f64,
    epsilon: f64,
}

impl<'a> Locator<'a> {
    pub fn new(doc: &'a Document) -> Self {
        Self {
            doc,
            threshold: DEFAULT_THRESHOLD,
            epsilon: AMBIGUITY_EPSILON,
        }
    }

    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    /// Rank candidates for a query, best first. Candidates are gathered in
    /// document order and sorted stably, so equal scores keep earliest-first
    /// ordering.
    pub fn find(&self, query: &str, scope: SearchScope, top_k: usize) -> Vec<Match> {
        if query.trim().is_empty() {
            return Vec::new();
        }
        let mut matches: Vec<Match> = self
            .candidates(scope)
            .into_iter()
            .filter_map(|(id, text)| {
                let score = score(query, &text, self.threshold)?;
                Some(Match { id, score, text })
            })
            .collect();
        matches.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
        matches.truncate(top_k);
        matches
    }

    /// Find exactly one element, or fail.
    ///
    /// `NotFound` when nothing clears the threshold; `AmbiguousMatch` when a
    /// second candidate scores within epsilon of the best.
    pub fn find_unique(&self, query: &str, scope: SearchScope) -> Result<Match> {
        let matches = self.find(query, scope, usize::MAX);
        let mut iter = matches.into_iter();
        let best = iter
            .next()
            .ok_or_else(|| EditError::NotFound(format!("no element matching {query:?}")))?;
        let rivals: Vec<String> = iter
            .filter(|m| m.score >= best.score - self.epsilon)
            .map(|m| m.text.clone())
            .collect();
        if !rivals.is_empty() {
            let mut candidates = vec![best.text.clone()];
            candidates.extend(rivals);
            return Err(EditError::AmbiguousMatch {
                query: query.to_string(),
                candidates,
            });
        }
        Ok(best)
    }

    fn candidates(&self, scope: SearchScope) -> Vec<(ElementId, String)> {
        let mut out = Vec::new();
        for block in &self.doc.body {
            match (block, scope) {
                (Block::Paragraph(p), SearchScope::Paragraphs) => {
                    out.push((p.id(), p.text()));
                }
                (Block::Paragraph(p), SearchScope::Headings) => {
                    if p.heading_level().is_some() {
                        out.push((p.id(), p.text()));
                    }
                }
                (Block::Table(t), SearchScope::Cells) => {
                    for p in t.paragraphs() {
                        out.push((p.id(), p.text()));
                    }
                }
                _ => {}
            }
        }
        if scope == SearchScope::Paragraphs {
            for p in self.doc.margin_paragraphs() {
                out.push((p.id(), p.text()));
            }
        }
        out
    }
}

/// Score a candidate against the query, or None when it falls outside the
/// inclusion rule (any containment, or token overlap at the threshold).
///
/// Non-containment scores are scaled to stay strictly below the
/// containment bands, so word soup never outranks a real substring hit.
fn score(query: &str, text: &str, threshold: f64) -> Option<f64> {
    if text.is_empty() {
        return None;
    }
    let overlap = token_overlap(query, text);
    if text.contains(query) {
        return Some(0.9 + 0.1 * overlap);
    }
    if text.to_lowercase().contains(&query.to_lowercase()) {
        return Some(0.8 + 0.1 * overlap);
    }
    (overlap >= threshold).then_some(0.7 * overlap)
}

/// Shared lowercase word tokens over total distinct tokens
fn token_overlap(a: &str, b: &str) -> f64 {
    let ta = tokens(a);
    let tb = tokens(b);
    if ta.is_empty() || tb.is_empty() {
        return 0.0;
    }
    let shared = ta.iter().filter(|t| tb.contains(*t)).count();
    let mut union = ta.clone();
    for t in &tb {
        if !union.contains(t) {
            union.push(t.clone());
        }
    }
    shared as f64 / union.len() as f64
}

fn tokens(s: &str) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for word in s.split_whitespace() {
        let cleaned: String = word
            .chars()
            .filter(|c| c.is_alphanumeric())
            .flat_map(|c| c.to_lowercase())
            .collect();
        if !cleaned.is_empty() && !out.contains(&cleaned) {
            out.push(cleaned);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc_with(lines: &[&str]) -> Document {
        let mut doc = Document::new();
        for line in lines {
            doc.push_paragraph(line);
        }
        doc
    }

    #[test]
    fn containment_outranks_token_overlap() {
        let doc = doc_with(&[
            "Project timeline overview",
            "Budget details",
            "See timeline section",
        ]);
        let locator = Locator::new(&doc);
        let matches = locator.find("timeline", SearchScope::Paragraphs, 10);
        assert_eq!(matches.len(), 2);
        assert_eq!(matches[0].text, "Project timeline overview");
        assert_eq!(matches[1].text, "See timeline section");
        assert!(matches.iter().all(|m| m.text != "Budget details"));
    }

    #[test]
    fn case_insensitive_containment_scores_lower_than_exact() {
        let doc = doc_with(&["the TIMELINE is here", "the timeline is here"]);
        let locator = Locator::new(&doc);
        let matches = locator.find("timeline", SearchScope::Paragraphs, 10);
        assert_eq!(matches[0].text, "the timeline is here");
        assert!(matches[0].score > matches[1].score);
    }

    #[test]
    fn equal_scores_keep_document_order() {
        let doc = doc_with(&["alpha beta", "alpha beta"]);
        let locator = Locator::new(&doc);
        let matches = locator.find("alpha beta", SearchScope::Paragraphs, 10);
        let first = doc.position_of(matches[0].id).unwrap();
        let second = doc.position_of(matches[1].id).unwrap();
        assert!(first < second);
    }

    #[test]
    fn find_unique_flags_near_ties() {
        let doc = doc_with(&["Draft section", "Draft section"]);
        let locator = Locator::new(&doc);
        let err = locator
            .find_unique("Draft section", SearchScope::Paragraphs)
            .unwrap_err();
        match err {
            EditError::AmbiguousMatch { candidates, .. } => assert_eq!(candidates.len(), 2),
            other => panic!("expected AmbiguousMatch, got {other:?}"),
        }
    }

    #[test]
    fn find_unique_prefers_clear_winner() {
        let doc = doc_with(&["Quarterly revenue report", "Weather notes"]);
        let locator = Locator::new(&doc);
        let m = locator
            .find_unique("revenue report", SearchScope::Paragraphs)
            .unwrap();
        assert_eq!(m.text, "Quarterly revenue report");
    }

    #[test]
    fn below_threshold_is_not_found() {
        let doc = doc_with(&["completely unrelated words"]);
        let locator = Locator::new(&doc);
        assert!(matches!(
            locator.find_unique("quarterly revenue", SearchScope::Paragraphs),
            Err(EditError::NotFound(_))
        ));
    }

    #[test]
    fn heading_scope_filters() {
        let mut doc = Document::new();
        let h = doc.push_paragraph("Introduction");
        doc.paragraph_mut(h).unwrap().properties.style_name = "Heading 1".to_string();
        doc.push_paragraph("Introduction text in the body");
        let locator = Locator::new(&doc);
        let matches = locator.find("Introduction", SearchScope::Headings, 10);
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].id, h);
    }

    #[test]
    fn empty_query_matches_nothing() {
        let doc = doc_with(&["anything"]);
        let locator = Locator::new(&doc);
        assert!(locator.find("  ", SearchScope::Paragraphs, 10).is_empty());
    }
}
