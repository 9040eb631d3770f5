//! Paragraph - a block of content containing runs

use crate::{Bookmark, DocModelError, ElementId, Hyperlink, Result, Run, RunProperties};
use serde::{Deserialize, Serialize};

/// Text alignment options
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Alignment {
    #[default]
    Left,
    Center,
    Right,
    Justify,
}

impl Alignment {
    /// Parse a caller-supplied alignment name
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "left" => Some(Alignment::Left),
            "center" => Some(Alignment::Center),
            "right" => Some(Alignment::Right),
            "justify" => Some(Alignment::Justify),
            _ => None,
        }
    }
}

/// List membership kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListKind {
    Bullet,
    Numbered,
}

/// Marks a paragraph as a list item at a given nesting level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListMarker {
    pub kind: ListKind,
    pub level: u8,
}

/// Paragraph-level properties
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParagraphProperties {
    /// Paragraph style name; must exist in the document's style registry
    pub style_name: String,
    /// Direct alignment override (`None` inherits from the style)
    pub alignment: Option<Alignment>,
    /// Space before the paragraph in points
    pub space_before: Option<f32>,
    /// Space after the paragraph in points
    pub space_after: Option<f32>,
    /// List membership marker
    pub list: Option<ListMarker>,
}

impl Default for ParagraphProperties {
    fn default() -> Self {
        Self {
            style_name: "Normal".to_string(),
            alignment: None,
            space_before: None,
            space_after: None,
            list: None,
        }
    }
}

/// The parts of a paragraph that move to the new paragraph after a split
#[derive(Debug, Clone)]
pub struct ParagraphTail {
    pub runs: Vec<Run>,
    pub bookmarks: Vec<Bookmark>,
    pub hyperlinks: Vec<Hyperlink>,
}

/// A paragraph containing text runs.
///
/// Owned exclusively by the document body, a table cell, or a
/// header/footer section. Bookmarks and hyperlinks anchored to this
/// paragraph are owned here and travel with it on structural moves.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paragraph {
    id: ElementId,
    pub runs: Vec<Run>,
    #[serde(default)]
    pub properties: ParagraphProperties,
    #[serde(default)]
    pub bookmarks: Vec<Bookmark>,
    #[serde(default)]
    pub hyperlinks: Vec<Hyperlink>,
}

impl Paragraph {
    /// Create an empty paragraph with the given ID
    pub fn new(id: ElementId) -> Self {
        Self {
            id,
            runs: Vec::new(),
            properties: ParagraphProperties::default(),
            bookmarks: Vec::new(),
            hyperlinks: Vec::new(),
        }
    }

    /// Create a paragraph with a single run of text
    pub fn with_text(id: ElementId, text: impl Into<String>) -> Self {
        let mut para = Self::new(id);
        let text = text.into();
        if !text.is_empty() {
            para.runs.push(Run::new(text));
        }
        para
    }

    pub fn id(&self) -> ElementId {
        self.id
    }

    /// Full text of the paragraph: the concatenation of its runs
    pub fn text(&self) -> String {
        self.runs.iter().map(|r| r.text.as_str()).collect()
    }

    /// Total text length in UTF-8 bytes
    pub fn len(&self) -> usize {
        self.runs.iter().map(|r| r.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.runs.iter().all(|r| r.is_empty())
    }

    /// Heading level if the paragraph style is "Heading N"
    pub fn heading_level(&self) -> Option<u8> {
        self.properties
            .style_name
            .strip_prefix("Heading ")
            .and_then(|n| n.parse().ok())
    }

    pub fn is_heading(&self) -> bool {
        self.heading_level().is_some()
    }

    /// Replace the whole text with a single run.
    ///
    /// With `preserve_formatting`, the new run keeps the formatting of the
    /// first existing run; otherwise it gets default formatting.
    pub fn set_text(&mut self, text: impl Into<String>, preserve_formatting: bool) {
        let properties = if preserve_formatting {
            self.runs
                .first()
                .map(|r| r.properties.clone())
                .unwrap_or_default()
        } else {
            RunProperties::default()
        };
        let text = text.into();
        self.runs.clear();
        if !text.is_empty() {
            self.runs.push(Run::with_properties(text, properties));
        }
    }

    /// Replace the byte range `[start, end)` of the paragraph text with
    /// `replacement`, re-cutting runs at the range boundaries.
    ///
    /// The replacement text takes the formatting of the run containing
    /// `start`; runs entirely outside the range keep their text and
    /// formatting untouched. Offsets must lie on char boundaries of the
    /// concatenated text.
    pub fn replace_range(&mut self, start: usize, end: usize, replacement: &str) -> Result<()> {
        let total = self.len();
        if start > end || end > total {
            return Err(DocModelError::InvalidOffset {
                element: self.id,
                offset: start.max(end),
                len: total,
            });
        }
        let full = self.text();
        if !full.is_char_boundary(start) || !full.is_char_boundary(end) {
            return Err(DocModelError::InvalidOffset {
                element: self.id,
                offset: if full.is_char_boundary(start) { end } else { start },
                len: total,
            });
        }

        let mut new_runs: Vec<Run> = Vec::with_capacity(self.runs.len() + 1);
        let mut cursor = 0usize;
        let mut inserted = false;

        for run in self.runs.drain(..) {
            let run_start = cursor;
            let run_end = cursor + run.text.len();
            cursor = run_end;

            if run_end <= start {
                new_runs.push(run);
                continue;
            }
            if run_start >= end && inserted {
                new_runs.push(run);
                continue;
            }

            let prefix = if start > run_start {
                &run.text[..start - run_start]
            } else {
                ""
            };
            let suffix = if end > run_start && end < run_end {
                &run.text[end - run_start..]
            } else if end <= run_start {
                &run.text[..]
            } else {
                ""
            };

            if !inserted {
                let mut text = String::with_capacity(prefix.len() + replacement.len());
                text.push_str(prefix);
                text.push_str(replacement);
                new_runs.push(Run::with_properties(text, run.properties.clone()));
                inserted = true;
            }
            if !suffix.is_empty() {
                new_runs.push(Run::with_properties(suffix.to_string(), run.properties));
            }
        }

        if !inserted {
            // Replacing at the very end of the text, or in an empty paragraph
            new_runs.push(Run::new(replacement));
        }

        self.runs = new_runs;
        self.prune_empty_runs();
        Ok(())
    }

    /// Split the paragraph at a byte offset, returning everything after the
    /// offset. Runs are re-cut so no run spans the split point; bookmarks
    /// and hyperlinks whose span starts at or after the offset move to the
    /// tail with rebased offsets.
    pub fn split_off(&mut self, at: usize) -> Result<ParagraphTail> {
        let total = self.len();
        if at > total {
            return Err(DocModelError::InvalidOffset {
                element: self.id,
                offset: at,
                len: total,
            });
        }
        let full = self.text();
        if !full.is_char_boundary(at) {
            return Err(DocModelError::InvalidOffset {
                element: self.id,
                offset: at,
                len: total,
            });
        }

        let mut head: Vec<Run> = Vec::new();
        let mut tail: Vec<Run> = Vec::new();
        let mut cursor = 0usize;

        for run in self.runs.drain(..) {
            let run_start = cursor;
            let run_end = cursor + run.text.len();
            cursor = run_end;

            if run_end <= at {
                head.push(run);
            } else if run_start >= at {
                tail.push(run);
            } else {
                let cut = at - run_start;
                head.push(Run::with_properties(
                    run.text[..cut].to_string(),
                    run.properties.clone(),
                ));
                tail.push(Run::with_properties(
                    run.text[cut..].to_string(),
                    run.properties,
                ));
            }
        }

        self.runs = head;
        self.prune_empty_runs();

        let moved_bookmarks = {
            let (moved, kept): (Vec<_>, Vec<_>) =
                self.bookmarks.drain(..).partition(|b| b.range.0 >= at);
            self.bookmarks = kept;
            moved
                .into_iter()
                .map(|mut b| {
                    b.range = (b.range.0 - at, b.range.1 - at);
                    b
                })
                .collect()
        };
        let moved_hyperlinks = {
            let (moved, kept): (Vec<_>, Vec<_>) =
                self.hyperlinks.drain(..).partition(|h| h.range.0 >= at);
            self.hyperlinks = kept;
            moved
                .into_iter()
                .map(|mut h| {
                    h.range = (h.range.0 - at, h.range.1 - at);
                    h
                })
                .collect()
        };

        let mut tail_runs = tail;
        tail_runs.retain(|r| !r.is_empty());

        Ok(ParagraphTail {
            runs: tail_runs,
            bookmarks: moved_bookmarks,
            hyperlinks: moved_hyperlinks,
        })
    }

    /// Append runs from another paragraph, optionally separated by literal
    /// text that inherits this paragraph's trailing formatting.
    pub fn append_runs(&mut self, runs: Vec<Run>, separator: Option<&str>) {
        if let Some(sep) = separator {
            if !sep.is_empty() {
                match self.runs.last_mut() {
                    Some(last) => last.text.push_str(sep),
                    None => self.runs.push(Run::new(sep)),
                }
            }
        }
        self.runs.extend(runs);
        self.prune_empty_runs();
    }

    /// Drop empty runs left behind by a split or merge
    pub fn prune_empty_runs(&mut self) {
        self.runs.retain(|r| !r.is_empty());
    }

    /// Deep-copy this paragraph's content and formatting under a new ID
    pub fn duplicate_as(&self, id: ElementId) -> Paragraph {
        Paragraph {
            id,
            runs: self.runs.clone(),
            properties: self.properties.clone(),
            bookmarks: self.bookmarks.clone(),
            hyperlinks: self.hyperlinks.clone(),
        }
    }
}
