//! Text run - a contiguous span of text with one formatting set

use serde::{Deserialize, Serialize};

/// Run-level formatting overrides. `None` means "inherit from the style".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunProperties {
    pub bold: Option<bool>,
    pub italic: Option<bool>,
    pub underline: Option<bool>,
    /// Font size in points
    pub font_size: Option<f32>,
    /// Character style name (must exist in the document's style registry)
    pub style_name: Option<String>,
}

impl RunProperties {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge another property set over this one; `Some` values in `other` win
    pub fn merge(&self, other: &RunProperties) -> RunProperties {
        RunProperties {
            bold: other.bold.or(self.bold),
            italic: other.italic.or(self.italic),
            underline: other.underline.or(self.underline),
            font_size: other.font_size.or(self.font_size),
            style_name: other.style_name.clone().or_else(|| self.style_name.clone()),
        }
    }

    /// Check if no overrides are set
    pub fn is_empty(&self) -> bool {
        self.bold.is_none()
            && self.italic.is_none()
            && self.underline.is_none()
            && self.font_size.is_none()
            && self.style_name.is_none()
    }
}

/// A text run - contiguous text sharing one formatting set.
///
/// Invariant: concatenating a paragraph's run texts yields the paragraph's
/// full text. Runs are never empty except transiently during a split or
/// merge, after which the owning paragraph prunes them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Run {
    pub text: String,
    #[serde(default)]
    pub properties: RunProperties,
}

impl Run {
    /// Create a new run with default formatting
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            properties: RunProperties::default(),
        }
    }

    /// Create a new run with explicit formatting
    pub fn with_properties(text: impl Into<String>, properties: RunProperties) -> Self {
        Self {
            text: text.into(),
            properties,
        }
    }

    /// Length of the text in UTF-8 bytes
    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Number of grapheme clusters in this run
    pub fn grapheme_count(&self) -> usize {
        use unicode_segmentation::UnicodeSegmentation;
        self.text.graphemes(true).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merge_prefers_other() {
        let base = RunProperties {
            bold: Some(true),
            font_size: Some(12.0),
            ..Default::default()
        };
        let over = RunProperties {
            bold: Some(false),
            italic: Some(true),
            ..Default::default()
        };
        let merged = base.merge(&over);
        assert_eq!(merged.bold, Some(false));
        assert_eq!(merged.italic, Some(true));
        assert_eq!(merged.font_size, Some(12.0));
    }

    #[test]
    fn grapheme_count_handles_combining_marks() {
        let run = Run::new("e\u{301}x");
        assert_eq!(run.grapheme_count(), 2);
        assert_eq!(run.len(), 4);
    }
}
