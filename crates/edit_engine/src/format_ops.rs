//! Formatting application: one validated update struct per call

use crate::error::{EditError, Result};
use doc_model::{Alignment, Document, ElementId, Paragraph, Run, RunProperties};
use serde::Deserialize;

/// A batch of formatting changes. Absent fields leave the current value
/// untouched; the whole struct is validated before anything is applied.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FormattingUpdate {
    pub bold: Option<bool>,
    pub italic: Option<bool>,
    pub underline: Option<bool>,
    pub font_size: Option<f32>,
    pub alignment: Option<Alignment>,
    pub style_name: Option<String>,
}

impl FormattingUpdate {
    pub fn is_empty(&self) -> bool {
        self.bold.is_none()
            && self.italic.is_none()
            && self.underline.is_none()
            && self.font_size.is_none()
            && self.alignment.is_none()
            && self.style_name.is_none()
    }

    fn run_overrides(&self) -> RunProperties {
        RunProperties {
            bold: self.bold,
            italic: self.italic,
            underline: self.underline,
            font_size: self.font_size,
            style_name: None,
        }
    }
}

/// What a formatting call touches
#[derive(Debug, Clone, Copy)]
pub enum FormatTarget {
    /// A whole paragraph: all runs plus paragraph-level properties
    Paragraph(ElementId),
    /// A byte range of one paragraph's text; runs are re-cut at the edges
    RunRange {
        paragraph: ElementId,
        start: usize,
        end: usize,
    },
}

fn target_paragraph(target: FormatTarget) -> ElementId {
    match target {
        FormatTarget::Paragraph(id) => id,
        FormatTarget::RunRange { paragraph, .. } => paragraph,
    }
}

/// Split the run containing `offset` so a run boundary falls exactly there
fn split_run_at(p: &mut Paragraph, offset: usize) {
    let mut cursor = 0;
    for i in 0..p.runs.len() {
        let len = p.runs[i].text.len();
        if offset > cursor && offset < cursor + len {
            let tail = p.runs[i].text.split_off(offset - cursor);
            let properties = p.runs[i].properties.clone();
            p.runs.insert(i + 1, Run::with_properties(tail, properties));
            return;
        }
        cursor += len;
    }
}

/// Indices of the runs covering [start, end) once boundaries are cut
fn isolate_range(p: &mut Paragraph, start: usize, end: usize) -> Result<std::ops::Range<usize>> {
    let text = p.text();
    if start > end || end > text.len() {
        return Err(EditError::InvalidPosition(format!(
            "range {start}..{end} outside paragraph of length {}",
            text.len()
        )));
    }
    if !text.is_char_boundary(start) || !text.is_char_boundary(end) {
        return Err(EditError::InvalidPosition(format!(
            "range {start}..{end} cuts a character"
        )));
    }
    if start == end {
        return Ok(0..0);
    }
    split_run_at(p, start);
    split_run_at(p, end);
    let mut cursor = 0;
    let mut first = p.runs.len();
    let mut last = p.runs.len();
    for (i, run) in p.runs.iter().enumerate() {
        if cursor == start && first == p.runs.len() {
            first = i;
        }
        cursor += run.text.len();
        if cursor == end {
            last = i + 1;
            break;
        }
    }
    Ok(first..last)
}

/// Apply a formatting update in one validated step.
///
/// An unknown `style_name` fails with `UnknownStyle` before any field is
/// touched.
pub fn apply_formatting(
    doc: &mut Document,
    target: FormatTarget,
    update: &FormattingUpdate,
) -> Result<()> {
    if let Some(name) = &update.style_name {
        if !doc.styles.contains(name) {
            return Err(EditError::UnknownStyle(name.clone()));
        }
    }
    let id = target_paragraph(target);
    // validate the range before mutating anything
    if let FormatTarget::RunRange { start, end, .. } = target {
        let text = doc.paragraph(id)?.text();
        if start > end || end > text.len() || !text.is_char_boundary(start) || !text.is_char_boundary(end)
        {
            return Err(EditError::InvalidPosition(format!(
                "range {start}..{end} invalid for paragraph of length {}",
                text.len()
            )));
        }
    } else {
        doc.paragraph(id)?;
    }

    let overrides = update.run_overrides();
    let paragraph = doc.paragraph_mut(id)?;
    match target {
        FormatTarget::Paragraph(_) => {
            for run in &mut paragraph.runs {
                run.properties = run.properties.merge(&overrides);
            }
            if let Some(alignment) = update.alignment {
                paragraph.properties.alignment = Some(alignment);
            }
            if let Some(name) = &update.style_name {
                paragraph.properties.style_name = name.clone();
            }
        }
        FormatTarget::RunRange { start, end, .. } => {
            let range = isolate_range(paragraph, start, end)?;
            for run in &mut paragraph.runs[range] {
                run.properties = run.properties.merge(&overrides);
            }
            if let Some(alignment) = update.alignment {
                paragraph.properties.alignment = Some(alignment);
            }
            if let Some(name) = &update.style_name {
                paragraph.properties.style_name = name.clone();
            }
        }
    }
    doc.touch();
    Ok(())
}

/// Drop run-level overrides so text falls back to its style's defaults.
/// Applying twice changes nothing.
pub fn clear_formatting(doc: &mut Document, target: FormatTarget) -> Result<()> {
    let id = target_paragraph(target);
    let paragraph = doc.paragraph_mut(id)?;
    match target {
        FormatTarget::Paragraph(_) => {
            for run in &mut paragraph.runs {
                run.properties = RunProperties::default();
            }
        }
        FormatTarget::RunRange { start, end, .. } => {
            let range = isolate_range(paragraph, start, end)?;
            for run in &mut paragraph.runs[range] {
                run.properties = RunProperties::default();
            }
        }
    }
    doc.touch();
    Ok(())
}
