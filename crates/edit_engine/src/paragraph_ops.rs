//! Paragraph-level mutations: insert, update, delete, move, merge, split

use crate::error::{EditError, Result};
use crate::locator::{Locator, SearchScope};
use doc_model::{Block, Document, ElementId, ListMarker, Paragraph, ParagraphHome};
use serde::Deserialize;
use unicode_segmentation::UnicodeSegmentation;

/// Where to place an inserted or moved block
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InsertPosition {
    Append,
    AtIndex(usize),
    Before(ElementId),
    After(ElementId),
}

/// Where to cut a paragraph in two
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SplitPoint {
    /// Byte offset into the paragraph text
    Offset(usize),
    /// Start of the first occurrence of a marker string
    Marker(String),
}

/// Resolve an insert position to a body index. The anchor of a
/// Before/After must currently live in the body.
pub(crate) fn resolve_body_index(doc: &Document, position: InsertPosition) -> Result<usize> {
    match position {
        InsertPosition::Append => Ok(doc.body.len()),
        InsertPosition::AtIndex(i) => {
            if i <= doc.body.len() {
                Ok(i)
            } else {
                Err(EditError::InvalidPosition(format!(
                    "index {i} out of range 0..={}",
                    doc.body.len()
                )))
            }
        }
        InsertPosition::Before(anchor) => doc
            .position_of(anchor)
            .ok_or_else(|| EditError::NotFound(format!("anchor {anchor} not in body"))),
        InsertPosition::After(anchor) => doc
            .position_of(anchor)
            .map(|i| i + 1)
            .ok_or_else(|| EditError::NotFound(format!("anchor {anchor} not in body"))),
    }
}

fn require_style(doc: &Document, name: &str) -> Result<()> {
    if doc.styles.contains(name) {
        Ok(())
    } else {
        Err(EditError::UnknownStyle(name.to_string()))
    }
}

/// Insert a new paragraph, optionally with a named style
pub fn insert_paragraph(
    doc: &mut Document,
    text: &str,
    position: InsertPosition,
    style: Option<&str>,
) -> Result<ElementId> {
    if let Some(name) = style {
        require_style(doc, name)?;
    }
    let index = resolve_body_index(doc, position)?;
    let id = doc.alloc_id();
    let mut paragraph = Paragraph::with_text(id, text);
    if let Some(name) = style {
        paragraph.properties.style_name = name.to_string();
    }
    doc.insert_block_at(index, Block::Paragraph(paragraph))?;
    doc.touch();
    Ok(id)
}

/// Replace a paragraph's text by ID. ID and position are unchanged.
///
/// With `preserve_formatting` the first run's properties carry over to the
/// new text; otherwise the paragraph reverts to unformatted runs.
pub fn update_paragraph(
    doc: &mut Document,
    id: ElementId,
    text: &str,
    preserve_formatting: bool,
) -> Result<()> {
    let paragraph = doc.paragraph_mut(id)?;
    paragraph.set_text(text, preserve_formatting);
    doc.touch();
    Ok(())
}

/// Delete a paragraph wherever it lives; its ID is tombstoned.
///
/// Deleting the last paragraph of a table cell re-inserts a fresh empty
/// paragraph so the cell is never empty.
pub fn delete_paragraph(doc: &mut Document, id: ElementId) -> Result<()> {
    let home = doc
        .locate_paragraph(id)
        .ok_or_else(|| EditError::NotFound(format!("paragraph {id}")))?;
    match home {
        ParagraphHome::Body { .. } => {
            doc.remove_block(id)?;
        }
        ParagraphHome::Cell {
            block, row, col, index,
        } => {
            let replacement = doc.alloc_id();
            if let Block::Table(t) = &mut doc.body[block] {
                let cell = &mut t.rows[row].cells[col];
                cell.paragraphs.remove(index);
                if cell.paragraphs.is_empty() {
                    cell.paragraphs.push(Paragraph::new(replacement));
                }
            }
            doc.retire_id(id);
        }
        ParagraphHome::Header { index } => {
            doc.header.remove(index);
            doc.retire_id(id);
        }
        ParagraphHome::Footer { index } => {
            doc.footer.remove(index);
            doc.retire_id(id);
        }
    }
    doc.touch();
    Ok(())
}

/// Delete the single paragraph best matching a text query.
///
/// Near-ties are rejected as `AmbiguousMatch` rather than guessing.
pub fn delete_paragraph_by_text(doc: &mut Document, query: &str) -> Result<ElementId> {
    let m = Locator::new(doc).find_unique(query, SearchScope::Paragraphs)?;
    delete_paragraph(doc, m.id)?;
    Ok(m.id)
}

/// Reorder a top-level paragraph. Bookmarks and hyperlinks travel with it.
pub fn move_paragraph(doc: &mut Document, id: ElementId, position: InsertPosition) -> Result<()> {
    let from = doc
        .position_of(id)
        .ok_or_else(|| EditError::NotFound(format!("paragraph {id} not in body")))?;
    if !matches!(doc.body[from], Block::Paragraph(_)) {
        return Err(EditError::InvalidPosition(format!("{id} is not a paragraph")));
    }
    if let InsertPosition::Before(anchor) | InsertPosition::After(anchor) = position {
        if anchor == id {
            return Err(EditError::InvalidPosition(
                "cannot move a paragraph relative to itself".to_string(),
            ));
        }
    }
    let mut to = resolve_body_index(doc, position)?;
    let block = doc.body.remove(from);
    if to > from {
        to -= 1;
    }
    doc.body.insert(to, block);
    doc.touch();
    Ok(())
}

/// Append `second`'s runs onto `first` and delete `second`.
///
/// `first` keeps its ID, style and position. The separator, when given, is
/// appended to `first`'s last run so it inherits that run's formatting.
pub fn merge_paragraphs(
    doc: &mut Document,
    first: ElementId,
    second: ElementId,
    separator: Option<&str>,
) -> Result<()> {
    if first == second {
        return Err(EditError::InvalidPosition(
            "cannot merge a paragraph with itself".to_string(),
        ));
    }
    doc.paragraph(first)?;
    let runs = doc.paragraph(second)?.runs.clone();
    delete_paragraph(doc, second)?;
    let target = doc.paragraph_mut(first)?;
    target.append_runs(runs, separator);
    doc.touch();
    Ok(())
}

/// Split a paragraph in two at an offset or marker.
///
/// The first half keeps the original ID and style; the second half gets a
/// fresh ID and the same style. Returns the new paragraph's ID.
pub fn split_paragraph(doc: &mut Document, id: ElementId, point: SplitPoint) -> Result<ElementId> {
    let home = doc
        .locate_paragraph(id)
        .ok_or_else(|| EditError::NotFound(format!("paragraph {id}")))?;
    let text = doc.paragraph(id)?.text();
    let at = match point {
        SplitPoint::Offset(k) => k,
        SplitPoint::Marker(ref marker) => text.find(marker.as_str()).ok_or_else(|| {
            EditError::InvalidPosition(format!("marker {marker:?} not found in paragraph {id}"))
        })?,
    };
    if at > text.len() {
        return Err(EditError::InvalidPosition(format!(
            "offset {at} beyond paragraph length {}",
            text.len()
        )));
    }
    // split only between user-visible characters
    let on_boundary = at == text.len()
        || text
            .grapheme_indices(true)
            .any(|(i, _)| i == at);
    if !on_boundary {
        return Err(EditError::InvalidPosition(format!(
            "offset {at} is not a character boundary"
        )));
    }

    let new_id = doc.alloc_id();
    let properties = doc.paragraph(id)?.properties.clone();
    let tail = doc.paragraph_mut(id)?.split_off(at)?;
    let mut second = Paragraph::new(new_id);
    second.runs = tail.runs;
    second.bookmarks = tail.bookmarks;
    second.hyperlinks = tail.hyperlinks;
    second.properties = properties;

    match home {
        ParagraphHome::Body { block } => {
            doc.insert_block_at(block + 1, Block::Paragraph(second))?;
        }
        ParagraphHome::Cell {
            block, row, col, index,
        } => {
            if let Block::Table(t) = &mut doc.body[block] {
                t.rows[row].cells[col].paragraphs.insert(index + 1, second);
            }
        }
        ParagraphHome::Header { index } => doc.header.insert(index + 1, second),
        ParagraphHome::Footer { index } => doc.footer.insert(index + 1, second),
    }
    doc.touch();
    Ok(new_id)
}

/// Deep-copy a paragraph to a target position under a fresh ID
pub fn duplicate_paragraph(
    doc: &mut Document,
    id: ElementId,
    position: Option<InsertPosition>,
) -> Result<ElementId> {
    let position = position.unwrap_or(InsertPosition::After(id));
    let index = resolve_body_index(doc, position)?;
    let copy_base = doc.paragraph(id)?.clone();
    let new_id = doc.alloc_id();
    doc.insert_block_at(index, Block::Paragraph(copy_base.duplicate_as(new_id)))?;
    doc.touch();
    Ok(new_id)
}

/// Insert a paragraph at the end of a heading's section: before the next
/// heading of the same or higher level, or at the document end.
pub fn insert_after_heading(
    doc: &mut Document,
    heading_query: &str,
    text: &str,
    style: Option<&str>,
) -> Result<ElementId> {
    let m = Locator::new(doc).find_unique(heading_query, SearchScope::Headings)?;
    let heading_index = doc
        .position_of(m.id)
        .ok_or_else(|| EditError::NotFound(format!("heading {}", m.id)))?;
    let level = doc
        .paragraph(m.id)?
        .heading_level()
        .unwrap_or(1);

    let mut insert_at = doc.body.len();
    for (i, block) in doc.body.iter().enumerate().skip(heading_index + 1) {
        if let Block::Paragraph(p) = block {
            if p.heading_level().is_some_and(|l| l <= level) {
                insert_at = i;
                break;
            }
        }
    }
    insert_paragraph(doc, text, InsertPosition::AtIndex(insert_at), style)
}

/// Set or clear a paragraph's list membership
pub fn set_list_marker(
    doc: &mut Document,
    id: ElementId,
    marker: Option<ListMarker>,
) -> Result<()> {
    let paragraph = doc.paragraph_mut(id)?;
    paragraph.properties.list = marker;
    doc.touch();
    Ok(())
}
