//! Literal text replacement across the document or a scoped target

use crate::error::{EditError, Result};
use doc_model::{Block, Document, ElementId, Paragraph};

/// What a replacement pass walks over
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplaceScope {
    /// Body paragraphs, table cells and headers/footers
    Document,
    /// One paragraph
    Paragraph(ElementId),
    /// Every cell of one table
    Table(ElementId),
}

/// Replace every occurrence within one paragraph, left to right.
///
/// Each match is re-cut at run boundaries so formatting outside the match
/// survives; resumes after the replacement so a replacement containing the
/// needle is not rescanned.
fn replace_in_paragraph(p: &mut Paragraph, needle: &str, replacement: &str) -> Result<usize> {
    let mut count = 0;
    let mut search_from = 0;
    loop {
        let text = p.text();
        let Some(rel) = text[search_from..].find(needle) else {
            break;
        };
        let start = search_from + rel;
        p.replace_range(start, start + needle.len(), replacement)?;
        search_from = start + replacement.len();
        count += 1;
    }
    Ok(count)
}

/// Replace literal text, returning the number of occurrences changed.
/// Zero matches is success.
pub fn replace_text(
    doc: &mut Document,
    needle: &str,
    replacement: &str,
    scope: ReplaceScope,
) -> Result<usize> {
    if needle.is_empty() {
        return Err(EditError::InvalidPosition(
            "search text must be non-empty".to_string(),
        ));
    }
    let mut count = 0;
    match scope {
        ReplaceScope::Paragraph(id) => {
            count += replace_in_paragraph(doc.paragraph_mut(id)?, needle, replacement)?;
        }
        ReplaceScope::Table(id) => {
            let table = doc.table_mut(id)?;
            let spans = table.spans.clone();
            for (r, row) in table.rows.iter_mut().enumerate() {
                for (c, cell) in row.cells.iter_mut().enumerate() {
                    if spans.iter().any(|s| s.covers(r, c)) {
                        continue;
                    }
                    for p in &mut cell.paragraphs {
                        count += replace_in_paragraph(p, needle, replacement)?;
                    }
                }
            }
        }
        ReplaceScope::Document => {
            for block in &mut doc.body {
                match block {
                    Block::Paragraph(p) => {
                        count += replace_in_paragraph(p, needle, replacement)?;
                    }
                    Block::Table(t) => {
                        let spans = t.spans.clone();
                        for (r, row) in t.rows.iter_mut().enumerate() {
                            for (c, cell) in row.cells.iter_mut().enumerate() {
                                if spans.iter().any(|s| s.covers(r, c)) {
                                    continue;
                                }
                                for p in &mut cell.paragraphs {
                                    count += replace_in_paragraph(p, needle, replacement)?;
                                }
                            }
                        }
                    }
                }
            }
            for p in doc.header.iter_mut().chain(doc.footer.iter_mut()) {
                count += replace_in_paragraph(p, needle, replacement)?;
            }
        }
    }
    if count > 0 {
        doc.touch();
    }
    Ok(count)
}
