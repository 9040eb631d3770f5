//! Table mutations: structure edits, cell updates, merges, text conversion

use crate::error::{EditError, Result};
use crate::grid::{self, GridFormat};
use crate::locator::{Locator, SearchScope};
use crate::paragraph_ops::{resolve_body_index, InsertPosition};
use doc_model::{Block, Cell, CellSpan, Document, ElementId, Paragraph, Table, TableRow};
use serde::Serialize;

/// Shape summary of one table, for listing
#[derive(Debug, Clone, Serialize)]
pub struct TableSummary {
    pub id: ElementId,
    pub rows: usize,
    pub cols: usize,
    /// Text of the first cell, as a caption-ish hint
    pub first_cell: String,
}

/// All tables in body order
pub fn list_tables(doc: &Document) -> Vec<TableSummary> {
    doc.body
        .iter()
        .filter_map(|block| match block {
            Block::Table(t) => Some(TableSummary {
                id: t.id(),
                rows: t.row_count(),
                cols: t.column_count(),
                first_cell: t.cell(0, 0).map(|c| c.text()).unwrap_or_default(),
            }),
            Block::Paragraph(_) => None,
        })
        .collect()
}

/// Cell texts of one table as a grid; covered cells come back empty
pub fn read_table(doc: &Document, id: ElementId) -> Result<Vec<Vec<String>>> {
    Ok(doc.table(id)?.to_grid())
}

/// Insert a table built from a rectangular grid of cell texts
pub fn insert_table(
    doc: &mut Document,
    grid: &[Vec<String>],
    position: InsertPosition,
) -> Result<ElementId> {
    let cols = grid.first().map_or(0, Vec::len);
    if grid.is_empty() || cols == 0 {
        return Err(EditError::MalformedTable("empty grid".to_string()));
    }
    if grid.iter().any(|row| row.len() != cols) {
        return Err(EditError::MalformedTable(
            "rows of unequal length".to_string(),
        ));
    }
    let index = resolve_body_index(doc, position)?;

    let id = doc.alloc_id();
    let mut table = Table::new(id);
    table.style_name = Some("Table Grid".to_string());
    for row in grid {
        let cells = row
            .iter()
            .map(|text| {
                let pid = doc.alloc_id();
                Cell::new(Paragraph::with_text(pid, text.as_str()))
            })
            .collect();
        table.rows.push(TableRow::new(cells));
    }
    doc.insert_block_at(index, Block::Table(table))?;
    doc.touch();
    Ok(id)
}

fn check_bounds(table: &Table, row: usize, col: usize) -> Result<()> {
    if row >= table.row_count() || col >= table.column_count() {
        return Err(EditError::InvalidPosition(format!(
            "cell ({row}, {col}) outside {}x{} table",
            table.row_count(),
            table.column_count()
        )));
    }
    Ok(())
}

/// Replace one cell's content with a single paragraph of text.
///
/// Writes aimed at a covered cell land on the span's origin.
pub fn update_cell(
    doc: &mut Document,
    table_id: ElementId,
    row: usize,
    col: usize,
    text: &str,
) -> Result<()> {
    let (row, col) = {
        let table = doc.table(table_id)?;
        check_bounds(table, row, col)?;
        table.resolve_origin(row, col)
    };
    let mut retired = Vec::new();
    {
        let table = doc.table_mut(table_id)?;
        let cell = &mut table.rows[row].cells[col];
        for extra in cell.paragraphs.drain(1..) {
            retired.push(extra.id());
        }
        cell.paragraphs[0].set_text(text, true);
    }
    for id in retired {
        doc.retire_id(id);
    }
    doc.touch();
    Ok(())
}

/// Write a row of values left to right, skipping covered cells
pub fn update_row(
    doc: &mut Document,
    table_id: ElementId,
    row: usize,
    values: &[String],
) -> Result<()> {
    let cols = {
        let table = doc.table(table_id)?;
        check_bounds(table, row, 0)?;
        table.column_count()
    };
    if values.len() > cols {
        return Err(EditError::InvalidPosition(format!(
            "{} values for a {cols}-column table",
            values.len()
        )));
    }
    for (col, value) in values.iter().enumerate() {
        if doc.table(table_id)?.is_covered(row, col) {
            continue;
        }
        update_cell(doc, table_id, row, col, value)?;
    }
    Ok(())
}

/// Build an empty cell reusing another cell's paragraph properties
fn blank_like(source: Option<&Cell>, id: ElementId) -> Cell {
    let mut paragraph = Paragraph::new(id);
    if let Some(first) = source.and_then(|c| c.paragraphs.first()) {
        paragraph.properties = first.properties.clone();
    }
    Cell::new(paragraph)
}

/// Insert an empty row at an index, cloning the nearest row's column count
/// and cell formatting
pub fn insert_table_row(doc: &mut Document, table_id: ElementId, index: usize) -> Result<()> {
    let (rows, cols) = {
        let table = doc.table(table_id)?;
        (table.row_count(), table.column_count())
    };
    if index > rows {
        return Err(EditError::InvalidPosition(format!(
            "row index {index} out of range 0..={rows}"
        )));
    }
    if rows == 0 {
        return Err(EditError::MalformedTable(
            "cannot infer columns for an empty table".to_string(),
        ));
    }
    let template = if index > 0 { index - 1 } else { 0 };
    let ids: Vec<ElementId> = (0..cols).map(|_| doc.alloc_id()).collect();
    let table = doc.table_mut(table_id)?;
    let cells = ids
        .into_iter()
        .enumerate()
        .map(|(c, id)| {
            let source = table.cell(template, c).cloned();
            blank_like(source.as_ref(), id)
        })
        .collect();
    table.insert_row_at(index, TableRow::new(cells));
    doc.touch();
    Ok(())
}

/// Insert an empty column at an index, cloning the nearest column's
/// cell formatting
pub fn insert_table_column(doc: &mut Document, table_id: ElementId, index: usize) -> Result<()> {
    let (rows, cols) = {
        let table = doc.table(table_id)?;
        (table.row_count(), table.column_count())
    };
    if index > cols {
        return Err(EditError::InvalidPosition(format!(
            "column index {index} out of range 0..={cols}"
        )));
    }
    let template = if index > 0 { index - 1 } else { 0 };
    let ids: Vec<ElementId> = (0..rows).map(|_| doc.alloc_id()).collect();
    let table = doc.table_mut(table_id)?;
    let cells = ids
        .into_iter()
        .enumerate()
        .map(|(r, id)| {
            let source = table.cell(r, template).cloned();
            blank_like(source.as_ref(), id)
        })
        .collect();
    table.insert_column_at(index, cells);
    doc.touch();
    Ok(())
}

fn retire_cells(doc: &mut Document, cells: Vec<Cell>) {
    for cell in cells {
        for p in cell.paragraphs {
            doc.retire_id(p.id());
        }
    }
}

/// Delete a row. Rows under a merge span are refused with `MergeConflict`
/// unless the caller confirms truncating the span.
pub fn delete_table_row(
    doc: &mut Document,
    table_id: ElementId,
    index: usize,
    confirm_span_truncation: bool,
) -> Result<()> {
    {
        let table = doc.table(table_id)?;
        if index >= table.row_count() {
            return Err(EditError::InvalidPosition(format!(
                "row index {index} out of range 0..{}",
                table.row_count()
            )));
        }
        if !confirm_span_truncation {
            if let Some(span) = table.spans.iter().find(|s| s.intersects_row(index)) {
                return Err(EditError::MergeConflict {
                    row: index,
                    col: span.col,
                });
            }
        }
    }
    let removed = doc.table_mut(table_id)?.remove_row(index);
    retire_cells(doc, removed.cells);
    doc.touch();
    Ok(())
}

/// Delete a column, with the same merge-span confirmation rule as rows
pub fn delete_table_column(
    doc: &mut Document,
    table_id: ElementId,
    index: usize,
    confirm_span_truncation: bool,
) -> Result<()> {
    {
        let table = doc.table(table_id)?;
        if index >= table.column_count() {
            return Err(EditError::InvalidPosition(format!(
                "column index {index} out of range 0..{}",
                table.column_count()
            )));
        }
        if !confirm_span_truncation {
            if let Some(span) = table.spans.iter().find(|s| s.intersects_col(index)) {
                return Err(EditError::MergeConflict {
                    row: span.row,
                    col: index,
                });
            }
        }
    }
    let removed = doc.table_mut(table_id)?.remove_column(index);
    retire_cells(doc, removed);
    doc.touch();
    Ok(())
}

/// Merge a rectangle of cells into one span.
///
/// The origin keeps the concatenated (paragraph-joined) text of every cell
/// in the rectangle; the others become non-addressable placeholders.
pub fn merge_cells(
    doc: &mut Document,
    table_id: ElementId,
    start: (usize, usize),
    end: (usize, usize),
) -> Result<()> {
    let (r1, r2) = (start.0.min(end.0), start.0.max(end.0));
    let (c1, c2) = (start.1.min(end.1), start.1.max(end.1));
    {
        let table = doc.table(table_id)?;
        check_bounds(table, r2, c2)?;
        if r1 == r2 && c1 == c2 {
            return Err(EditError::InvalidPosition(
                "merge region must cover at least two cells".to_string(),
            ));
        }
        for r in r1..=r2 {
            for c in c1..=c2 {
                if table.span_at(r, c).is_some() {
                    return Err(EditError::MergeConflict { row: r, col: c });
                }
            }
        }
    }

    // gather non-empty cell texts in row-major order
    let combined = {
        let table = doc.table(table_id)?;
        let mut parts = Vec::new();
        for r in r1..=r2 {
            for c in c1..=c2 {
                if let Some(cell) = table.cell(r, c) {
                    let text = cell.text();
                    if !text.is_empty() {
                        parts.push(text);
                    }
                }
            }
        }
        parts.join("\n")
    };

    let placeholder_count = (r2 - r1 + 1) * (c2 - c1 + 1) - 1;
    let fresh: Vec<ElementId> = (0..placeholder_count).map(|_| doc.alloc_id()).collect();
    let mut next_fresh = 0;
    let mut retired = Vec::new();
    {
        let table = doc.table_mut(table_id)?;
        for r in r1..=r2 {
            for c in c1..=c2 {
                let cell = &mut table.rows[r].cells[c];
                if r == r1 && c == c1 {
                    for extra in cell.paragraphs.drain(1..) {
                        retired.push(extra.id());
                    }
                    cell.paragraphs[0].set_text(combined.as_str(), true);
                } else {
                    let id = fresh[next_fresh];
                    next_fresh += 1;
                    for old in cell.paragraphs.drain(..) {
                        retired.push(old.id());
                    }
                    cell.paragraphs.push(Paragraph::new(id));
                }
            }
        }
        table.add_span(CellSpan::new(r1, c1, r2 - r1 + 1, c2 - c1 + 1));
    }
    for id in retired {
        doc.retire_id(id);
    }
    doc.touch();
    Ok(())
}

/// Turn a run of consecutive table-looking paragraphs into a real table.
///
/// The run starts at the paragraph best matching the query and extends
/// while lines look tabular; the paragraphs are removed and a table takes
/// their place.
pub fn convert_text_to_table(doc: &mut Document, query: &str) -> Result<ElementId> {
    let m = Locator::new(doc).find_unique(query, SearchScope::Paragraphs)?;
    let start = doc
        .position_of(m.id)
        .ok_or_else(|| EditError::NotFound(format!("paragraph {} not in body", m.id)))?;

    let mut lines = Vec::new();
    let mut end = start;
    while let Some(Block::Paragraph(p)) = doc.body.get(end) {
        let text = p.text();
        if !grid::looks_tabular(&text) {
            break;
        }
        lines.push(text);
        end += 1;
    }
    if lines.is_empty() {
        return Err(EditError::MalformedTable(format!(
            "paragraph {:?} does not look like table text",
            m.text
        )));
    }
    let refs: Vec<&str> = lines.iter().map(String::as_str).collect();
    let format = grid::detect(&refs)
        .ok_or_else(|| EditError::MalformedTable("unrecognized table text".to_string()))?;
    let parsed = grid::parse(&refs, format)?;

    let removed: Vec<Block> = doc.body.drain(start..end).collect();
    for block in removed {
        doc.retire_id(block.id());
    }
    insert_table(doc, &parsed, InsertPosition::AtIndex(start))
}
