//! Table model - rectangular cell grids with recorded merge spans
//!
//! A table stores one `Cell` per grid position, so every row always has the
//! same expanded cell count. Merges are recorded as spans on the table;
//! cells covered by a span (other than its origin) stay in the grid as
//! non-addressable placeholders.

use crate::{ElementId, Paragraph};
use serde::{Deserialize, Serialize};

/// One grid cell. Owns its paragraphs; never empty (a cell with no content
/// holds one empty paragraph).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cell {
    pub paragraphs: Vec<Paragraph>,
}

impl Cell {
    pub fn new(paragraph: Paragraph) -> Self {
        Self {
            paragraphs: vec![paragraph],
        }
    }

    /// Cell text: the cell's paragraphs joined with newlines
    pub fn text(&self) -> String {
        self.paragraphs
            .iter()
            .map(|p| p.text())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// One logical row of grid cells
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableRow {
    pub cells: Vec<Cell>,
}

impl TableRow {
    pub fn new(cells: Vec<Cell>) -> Self {
        Self { cells }
    }
}

/// A recorded merge: an origin cell plus the rectangle it covers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellSpan {
    pub row: usize,
    pub col: usize,
    pub row_span: usize,
    pub col_span: usize,
}

impl CellSpan {
    pub fn new(row: usize, col: usize, row_span: usize, col_span: usize) -> Self {
        Self {
            row,
            col,
            row_span,
            col_span,
        }
    }

    /// Whether the span's rectangle contains a grid position (origin included)
    pub fn contains(&self, row: usize, col: usize) -> bool {
        row >= self.row
            && row < self.row + self.row_span
            && col >= self.col
            && col < self.col + self.col_span
    }

    /// Whether a grid position is covered by this span without being its origin
    pub fn covers(&self, row: usize, col: usize) -> bool {
        self.contains(row, col) && !(row == self.row && col == self.col)
    }

    pub fn intersects_row(&self, row: usize) -> bool {
        row >= self.row && row < self.row + self.row_span
    }

    pub fn intersects_col(&self, col: usize) -> bool {
        col >= self.col && col < self.col + self.col_span
    }
}

/// A table: a rectangular grid of cells plus merge spans
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Table {
    id: ElementId,
    pub rows: Vec<TableRow>,
    #[serde(default)]
    pub spans: Vec<CellSpan>,
    #[serde(default)]
    pub style_name: Option<String>,
}

impl Table {
    pub fn new(id: ElementId) -> Self {
        Self {
            id,
            rows: Vec::new(),
            spans: Vec::new(),
            style_name: None,
        }
    }

    pub fn id(&self) -> ElementId {
        self.id
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Expanded grid width; zero for an empty table
    pub fn column_count(&self) -> usize {
        self.rows.first().map_or(0, |r| r.cells.len())
    }

    /// Every row has the same expanded grid-cell count
    pub fn is_uniform(&self) -> bool {
        let cols = self.column_count();
        self.rows.iter().all(|r| r.cells.len() == cols)
    }

    pub fn cell(&self, row: usize, col: usize) -> Option<&Cell> {
        self.rows.get(row)?.cells.get(col)
    }

    pub fn cell_mut(&mut self, row: usize, col: usize) -> Option<&mut Cell> {
        self.rows.get_mut(row)?.cells.get_mut(col)
    }

    /// The span whose rectangle contains a position, if any
    pub fn span_at(&self, row: usize, col: usize) -> Option<&CellSpan> {
        self.spans.iter().find(|s| s.contains(row, col))
    }

    /// Whether a position is a non-addressable placeholder under a span
    pub fn is_covered(&self, row: usize, col: usize) -> bool {
        self.spans.iter().any(|s| s.covers(row, col))
    }

    /// Origin position for a covered cell, or the position itself otherwise
    pub fn resolve_origin(&self, row: usize, col: usize) -> (usize, usize) {
        match self.span_at(row, col) {
            Some(span) => (span.row, span.col),
            None => (row, col),
        }
    }

    /// Record a merge span. Callers validate rectangularity and overlap first.
    pub fn add_span(&mut self, span: CellSpan) {
        self.spans.push(span);
    }

    /// Insert a row at an index, growing vertical spans that straddle it
    pub fn insert_row_at(&mut self, index: usize, row: TableRow) {
        for span in &mut self.spans {
            if span.row >= index {
                span.row += 1;
            } else if index < span.row + span.row_span {
                span.row_span += 1;
            }
        }
        self.rows.insert(index, row);
    }

    /// Remove a row, truncating spans that intersect it. A span whose origin
    /// sits on the removed row migrates its origin to the next covered row.
    pub fn remove_row(&mut self, index: usize) -> TableRow {
        self.spans.retain(|s| !(s.intersects_row(index) && s.row_span == 1));
        for span in &mut self.spans {
            if span.row > index {
                span.row -= 1;
            } else if span.intersects_row(index) {
                // row_span > 1 here; shrink, moving the origin if it was removed
                span.row_span -= 1;
                // span.row == index: the origin cell at index+1 shifts to index
            }
        }
        self.spans.retain(|s| s.row_span * s.col_span > 1);
        self.rows.remove(index)
    }

    /// Insert a column at an index, growing horizontal spans that straddle it
    pub fn insert_column_at(&mut self, index: usize, cells: Vec<Cell>) {
        debug_assert_eq!(cells.len(), self.row_count());
        for span in &mut self.spans {
            if span.col >= index {
                span.col += 1;
            } else if index < span.col + span.col_span {
                span.col_span += 1;
            }
        }
        for (row, cell) in self.rows.iter_mut().zip(cells) {
            row.cells.insert(index, cell);
        }
    }

    /// Remove a column, truncating spans that intersect it
    pub fn remove_column(&mut self, index: usize) -> Vec<Cell> {
        self.spans.retain(|s| !(s.intersects_col(index) && s.col_span == 1));
        for span in &mut self.spans {
            if span.col > index {
                span.col -= 1;
            } else if span.intersects_col(index) {
                span.col_span -= 1;
            }
        }
        self.spans.retain(|s| s.row_span * s.col_span > 1);
        self.rows
            .iter_mut()
            .map(|row| row.cells.remove(index))
            .collect()
    }

    /// Iterate the paragraphs of all addressable (non-covered) cells in
    /// row-major order
    pub fn paragraphs(&self) -> impl Iterator<Item = &Paragraph> {
        self.rows.iter().enumerate().flat_map(move |(r, row)| {
            row.cells.iter().enumerate().flat_map(move |(c, cell)| {
                let covered = self.is_covered(r, c);
                cell.paragraphs
                    .iter()
                    .filter(move |_| !covered)
            })
        })
    }

    /// Cell texts as a grid, covered placeholders rendered empty
    pub fn to_grid(&self) -> Vec<Vec<String>> {
        self.rows
            .iter()
            .enumerate()
            .map(|(r, row)| {
                row.cells
                    .iter()
                    .enumerate()
                    .map(|(c, cell)| {
                        if self.is_covered(r, c) {
                            String::new()
                        } else {
                            cell.text()
                        }
                    })
                    .collect()
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::IdAllocator;

    fn build_table(alloc: &mut IdAllocator, rows: usize, cols: usize) -> Table {
        let mut table = Table::new(alloc.assign());
        for r in 0..rows {
            let cells = (0..cols)
                .map(|c| {
                    Cell::new(Paragraph::with_text(
                        alloc.assign(),
                        format!("r{}c{}", r, c),
                    ))
                })
                .collect();
            table.rows.push(TableRow::new(cells));
        }
        table
    }

    #[test]
    fn grid_is_uniform() {
        let mut alloc = IdAllocator::new();
        let table = build_table(&mut alloc, 3, 4);
        assert!(table.is_uniform());
        assert_eq!(table.row_count(), 3);
        assert_eq!(table.column_count(), 4);
    }

    #[test]
    fn span_covers_excludes_origin() {
        let span = CellSpan::new(0, 0, 2, 2);
        assert!(!span.covers(0, 0));
        assert!(span.covers(0, 1));
        assert!(span.covers(1, 1));
        assert!(!span.covers(2, 0));
    }

    #[test]
    fn insert_row_shifts_spans_below() {
        let mut alloc = IdAllocator::new();
        let mut table = build_table(&mut alloc, 3, 2);
        table.add_span(CellSpan::new(2, 0, 1, 2));
        let cells = (0..2)
            .map(|_| Cell::new(Paragraph::new(alloc.assign())))
            .collect();
        table.insert_row_at(0, TableRow::new(cells));
        assert_eq!(table.spans[0].row, 3);
        assert!(table.is_uniform());
    }

    #[test]
    fn insert_row_inside_span_grows_it() {
        let mut alloc = IdAllocator::new();
        let mut table = build_table(&mut alloc, 3, 2);
        table.add_span(CellSpan::new(0, 0, 3, 1));
        let cells = (0..2)
            .map(|_| Cell::new(Paragraph::new(alloc.assign())))
            .collect();
        table.insert_row_at(1, TableRow::new(cells));
        assert_eq!(table.spans[0].row_span, 4);
    }

    #[test]
    fn remove_row_drops_flat_span_and_shrinks_tall_one() {
        let mut alloc = IdAllocator::new();
        let mut table = build_table(&mut alloc, 4, 2);
        table.add_span(CellSpan::new(1, 0, 1, 2));
        table.add_span(CellSpan::new(2, 1, 2, 1));
        table.remove_row(1);
        assert_eq!(table.spans.len(), 1);
        assert_eq!(table.spans[0], CellSpan::new(1, 1, 2, 1));
    }

    #[test]
    fn remove_column_mirrors_row_behavior() {
        let mut alloc = IdAllocator::new();
        let mut table = build_table(&mut alloc, 2, 3);
        table.add_span(CellSpan::new(0, 1, 1, 2));
        table.remove_column(2);
        assert_eq!(table.spans[0], CellSpan::new(0, 1, 1, 1));
        assert_eq!(table.column_count(), 2);
        assert!(table.is_uniform());
    }

    #[test]
    fn covered_cells_render_empty_in_grid() {
        let mut alloc = IdAllocator::new();
        let mut table = build_table(&mut alloc, 2, 2);
        table.add_span(CellSpan::new(0, 0, 1, 2));
        let grid = table.to_grid();
        assert_eq!(grid[0][0], "r0c0");
        assert_eq!(grid[0][1], "");
        assert_eq!(grid[1][1], "r1c1");
    }
}
