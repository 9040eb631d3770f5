//! Document root: the element tree, ID table, styles and properties

use crate::{
    DocModelError, ElementId, IdAllocator, Paragraph, Result, StyleRegistry, Table,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Core document metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentProperties {
    pub title: Option<String>,
    pub author: Option<String>,
    pub created: DateTime<Utc>,
    pub modified: DateTime<Utc>,
}

impl DocumentProperties {
    fn new() -> Self {
        let now = Utc::now();
        Self {
            title: None,
            author: None,
            created: now,
            modified: now,
        }
    }
}

/// A top-level body element
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Block {
    Paragraph(Paragraph),
    Table(Table),
}

impl Block {
    pub fn id(&self) -> ElementId {
        match self {
            Block::Paragraph(p) => p.id(),
            Block::Table(t) => t.id(),
        }
    }
}

/// A resolved element reference
#[derive(Debug)]
pub enum Resolved<'a> {
    Paragraph(&'a Paragraph),
    Table(&'a Table),
}

/// Where a paragraph lives in the tree
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParagraphHome {
    Body {
        block: usize,
    },
    Cell {
        block: usize,
        row: usize,
        col: usize,
        index: usize,
    },
    Header {
        index: usize,
    },
    Footer {
        index: usize,
    },
}

/// An in-memory document: an ordered body of paragraphs and tables, plus
/// header/footer paragraphs, the style table and the ID allocator.
///
/// Element positions are never cached; anything positional is recomputed
/// by walking the body in order at lookup time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    uuid: Uuid,
    pub body: Vec<Block>,
    #[serde(default)]
    pub header: Vec<Paragraph>,
    #[serde(default)]
    pub footer: Vec<Paragraph>,
    pub properties: DocumentProperties,
    pub styles: StyleRegistry,
    ids: IdAllocator,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    pub fn new() -> Self {
        Self {
            uuid: Uuid::new_v4(),
            body: Vec::new(),
            header: Vec::new(),
            footer: Vec::new(),
            properties: DocumentProperties::new(),
            styles: StyleRegistry::new(),
            ids: IdAllocator::new(),
        }
    }

    pub fn uuid(&self) -> Uuid {
        self.uuid
    }

    /// Assign a fresh element ID
    pub fn alloc_id(&mut self) -> ElementId {
        self.ids.assign()
    }

    /// Tombstone an ID so later lookups fail instead of aliasing
    pub fn retire_id(&mut self, id: ElementId) {
        self.ids.retire(id);
    }

    pub fn is_retired(&self, id: ElementId) -> bool {
        self.ids.is_retired(id)
    }

    pub fn touch(&mut self) {
        self.properties.modified = Utc::now();
    }

    /// Resolve an ID to the element it names.
    ///
    /// Fails for IDs that were retired by a delete, and never reaches
    /// paragraphs sitting under a merged (covered) table cell.
    pub fn resolve(&self, id: ElementId) -> Result<Resolved<'_>> {
        if self.ids.is_retired(id) {
            return Err(DocModelError::ElementNotFound(id));
        }
        for block in &self.body {
            match block {
                Block::Paragraph(p) if p.id() == id => return Ok(Resolved::Paragraph(p)),
                Block::Table(t) if t.id() == id => return Ok(Resolved::Table(t)),
                Block::Table(t) => {
                    if let Some(p) = t.paragraphs().find(|p| p.id() == id) {
                        return Ok(Resolved::Paragraph(p));
                    }
                }
                _ => {}
            }
        }
        if let Some(p) = self
            .header
            .iter()
            .chain(self.footer.iter())
            .find(|p| p.id() == id)
        {
            return Ok(Resolved::Paragraph(p));
        }
        Err(DocModelError::ElementNotFound(id))
    }

    /// Body index of a top-level block, recomputed by a linear pass
    pub fn position_of(&self, id: ElementId) -> Option<usize> {
        self.body.iter().position(|b| b.id() == id)
    }

    /// Find where a paragraph lives. Covered cells are skipped.
    pub fn locate_paragraph(&self, id: ElementId) -> Option<ParagraphHome> {
        if self.ids.is_retired(id) {
            return None;
        }
        for (bi, block) in self.body.iter().enumerate() {
            match block {
                Block::Paragraph(p) if p.id() == id => {
                    return Some(ParagraphHome::Body { block: bi });
                }
                Block::Table(t) => {
                    for (r, row) in t.rows.iter().enumerate() {
                        for (c, cell) in row.cells.iter().enumerate() {
                            if t.is_covered(r, c) {
                                continue;
                            }
                            for (pi, p) in cell.paragraphs.iter().enumerate() {
                                if p.id() == id {
                                    return Some(ParagraphHome::Cell {
                                        block: bi,
                                        row: r,
                                        col: c,
                                        index: pi,
                                    });
                                }
                            }
                        }
                    }
                }
                _ => {}
            }
        }
        if let Some(i) = self.header.iter().position(|p| p.id() == id) {
            return Some(ParagraphHome::Header { index: i });
        }
        if let Some(i) = self.footer.iter().position(|p| p.id() == id) {
            return Some(ParagraphHome::Footer { index: i });
        }
        None
    }

    pub fn paragraph(&self, id: ElementId) -> Result<&Paragraph> {
        match self.resolve(id)? {
            Resolved::Paragraph(p) => Ok(p),
            Resolved::Table(_) => Err(DocModelError::InvalidOperation(format!(
                "{id} is a table, not a paragraph"
            ))),
        }
    }

    pub fn paragraph_mut(&mut self, id: ElementId) -> Result<&mut Paragraph> {
        let home = self
            .locate_paragraph(id)
            .ok_or(DocModelError::ElementNotFound(id))?;
        match home {
            ParagraphHome::Body { block } => {
                if let Block::Paragraph(p) = &mut self.body[block] {
                    return Ok(p);
                }
            }
            ParagraphHome::Cell {
                block,
                row,
                col,
                index,
            } => {
                if let Block::Table(t) = &mut self.body[block] {
                    return Ok(&mut t.rows[row].cells[col].paragraphs[index]);
                }
            }
            ParagraphHome::Header { index } => return Ok(&mut self.header[index]),
            ParagraphHome::Footer { index } => return Ok(&mut self.footer[index]),
        }
        Err(DocModelError::ElementNotFound(id))
    }

    pub fn table(&self, id: ElementId) -> Result<&Table> {
        match self.resolve(id)? {
            Resolved::Table(t) => Ok(t),
            Resolved::Paragraph(_) => Err(DocModelError::InvalidOperation(format!(
                "{id} is a paragraph, not a table"
            ))),
        }
    }

    pub fn table_mut(&mut self, id: ElementId) -> Result<&mut Table> {
        if self.ids.is_retired(id) {
            return Err(DocModelError::ElementNotFound(id));
        }
        for block in &mut self.body {
            if let Block::Table(t) = block {
                if t.id() == id {
                    return Ok(t);
                }
            }
        }
        Err(DocModelError::ElementNotFound(id))
    }

    /// All body paragraphs in document order, descending into table cells
    pub fn paragraphs(&self) -> impl Iterator<Item = &Paragraph> {
        self.body.iter().flat_map(|block| {
            let items: Vec<&Paragraph> = match block {
                Block::Paragraph(p) => vec![p],
                Block::Table(t) => t.paragraphs().collect(),
            };
            items
        })
    }

    /// Header and footer paragraphs
    pub fn margin_paragraphs(&self) -> impl Iterator<Item = &Paragraph> {
        self.header.iter().chain(self.footer.iter())
    }

    /// Append a paragraph to the body with the given text
    pub fn push_paragraph(&mut self, text: &str) -> ElementId {
        let id = self.ids.assign();
        self.body
            .push(Block::Paragraph(Paragraph::with_text(id, text)));
        id
    }

    /// Insert a block at a body index
    pub fn insert_block_at(&mut self, index: usize, block: Block) -> Result<()> {
        if index > self.body.len() {
            return Err(DocModelError::InvalidOperation(format!(
                "body index {index} out of range 0..={}",
                self.body.len()
            )));
        }
        self.body.insert(index, block);
        Ok(())
    }

    /// Remove a top-level block and tombstone it (and, for tables, every
    /// cell paragraph under it)
    pub fn remove_block(&mut self, id: ElementId) -> Result<Block> {
        let index = self
            .position_of(id)
            .ok_or(DocModelError::ElementNotFound(id))?;
        let block = self.body.remove(index);
        self.ids.retire(id);
        if let Block::Table(t) = &block {
            for p in t.rows.iter().flat_map(|r| &r.cells).flat_map(|c| &c.paragraphs) {
                self.ids.retire(p.id());
            }
        }
        Ok(block)
    }

    /// Full document text: body paragraphs joined with newlines
    pub fn text_content(&self) -> String {
        self.paragraphs()
            .map(|p| p.text())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Cell, CellSpan, TableRow};

    fn doc_with_table() -> (Document, ElementId) {
        let mut doc = Document::new();
        doc.push_paragraph("intro");
        let tid = doc.alloc_id();
        let mut table = Table::new(tid);
        for r in 0..2 {
            let cells = (0..2)
                .map(|c| {
                    let pid = doc.alloc_id();
                    Cell::new(Paragraph::with_text(pid, format!("r{}c{}", r, c)))
                })
                .collect();
            table.rows.push(TableRow::new(cells));
        }
        doc.body.push(Block::Table(table));
        (doc, tid)
    }

    #[test]
    fn resolve_reaches_cell_paragraphs() {
        let (doc, tid) = doc_with_table();
        let cell_pid = doc.table(tid).unwrap().rows[1].cells[0].paragraphs[0].id();
        match doc.resolve(cell_pid).unwrap() {
            Resolved::Paragraph(p) => assert_eq!(p.text(), "r1c0"),
            Resolved::Table(_) => panic!("expected paragraph"),
        }
    }

    #[test]
    fn covered_cell_paragraph_is_unreachable() {
        let (mut doc, tid) = doc_with_table();
        let covered_pid = doc.table(tid).unwrap().rows[0].cells[1].paragraphs[0].id();
        doc.table_mut(tid).unwrap().add_span(CellSpan::new(0, 0, 1, 2));
        assert!(doc.resolve(covered_pid).is_err());
    }

    #[test]
    fn retired_id_never_resolves() {
        let mut doc = Document::new();
        let id = doc.push_paragraph("gone soon");
        doc.remove_block(id).unwrap();
        assert!(matches!(
            doc.resolve(id),
            Err(DocModelError::ElementNotFound(_))
        ));
        // the slot is empty but the ID stays dead
        let fresh = doc.push_paragraph("replacement");
        assert_ne!(fresh, id);
    }

    #[test]
    fn removing_table_retires_cell_paragraphs() {
        let (mut doc, tid) = doc_with_table();
        let cell_pid = doc.table(tid).unwrap().rows[0].cells[0].paragraphs[0].id();
        doc.remove_block(tid).unwrap();
        assert!(doc.resolve(cell_pid).is_err());
    }

    #[test]
    fn position_recomputed_after_insert() {
        let mut doc = Document::new();
        let a = doc.push_paragraph("a");
        let b = doc.push_paragraph("b");
        assert_eq!(doc.position_of(b), Some(1));
        let id = doc.alloc_id();
        doc.insert_block_at(0, Block::Paragraph(Paragraph::with_text(id, "front")))
            .unwrap();
        assert_eq!(doc.position_of(a), Some(1));
        assert_eq!(doc.position_of(b), Some(2));
    }

    #[test]
    fn text_content_walks_tables_in_order() {
        let (doc, _) = doc_with_table();
        assert_eq!(doc.text_content(), "intro\nr0c0\nr0c1\nr1c0\nr1c1");
    }

    #[test]
    fn json_round_trip_preserves_ids() {
        let (doc, tid) = doc_with_table();
        let json = serde_json::to_string(&doc).unwrap();
        let back: Document = serde_json::from_str(&json).unwrap();
        assert_eq!(back.uuid(), doc.uuid());
        assert!(back.table(tid).is_ok());
        assert_eq!(back.text_content(), doc.text_content());
    }
}
