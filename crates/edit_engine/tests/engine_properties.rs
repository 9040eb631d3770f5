//! Cross-operation properties of the mutation engine
//!
//! These run sequences of structural edits against one document and check
//! the invariants that must hold regardless of order: stable IDs, uniform
//! table grids, inverse split/merge, and failed operations leaving the
//! tree untouched.

use doc_model::{Block, Document, ElementId};
use edit_engine::{
    apply_formatting, clear_formatting, delete_table_column, delete_table_row, insert_paragraph,
    insert_table, insert_table_column, insert_table_row, merge_cells, merge_paragraphs,
    move_paragraph, replace_text, split_paragraph, EditError, FormatTarget, FormattingUpdate,
    InsertPosition, ReplaceScope, SplitPoint,
};

fn grid(rows: &[&[&str]]) -> Vec<Vec<String>> {
    rows.iter()
        .map(|r| r.iter().map(|c| c.to_string()).collect())
        .collect()
}

#[test]
fn ids_survive_unrelated_edits() {
    let mut doc = Document::new();
    let keep = doc.push_paragraph("keep me addressable");
    doc.push_paragraph("filler one");
    let victim = doc.push_paragraph("delete me");

    insert_paragraph(&mut doc, "front matter", InsertPosition::AtIndex(0), None).unwrap();
    move_paragraph(&mut doc, keep, InsertPosition::Append).unwrap();
    doc.remove_block(victim).unwrap();
    replace_text(&mut doc, "filler", "padding", ReplaceScope::Document).unwrap();

    let resolved = doc.paragraph(keep).unwrap();
    assert_eq!(resolved.text(), "keep me addressable");
    assert!(doc.resolve(victim).is_err());
}

#[test]
fn table_grid_stays_uniform_through_op_sequence() {
    let mut doc = Document::new();
    let id = insert_table(
        &mut doc,
        &grid(&[&["a", "b", "c"], &["d", "e", "f"], &["g", "h", "i"]]),
        InsertPosition::Append,
    )
    .unwrap();

    insert_table_row(&mut doc, id, 1).unwrap();
    insert_table_column(&mut doc, id, 0).unwrap();
    merge_cells(&mut doc, id, (0, 1), (1, 2)).unwrap();
    delete_table_row(&mut doc, id, 3, false).unwrap();
    delete_table_column(&mut doc, id, 3, false).unwrap();
    delete_table_row(&mut doc, id, 0, true).unwrap();

    let table = doc.table(id).unwrap();
    assert!(table.is_uniform());
    for span in &table.spans {
        assert!(span.row + span.row_span <= table.row_count());
        assert!(span.col + span.col_span <= table.column_count());
    }
}

#[test]
fn split_then_merge_restores_text_and_id() {
    let mut doc = Document::new();
    let id = doc.push_paragraph("The quick brown fox jumps over the lazy dog");
    for k in [1, 9, 19, 43] {
        let second = split_paragraph(&mut doc, id, SplitPoint::Offset(k)).unwrap();
        merge_paragraphs(&mut doc, id, second, None).unwrap();
        assert_eq!(
            doc.paragraph(id).unwrap().text(),
            "The quick brown fox jumps over the lazy dog"
        );
        assert!(doc.resolve(second).is_err());
    }
    assert_eq!(doc.body.len(), 1);
}

#[test]
fn clear_formatting_is_idempotent_after_rich_edits() {
    let mut doc = Document::new();
    let id = doc.push_paragraph("some richly formatted text");
    apply_formatting(
        &mut doc,
        FormatTarget::RunRange {
            paragraph: id,
            start: 5,
            end: 11,
        },
        &FormattingUpdate {
            bold: Some(true),
            font_size: Some(18.0),
            ..Default::default()
        },
    )
    .unwrap();
    apply_formatting(
        &mut doc,
        FormatTarget::Paragraph(id),
        &FormattingUpdate {
            italic: Some(true),
            ..Default::default()
        },
    )
    .unwrap();

    clear_formatting(&mut doc, FormatTarget::Paragraph(id)).unwrap();
    let once: Vec<_> = doc.paragraph(id).unwrap().runs.clone();
    clear_formatting(&mut doc, FormatTarget::Paragraph(id)).unwrap();
    let twice: Vec<_> = doc.paragraph(id).unwrap().runs.clone();
    assert_eq!(once, twice);
    assert!(once.iter().all(|r| r.properties.is_empty()));
    assert_eq!(doc.paragraph(id).unwrap().text(), "some richly formatted text");
}

#[test]
fn failed_ops_leave_the_document_untouched() {
    let mut doc = Document::new();
    let id = doc.push_paragraph("stable content");
    let tid = insert_table(&mut doc, &grid(&[&["x", "y"]]), InsertPosition::Append).unwrap();
    let before = serde_json::to_string(&doc).unwrap();

    assert!(insert_paragraph(&mut doc, "z", InsertPosition::AtIndex(99), None).is_err());
    assert!(split_paragraph(&mut doc, id, SplitPoint::Offset(999)).is_err());
    assert!(merge_cells(&mut doc, tid, (0, 0), (5, 5)).is_err());
    assert!(matches!(
        apply_formatting(
            &mut doc,
            FormatTarget::Paragraph(id),
            &FormattingUpdate {
                style_name: Some("Nonexistent".to_string()),
                ..Default::default()
            },
        ),
        Err(EditError::UnknownStyle(_))
    ));

    let after = serde_json::to_string(&doc).unwrap();
    assert_eq!(before, after);
}

#[test]
fn deleted_table_ids_stay_dead_for_cell_paragraphs() {
    let mut doc = Document::new();
    let tid = insert_table(&mut doc, &grid(&[&["a", "b"]]), InsertPosition::Append).unwrap();
    let cell_ids: Vec<ElementId> = match &doc.body[0] {
        Block::Table(t) => t.paragraphs().map(|p| p.id()).collect(),
        Block::Paragraph(_) => unreachable!(),
    };
    doc.remove_block(tid).unwrap();
    for id in cell_ids {
        assert!(doc.resolve(id).is_err());
    }
}
