//! Placeholder grammar and discovery
//!
//! Two delimiter styles are recognized: `<<name>>` where the name is one or
//! more non-`>` characters, and `{{name}}` where the name is one or more
//! non-`}` characters. Names are taken verbatim: no trimming, case
//! sensitive.

use doc_model::{Block, Document, ElementId};
use regex_lite::Regex;
use serde::Serialize;
use std::sync::OnceLock;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DelimiterStyle {
    /// `<<name>>`
    Angle,
    /// `{{name}}`
    Brace,
}

/// Where the paragraph holding a placeholder lives
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PlaceholderHost {
    Body,
    TableCell {
        table: ElementId,
        row: usize,
        col: usize,
    },
    Header,
    Footer,
}

/// One placeholder occurrence. Ranges are byte offsets into the paragraph
/// text at scan time; any mutation invalidates them.
#[derive(Debug, Clone, Serialize)]
pub struct Placeholder {
    pub name: String,
    pub style: DelimiterStyle,
    pub paragraph: ElementId,
    pub host: PlaceholderHost,
    pub range: (usize, usize),
    /// Surrounding paragraph text, trimmed to a readable window
    pub context: String,
}

fn pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"<<([^>]+)>>|\{\{([^}]+)\}\}").expect("static pattern"))
}

/// All placeholder occurrences in one text, in order
pub fn scan(text: &str) -> Vec<(String, DelimiterStyle, usize, usize)> {
    pattern()
        .captures_iter(text)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            if let Some(name) = caps.get(1) {
                Some((
                    name.as_str().to_string(),
                    DelimiterStyle::Angle,
                    whole.start(),
                    whole.end(),
                ))
            } else {
                caps.get(2).map(|name| {
                    (
                        name.as_str().to_string(),
                        DelimiterStyle::Brace,
                        whole.start(),
                        whole.end(),
                    )
                })
            }
        })
        .collect()
}

const CONTEXT_WINDOW: usize = 30;

fn context_around(text: &str, start: usize, end: usize) -> String {
    let mut from = start.saturating_sub(CONTEXT_WINDOW);
    while from > 0 && !text.is_char_boundary(from) {
        from -= 1;
    }
    let mut to = (end + CONTEXT_WINDOW).min(text.len());
    while to < text.len() && !text.is_char_boundary(to) {
        to += 1;
    }
    text[from..to].to_string()
}

fn collect_from(
    out: &mut Vec<Placeholder>,
    paragraph: ElementId,
    host: PlaceholderHost,
    text: &str,
) {
    for (name, style, start, end) in scan(text) {
        out.push(Placeholder {
            name,
            style,
            paragraph,
            host,
            range: (start, end),
            context: context_around(text, start, end),
        });
    }
}

/// List every placeholder in the document: body, table cells (skipping
/// merged-away cells), headers and footers, in document order.
pub fn list_placeholders(doc: &Document) -> Vec<Placeholder> {
    let mut out = Vec::new();
    for block in &doc.body {
        match block {
            Block::Paragraph(p) => {
                collect_from(&mut out, p.id(), PlaceholderHost::Body, &p.text());
            }
            Block::Table(t) => {
                for (r, row) in t.rows.iter().enumerate() {
                    for (c, cell) in row.cells.iter().enumerate() {
                        if t.is_covered(r, c) {
                            continue;
                        }
                        for p in &cell.paragraphs {
                            collect_from(
                                &mut out,
                                p.id(),
                                PlaceholderHost::TableCell {
                                    table: t.id(),
                                    row: r,
                                    col: c,
                                },
                                &p.text(),
                            );
                        }
                    }
                }
            }
        }
    }
    for p in &doc.header {
        collect_from(&mut out, p.id(), PlaceholderHost::Header, &p.text());
    }
    for p in &doc.footer {
        collect_from(&mut out, p.id(), PlaceholderHost::Footer, &p.text());
    }
    out
}
