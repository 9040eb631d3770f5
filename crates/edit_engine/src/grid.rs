//! Plain-text table grid detection and parsing
//!
//! Two input shapes are recognized: markdown pipe tables (separator rows
//! of dashes/colons are skipped) and tab-delimited lines. Rows may differ
//! by at most one column; anything looser is rejected as malformed.

use crate::error::{EditError, Result};
use regex_lite::Regex;
use std::sync::OnceLock;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridFormat {
    Markdown,
    TabDelimited,
}

fn separator_row() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    // e.g. "| --- | :---: |"
    RE.get_or_init(|| Regex::new(r"^\s*\|[\s\-:|]+\|\s*$").expect("static pattern"))
}

/// Whether a single line looks like a table row in either format
pub fn looks_tabular(line: &str) -> bool {
    let trimmed = line.trim();
    (trimmed.starts_with('|') && trimmed.ends_with('|') && trimmed.len() > 1)
        || line.contains('\t')
}

/// Detect the grid format of a block of lines, if any
pub fn detect(lines: &[&str]) -> Option<GridFormat> {
    let non_empty: Vec<&str> = lines.iter().map(|l| l.trim()).filter(|l| !l.is_empty()).collect();
    if non_empty.is_empty() {
        return None;
    }
    if non_empty
        .iter()
        .all(|l| l.starts_with('|') && l.ends_with('|') && l.len() > 1)
    {
        return Some(GridFormat::Markdown);
    }
    if non_empty.iter().all(|l| l.contains('\t')) {
        return Some(GridFormat::TabDelimited);
    }
    None
}

/// Parse lines in a known format into a rectangular grid of cell texts.
///
/// Short rows (within one column of the widest) are padded with empty
/// cells; a larger spread is `MalformedTable`.
pub fn parse(lines: &[&str], format: GridFormat) -> Result<Vec<Vec<String>>> {
    let sep = separator_row();
    let mut rows: Vec<Vec<String>> = Vec::new();
    for line in lines {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        match format {
            GridFormat::Markdown => {
                if sep.is_match(trimmed) {
                    continue;
                }
                let inner = trimmed
                    .strip_prefix('|')
                    .and_then(|l| l.strip_suffix('|'))
                    .ok_or_else(|| {
                        EditError::MalformedTable(format!("not a markdown table row: {trimmed:?}"))
                    })?;
                rows.push(inner.split('|').map(|c| c.trim().to_string()).collect());
            }
            GridFormat::TabDelimited => {
                rows.push(line.split('\t').map(|c| c.trim().to_string()).collect());
            }
        }
    }
    if rows.is_empty() {
        return Err(EditError::MalformedTable("no table rows found".to_string()));
    }
    let max = rows.iter().map(Vec::len).max().unwrap_or(0);
    let min = rows.iter().map(Vec::len).min().unwrap_or(0);
    if max - min > 1 {
        return Err(EditError::MalformedTable(format!(
            "inconsistent row widths: between {min} and {max} columns"
        )));
    }
    for row in &mut rows {
        row.resize(max, String::new());
    }
    Ok(rows)
}

/// Detect and parse in one step
pub fn parse_auto(text: &str) -> Result<Vec<Vec<String>>> {
    let lines: Vec<&str> = text.lines().collect();
    let format = detect(&lines)
        .ok_or_else(|| EditError::MalformedTable("unrecognized table text".to_string()))?;
    parse(&lines, format)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_markdown_and_skips_separator() {
        let text = "| Name | Role |\n| --- | :---: |\n| Ada | Engineer |";
        let grid = parse_auto(text).unwrap();
        assert_eq!(grid, vec![vec!["Name", "Role"], vec!["Ada", "Engineer"]]);
    }

    #[test]
    fn detects_tab_delimited() {
        let text = "Name\tRole\nAda\tEngineer";
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(detect(&lines), Some(GridFormat::TabDelimited));
        let grid = parse(&lines, GridFormat::TabDelimited).unwrap();
        assert_eq!(grid[1], vec!["Ada", "Engineer"]);
    }

    #[test]
    fn pads_rows_one_column_short() {
        let text = "a\tb\tc\nd\te";
        let grid = parse_auto(text).unwrap();
        assert_eq!(grid[1], vec!["d", "e", ""]);
    }

    #[test]
    fn rejects_wider_spread() {
        let text = "a\tb\tc\nd";
        let lines: Vec<&str> = text.lines().collect();
        // "d" has no tab so detection already fails
        assert_eq!(detect(&lines), None);
        let err = parse(&lines, GridFormat::TabDelimited).unwrap_err();
        assert!(matches!(err, EditError::MalformedTable(_)));
    }

    #[test]
    fn plain_prose_is_not_a_grid() {
        assert!(parse_auto("just a sentence").is_err());
        assert!(!looks_tabular("just a sentence"));
        assert!(looks_tabular("| a | b |"));
        assert!(looks_tabular("a\tb"));
    }
}
