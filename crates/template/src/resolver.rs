//! In-place placeholder substitution
//!
//! A replacement takes the formatting of the run containing the opening
//! delimiter; when a placeholder spans runs, the spanning runs are re-cut
//! so surrounding formatting survives. Names with no occurrence simply
//! count zero; they are never an error.

use crate::error::Result;
use crate::placeholder::scan;
use doc_model::{Block, Document, Paragraph};
use serde::Serialize;
use std::collections::BTreeMap;

/// Per-name substitution counts for one pass
#[derive(Debug, Clone, Default, Serialize)]
pub struct SubstitutionReport {
    pub counts: BTreeMap<String, usize>,
    pub total: usize,
}

fn substitute_in_paragraph(
    p: &mut Paragraph,
    values: &BTreeMap<String, String>,
    report: &mut SubstitutionReport,
) -> Result<()> {
    let mut search_from = 0;
    loop {
        let text = p.text();
        let next = scan(&text)
            .into_iter()
            .find(|(name, _, start, _)| *start >= search_from && values.contains_key(name));
        let Some((name, _, start, end)) = next else {
            break;
        };
        let value = &values[&name];
        p.replace_range(start, end, value)?;
        // resume past the inserted value so a value that itself looks like
        // a placeholder is left alone
        search_from = start + value.len();
        *report.counts.entry(name).or_insert(0) += 1;
        report.total += 1;
    }
    Ok(())
}

/// Substitute several placeholder names in one pass over the document
pub fn replace_many(
    doc: &mut Document,
    values: &BTreeMap<String, String>,
) -> Result<SubstitutionReport> {
    let mut report = SubstitutionReport::default();
    for name in values.keys() {
        report.counts.insert(name.clone(), 0);
    }
    for block in &mut doc.body {
        match block {
            Block::Paragraph(p) => substitute_in_paragraph(p, values, &mut report)?,
            Block::Table(t) => {
                let spans = t.spans.clone();
                for (r, row) in t.rows.iter_mut().enumerate() {
                    for (c, cell) in row.cells.iter_mut().enumerate() {
                        if spans.iter().any(|s| s.covers(r, c)) {
                            continue;
                        }
                        for p in &mut cell.paragraphs {
                            substitute_in_paragraph(p, values, &mut report)?;
                        }
                    }
                }
            }
        }
    }
    for p in doc.header.iter_mut().chain(doc.footer.iter_mut()) {
        substitute_in_paragraph(p, values, &mut report)?;
    }
    if report.total > 0 {
        doc.touch();
    }
    Ok(report)
}

/// Substitute one placeholder name, returning how many occurrences changed
pub fn replace_one(doc: &mut Document, name: &str, value: &str) -> Result<usize> {
    let mut values = BTreeMap::new();
    values.insert(name.to_string(), value.to_string());
    let report = replace_many(doc, &values)?;
    Ok(report.total)
}

#[cfg(test)]
mod tests {
    use super::*;
    use doc_model::{Run, RunProperties};

    fn values(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn substitutes_both_delimiter_styles() {
        let mut doc = Document::new();
        doc.push_paragraph("Dear <<Name>>, regarding {{Date}}.");
        let report =
            replace_many(&mut doc, &values(&[("Name", "Acme"), ("Date", "Jan 1")])).unwrap();
        assert_eq!(doc.text_content(), "Dear Acme, regarding Jan 1.");
        assert_eq!(report.counts["Name"], 1);
        assert_eq!(report.counts["Date"], 1);
        assert_eq!(report.total, 2);
    }

    #[test]
    fn surrounding_formatting_survives() {
        let mut doc = Document::new();
        let id = doc.push_paragraph("");
        let bold = RunProperties {
            bold: Some(true),
            ..Default::default()
        };
        doc.paragraph_mut(id).unwrap().runs = vec![
            Run::new("Dear "),
            Run::with_properties("<<Name>>", bold.clone()),
            Run::new(", hello"),
        ];
        replace_one(&mut doc, "Name", "Acme").unwrap();
        let p = doc.paragraph(id).unwrap();
        assert_eq!(p.text(), "Dear Acme, hello");
        // the replacement took the placeholder run's formatting
        let acme = p.runs.iter().find(|r| r.text.contains("Acme")).unwrap();
        assert_eq!(acme.properties.bold, Some(true));
        assert_eq!(p.runs.first().unwrap().properties.bold, None);
    }

    #[test]
    fn placeholder_spanning_runs_is_replaced() {
        let mut doc = Document::new();
        let id = doc.push_paragraph("");
        doc.paragraph_mut(id).unwrap().runs =
            vec![Run::new("start <<Na"), Run::new("me>> end")];
        let n = replace_one(&mut doc, "Name", "Acme").unwrap();
        assert_eq!(n, 1);
        assert_eq!(doc.paragraph(id).unwrap().text(), "start Acme end");
    }

    #[test]
    fn unmatched_name_counts_zero() {
        let mut doc = Document::new();
        doc.push_paragraph("no placeholders here");
        let report = replace_many(&mut doc, &values(&[("Ghost", "boo")])).unwrap();
        assert_eq!(report.counts["Ghost"], 0);
        assert_eq!(report.total, 0);
    }

    #[test]
    fn value_resembling_a_placeholder_is_not_rescanned() {
        let mut doc = Document::new();
        doc.push_paragraph("<<A>>");
        let n = replace_one(&mut doc, "A", "<<A>>").unwrap();
        assert_eq!(n, 1);
        assert_eq!(doc.text_content(), "<<A>>");
    }

    #[test]
    fn repeated_occurrences_all_change() {
        let mut doc = Document::new();
        doc.push_paragraph("{{x}} and {{x}} and {{x}}");
        let n = replace_one(&mut doc, "x", "y").unwrap();
        assert_eq!(n, 3);
        assert_eq!(doc.text_content(), "y and y and y");
    }
}
