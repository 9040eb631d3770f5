//! Fuzzy document discovery in a directory
//!
//! Matches a query against file stems: case-insensitive containment scores
//! high (0.8 floor), otherwise shared-token similarity, with a 0.3 cutoff.
//! Editor temp files (`~$` prefix) are skipped.

use crate::error::Result;
use std::cmp::Ordering;
use std::path::{Path, PathBuf};

/// One discovered document with its match score
#[derive(Debug, Clone)]
pub struct Discovered {
    pub path: PathBuf,
    pub score: f64,
}

const CONTAINMENT_FLOOR: f64 = 0.8;
const MIN_SCORE: f64 = 0.3;

fn tokens(s: &str) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for word in s.split(|c: char| !c.is_alphanumeric()) {
        let lower = word.to_lowercase();
        if !lower.is_empty() && !out.contains(&lower) {
            out.push(lower);
        }
    }
    out
}

fn stem_score(query: &str, stem: &str) -> f64 {
    let q = query.to_lowercase();
    let s = stem.to_lowercase();
    if s.contains(&q) || q.contains(&s) {
        // tighter containment (closer lengths) scores higher
        let ratio = q.len().min(s.len()) as f64 / q.len().max(s.len()) as f64;
        return CONTAINMENT_FLOOR + (1.0 - CONTAINMENT_FLOOR) * ratio;
    }
    let tq = tokens(&q);
    let ts = tokens(&s);
    if tq.is_empty() || ts.is_empty() {
        return 0.0;
    }
    let shared = tq.iter().filter(|t| ts.contains(*t)).count();
    let mut union = tq.clone();
    for t in &ts {
        if !union.contains(t) {
            union.push(t.clone());
        }
    }
    shared as f64 / union.len() as f64
}

/// Find package files under `dir` whose names match `query`, best first
pub fn find_documents(dir: &Path, query: &str, extension: &str) -> Result<Vec<Discovered>> {
    let mut found = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if !path.is_file() {
            continue;
        }
        if path.extension().and_then(|e| e.to_str()) != Some(extension) {
            continue;
        }
        let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
            continue;
        };
        if stem.starts_with("~$") {
            continue;
        }
        let score = stem_score(query, stem);
        if score >= MIN_SCORE {
            found.push(Discovered { path, score });
        }
    }
    found.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.path.cmp(&b.path))
    });
    Ok(found)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn containment_beats_token_overlap() {
        assert!(stem_score("report", "annual_report") > stem_score("report", "fourth report of many words here"));
        assert!(stem_score("quarterly report", "report_quarterly_2024") >= MIN_SCORE);
        assert!(stem_score("budget", "meeting_notes") < MIN_SCORE);
    }

    #[test]
    fn finds_and_ranks_files() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["annual_report.json", "report.json", "notes.json", "~$report.json"] {
            fs::write(dir.path().join(name), b"{}").unwrap();
        }
        fs::write(dir.path().join("report.txt"), b"x").unwrap();

        let found = find_documents(dir.path(), "report", "json").unwrap();
        let names: Vec<_> = found
            .iter()
            .map(|d| d.path.file_name().unwrap().to_str().unwrap().to_string())
            .collect();
        assert!(names.contains(&"report.json".to_string()));
        assert!(names.contains(&"annual_report.json".to_string()));
        assert!(!names.iter().any(|n| n.starts_with("~$")));
        assert!(!names.contains(&"notes.json".to_string()));
        // exact stem ranks first
        assert_eq!(names[0], "report.json");
    }
}
