//! Error types for the mutation engine

use thiserror::Error;

#[derive(Debug, Error)]
pub enum EditError {
    /// No element matched the query or ID
    #[error("not found: {0}")]
    NotFound(String),

    /// Several candidates matched with near-equal confidence; the caller
    /// must disambiguate
    #[error("ambiguous match for {query:?}: {} candidates", candidates.len())]
    AmbiguousMatch {
        query: String,
        candidates: Vec<String>,
    },

    /// Index, offset or anchor outside the valid range
    #[error("invalid position: {0}")]
    InvalidPosition(String),

    /// The operation would destroy part of a merged cell region
    #[error("merge conflict at row {row}, column {col}")]
    MergeConflict { row: usize, col: usize },

    /// Rows of unequal length or other grid-structure violation
    #[error("malformed table: {0}")]
    MalformedTable(String),

    /// Style name not present in the document's style registry
    #[error("unknown style: {0:?}")]
    UnknownStyle(String),

    #[error(transparent)]
    Model(#[from] doc_model::DocModelError),
}

impl EditError {
    /// Stable machine-readable tag for callers that branch on error class
    pub fn kind(&self) -> &'static str {
        match self {
            EditError::NotFound(_) => "not_found",
            EditError::AmbiguousMatch { .. } => "ambiguous_match",
            EditError::InvalidPosition(_) => "invalid_position",
            EditError::MergeConflict { .. } => "merge_conflict",
            EditError::MalformedTable(_) => "malformed_table",
            EditError::UnknownStyle(_) => "unknown_style",
            EditError::Model(doc_model::DocModelError::ElementNotFound(_)) => "not_found",
            EditError::Model(doc_model::DocModelError::InvalidOffset { .. }) => "invalid_position",
            EditError::Model(_) => "invalid_operation",
        }
    }
}

pub type Result<T> = std::result::Result<T, EditError>;
