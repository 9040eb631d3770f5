//! Session-level errors

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SessionError {
    /// The package bytes could not be parsed into a document
    #[error("malformed document: {0}")]
    MalformedDocument(String),

    #[error("i/o failure: {0}")]
    IOFailure(#[from] std::io::Error),

    /// An operation needed a live document and none is open
    #[error("no document is open")]
    NoActiveDocument,
}

pub type Result<T> = std::result::Result<T, SessionError>;
