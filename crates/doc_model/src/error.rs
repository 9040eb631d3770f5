//! Error types for document model operations

use crate::ElementId;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DocModelError {
    #[error("Element not found: {0}")]
    ElementNotFound(ElementId),

    #[error("Invalid offset {offset} in element {element} (length {len})")]
    InvalidOffset {
        element: ElementId,
        offset: usize,
        len: usize,
    },

    #[error("Invalid operation: {0}")]
    InvalidOperation(String),
}

pub type Result<T> = std::result::Result<T, DocModelError>;
