//! Error type for placeholder substitution

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TemplateError {
    #[error(transparent)]
    Model(#[from] doc_model::DocModelError),
}

pub type Result<T> = std::result::Result<T, TemplateError>;
