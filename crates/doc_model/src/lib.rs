//! Document Model - Core document tree structure and types
//!
//! This crate provides the foundational document model: a closed set of
//! tagged element variants (paragraphs, runs, tables, cells) owned directly
//! by the document, with session-stable element IDs.

mod bookmark;
mod document;
mod element_id;
mod error;
mod paragraph;
mod run;
pub mod style;
pub mod table;

pub use bookmark::*;
pub use document::*;
pub use element_id::*;
pub use error::*;
pub use paragraph::*;
pub use run::*;
pub use style::*;
pub use table::*;
