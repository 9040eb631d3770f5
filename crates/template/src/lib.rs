//! Template - placeholder discovery and substitution
//!
//! Placeholders are `<<name>>` or `{{name}}` markers left in a document's
//! text; this crate finds them and fills them in while preserving the
//! surrounding formatting.

mod error;
mod placeholder;
mod resolver;

pub use error::*;
pub use placeholder::*;
pub use resolver::*;
