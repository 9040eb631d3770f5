//! Edit Engine - Fuzzy locator and structural mutation operations
//!
//! Every operation validates its inputs against the live document before
//! touching it; a failed call leaves the tree exactly as it was.

mod error;
mod find_replace;
mod format_ops;
pub mod grid;
mod locator;
mod paragraph_ops;
mod table_ops;

pub use error::*;
pub use find_replace::*;
pub use format_ops::*;
pub use locator::*;
pub use paragraph_ops::*;
pub use table_ops::*;
