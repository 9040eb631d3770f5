//! Session - the single live document and its package I/O
//!
//! Owns at most one open `Document` at a time, reached through explicit
//! open/switch/save calls rather than global state. The package container
//! format sits behind the `FormatReader`/`FormatWriter` traits.

mod discovery;
mod error;
mod io;
mod session;

pub use discovery::*;
pub use error::*;
pub use io::*;
pub use session::*;
