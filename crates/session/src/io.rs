//! Package format seams
//!
//! The container format (zipped XML in the real package) is reached
//! through these traits; the engine itself only ever sees a `Document`.
//! `JsonPackage` is the bundled implementation used for storage and tests.

use crate::error::{Result, SessionError};
use doc_model::Document;

/// Parses package bytes into a document tree
pub trait FormatReader {
    fn read(&self, bytes: &[u8]) -> Result<Document>;
}

/// Serializes a document tree back to package bytes
pub trait FormatWriter {
    fn write(&self, doc: &Document) -> Result<Vec<u8>>;
}

/// JSON on-disk representation of the full document tree
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonPackage;

impl JsonPackage {
    /// File extension handled by this package format
    pub const EXTENSION: &'static str = "json";
}

impl FormatReader for JsonPackage {
    fn read(&self, bytes: &[u8]) -> Result<Document> {
        serde_json::from_slice(bytes)
            .map_err(|e| SessionError::MalformedDocument(e.to_string()))
    }
}

impl FormatWriter for JsonPackage {
    fn write(&self, doc: &Document) -> Result<Vec<u8>> {
        serde_json::to_vec_pretty(doc)
            .map_err(|e| SessionError::MalformedDocument(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip_preserves_structure() {
        let mut doc = Document::new();
        doc.push_paragraph("alpha");
        doc.push_paragraph("beta");
        let bytes = JsonPackage.write(&doc).unwrap();
        let back = JsonPackage.read(&bytes).unwrap();
        assert_eq!(back.text_content(), "alpha\nbeta");
        assert_eq!(back.uuid(), doc.uuid());
    }

    #[test]
    fn garbage_bytes_are_malformed() {
        let err = JsonPackage.read(b"not a document").unwrap_err();
        assert!(matches!(err, SessionError::MalformedDocument(_)));
    }
}
