//! The live editing session
//!
//! One document is live at a time. Opening or switching parses the new
//! package completely before the old document is dropped, so a failed
//! open leaves the previous session intact. All access goes through this
//! object; there is no global state, and callers uphold the single-writer
//! discipline.

use crate::error::{Result, SessionError};
use crate::io::{FormatReader, FormatWriter};
use doc_model::Document;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// The currently open document plus its bookkeeping
#[derive(Debug)]
pub struct LiveDocument {
    pub doc: Document,
    pub path: PathBuf,
    pub dirty: bool,
}

pub struct Session<R: FormatReader, W: FormatWriter> {
    reader: R,
    writer: W,
    current: Option<LiveDocument>,
}

impl<R: FormatReader, W: FormatWriter> Session<R, W> {
    pub fn new(reader: R, writer: W) -> Self {
        Self {
            reader,
            writer,
            current: None,
        }
    }

    /// Open a package file, replacing any live document.
    ///
    /// The new tree is fully parsed before the old one is released; on
    /// error the previous document stays live.
    pub fn open(&mut self, path: &Path) -> Result<&Document> {
        let bytes = std::fs::read(path)?;
        let doc = self.reader.read(&bytes)?;
        info!(path = %path.display(), blocks = doc.body.len(), "opened document");
        let live = self.current.insert(LiveDocument {
            doc,
            path: path.to_path_buf(),
            dirty: false,
        });
        Ok(&live.doc)
    }

    /// Alias of `open` that reads as an explicit state replacement
    pub fn switch_to(&mut self, path: &Path) -> Result<&Document> {
        self.open(path)
    }

    /// Start a fresh unsaved document
    pub fn create(&mut self, path: &Path) -> &mut Document {
        info!(path = %path.display(), "created document");
        let live = self.current.insert(LiveDocument {
            doc: Document::new(),
            path: path.to_path_buf(),
            dirty: true,
        });
        &mut live.doc
    }

    /// The live document, read-only
    pub fn document(&self) -> Result<&Document> {
        self.current
            .as_ref()
            .map(|l| &l.doc)
            .ok_or(SessionError::NoActiveDocument)
    }

    /// The live document for mutation; marks the session dirty
    pub fn document_mut(&mut self) -> Result<&mut Document> {
        let live = self
            .current
            .as_mut()
            .ok_or(SessionError::NoActiveDocument)?;
        live.dirty = true;
        Ok(&mut live.doc)
    }

    pub fn current(&self) -> Option<&LiveDocument> {
        self.current.as_ref()
    }

    pub fn is_dirty(&self) -> bool {
        self.current.as_ref().is_some_and(|l| l.dirty)
    }

    /// Write the live document back to its own path
    pub fn save(&mut self) -> Result<()> {
        let live = self
            .current
            .as_mut()
            .ok_or(SessionError::NoActiveDocument)?;
        let bytes = self.writer.write(&live.doc)?;
        std::fs::write(&live.path, bytes)?;
        live.dirty = false;
        debug!(path = %live.path.display(), "saved document");
        Ok(())
    }

    /// Write the live document to a new path, which becomes its path
    pub fn save_as(&mut self, path: &Path) -> Result<()> {
        let live = self
            .current
            .as_mut()
            .ok_or(SessionError::NoActiveDocument)?;
        let bytes = self.writer.write(&live.doc)?;
        std::fs::write(path, bytes)?;
        live.path = path.to_path_buf();
        live.dirty = false;
        info!(path = %path.display(), "saved document as");
        Ok(())
    }

    /// Drop the live document without saving
    pub fn close(&mut self) -> Option<LiveDocument> {
        if let Some(live) = &self.current {
            info!(path = %live.path.display(), dirty = live.dirty, "closed document");
        }
        self.current.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::JsonPackage;

    fn session() -> Session<JsonPackage, JsonPackage> {
        Session::new(JsonPackage, JsonPackage)
    }

    #[test]
    fn save_then_reopen_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("letter.json");
        let mut s = session();
        let doc = s.create(&path);
        doc.push_paragraph("Dear <<Name>>,");
        doc.push_paragraph("Sincerely");
        s.save().unwrap();
        assert!(!s.is_dirty());

        let mut s2 = session();
        s2.open(&path).unwrap();
        assert_eq!(s2.document().unwrap().text_content(), "Dear <<Name>>,\nSincerely");
    }

    #[test]
    fn failed_open_keeps_previous_document() {
        let dir = tempfile::tempdir().unwrap();
        let good = dir.path().join("good.json");
        let bad = dir.path().join("bad.json");
        std::fs::write(&bad, b"{ nope").unwrap();

        let mut s = session();
        s.create(&good).push_paragraph("still here");
        s.save().unwrap();
        s.open(&good).unwrap();

        let err = s.switch_to(&bad).unwrap_err();
        assert!(matches!(err, SessionError::MalformedDocument(_)));
        assert_eq!(s.document().unwrap().text_content(), "still here");
    }

    #[test]
    fn missing_file_is_io_failure() {
        let mut s = session();
        let err = s.open(Path::new("/nonexistent/nowhere.json")).unwrap_err();
        assert!(matches!(err, SessionError::IOFailure(_)));
    }

    #[test]
    fn no_active_document_errors() {
        let mut s = session();
        assert!(matches!(s.document(), Err(SessionError::NoActiveDocument)));
        assert!(matches!(s.save(), Err(SessionError::NoActiveDocument)));
        assert!(s.close().is_none());
    }

    #[test]
    fn mutation_marks_dirty_until_save() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("doc.json");
        let mut s = session();
        s.create(&path);
        s.save().unwrap();
        assert!(!s.is_dirty());
        s.document_mut().unwrap().push_paragraph("edit");
        assert!(s.is_dirty());
        s.save().unwrap();
        assert!(!s.is_dirty());
    }
}
