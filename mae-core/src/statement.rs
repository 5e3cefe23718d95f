//! The statement file handed to the importer.

use std::path::Path;

use crate::error::ImportError;

/// Raw statement bytes plus the name shown to the parsing service.
///
/// Immutable once built; the bytes are re-sent once per attempted mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatementFile {
    bytes: Vec<u8>,
    filename: String,
}

impl StatementFile {
    /// Wrap an in-memory buffer. Empty buffers are rejected.
    pub fn new(bytes: Vec<u8>, filename: impl Into<String>) -> Result<Self, ImportError> {
        if bytes.is_empty() {
            return Err(ImportError::InvalidFile);
        }
        Ok(Self {
            bytes,
            filename: filename.into(),
        })
    }

    /// Read a statement from disk. Unreadable and empty files both map to
    /// `InvalidFile`.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ImportError> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|_| ImportError::InvalidFile)?;
        let filename = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "statement.pdf".to_string());
        Self::new(bytes, filename)
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Always false for a constructed file; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}
