//! Document-ingestion collaborator contract.

use crate::error::{AmanahError, Result};
use async_trait::async_trait;
use std::path::Path;

/// Converts an uploaded document into plain/markdown text.
///
/// The engine treats OCR as opaque: whatever stands behind this trait
/// (a vision model, a local OCR pipeline) only has to return readable text
/// for a readable PDF and an `Ingestion` error for everything else.
#[async_trait]
pub trait DocumentIngestor: Send + Sync {
    /// Transcribes the document at `path` into text.
    ///
    /// # Errors
    ///
    /// Returns [`AmanahError::Ingestion`] if the file is missing, is not a
    /// PDF, or cannot be transcribed.
    async fn document_to_text(&self, path: &Path) -> Result<String>;
}

/// Validates that `path` carries a `.pdf` extension (case-insensitive).
///
/// Only the extension is checked here; corrupt content is caught later by
/// the transcription step itself.
pub fn ensure_pdf(path: &Path) -> Result<()> {
    let is_pdf = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"));

    if is_pdf {
        Ok(())
    } else {
        Err(AmanahError::ingestion(format!(
            "file must be a PDF: {}",
            path.display()
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_ensure_pdf_accepts_pdf_extensions() {
        assert!(ensure_pdf(&PathBuf::from("proposal.pdf")).is_ok());
        assert!(ensure_pdf(&PathBuf::from("proposal.PDF")).is_ok());
    }

    #[test]
    fn test_ensure_pdf_rejects_other_files() {
        assert!(ensure_pdf(&PathBuf::from("proposal.docx")).is_err());
        assert!(ensure_pdf(&PathBuf::from("proposal")).is_err());

        let err = ensure_pdf(&PathBuf::from("notes.txt")).unwrap_err();
        assert!(err.is_ingestion());
    }
}
