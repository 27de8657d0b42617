//! Gemini-backed PDF transcription.

use amanah_core::error::{AmanahError, Result};
use amanah_core::generator::{Attachment, GenerateRequest, TextGenerator};
use amanah_core::ingest::{DocumentIngestor, ensure_pdf};
use async_trait::async_trait;
use std::path::Path;
use std::sync::Arc;
use tracing::info;

const TRANSCRIBE_INSTRUCTION: &str = "\
Transcribe the attached PDF document to clean markdown. Preserve headings, \
lists and tables. Output only the markdown content, with no commentary.";

/// [`DocumentIngestor`] that sends the PDF to the model as an inline
/// attachment and asks for a markdown transcription.
pub struct GeminiIngestor {
    generator: Arc<dyn TextGenerator>,
}

impl GeminiIngestor {
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self { generator }
    }
}

#[async_trait]
impl DocumentIngestor for GeminiIngestor {
    async fn document_to_text(&self, path: &Path) -> Result<String> {
        ensure_pdf(path)?;

        let bytes = tokio::fs::read(path).await.map_err(|err| {
            AmanahError::ingestion(format!("failed to read {}: {err}", path.display()))
        })?;
        info!(path = %path.display(), bytes = bytes.len(), "transcribing proposal PDF");

        let request =
            GenerateRequest::new(TRANSCRIBE_INSTRUCTION).with_attachment(Attachment::pdf(bytes));

        // A failed transcription is fatal for the request: surface it as an
        // ingestion failure rather than a recoverable generation error.
        self.generator.generate(request).await.map_err(|err| {
            AmanahError::ingestion(format!("transcription failed for {}: {err}", path.display()))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    struct EchoGenerator;

    #[async_trait]
    impl TextGenerator for EchoGenerator {
        async fn generate(&self, request: GenerateRequest) -> Result<String> {
            assert!(request.attachment.is_some());
            Ok("# Transcribed proposal".to_string())
        }
    }

    struct FailingGenerator;

    #[async_trait]
    impl TextGenerator for FailingGenerator {
        async fn generate(&self, _request: GenerateRequest) -> Result<String> {
            Err(AmanahError::generation("safety block"))
        }
    }

    fn write_fake_pdf(dir: &TempDir, name: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(b"%PDF-1.4 fake content").unwrap();
        path
    }

    #[tokio::test]
    async fn test_transcribes_readable_pdf() {
        let dir = TempDir::new().unwrap();
        let path = write_fake_pdf(&dir, "proposal.pdf");
        let ingestor = GeminiIngestor::new(Arc::new(EchoGenerator));

        let text = ingestor.document_to_text(&path).await.unwrap();
        assert_eq!(text, "# Transcribed proposal");
    }

    #[tokio::test]
    async fn test_rejects_non_pdf_extension() {
        let dir = TempDir::new().unwrap();
        let path = write_fake_pdf(&dir, "proposal.docx");
        let ingestor = GeminiIngestor::new(Arc::new(EchoGenerator));

        let err = ingestor.document_to_text(&path).await.unwrap_err();
        assert!(err.is_ingestion());
    }

    #[tokio::test]
    async fn test_missing_file_is_an_ingestion_error() {
        let ingestor = GeminiIngestor::new(Arc::new(EchoGenerator));
        let err = ingestor
            .document_to_text(Path::new("/nonexistent/proposal.pdf"))
            .await
            .unwrap_err();
        assert!(err.is_ingestion());
    }

    #[tokio::test]
    async fn test_generation_failure_maps_to_ingestion_error() {
        let dir = TempDir::new().unwrap();
        let path = write_fake_pdf(&dir, "proposal.pdf");
        let ingestor = GeminiIngestor::new(Arc::new(FailingGenerator));

        let err = ingestor.document_to_text(&path).await.unwrap_err();
        assert!(err.is_ingestion());
    }
}
