use async_trait::async_trait;
use pdf_oxide::PdfDocument;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

const EXTRACTION_TIMEOUT: Duration = Duration::from_secs(30);

/// Document kinds the pipeline accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentKind {
    Pdf,
    Text,
}

impl DocumentKind {
    /// Derives the kind from the file extension (case-insensitive).
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "pdf" => Some(DocumentKind::Pdf),
            "txt" | "text" | "md" => Some(DocumentKind::Text),
            _ => None,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ExtractionError {
    #[error("unsupported document type: {0}")]
    UnsupportedDocument(String),
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("extraction failed: {0}")]
    ExtractionFailed(String),
}

/// Reads a document from disk and yields its raw text.
#[async_trait]
pub trait TextExtractor: Send + Sync {
    async fn extract(&self, path: &Path) -> Result<String, ExtractionError>;
}

#[derive(Debug, Default)]
pub struct PdfExtractor;

impl PdfExtractor {
    pub fn new() -> Self {
        Self
    }

    fn extract_pages(path: &Path) -> Result<String, ExtractionError> {
        let mut doc = PdfDocument::open(path)
            .map_err(|e| ExtractionError::ExtractionFailed(format!("failed to parse PDF: {e}")))?;

        let page_count = doc.page_count().map_err(|e| {
            ExtractionError::ExtractionFailed(format!("failed to read page count: {e}"))
        })?;

        let mut text = String::new();
        for page_index in 0..page_count {
            let page_text = doc.extract_text(page_index).unwrap_or_default();
            if page_text.trim().is_empty() {
                debug!(page = page_index + 1, "Skipping page without text");
                continue;
            }
            text.push_str(&page_text);
            text.push('\n');
        }

        info!(page_count, chars = text.chars().count(), "PDF text extraction complete");
        Ok(text)
    }
}

#[async_trait]
impl TextExtractor for PdfExtractor {
    async fn extract(&self, path: &Path) -> Result<String, ExtractionError> {
        let owned = path.to_path_buf();
        tokio::time::timeout(
            EXTRACTION_TIMEOUT,
            tokio::task::spawn_blocking(move || Self::extract_pages(&owned)),
        )
        .await
        .map_err(|_| ExtractionError::ExtractionFailed("PDF extraction timed out".to_string()))?
        .map_err(|e| ExtractionError::ExtractionFailed(format!("task join error: {e}")))?
    }
}

#[derive(Debug, Default)]
pub struct PlainTextExtractor;

#[async_trait]
impl TextExtractor for PlainTextExtractor {
    async fn extract(&self, path: &Path) -> Result<String, ExtractionError> {
        let bytes = tokio::fs::read(path).await.map_err(|source| ExtractionError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}

/// Dispatches to the extractor registered for the document's kind.
pub struct DocumentExtractor {
    adapters: HashMap<DocumentKind, Arc<dyn TextExtractor>>,
}

impl DocumentExtractor {
    pub fn new(adapters: Vec<(DocumentKind, Arc<dyn TextExtractor>)>) -> Self {
        Self {
            adapters: adapters.into_iter().collect(),
        }
    }
}

impl Default for DocumentExtractor {
    fn default() -> Self {
        Self::new(vec![
            (DocumentKind::Pdf, Arc::new(PdfExtractor::new()) as Arc<dyn TextExtractor>),
            (DocumentKind::Text, Arc::new(PlainTextExtractor)),
        ])
    }
}

#[async_trait]
impl TextExtractor for DocumentExtractor {
    async fn extract(&self, path: &Path) -> Result<String, ExtractionError> {
        let adapter = DocumentKind::from_path(path)
            .and_then(|kind| self.adapters.get(&kind))
            .ok_or_else(|| ExtractionError::UnsupportedDocument(path.display().to_string()))?;

        adapter.extract(path).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_follows_extension() {
        assert_eq!(DocumentKind::from_path(Path::new("a/b/Report.PDF")), Some(DocumentKind::Pdf));
        assert_eq!(DocumentKind::from_path(Path::new("notes.txt")), Some(DocumentKind::Text));
        assert_eq!(DocumentKind::from_path(Path::new("image.png")), None);
        assert_eq!(DocumentKind::from_path(Path::new("no_extension")), None);
    }

    #[tokio::test]
    async fn unsupported_document_is_rejected() {
        let err = DocumentExtractor::default()
            .extract(Path::new("slides.pptx"))
            .await
            .unwrap_err();
        assert!(matches!(err, ExtractionError::UnsupportedDocument(_)));
    }

    #[tokio::test]
    async fn text_documents_are_read_lossily() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.md");
        tokio::fs::write(&path, b"Caf\xc3\xa9 notes \xff end").await.unwrap();

        let text = DocumentExtractor::default().extract(&path).await.unwrap();
        assert!(text.starts_with("Caf\u{e9} notes "));
        assert!(text.ends_with(" end"));
    }

    #[tokio::test]
    async fn missing_file_reports_path() {
        let err = PlainTextExtractor
            .extract(Path::new("/nonexistent/notes.txt"))
            .await
            .unwrap_err();
        assert!(matches!(err, ExtractionError::Io { .. }));
    }
}
