//! Page-level text extraction for stored PDFs.
//!
//! `AppState` holds an `Arc<dyn TextExtractor>`; the default backend is
//! `PdfTextExtractor`, which reads from the artifact store and delegates
//! parsing to `pdf-extract`.

use async_trait::async_trait;
use thiserror::Error;
use tracing::{debug, warn};

use crate::storage::{ArtifactStore, StorageError};

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("file {0} not found")]
    NotFound(String),

    #[error("page {page} is out of range (document has {page_count} pages)")]
    OutOfRange { page: usize, page_count: usize },

    #[error("failed to parse PDF: {0}")]
    Parse(String),

    #[error(transparent)]
    Storage(StorageError),
}

impl From<StorageError> for ExtractError {
    fn from(e: StorageError) -> Self {
        match e {
            StorageError::NotFound(id) => ExtractError::NotFound(id),
            other => ExtractError::Storage(other),
        }
    }
}

#[async_trait]
pub trait TextExtractor: Send + Sync {
    /// Returns the plain text of zero-based page `page` of artifact `file_id`.
    async fn extract_page_text(&self, file_id: &str, page: usize) -> Result<String, ExtractError>;
}

pub struct PdfTextExtractor {
    store: ArtifactStore,
}

impl PdfTextExtractor {
    pub fn new(store: ArtifactStore) -> Self {
        Self { store }
    }
}

#[async_trait]
impl TextExtractor for PdfTextExtractor {
    async fn extract_page_text(&self, file_id: &str, page: usize) -> Result<String, ExtractError> {
        let bytes = self.store.read(file_id).await?;
        debug!("Extracting page {page} from {file_id} ({} bytes)", bytes.len());

        // pdf-extract is CPU-bound and may panic on malformed input
        let pages = tokio::task::spawn_blocking(move || split_pages(&bytes))
            .await
            .map_err(|e| {
                warn!("PDF parser aborted for {file_id}: {e}");
                ExtractError::Parse("PDF parser aborted".to_string())
            })??;

        select_page(pages, page)
    }
}

fn split_pages(bytes: &[u8]) -> Result<Vec<String>, ExtractError> {
    pdf_extract::extract_text_from_mem_by_pages(bytes)
        .map_err(|e| ExtractError::Parse(e.to_string()))
}

fn select_page(mut pages: Vec<String>, page: usize) -> Result<String, ExtractError> {
    let page_count = pages.len();
    if page >= page_count {
        return Err(ExtractError::OutOfRange { page, page_count });
    }
    Ok(pages.swap_remove(page))
}


#[cfg(test)]
mod tests {
    use super::fixtures::pdf_with_pages;
    use super::*;

    async fn store_with(bytes: &[u8]) -> (tempfile::TempDir, PdfTextExtractor, String) {
        let dir = tempfile::tempdir().unwrap();
        let store = ArtifactStore::open(dir.path()).await.unwrap();
        let id = store.store(bytes).await.unwrap();
        (dir, PdfTextExtractor::new(store), id.to_string())
    }

    #[test]
    fn test_select_page_in_range() {
        let pages = vec!["one".to_string(), "two".to_string(), "three".to_string()];
        assert_eq!(select_page(pages, 1).unwrap(), "two");
    }

    #[test]
    fn test_select_page_out_of_range() {
        let pages = vec!["one".to_string()];
        let err = select_page(pages, 1).unwrap_err();
        assert!(matches!(
            err,
            ExtractError::OutOfRange {
                page: 1,
                page_count: 1
            }
        ));
    }

    #[test]
    fn test_select_page_empty_document() {
        let err = select_page(Vec::new(), 0).unwrap_err();
        assert!(matches!(err, ExtractError::OutOfRange { page_count: 0, .. }));
    }

    #[tokio::test]
    async fn test_extracts_requested_page() {
        let pdf = pdf_with_pages(&["Hello first", "Goodbye second"]);
        let (_dir, extractor, id) = store_with(&pdf).await;

        let text = extractor.extract_page_text(&id, 1).await.unwrap();
        assert!(text.contains("Goodbye"), "got: {text:?}");
    }

    #[tokio::test]
    async fn test_page_past_end_is_out_of_range() {
        let pdf = pdf_with_pages(&["only page"]);
        let (_dir, extractor, id) = store_with(&pdf).await;

        let err = extractor.extract_page_text(&id, 3).await.unwrap_err();
        assert!(matches!(err, ExtractError::OutOfRange { page: 3, .. }));
    }

    #[tokio::test]
    async fn test_unknown_file_is_not_found() {
        let (_dir, extractor, _id) = store_with(b"whatever").await;
        let unknown = uuid::Uuid::new_v4().to_string();

        let err = extractor.extract_page_text(&unknown, 0).await.unwrap_err();
        assert!(matches!(err, ExtractError::NotFound(_)));

        let err = extractor
            .extract_page_text("../../etc/passwd", 0)
            .await
            .unwrap_err();
        assert!(matches!(err, ExtractError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_garbage_bytes_are_a_parse_error() {
        let (_dir, extractor, id) = store_with(b"this is not a pdf at all").await;
        let err = extractor.extract_page_text(&id, 0).await.unwrap_err();
        assert!(matches!(err, ExtractError::Parse(_)));
    }
}
