use std::sync::Arc;

use crate::llm_client::CompletionClient;
use crate::pdf::TextExtractor;
use crate::storage::ArtifactStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub store: ArtifactStore,
    /// Pluggable page-text backend. Default: PdfTextExtractor over `store`.
    pub extractor: Arc<dyn TextExtractor>,
    /// Pluggable completion backend. Default: LlmClient.
    pub llm: Arc<dyn CompletionClient>,
    /// Body limit applied to `/upload_pdf`.
    pub max_upload_bytes: usize,
}
