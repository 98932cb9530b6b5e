//! Handlers for the PDF artifact endpoints: upload and page-text extraction.

use axum::{
    extract::{multipart::MultipartRejection, Multipart, State},
    Json,
};
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::errors::AppError;
use crate::extractors::AppQuery;
use crate::state::AppState;

/// Multipart field that carries the PDF bytes.
const FILE_FIELD: &str = "file";

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub status: &'static str,
    pub file_id: String,
    pub message: &'static str,
}

#[derive(Debug, Deserialize)]
pub struct ExtractTextParams {
    pub file_id: String,
    pub page_number: usize,
}

#[derive(Debug, Serialize)]
pub struct ExtractTextResponse {
    pub extracted_text: String,
}

/// POST /upload_pdf
///
/// Stores one file part verbatim under a fresh identifier: the first part that
/// is named `file` or carries a filename. Later parts are not read.
pub async fn handle_upload_pdf(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<UploadResponse>, AppError> {
    let mut multipart = multipart?;

    let mut payload: Option<(Option<String>, Bytes)> = None;
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(FILE_FIELD) && field.file_name().is_none() {
            continue;
        }
        let filename = field.file_name().map(str::to_string);
        payload = Some((filename, field.bytes().await?));
        break;
    }

    let (filename, bytes) = payload.ok_or_else(|| {
        AppError::Validation(format!("multipart body has no '{FILE_FIELD}' field"))
    })?;

    if !bytes.starts_with(b"%PDF-") {
        warn!(
            "Upload {:?} does not start with a PDF header; storing anyway",
            filename
        );
    }

    let file_id = state.store.store(&bytes).await?;
    info!(%file_id, size = bytes.len(), "PDF uploaded");

    Ok(Json(UploadResponse {
        status: "success",
        file_id: file_id.to_string(),
        message: "File uploaded successfully",
    }))
}

/// POST /extract_text?file_id=<uuid>&page_number=<int>
///
/// Returns the text of one zero-based page of a stored PDF.
pub async fn handle_extract_text(
    State(state): State<AppState>,
    AppQuery(params): AppQuery<ExtractTextParams>,
) -> Result<Json<ExtractTextResponse>, AppError> {
    if !state.store.exists(&params.file_id).await? {
        return Err(AppError::NotFound);
    }

    let extracted_text = state
        .extractor
        .extract_page_text(&params.file_id, params.page_number)
        .await?;
    info!(
        file_id = %params.file_id,
        page = params.page_number,
        chars = extracted_text.len(),
        "Page text extracted"
    );

    Ok(Json(ExtractTextResponse { extracted_text }))
}
