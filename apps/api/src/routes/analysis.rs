//! Handlers for the LLM-backed analysis endpoints.
//! Each one validates its body, builds a prompt, and relays the completion.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::AppError;
use crate::extractors::AppJson;
use crate::llm_client::prompts::{
    match_payload, EXTRACT_SKILLS_SYSTEM, MATCH_SYSTEM, SUMMARIZE_SYSTEM,
};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct SummarizeRequest {
    pub text: String,
}

#[derive(Debug, Deserialize)]
pub struct ExtractSkillsRequest {
    pub text: String,
}

#[derive(Debug, Deserialize)]
pub struct MatchRequest {
    #[serde(alias = "jobDescription")]
    pub job_description: String,
    #[serde(alias = "candidateResume")]
    pub candidate_resume: String,
}

/// All three endpoints answer with the raw completion under `summary`.
#[derive(Debug, Serialize)]
pub struct CompletionResponse {
    pub summary: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /summarize_text
pub async fn handle_summarize_text(
    State(state): State<AppState>,
    AppJson(request): AppJson<SummarizeRequest>,
) -> Result<Json<CompletionResponse>, AppError> {
    let summary = state.llm.complete(SUMMARIZE_SYSTEM, &request.text).await?;
    info!(input_chars = request.text.len(), "Text summarized");
    Ok(Json(CompletionResponse { summary }))
}

/// POST /extract_skills
///
/// The completion is expected to hold a comma-separated skill list; it is
/// passed through untouched.
pub async fn handle_extract_skills(
    State(state): State<AppState>,
    AppJson(request): AppJson<ExtractSkillsRequest>,
) -> Result<Json<CompletionResponse>, AppError> {
    let summary = state
        .llm
        .complete(EXTRACT_SKILLS_SYSTEM, &request.text)
        .await?;
    info!(input_chars = request.text.len(), "Skills extracted");
    Ok(Json(CompletionResponse { summary }))
}

/// POST /match_job_candidate
pub async fn handle_match_job_candidate(
    State(state): State<AppState>,
    AppJson(request): AppJson<MatchRequest>,
) -> Result<Json<CompletionResponse>, AppError> {
    let payload = match_payload(&request.candidate_resume, &request.job_description);
    let summary = state.llm.complete(MATCH_SYSTEM, &payload).await?;
    info!("Job/candidate match scored");
    Ok(Json(CompletionResponse { summary }))
}
