pub mod analysis;
pub mod documents;
pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let upload_limit = state.max_upload_bytes;

    Router::new()
        .route("/heartbeat", get(health::heartbeat_handler))
        // PDF artifacts
        .route(
            "/upload_pdf",
            post(documents::handle_upload_pdf).layer(DefaultBodyLimit::max(upload_limit)),
        )
        .route("/extract_text", post(documents::handle_extract_text))
        // LLM analysis
        .route("/summarize_text", post(analysis::handle_summarize_text))
        .route("/extract_skills", post(analysis::handle_extract_skills))
        .route(
            "/match_job_candidate",
            post(analysis::handle_match_job_candidate),
        )
        .with_state(state)
}
