use axum::Json;
use serde_json::{json, Value};

/// GET /heartbeat
/// Liveness check; always the same payload.
pub async fn heartbeat_handler() -> Json<Value> {
    Json(json!({
        "status": "running",
        "message": "API Server is running"
    }))
}
