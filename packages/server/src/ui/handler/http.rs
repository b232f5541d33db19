//! HTTP API endpoint handlers.

use axum::Json;

/// Health check endpoint used by the hosting platform's liveness probe
pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}
