use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::json;

/// Liveness check: 200 for as long as the process serves requests, refresh or not.
pub async fn live() -> impl IntoResponse {
    (StatusCode::OK, Json(json!({"status": "ok"})))
}
