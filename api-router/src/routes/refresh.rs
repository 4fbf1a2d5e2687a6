use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::json;
use tracing::info;

use crate::api_state::ApiState;

/// Starts a background refresh and acknowledges immediately. Refresh errors only reach the logs.
pub async fn refresh_database(State(state): State<ApiState>) -> impl IntoResponse {
    let status = if state.pipeline.spawn_refresh() {
        info!("refresh triggered over http");
        "refresh challenge database started"
    } else {
        "refresh already in progress"
    };

    (StatusCode::ACCEPTED, Json(json!({ "status": status })))
}
