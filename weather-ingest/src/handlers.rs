pub use crate::ingest::submit_reading_handler;
pub use crate::readings::{latest_reading_handler, recent_readings_handler};

use axum::{response::IntoResponse, Json};
use serde_json::json;

pub async fn health_handler() -> impl IntoResponse {
    // Simple readiness/health endpoint. Keep it lightweight.
    Json(json!({ "status": "ok" }))
}
