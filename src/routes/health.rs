use axum::{http::StatusCode, response::IntoResponse, Json};

use crate::dto::quiz_dto::HealthResponse;

#[axum::debug_handler]
pub async fn health() -> impl IntoResponse {
    let body = HealthResponse {
        status: "ok".to_string(),
        timestamp: chrono::Utc::now(),
    };
    (StatusCode::OK, Json(body))
}
