use axum::{http::StatusCode, response::Response};
use shared::HealthResponse;

use crate::responses;

pub async fn health() -> Response {
    responses::json(
        StatusCode::OK,
        &HealthResponse {
            status: "ok".to_string(),
        },
    )
}
