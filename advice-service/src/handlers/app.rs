use axum::{http::header, response::IntoResponse, Json};
use service_core::error::AppError;
use service_core::observability::render_metrics;

use crate::dtos::StatusResponse;

pub async fn home() -> Json<StatusResponse> {
    Json(StatusResponse {
        status: "API is running",
    })
}

pub async fn health() -> Json<StatusResponse> {
    Json(StatusResponse { status: "healthy" })
}

pub async fn metrics() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        render_metrics(),
    )
}

pub async fn not_found() -> AppError {
    AppError::NotFound(anyhow::anyhow!("Not found"))
}
