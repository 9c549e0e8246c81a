use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use std::any::Any;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Bad request: {0}")]
    BadRequest(anyhow::Error),

    #[error("Invalid JSON body: {0}")]
    InvalidJson(String),

    #[error("Not found: {0}")]
    NotFound(anyhow::Error),

    #[error("Payload too large: {0}")]
    PayloadTooLarge(anyhow::Error),

    #[error("{message}: {details}")]
    UpstreamError { message: String, details: String },

    #[error("Internal server error: {0}")]
    InternalError(#[from] anyhow::Error),

    #[error("Configuration error: {0}")]
    ConfigError(anyhow::Error),
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        AppError::ConfigError(anyhow::Error::new(err))
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::InternalError(anyhow::Error::new(err))
    }
}

/// JSON body of every error response: `{"error": ..., "details"?: ...}`.
#[derive(Debug, Serialize)]
pub struct ErrorEnvelope {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl AppError {
    fn envelope(self) -> (StatusCode, ErrorEnvelope) {
        let (status, error, details) = match self {
            AppError::BadRequest(err) => (StatusCode::BAD_REQUEST, err.to_string(), None),
            AppError::InvalidJson(details) => (
                StatusCode::BAD_REQUEST,
                "Invalid JSON body".to_string(),
                Some(details),
            ),
            AppError::NotFound(err) => (StatusCode::NOT_FOUND, err.to_string(), None),
            AppError::PayloadTooLarge(err) => (
                StatusCode::PAYLOAD_TOO_LARGE,
                "Request body too large".to_string(),
                Some(err.to_string()),
            ),
            AppError::UpstreamError { message, details } => {
                (StatusCode::INTERNAL_SERVER_ERROR, message, Some(details))
            }
            AppError::InternalError(err) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
                Some(format!("{:#}", err)),
            ),
            AppError::ConfigError(err) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Configuration error".to_string(),
                Some(err.to_string()),
            ),
        };

        (status, ErrorEnvelope { error, details })
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, envelope) = self.envelope();

        if status.is_server_error() {
            tracing::error!(
                status = status.as_u16(),
                error = %envelope.error,
                details = envelope.details.as_deref().unwrap_or(""),
                "Request failed"
            );
        } else {
            tracing::warn!(
                status = status.as_u16(),
                error = %envelope.error,
                "Request rejected"
            );
        }

        (status, Json(envelope)).into_response()
    }
}

/// Response used by `CatchPanicLayer` so a panicking handler still answers
/// with the error envelope.
pub fn panic_response(err: Box<dyn Any + Send + 'static>) -> Response {
    let message = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "handler panicked".to_string()
    };

    AppError::InternalError(anyhow::anyhow!(message)).into_response()
}
