#![allow(dead_code)]

use advice_service::config::{
    AdviceConfig, CorsSettings, GeminiSettings, ObservabilitySettings,
};
use advice_service::services::providers::TextProvider;
use advice_service::startup::{build_router, AppState};
use axum::{
    body::Body,
    http::{Method, Request},
    Router,
};
use http_body_util::BodyExt;
use secrecy::Secret;
use service_core::config::Config as CoreConfig;
use std::sync::Arc;

pub const FRONTEND_ORIGIN: &str = "http://localhost:8000";

/// Config for a test instance: random port, Gemini pointed at `api_base`.
pub fn test_config(api_base: &str) -> AdviceConfig {
    AdviceConfig {
        common: CoreConfig { port: 0 },
        gemini: GeminiSettings {
            api_key: Secret::new("test-api-key".to_string()),
            model: "gemini-1.5-flash".to_string(),
            api_base: api_base.to_string(),
            timeout_secs: 5,
        },
        cors: CorsSettings::local_frontend(),
        observability: ObservabilitySettings {
            log_level: "debug".to_string(),
            otlp_endpoint: None,
        },
    }
}

pub fn test_router(provider: impl TextProvider + 'static) -> Router {
    build_router(AppState {
        cors: CorsSettings::local_frontend(),
        text_provider: Arc::new(provider),
    })
}

pub fn parse_request(content_type: Option<&str>, body: &str) -> Request<Body> {
    let mut builder = Request::builder().method(Method::POST).uri("/api/parse");
    if let Some(content_type) = content_type {
        builder = builder.header("content-type", content_type);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

pub fn get_request(uri: &str) -> Request<Body> {
    Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

pub async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
