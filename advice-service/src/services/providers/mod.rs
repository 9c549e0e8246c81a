//! Model client abstraction and implementations.
//!
//! The gateway talks to a [`TextProvider`]; production wires in Gemini,
//! tests wire in the mock.

pub mod gemini;
pub mod mock;

use async_trait::async_trait;
use metrics::{counter, histogram};
use std::time::Instant;
use thiserror::Error;

/// Error type for provider operations.
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("Provider not configured: {0}")]
    NotConfigured(String),

    #[error("API error: {0}")]
    ApiError(String),

    #[error("Rate limited")]
    RateLimited,

    #[error("Content filtered: {0}")]
    ContentFiltered(String),

    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Model returned an empty response")]
    EmptyResponse,
}

impl ProviderError {
    /// Short label for metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            ProviderError::NotConfigured(_) => "not_configured",
            ProviderError::ApiError(_) => "api_error",
            ProviderError::RateLimited => "rate_limited",
            ProviderError::ContentFiltered(_) => "content_filtered",
            ProviderError::NetworkError(_) => "network_error",
            ProviderError::EmptyResponse => "empty_response",
        }
    }
}

/// Result of a single generation call.
#[derive(Debug, Clone)]
pub struct ProviderResponse {
    /// Generated text, if the model produced any.
    pub text: Option<String>,

    /// Input tokens consumed.
    pub input_tokens: i32,

    /// Output tokens generated.
    pub output_tokens: i32,

    /// Finish reason.
    pub finish_reason: FinishReason,
}

/// Reason why generation stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FinishReason {
    Complete,
    Length,
    ContentFilter,
}

/// Sampling parameters sent with every request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenerationParams {
    pub temperature: f32,
    pub top_p: f32,
    pub top_k: i32,
    pub max_output_tokens: i32,
}

/// Parameters used for conversation advice.
pub const ADVICE_GENERATION_PARAMS: GenerationParams = GenerationParams {
    temperature: 0.7,
    top_p: 1.0,
    top_k: 32,
    max_output_tokens: 500,
};

/// A hosted text-generation backend.
#[async_trait]
pub trait TextProvider: Send + Sync {
    /// Provider name used in logs and metric labels.
    fn name(&self) -> &'static str;

    /// Send `prompt` and return the raw generation result.
    async fn generate(&self, prompt: &str) -> Result<ProviderResponse, ProviderError>;

    /// Send `prompt` and return the trimmed completion text.
    ///
    /// Blank output is an error. Nothing is retried.
    async fn complete(&self, prompt: &str) -> Result<String, ProviderError> {
        let started = Instant::now();
        let result = self.generate(prompt).await.and_then(|response| {
            response
                .text
                .map(|text| text.trim().to_string())
                .filter(|text| !text.is_empty())
                .ok_or(ProviderError::EmptyResponse)
        });

        histogram!("model_provider_latency_seconds", "provider" => self.name())
            .record(started.elapsed().as_secs_f64());

        if let Err(e) = &result {
            counter!(
                "model_provider_errors_total",
                "provider" => self.name(),
                "kind" => e.kind()
            )
            .increment(1);
            tracing::error!(provider = self.name(), error = %e, "Completion failed");
        }

        result
    }
}
