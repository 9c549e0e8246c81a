use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};
use serde_json::Value;
use service_core::error::AppError;

use crate::dtos::ParseResponse;
use crate::models::{conversation::NO_CONVERSATION_TEXT, ConversationText};
use crate::services::build_advice_prompt;
use crate::services::providers::ProviderError;
use crate::startup::AppState;

const ANALYSIS_FAILED: &str = "Failed to analyze conversation";

/// `POST /api/parse`: transcript in, advice out.
#[tracing::instrument(skip(state, payload))]
pub async fn parse_conversation(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<ParseResponse>, AppError> {
    let Json(body) = payload.map_err(reject_body)?;
    let conversation = ConversationText::from_request_body(&body)?;

    let prompt = build_advice_prompt(&conversation);
    let advice = state
        .text_provider
        .complete(&prompt)
        .await
        .map_err(analysis_failed)?;

    tracing::info!(
        conversation_len = conversation.as_str().len(),
        response_len = advice.len(),
        "Conversation analyzed"
    );

    Ok(Json(ParseResponse { response: advice }))
}

fn reject_body(rejection: JsonRejection) -> AppError {
    match rejection {
        JsonRejection::MissingJsonContentType(_) => {
            AppError::BadRequest(anyhow::anyhow!("Content-Type must be application/json"))
        }
        JsonRejection::JsonSyntaxError(e) => AppError::InvalidJson(e.body_text()),
        JsonRejection::JsonDataError(_) => {
            AppError::BadRequest(anyhow::anyhow!(NO_CONVERSATION_TEXT))
        }
        // Body over the router's size limit, or the client hung up mid-upload.
        JsonRejection::BytesRejection(e) if e.status() == StatusCode::PAYLOAD_TOO_LARGE => {
            AppError::PayloadTooLarge(anyhow::anyhow!(e.body_text()))
        }
        JsonRejection::BytesRejection(e) => AppError::BadRequest(anyhow::anyhow!(e.body_text())),
        other => AppError::InternalError(anyhow::anyhow!(other.body_text())),
    }
}

fn analysis_failed(err: ProviderError) -> AppError {
    AppError::UpstreamError {
        message: ANALYSIS_FAILED.to_string(),
        details: err.to_string(),
    }
}
