use serde_json::Value;
use service_core::error::AppError;

/// Message returned whenever the request carries no usable transcript.
pub const NO_CONVERSATION_TEXT: &str = "No conversation text provided";

/// Request key holding the transcript. Named `email` for compatibility with
/// existing clients.
pub const CONVERSATION_FIELD: &str = "email";

/// A chat transcript supplied by the client.
///
/// Never empty. The text is kept exactly as sent, so whitespace-only input
/// still reaches the model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversationText(String);

impl ConversationText {
    pub fn parse(text: impl Into<String>) -> Result<Self, AppError> {
        let text = text.into();
        if text.is_empty() {
            return Err(AppError::BadRequest(anyhow::anyhow!(NO_CONVERSATION_TEXT)));
        }
        Ok(Self(text))
    }

    /// Extract the transcript from a decoded request body.
    ///
    /// Anything other than an object with a string under
    /// [`CONVERSATION_FIELD`] is rejected.
    pub fn from_request_body(body: &Value) -> Result<Self, AppError> {
        match body.get(CONVERSATION_FIELD).and_then(Value::as_str) {
            Some(text) => Self::parse(text),
            None => Err(AppError::BadRequest(anyhow::anyhow!(NO_CONVERSATION_TEXT))),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}
