//! Mock provider for tests and offline development.

use super::{FinishReason, ProviderError, ProviderResponse, TextProvider};
use async_trait::async_trait;

enum MockReply {
    Echo,
    Fixed(String),
    Disabled,
}

/// Mock text provider for testing.
pub struct MockTextProvider {
    reply: MockReply,
}

impl MockTextProvider {
    /// An enabled mock echoes the prompt back; a disabled one fails every
    /// call with [`ProviderError::NotConfigured`].
    pub fn new(enabled: bool) -> Self {
        let reply = if enabled {
            MockReply::Echo
        } else {
            MockReply::Disabled
        };
        Self { reply }
    }

    /// Always answer with `reply`, untouched.
    pub fn with_reply(reply: impl Into<String>) -> Self {
        Self {
            reply: MockReply::Fixed(reply.into()),
        }
    }
}

#[async_trait]
impl TextProvider for MockTextProvider {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn generate(&self, prompt: &str) -> Result<ProviderResponse, ProviderError> {
        let text = match &self.reply {
            MockReply::Echo => format!("Mock response for: {}", prompt),
            MockReply::Fixed(reply) => reply.clone(),
            MockReply::Disabled => {
                return Err(ProviderError::NotConfigured(
                    "Mock text provider not enabled".to_string(),
                ))
            }
        };

        Ok(ProviderResponse {
            output_tokens: text.len() as i32 / 4,
            text: Some(text),
            input_tokens: prompt.len() as i32 / 4,
            finish_reason: FinishReason::Complete,
        })
    }
}
