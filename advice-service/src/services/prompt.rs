//! Fixed instructional template wrapped around the user's transcript.

use crate::models::ConversationText;

const PREAMBLE: &str = "You are an expert dating coach. Analyze the following text conversation and provide:
1. An assessment of the conversation dynamics
2. 2 options of what to text next
Text conversation:
";

const CLOSING: &str =
    "Please format your response in a clear, structured way. Be very brief and concise";

/// Build the model prompt for `conversation`. Pure and deterministic.
pub fn build_advice_prompt(conversation: &ConversationText) -> String {
    format!("{}{}\n{}", PREAMBLE, conversation.as_str(), CLOSING)
}
