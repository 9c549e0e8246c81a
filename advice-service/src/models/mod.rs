pub mod conversation;

pub use conversation::ConversationText;
