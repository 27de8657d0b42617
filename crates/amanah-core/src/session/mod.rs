//! Document-grounded conversation session.

pub mod chat;
pub mod message;

pub use chat::{ChatSession, HISTORY_WINDOW};
pub use message::{ConversationMessage, MessageRole};
