//! Conversation message types.

use serde::{Deserialize, Serialize};

/// Represents the role of a message in a conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MessageRole {
    /// Message from the user.
    User,
    /// Message from the AI assistant.
    Assistant,
}

impl MessageRole {
    /// Human-readable label used when rendering history into a prompt.
    pub fn label(&self) -> &'static str {
        match self {
            MessageRole::User => "Human",
            MessageRole::Assistant => "Assistant",
        }
    }
}

/// A single message in a conversation history.
///
/// Messages are immutable once created and owned exclusively by one
/// [`ChatSession`](crate::session::ChatSession).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationMessage {
    /// The role of the message sender.
    pub role: MessageRole,
    /// The content of the message.
    pub content: String,
    /// Timestamp when the message was created (ISO 8601 format).
    pub timestamp: String,
}

impl ConversationMessage {
    /// Creates a new message with the current timestamp.
    pub fn new(role: MessageRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }

    /// Creates a user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(MessageRole::User, content)
    }

    /// Creates an assistant message.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(MessageRole::Assistant, content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_labels() {
        assert_eq!(MessageRole::User.label(), "Human");
        assert_eq!(MessageRole::Assistant.label(), "Assistant");
    }

    #[test]
    fn test_message_constructors() {
        let msg = ConversationMessage::user("what about the budget?");
        assert_eq!(msg.role, MessageRole::User);
        assert_eq!(msg.content, "what about the budget?");
        assert!(!msg.timestamp.is_empty());

        let msg = ConversationMessage::assistant("the budget looks sound");
        assert_eq!(msg.role, MessageRole::Assistant);
    }
}
