//! Conversational Q&A grounded in one ingested proposal document.

use super::message::ConversationMessage;
use crate::generator::{GenerateRequest, TextGenerator};
use std::sync::Arc;
use tracing::warn;

/// Number of recent messages rendered into each prompt (5 user/assistant
/// pairs). Older messages stay stored but are not sent to the model.
pub const HISTORY_WINDOW: usize = 10;

/// Fixed user-facing reply when the model call fails. The failed turn is
/// not retried and the user message stays in history.
const APOLOGY: &str = "I apologize, but I encountered an error processing your request.";

const DEFAULT_SYSTEM_PROMPT: &str = "\
You are an expert charity proposal analyst with deep experience in detecting financial risks and money laundering schemes. Your role is to help review charity proposals and identify potential risks or red flags.

Key Areas to Analyze:
1. Financial Transparency
   - Budget breakdown clarity
   - Cost reasonableness
   - Fund allocation justification
   - Financial control mechanisms

2. Money Laundering Risk Indicators
   - Unusual funding patterns
   - Vague or inflated budgets
   - Lack of clear beneficiary tracking
   - Suspicious partner organizations
   - Unusual cash transactions

3. Project Legitimacy
   - Clear objectives and outcomes
   - Realistic implementation timeline
   - Verifiable beneficiaries
   - Proper registration and compliance
   - Track record of organization

Provide detailed, analytical responses focusing on:
- Specific risk factors identified
- Recommendations for additional verification
- Questions that need clarification
- Compliance requirements
- Suggested risk mitigation measures

Maintain a professional yet conversational tone. If asked about specific aspects, provide detailed analysis of that area.";

/// A conversation anchored to one ingested proposal document.
///
/// The session owns the extracted document text as context, an append-only
/// message history, and mediates every turn through the injected
/// [`TextGenerator`]. `chat` takes `&mut self`, so exclusive access is
/// enforced by the borrow checker; to share a session across tasks, wrap it
/// in a `tokio::sync::Mutex` and hold the lock for the whole turn.
pub struct ChatSession {
    generator: Arc<dyn TextGenerator>,
    system_prompt: String,
    context: String,
    history: Vec<ConversationMessage>,
}

impl ChatSession {
    /// Creates a session with the default proposal-analyst system prompt
    /// and no document context.
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self {
            generator,
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
            context: String::new(),
            history: Vec::new(),
        }
    }

    /// Overrides the system prompt.
    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = prompt.into();
        self
    }

    /// Replaces the document context wholesale. History is untouched.
    pub fn set_context(&mut self, text: impl Into<String>) {
        self.context = text.into();
    }

    /// Returns the current document context.
    pub fn context(&self) -> &str {
        &self.context
    }

    /// Returns the full stored history, including messages outside the
    /// rendering window.
    pub fn history(&self) -> &[ConversationMessage] {
        &self.history
    }

    /// Discards all stored messages. Context is untouched.
    pub fn clear_history(&mut self) {
        self.history.clear();
    }

    /// Runs one conversation turn.
    ///
    /// Appends the user message, renders the prompt (system prompt +
    /// document context + windowed history + closing instruction) and
    /// invokes the generator once. On success the reply is appended as an
    /// assistant message and returned. On failure a fixed apology is
    /// returned instead; the user message stays in history and no
    /// assistant message is appended.
    pub async fn chat(&mut self, user_message: &str) -> String {
        self.history.push(ConversationMessage::user(user_message));

        let prompt = self.render_prompt(user_message);
        match self.generator.generate(GenerateRequest::new(prompt)).await {
            Ok(reply) => {
                self.history.push(ConversationMessage::assistant(reply.clone()));
                reply
            }
            Err(err) => {
                warn!(error = %err, "chat generation failed, returning apology");
                APOLOGY.to_string()
            }
        }
    }

    fn render_prompt(&self, user_message: &str) -> String {
        format!(
            "{system}\n\n\
             CHARITY PROPOSAL DOCUMENT:\n{context}\n\n\
             PREVIOUS CONVERSATION:\n{history}\n\n\
             USER QUESTION: {user_message}\n\n\
             Please analyze based on your expertise and provide a clear, structured response.",
            system = self.system_prompt,
            context = self.context,
            history = self.render_history(),
        )
    }

    /// Renders the most recent [`HISTORY_WINDOW`] messages, one per entry,
    /// role mapped to a human-readable label and entries separated by a
    /// blank line.
    fn render_history(&self) -> String {
        if self.history.is_empty() {
            return "No previous conversation.".to_string();
        }

        let start = self.history.len().saturating_sub(HISTORY_WINDOW);
        let mut rendered = String::new();
        for msg in &self.history[start..] {
            rendered.push_str(&format!("{}: {}\n\n", msg.role.label(), msg.content));
        }
        rendered
    }
}
