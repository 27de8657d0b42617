//! Text-generation collaborator contract.
//!
//! The engine never talks to a model vendor directly; every component that
//! needs generated text takes a [`TextGenerator`] handle. Implementations
//! live in `amanah-interaction`, test doubles live next to their tests.

use crate::error::Result;
use async_trait::async_trait;

/// A binary payload attached to a generation request, e.g. a proposal PDF
/// sent for direct multimodal review.
#[derive(Debug, Clone)]
pub struct Attachment {
    pub data: Vec<u8>,
    pub mime_type: String,
}

impl Attachment {
    pub fn new(data: Vec<u8>, mime_type: impl Into<String>) -> Self {
        Self {
            data,
            mime_type: mime_type.into(),
        }
    }

    /// Convenience constructor for PDF payloads.
    pub fn pdf(data: Vec<u8>) -> Self {
        Self::new(data, "application/pdf")
    }
}

/// A single generation request: prompt text plus optional system
/// instruction, binary attachment and sampling temperature.
#[derive(Debug, Clone, Default)]
pub struct GenerateRequest {
    pub prompt: String,
    pub system_instruction: Option<String>,
    pub attachment: Option<Attachment>,
    pub temperature: Option<f32>,
}

impl GenerateRequest {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            ..Self::default()
        }
    }

    /// Adds a system instruction sent alongside the prompt.
    pub fn with_system_instruction(mut self, instruction: impl Into<String>) -> Self {
        self.system_instruction = Some(instruction.into());
        self
    }

    /// Attaches a binary document to the request.
    pub fn with_attachment(mut self, attachment: Attachment) -> Self {
        self.attachment = Some(attachment);
        self
    }

    /// Overrides the sampling temperature.
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }
}

/// Contract for the model backend.
///
/// Implementations are expected to enforce their own request timeout and
/// surface expiry as a retryable [`AmanahError::Generation`]. Retrying is
/// the caller's decision; nothing in the core retries.
///
/// [`AmanahError::Generation`]: crate::error::AmanahError::Generation
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Generates text for the given request.
    async fn generate(&self, request: GenerateRequest) -> Result<String>;
}
