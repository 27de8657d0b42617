//! Collaborator implementations for the Amanah analysis engine.
//!
//! Provides the Gemini REST backend for text generation and the
//! Gemini-backed PDF-to-markdown ingestor.

pub mod gemini;
pub mod ingestor;

pub use gemini::GeminiGenerator;
pub use ingestor::GeminiIngestor;
