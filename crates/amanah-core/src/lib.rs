//! Core domain logic for the Amanah proposal-analysis engine.
//!
//! Turns an ingested charity/zakat proposal into structured analysis:
//! a schema-complete financial-metrics record, a list of discrete
//! Shariah-compliance flags, and a document-grounded Q&A session with a
//! bounded prompt window. Model and OCR backends are injected through the
//! [`TextGenerator`] and [`DocumentIngestor`] traits; implementations live
//! in `amanah-interaction`.

pub mod analyzer;
pub mod error;
pub mod flags;
pub mod generator;
pub mod ingest;
pub mod metrics;
pub mod session;

// Re-export common types
pub use analyzer::ProposalAnalyzer;
pub use error::{AmanahError, Result};
pub use flags::{AnalysisResult, ComplianceFlag, parse_flags};
pub use generator::{Attachment, GenerateRequest, TextGenerator};
pub use ingest::{DocumentIngestor, ensure_pdf};
pub use metrics::{MetricValue, MetricsExtractor, ZakatMetrics};
pub use session::{ChatSession, ConversationMessage, HISTORY_WINDOW, MessageRole};
