//! One-shot Shariah-compliance review of a proposal PDF.

use crate::error::Result;
use crate::flags::{AnalysisResult, parse_flags};
use crate::generator::{Attachment, GenerateRequest, TextGenerator};
use std::sync::Arc;
use tracing::info;

const REVIEW_INSTRUCTION: &str = "\
You are reviewing a charity proposal for Shariah compliance and financial integrity.

Read the attached proposal document and identify every passage that raises a concern in one of these categories:
- Riba: interest-bearing terms, guaranteed returns on loans
- Gharar: excessive uncertainty in contracts, undefined obligations or profit splits
- Maysir: gambling-like mechanisms, lotteries, speculative fundraising
- Money laundering indicators: unusual cash flows, vague budgets, untraceable beneficiaries, suspicious partner organizations

For each concern, output exactly two lines in this format:
Flagged: <the verbatim excerpt from the document>
Explanation: <why this passage is a concern>

Report the concerns in the order they appear in the document. If the proposal raises no concerns, state that it appears compliant and do not use the format above.";

/// Sends a raw proposal PDF to the model for compliance review and parses
/// the response into discrete flags.
pub struct ProposalAnalyzer {
    generator: Arc<dyn TextGenerator>,
}

impl ProposalAnalyzer {
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self { generator }
    }

    /// Reviews the given PDF bytes.
    ///
    /// Flag parsing is total, so the only failure mode is the model call
    /// itself; there is no deterministic fallback for the raw analysis
    /// text, so generation errors propagate.
    ///
    /// # Errors
    ///
    /// Returns [`AmanahError::Generation`] if the model call fails.
    ///
    /// [`AmanahError::Generation`]: crate::error::AmanahError::Generation
    pub async fn analyze(&self, pdf_bytes: Vec<u8>) -> Result<AnalysisResult> {
        let request =
            GenerateRequest::new(REVIEW_INSTRUCTION).with_attachment(Attachment::pdf(pdf_bytes));

        let raw_text = self.generator.generate(request).await?;
        let flags = parse_flags(&raw_text);
        info!(flag_count = flags.len(), "proposal review completed");

        Ok(AnalysisResult { raw_text, flags })
    }
}
