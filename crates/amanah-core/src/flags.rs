//! Parser for Shariah-compliance review output.
//!
//! The model is instructed to report each issue as a `Flagged:` line with
//! the verbatim excerpt, followed by an `Explanation:` line. This module
//! turns that free text into discrete, attributable flags with a small
//! line-oriented state machine. Parsing is total: malformed input yields an
//! empty list, never an error.

use serde::{Deserialize, Serialize};

const FLAG_MARKER: &str = "Flagged:";
const EXPLANATION_MARKER: &str = "Explanation:";

/// One discrete compliance finding: the verbatim excerpt the model flagged
/// and its free-text rationale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComplianceFlag {
    pub phrase: String,
    pub explanation: String,
}

/// The full result of one compliance review: the raw model output plus the
/// flags parsed out of it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub raw_text: String,
    pub flags: Vec<ComplianceFlag>,
}

impl AnalysisResult {
    pub fn is_flagged(&self) -> bool {
        !self.flags.is_empty()
    }
}

/// Parses compliance flags out of free-text analysis output.
///
/// Two states: outside a flag, and inside one. A `Flagged:` marker (after
/// stripping leading whitespace; matching is case-sensitive and anchored,
/// so the marker text mid-line is ordinary prose) opens a new flag and
/// closes the previous one. Inside a flag, `Explanation:` replaces the
/// accumulated explanation, further non-empty lines are joined onto it with
/// single spaces, and blank lines are skipped. End of input closes the open
/// flag. Flags come back in source order.
pub fn parse_flags(analysis_text: &str) -> Vec<ComplianceFlag> {
    let mut flags = Vec::new();
    // (phrase, accumulated explanation) while inside a flag
    let mut current: Option<(String, String)> = None;

    for line in analysis_text.lines() {
        let line = line.trim_start();

        if let Some(rest) = line.strip_prefix(FLAG_MARKER) {
            if let Some((phrase, explanation)) = current.take() {
                flags.push(close_flag(phrase, explanation));
            }
            current = Some((rest.trim().to_string(), String::new()));
        } else if let Some((_, explanation)) = current.as_mut() {
            if let Some(rest) = line.strip_prefix(EXPLANATION_MARKER) {
                *explanation = rest.trim().to_string();
            } else if !line.trim().is_empty() {
                if !explanation.is_empty() {
                    explanation.push(' ');
                }
                explanation.push_str(line.trim());
            }
        }
    }

    if let Some((phrase, explanation)) = current {
        flags.push(close_flag(phrase, explanation));
    }

    flags
}

fn close_flag(phrase: String, explanation: String) -> ComplianceFlag {
    ComplianceFlag {
        phrase,
        explanation: explanation.trim().to_string(),
    }
}
