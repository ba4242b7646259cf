use serde::Serialize;
use std::fmt::Write;

use super::patterns::{detect_pattern_based, distinct_kinds, Match};

/// Shown in place of an empty contextual analysis.
pub const NO_CONTEXTUAL_FINDINGS: &str = "No contextual findings.";
/// Shown in place of an empty pattern block.
pub const NO_PATTERN_FINDINGS: &str = "No pattern-based detections.";

/// Pattern-based and LLM-based detections for one query, side by side.
#[derive(Debug, Clone, Serialize)]
pub struct HybridResult {
    pub pattern_based: Vec<Match>,
    pub contextual_analysis: String,
}

/// Combine pattern-based (regex) and LLM-based sensitive data detections.
pub fn hybrid_analysis(text: &str, contextual_analysis: &str) -> HybridResult {
    let pattern_based = detect_pattern_based(text);
    tracing::info!(
        "Hybrid analysis produced {} pattern matches. Kinds: {:?}",
        pattern_based.len(),
        distinct_kinds(&pattern_based)
    );
    HybridResult {
        pattern_based,
        contextual_analysis: contextual_analysis.to_string(),
    }
}

/// Render a hybrid result as the answer text returned to the caller.
pub fn format_answer(result: &HybridResult) -> String {
    let mut out = String::from("Pattern-Based Detections:\n");

    if result.pattern_based.is_empty() {
        let _ = writeln!(out, "- {NO_PATTERN_FINDINGS}");
    } else {
        for m in &result.pattern_based {
            let _ = writeln!(out, "- {}: {}", m.kind, m.value);
        }
    }

    out.push_str("\nContextual Analysis:\n");
    let contextual = result.contextual_analysis.trim();
    if contextual.is_empty() {
        out.push_str(NO_CONTEXTUAL_FINDINGS);
    } else {
        out.push_str(contextual);
    }

    out
}
