//! Sensitive-data detection: a fixed regex rule table plus the hybrid merge
//! with the LLM's contextual analysis.

pub mod hybrid;
pub mod patterns;

pub use hybrid::{format_answer, hybrid_analysis, HybridResult};
pub use patterns::{detect_pattern_based, distinct_kinds, Match, SensitiveKind};
