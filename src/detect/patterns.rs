//! Fixed regex rule table for sensitive-data detection.
//!
//! Rules run in table order. Within a rule, matches are reported in order of
//! occurrence using leftmost-first, non-overlapping semantics. No checksum
//! validation is applied, so the card and phone rules over-match long digit
//! runs.

use regex::Regex;
use serde::Serialize;
use std::sync::LazyLock;

/// Category of sensitive data a rule looks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum SensitiveKind {
    #[serde(rename = "email")]
    Email,
    #[serde(rename = "credit_card/debit_card")]
    PaymentCard,
    #[serde(rename = "ssn")]
    Ssn,
    #[serde(rename = "phone")]
    Phone,
    #[serde(rename = "jwt_token")]
    JwtToken,
    #[serde(rename = "ip_address")]
    IpAddress,
}

impl SensitiveKind {
    pub const ALL: [SensitiveKind; 6] = [
        SensitiveKind::Email,
        SensitiveKind::PaymentCard,
        SensitiveKind::Ssn,
        SensitiveKind::Phone,
        SensitiveKind::JwtToken,
        SensitiveKind::IpAddress,
    ];

    /// Label used in API output.
    pub fn label(&self) -> &'static str {
        match self {
            SensitiveKind::Email => "email",
            SensitiveKind::PaymentCard => "credit_card/debit_card",
            SensitiveKind::Ssn => "ssn",
            SensitiveKind::Phone => "phone",
            SensitiveKind::JwtToken => "jwt_token",
            SensitiveKind::IpAddress => "ip_address",
        }
    }

    fn pattern(&self) -> &'static str {
        match self {
            SensitiveKind::Email => r"[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}",
            SensitiveKind::PaymentCard => r"\b(?:\d[ -]*?){13,16}\b",
            SensitiveKind::Ssn => r"\b\d{3}-\d{2}-\d{4}\b",
            SensitiveKind::Phone => r"\b\d{3}[-.\s]?\d{3}[-.\s]?\d{4}\b",
            SensitiveKind::JwtToken => {
                r"\beyJ[a-zA-Z0-9_-]+\.eyJ[a-zA-Z0-9_-]+\.[a-zA-Z0-9_-]+\b"
            }
            SensitiveKind::IpAddress => r"\b(?:\d{1,3}\.){3}\d{1,3}\b",
        }
    }
}

impl std::fmt::Display for SensitiveKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// A compiled detection rule.
pub struct PatternRule {
    pub kind: SensitiveKind,
    pub regex: Regex,
}

/// One occurrence of a rule match in the scanned text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Match {
    #[serde(rename = "type")]
    pub kind: SensitiveKind,
    pub value: String,
}

static RULES: LazyLock<Vec<PatternRule>> = LazyLock::new(|| {
    SensitiveKind::ALL
        .iter()
        .map(|kind| PatternRule {
            kind: *kind,
            // The table is fixed; a bad pattern is a programming error caught by tests.
            regex: Regex::new(kind.pattern()).expect("built-in sensitive pattern must compile"),
        })
        .collect()
});

/// The process-wide rule table, in evaluation order.
pub fn rules() -> &'static [PatternRule] {
    &RULES
}

/// Detect basic sensitive patterns via regex.
pub fn detect_pattern_based(text: &str) -> Vec<Match> {
    let mut matches = Vec::new();
    if text.is_empty() {
        return matches;
    }

    for rule in rules() {
        for m in rule.regex.find_iter(text) {
            matches.push(Match {
                kind: rule.kind,
                value: m.as_str().to_string(),
            });
        }
    }

    matches
}

/// Distinct kinds among `matches`, in table order.
pub fn distinct_kinds(matches: &[Match]) -> Vec<SensitiveKind> {
    SensitiveKind::ALL
        .into_iter()
        .filter(|kind| matches.iter().any(|m| m.kind == *kind))
        .collect()
}
