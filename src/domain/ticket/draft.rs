//! Structured draft extracted from a raw ticket report.

use serde::{Deserialize, Serialize};

/// Per-field confidence scores for a draft, in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DraftConfidence {
    pub environment: f64,
    pub impact: f64,
}

/// Per-field evidence labels describing how a draft field was derived.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DraftEvidence {
    pub environment: String,
    pub impact: String,
}

/// Structured extraction of a raw ticket report.
///
/// One-to-one with a ticket and immutable once persisted: later stages read
/// it but never overwrite it. Confidence and evidence are typed in memory and
/// serialized to JSON only at the persistence boundary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Draft {
    pub problem: String,
    pub environment: String,
    pub reproduction: String,
    pub impact: String,
    #[serde(rename = "userIntent")]
    pub user_intent: String,
    pub confidence: DraftConfidence,
    pub evidence: DraftEvidence,
}
