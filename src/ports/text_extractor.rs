//! Text-extraction capability port.
//!
//! The intake stage can optionally refine its heuristic draft with fields
//! extracted by an external model. The capability is injected explicitly;
//! when unconfigured the heuristic path runs identically in tests and in
//! production. Implementations must bound their call with a timeout so the
//! intake stage never blocks a transaction indefinitely.

use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;

/// Partial confidence scores returned by the extractor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
pub struct ExtractedConfidence {
    pub environment: Option<f64>,
    pub impact: Option<f64>,
}

/// Partial evidence labels returned by the extractor.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ExtractedEvidence {
    pub environment: Option<String>,
    pub impact: Option<String>,
}

/// Draft fields the extractor managed to produce.
///
/// Every field is optional; present fields override the heuristic draft
/// field-by-field, absent fields keep the heuristic value.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ExtractedFields {
    pub problem: Option<String>,
    pub environment: Option<String>,
    pub reproduction: Option<String>,
    pub impact: Option<String>,
    #[serde(rename = "userIntent")]
    pub user_intent: Option<String>,
    #[serde(default)]
    pub confidence: ExtractedConfidence,
    #[serde(default)]
    pub evidence: ExtractedEvidence,
}

/// Failure modes of the extraction capability.
///
/// Callers recover from every variant by falling back to the heuristic
/// draft; none of these errors surface past the intake stage.
#[derive(Debug, Error)]
pub enum ExtractorError {
    #[error("Extraction request timed out")]
    Timeout,

    #[error("Extraction request failed: {0}")]
    Request(String),

    #[error("Extractor returned malformed output: {0}")]
    MalformedOutput(String),
}

/// Port for the optional text-extraction capability.
#[async_trait]
pub trait TextExtractor: Send + Sync {
    /// Extracts structured draft fields from raw report text.
    async fn extract(&self, raw_text: &str) -> Result<ExtractedFields, ExtractorError>;
}
