//! Intake stage: builds a structured draft from raw report text.

use std::sync::Arc;

use crate::domain::ticket::{Draft, DraftConfidence, DraftEvidence};
use crate::ports::{ExtractedFields, TextExtractor};

use super::heuristics::{extract_impact, infer_environment};

/// Maximum length of the drafted problem summary.
const PROBLEM_SUMMARY_CHARS: usize = 140;

/// Placeholder reproduction note until the reporter supplies steps.
pub const REPRODUCTION_PLACEHOLDER: &str = "User reported issue, steps pending.";

/// Default user intent for a fresh report.
pub const USER_INTENT_DEFAULT: &str = "Resolve and confirm service health.";

/// Builds drafts from raw report text.
///
/// Holds the optional text-extraction capability; when absent, the keyword
/// heuristics are the whole story. Extraction failures of any kind fall back
/// silently to the heuristic draft, so `build_draft` never fails the caller.
#[derive(Clone)]
pub struct DraftBuilder {
    extractor: Option<Arc<dyn TextExtractor>>,
}

impl DraftBuilder {
    /// Builder using keyword heuristics only.
    pub fn heuristic_only() -> Self {
        Self { extractor: None }
    }

    /// Builder that refines the heuristic draft with an extraction capability.
    pub fn with_extractor(extractor: Arc<dyn TextExtractor>) -> Self {
        Self {
            extractor: Some(extractor),
        }
    }

    /// Builds a draft for the given raw text.
    pub async fn build_draft(&self, raw_text: &str) -> Draft {
        let draft = heuristic_draft(raw_text);

        let Some(extractor) = &self.extractor else {
            return draft;
        };

        match extractor.extract(raw_text).await {
            Ok(fields) => merge_extracted(draft, fields),
            Err(err) => {
                tracing::debug!(error = %err, "text extraction failed, using heuristic draft");
                draft
            }
        }
    }
}

fn heuristic_draft(raw_text: &str) -> Draft {
    Draft {
        problem: raw_text.chars().take(PROBLEM_SUMMARY_CHARS).collect(),
        environment: infer_environment(raw_text).to_string(),
        reproduction: REPRODUCTION_PLACEHOLDER.to_string(),
        impact: extract_impact(raw_text).to_string(),
        user_intent: USER_INTENT_DEFAULT.to_string(),
        confidence: DraftConfidence {
            environment: 0.42,
            impact: 0.50,
        },
        evidence: DraftEvidence {
            environment: "Keyword scan".to_string(),
            impact: "Keyword scan".to_string(),
        },
    }
}

fn merge_extracted(mut draft: Draft, fields: ExtractedFields) -> Draft {
    if let Some(problem) = fields.problem {
        draft.problem = problem;
    }
    if let Some(environment) = fields.environment {
        draft.environment = environment;
    }
    if let Some(reproduction) = fields.reproduction {
        draft.reproduction = reproduction;
    }
    if let Some(impact) = fields.impact {
        draft.impact = impact;
    }
    if let Some(user_intent) = fields.user_intent {
        draft.user_intent = user_intent;
    }
    if let Some(environment) = fields.confidence.environment {
        draft.confidence.environment = environment;
    }
    if let Some(impact) = fields.confidence.impact {
        draft.confidence.impact = impact;
    }
    if let Some(environment) = fields.evidence.environment {
        draft.evidence.environment = environment;
    }
    if let Some(impact) = fields.evidence.impact {
        draft.evidence.impact = impact;
    }
    draft
}
