//! Clarification stage: derives missing-information questions from a draft.

use crate::domain::ticket::Draft;

/// Maximum number of questions emitted per run.
const MAX_QUESTIONS: usize = 3;

/// Derives an ordered list of at most three clarification questions.
///
/// Gaps are checked in a fixed order: unknown environment, placeholder
/// reproduction note, missing impact. When no gap is found a single generic
/// fallback question is emitted. Pure; the caller logs the output.
pub fn clarify(draft: &Draft) -> Vec<String> {
    let mut questions = Vec::new();

    if draft.environment.is_empty() || draft.environment == "Unknown" {
        questions.push("Which OS and app version are you using?".to_string());
    }
    if draft.reproduction.is_empty() || draft.reproduction.contains("pending") {
        questions.push("Can you share the exact steps to reproduce?".to_string());
    }
    if draft.impact.is_empty() {
        questions.push("How many users or teams are impacted?".to_string());
    }

    if questions.is_empty() {
        questions.push("Any recent changes before the issue started?".to_string());
    }

    questions.truncate(MAX_QUESTIONS);
    questions
}
