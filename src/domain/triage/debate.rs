//! Debate stage: the staged multi-agent assessment of a ticket.

use crate::domain::foundation::{Severity, Team, TicketId};
use crate::domain::ticket::{Draft, TranscriptEntry};

use super::heuristics::{assess_severity, detect_duplicate, route_team};

/// Output record of the debate stage.
///
/// Transient for one automation invocation; persisted only via its
/// projections (ticket severity/status, negotiation transcript, ticket link).
#[derive(Debug, Clone, PartialEq)]
pub struct Verdict {
    pub severity: Severity,
    pub sla_risk: f64,
    pub team: Team,
    pub status: &'static str,
    pub requires_human: bool,
    pub duplicate_of: Option<TicketId>,
    pub duplicate_confidence: f64,
    pub transcript: Vec<TranscriptEntry>,
}

/// Runs the heuristics as a sequence of simulated agent findings.
///
/// Assessment text is the draft's problem summary, falling back to the
/// ticket title when no draft exists. Deterministic and side-effect free;
/// the caller persists the projections. Every verdict currently requires a
/// human gate before resolution.
pub fn debate(ticket_title: &str, draft: Option<&Draft>) -> Verdict {
    let base_text = draft.map(|d| d.problem.as_str()).unwrap_or(ticket_title);
    let impact = draft.map(|d| d.impact.as_str()).unwrap_or("Unknown impact");

    let duplicate = detect_duplicate(base_text);
    let (severity, sla_risk) = assess_severity(base_text, impact);
    let team = route_team(base_text);

    let mut transcript = Vec::with_capacity(4);

    transcript.push(match duplicate {
        Some(hint) => TranscriptEntry::new(
            "Duplicate Detective Agent",
            format!("Potential duplicate of #{} ({})", hint.ticket, hint.confidence),
        )
        .with_evidence("Keyword overlap"),
        None => TranscriptEntry::new("Duplicate Detective Agent", "No strong duplicate signal")
            .with_evidence("None"),
    });

    transcript.push(
        TranscriptEntry::new(
            "Severity + SLA Risk Agent",
            format!("Severity {} with SLA risk {}", severity, sla_risk),
        )
        .with_evidence(impact),
    );

    transcript.push(TranscriptEntry::new(
        "Routing Agent",
        format!("Route to {} team. Automation lane: no", team),
    ));

    transcript.push(TranscriptEntry::new(
        "Manager Agent",
        "Consensus reached with evidence from draft keywords.",
    ));

    Verdict {
        severity,
        sla_risk,
        team,
        status: "triaged",
        requires_human: true,
        duplicate_of: duplicate.map(|hint| hint.ticket),
        duplicate_confidence: duplicate.map(|hint| hint.confidence).unwrap_or(0.0),
        transcript,
    }
}
