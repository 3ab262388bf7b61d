//! Resolution stage: builds the resolution narrative for a ticket.

use crate::domain::ticket::Draft;

/// Produces a resolution narrative from the ticket title and optional draft.
///
/// Fixed-template triage recommendation plus the draft's problem summary,
/// falling back to the title when no draft exists. Always succeeds.
pub fn propose_resolution(ticket_title: &str, draft: Option<&Draft>) -> String {
    let core = draft.map(|d| d.problem.as_str()).unwrap_or(ticket_title);
    format!(
        "Workaround now: capture logs and confirm the affected endpoints. \
         Escalation next: assign to on-call if metrics stay degraded. \
         Summary: {}",
        core
    )
}
