//! Escalation policy over SLA breach risk.

/// SLA risk above this threshold triggers escalation.
const ESCALATION_THRESHOLD: f64 = 0.70;

/// Escalation decision for one verdict.
#[derive(Debug, Clone, PartialEq)]
pub struct Escalation {
    pub escalate: bool,
    pub message: String,
}

/// Applies the escalation policy to an SLA risk score in `[0, 1]`.
///
/// Total function: every input yields a decision, never an error.
pub fn apply_escalation(sla_risk: f64) -> Escalation {
    if sla_risk > ESCALATION_THRESHOLD {
        Escalation {
            escalate: true,
            message: "SLA risk above threshold. Auto-page on-call and raise comms urgency."
                .to_string(),
        }
    } else {
        Escalation {
            escalate: false,
            message: "No escalation required.".to_string(),
        }
    }
}
