//! Lifecycle and classification enums for tickets.
//!
//! `TicketStatus` is the single canonical status vocabulary. Every layer that
//! reads or writes a status string goes through [`TicketStatus::parse`], which
//! also folds legacy aliases ("pending_approval") into the canonical form so
//! two spellings of the same state never coexist in persisted data.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::ValidationError;

/// Canonical ticket lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TicketStatus {
    Open,
    PendingInfo,
    InProgress,
    Resolved,
}

impl TicketStatus {
    /// Returns the canonical wire/storage spelling.
    pub fn as_str(&self) -> &'static str {
        match self {
            TicketStatus::Open => "open",
            TicketStatus::PendingInfo => "pending_info",
            TicketStatus::InProgress => "in_progress",
            TicketStatus::Resolved => "resolved",
        }
    }

    /// Parses a status string, normalizing known legacy aliases.
    pub fn parse(s: &str) -> Result<Self, ValidationError> {
        match s {
            "open" => Ok(TicketStatus::Open),
            "pending_info" | "pending_approval" => Ok(TicketStatus::PendingInfo),
            "in_progress" => Ok(TicketStatus::InProgress),
            "resolved" => Ok(TicketStatus::Resolved),
            other => Err(ValidationError::invalid_format(
                "status",
                format!("Unknown ticket status: {}", other),
            )),
        }
    }

    /// Returns true if a transition from self to target is valid.
    ///
    /// Transitions are monotonic within one automation run: an open ticket
    /// either halts pending info or moves through in_progress to resolved.
    /// A resolved ticket is terminal.
    pub fn can_transition_to(&self, target: TicketStatus) -> bool {
        matches!(
            (self, target),
            (TicketStatus::Open, TicketStatus::PendingInfo)
                | (TicketStatus::Open, TicketStatus::InProgress)
                | (TicketStatus::PendingInfo, TicketStatus::InProgress)
                | (TicketStatus::InProgress, TicketStatus::Resolved)
        )
    }
}

impl fmt::Display for TicketStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Incident severity produced by the debate stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Severity {
    S1,
    S2,
    S3,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::S1 => "S1",
            Severity::S2 => "S2",
            Severity::S3 => "S3",
        }
    }

    pub fn parse(s: &str) -> Result<Self, ValidationError> {
        match s {
            "S1" => Ok(Severity::S1),
            "S2" => Ok(Severity::S2),
            "S3" => Ok(Severity::S3),
            other => Err(ValidationError::invalid_format(
                "severity",
                format!("Unknown severity: {}", other),
            )),
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Human-facing ticket priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Critical,
    High,
    Medium,
    Low,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Critical => "critical",
            Priority::High => "high",
            Priority::Medium => "medium",
            Priority::Low => "low",
        }
    }

    /// Parses a priority, case-insensitively (callers send "High" and "high").
    pub fn parse(s: &str) -> Result<Self, ValidationError> {
        match s.to_ascii_lowercase().as_str() {
            "critical" => Ok(Priority::Critical),
            "high" => Ok(Priority::High),
            "medium" => Ok(Priority::Medium),
            "low" => Ok(Priority::Low),
            other => Err(ValidationError::invalid_format(
                "priority",
                format!("Unknown priority: {}", other),
            )),
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Owning team a ticket routes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Team {
    Billing,
    Auth,
    Infra,
    Frontend,
    Backend,
}

impl Team {
    pub fn as_str(&self) -> &'static str {
        match self {
            Team::Billing => "billing",
            Team::Auth => "auth",
            Team::Infra => "infra",
            Team::Frontend => "frontend",
            Team::Backend => "backend",
        }
    }

    /// Assignee label for this team, e.g. "Billing Team".
    pub fn assignee_label(&self) -> String {
        let name = self.as_str();
        let mut label = String::with_capacity(name.len() + 5);
        let mut chars = name.chars();
        if let Some(first) = chars.next() {
            label.extend(first.to_uppercase());
            label.push_str(chars.as_str());
        }
        label.push_str(" Team");
        label
    }
}

impl fmt::Display for Team {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_roundtrips_through_canonical_spelling() {
        for status in [
            TicketStatus::Open,
            TicketStatus::PendingInfo,
            TicketStatus::InProgress,
            TicketStatus::Resolved,
        ] {
            assert_eq!(TicketStatus::parse(status.as_str()).unwrap(), status);
        }
    }

    #[test]
    fn status_normalizes_pending_approval_alias() {
        assert_eq!(
            TicketStatus::parse("pending_approval").unwrap(),
            TicketStatus::PendingInfo
        );
    }

    #[test]
    fn status_rejects_unknown_spelling() {
        assert!(TicketStatus::parse("triaged").is_err());
    }

    #[test]
    fn open_ticket_can_halt_or_progress() {
        assert!(TicketStatus::Open.can_transition_to(TicketStatus::PendingInfo));
        assert!(TicketStatus::Open.can_transition_to(TicketStatus::InProgress));
        assert!(!TicketStatus::Open.can_transition_to(TicketStatus::Resolved));
    }

    #[test]
    fn resolved_ticket_is_terminal() {
        for target in [
            TicketStatus::Open,
            TicketStatus::PendingInfo,
            TicketStatus::InProgress,
            TicketStatus::Resolved,
        ] {
            assert!(!TicketStatus::Resolved.can_transition_to(target));
        }
    }

    #[test]
    fn pending_info_resumes_to_in_progress_only() {
        assert!(TicketStatus::PendingInfo.can_transition_to(TicketStatus::InProgress));
        assert!(!TicketStatus::PendingInfo.can_transition_to(TicketStatus::Resolved));
        assert!(!TicketStatus::PendingInfo.can_transition_to(TicketStatus::Open));
    }

    #[test]
    fn severity_roundtrips() {
        for severity in [Severity::S1, Severity::S2, Severity::S3] {
            assert_eq!(Severity::parse(severity.as_str()).unwrap(), severity);
        }
    }

    #[test]
    fn priority_parses_case_insensitively() {
        assert_eq!(Priority::parse("Critical").unwrap(), Priority::Critical);
        assert_eq!(Priority::parse("high").unwrap(), Priority::High);
        assert!(Priority::parse("urgent").is_err());
    }

    #[test]
    fn team_assignee_label_is_capitalized() {
        assert_eq!(Team::Billing.assignee_label(), "Billing Team");
        assert_eq!(Team::Backend.assignee_label(), "Backend Team");
    }
}
