//! The ticket record owned by the automation engine for one invocation.

use chrono::{DateTime, Utc};

use crate::domain::foundation::{Priority, Severity, TicketId, TicketStatus};

use super::number::{TicketKind, TicketNumber};

/// A persisted support ticket.
///
/// Severity is `None` until the first triage run assigns one.
#[derive(Debug, Clone, PartialEq)]
pub struct Ticket {
    pub id: TicketId,
    pub number: TicketNumber,
    pub subject: String,
    pub body: String,
    pub status: TicketStatus,
    pub severity: Option<Severity>,
    pub priority: Priority,
    pub company: Option<String>,
    pub assignees: Vec<String>,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
}

impl Ticket {
    /// Text the intake stage should draft from: the body, falling back to
    /// the subject when the report arrived without one.
    pub fn intake_text(&self) -> &str {
        if self.body.is_empty() {
            &self.subject
        } else {
            &self.body
        }
    }
}

/// Fields required to insert a ticket; id and number are store-assigned.
#[derive(Debug, Clone)]
pub struct NewTicket {
    pub kind: TicketKind,
    pub subject: String,
    pub body: String,
    pub status: TicketStatus,
    pub priority: Priority,
    pub company: Option<String>,
    pub assignees: Vec<String>,
    pub created_by: String,
}
