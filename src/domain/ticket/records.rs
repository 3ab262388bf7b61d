//! Append-only records produced by automation runs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::foundation::TicketId;

/// One simulated agent finding inside a debate transcript.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptEntry {
    pub id: Uuid,
    pub agent: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub evidence: Option<String>,
}

impl TranscriptEntry {
    pub fn new(agent: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            agent: agent.into(),
            message: message.into(),
            evidence: None,
        }
    }

    pub fn with_evidence(mut self, evidence: impl Into<String>) -> Self {
        self.evidence = Some(evidence.into());
        self
    }
}

/// Persisted transcript of one triage run.
///
/// Append-only: a ticket accumulates one record per automation invocation,
/// and the presence of any record is the batch runner's idempotency guard.
#[derive(Debug, Clone, PartialEq)]
pub struct Negotiation {
    pub ticket_id: TicketId,
    pub phase: String,
    pub transcript: Vec<TranscriptEntry>,
    pub created_at: DateTime<Utc>,
}

/// Lookup-only cross-reference to a suspected duplicate ticket.
#[derive(Debug, Clone, PartialEq)]
pub struct TicketLink {
    pub ticket_id: TicketId,
    pub duplicate_of: TicketId,
    pub confidence: f64,
    pub created_at: DateTime<Utc>,
}

/// Human-visible audit-log entry on a ticket.
#[derive(Debug, Clone, PartialEq)]
pub struct TicketUpdate {
    pub ticket_id: TicketId,
    pub author: String,
    pub message: String,
    pub created_at: DateTime<Utc>,
}
