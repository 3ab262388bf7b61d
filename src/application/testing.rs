//! In-memory ticket store for application-layer tests.
//!
//! Mirrors the transactional contract of the Postgres adapter: writes are
//! staged inside a unit of work and become visible only on commit, so the
//! atomicity properties of the engine can be asserted without a database.
//! Number sequences are applied immediately, like real database sequences,
//! and are not rolled back with the transaction.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;

use crate::domain::foundation::{
    DomainError, ErrorCode, Priority, Severity, TicketId, TicketStatus,
};
use crate::domain::ticket::{
    Draft, DraftConfidence, DraftEvidence, Negotiation, NewTicket, Ticket, TicketKind, TicketLink,
    TicketNumber, TicketUpdate, TranscriptEntry,
};
use crate::ports::{TicketStore, TicketTx};

/// Write that can be forced to fail, for rollback assertions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum FailPoint {
    UpdateByAuthor(&'static str),
    NegotiationFor(TicketId),
}

#[derive(Default)]
struct MemoryState {
    tickets: HashMap<i64, Ticket>,
    drafts: HashMap<i64, Draft>,
    negotiations: Vec<Negotiation>,
    links: Vec<TicketLink>,
    updates: Vec<TicketUpdate>,
    sequences: HashMap<&'static str, i64>,
    next_row_id: i64,
}

enum StagedWrite {
    InsertTicket(Ticket),
    InsertDraft(i64, Draft),
    SetTriage(i64, Severity, TicketStatus),
    SetStatus(i64, TicketStatus),
    Negotiation(Negotiation),
    Link(TicketLink),
    Update(TicketUpdate),
}

pub(crate) struct MemoryTicketStore {
    state: Arc<Mutex<MemoryState>>,
    locks: Arc<Mutex<HashSet<i64>>>,
    fail: Arc<Mutex<Option<FailPoint>>>,
}

impl MemoryTicketStore {
    pub(crate) fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(MemoryState::default())),
            locks: Arc::new(Mutex::new(HashSet::new())),
            fail: Arc::new(Mutex::new(None)),
        }
    }

    /// Forces the next matching write to fail.
    pub(crate) fn fail_on(&self, point: FailPoint) {
        *self.fail.lock().unwrap() = Some(point);
    }

    /// Inserts a committed ticket directly, bypassing any transaction.
    pub(crate) fn seed_ticket(&self, subject: &str, body: &str, status: TicketStatus) -> Ticket {
        let mut state = self.state.lock().unwrap();
        state.next_row_id += 1;
        let id = state.next_row_id;
        let sequence = state.sequences.entry("INC").or_insert(0);
        *sequence += 1;
        let ticket = Ticket {
            id: TicketId::new(id),
            number: TicketNumber::new(TicketKind::Incident, *sequence),
            subject: subject.to_string(),
            body: body.to_string(),
            status,
            severity: None,
            priority: Priority::Medium,
            company: None,
            assignees: vec![],
            created_by: "reporter@example.com".to_string(),
            created_at: Utc::now(),
        };
        state.tickets.insert(id, ticket.clone());
        ticket
    }

    /// Inserts a committed draft directly.
    pub(crate) fn seed_draft(&self, ticket_id: TicketId, problem: &str) -> Draft {
        let draft = Draft {
            problem: problem.to_string(),
            environment: "Unknown".to_string(),
            reproduction: "User reported issue, steps pending.".to_string(),
            impact: "Degraded experience".to_string(),
            user_intent: "Resolve and confirm service health.".to_string(),
            confidence: DraftConfidence {
                environment: 0.42,
                impact: 0.5,
            },
            evidence: DraftEvidence {
                environment: "Keyword scan".to_string(),
                impact: "Keyword scan".to_string(),
            },
        };
        self.state
            .lock()
            .unwrap()
            .drafts
            .insert(ticket_id.as_i64(), draft.clone());
        draft
    }

    /// Inserts a committed negotiation directly (for idempotency-guard tests).
    pub(crate) fn seed_negotiation(&self, ticket_id: TicketId) {
        self.state.lock().unwrap().negotiations.push(Negotiation {
            ticket_id,
            phase: "triage".to_string(),
            transcript: vec![TranscriptEntry::new("Manager Agent", "prior run")],
            created_at: Utc::now(),
        });
    }

    pub(crate) fn ticket(&self, id: TicketId) -> Option<Ticket> {
        self.state.lock().unwrap().tickets.get(&id.as_i64()).cloned()
    }

    pub(crate) fn negotiations_for(&self, id: TicketId) -> Vec<Negotiation> {
        self.state
            .lock()
            .unwrap()
            .negotiations
            .iter()
            .filter(|n| n.ticket_id == id)
            .cloned()
            .collect()
    }

    pub(crate) fn links_for(&self, id: TicketId) -> Vec<TicketLink> {
        self.state
            .lock()
            .unwrap()
            .links
            .iter()
            .filter(|l| l.ticket_id == id)
            .cloned()
            .collect()
    }

    pub(crate) fn updates_for(&self, id: TicketId) -> Vec<TicketUpdate> {
        self.state
            .lock()
            .unwrap()
            .updates
            .iter()
            .filter(|u| u.ticket_id == id)
            .cloned()
            .collect()
    }

    pub(crate) fn ticket_count(&self) -> usize {
        self.state.lock().unwrap().tickets.len()
    }
}

#[async_trait]
impl TicketStore for MemoryTicketStore {
    async fn find_open_tickets(&self) -> Result<Vec<Ticket>, DomainError> {
        let mut tickets: Vec<Ticket> = self
            .state
            .lock()
            .unwrap()
            .tickets
            .values()
            .filter(|t| t.status == TicketStatus::Open)
            .cloned()
            .collect();
        tickets.sort_by_key(|t| t.id);
        Ok(tickets)
    }

    async fn find_draft(&self, ticket_id: TicketId) -> Result<Option<Draft>, DomainError> {
        Ok(self
            .state
            .lock()
            .unwrap()
            .drafts
            .get(&ticket_id.as_i64())
            .cloned())
    }

    async fn has_negotiation(&self, ticket_id: TicketId) -> Result<bool, DomainError> {
        Ok(self
            .state
            .lock()
            .unwrap()
            .negotiations
            .iter()
            .any(|n| n.ticket_id == ticket_id))
    }

    async fn begin(&self) -> Result<Box<dyn TicketTx>, DomainError> {
        Ok(Box::new(MemoryTx {
            state: self.state.clone(),
            locks: self.locks.clone(),
            fail: *self.fail.lock().unwrap(),
            staged: Vec::new(),
            held: Vec::new(),
        }))
    }
}

struct MemoryTx {
    state: Arc<Mutex<MemoryState>>,
    locks: Arc<Mutex<HashSet<i64>>>,
    fail: Option<FailPoint>,
    staged: Vec<StagedWrite>,
    held: Vec<i64>,
}

// Locks live until the unit of work is dropped, mirroring the lifetime of a
// transaction-scoped advisory lock.
impl Drop for MemoryTx {
    fn drop(&mut self) {
        let mut locks = self.locks.lock().unwrap();
        for id in &self.held {
            locks.remove(id);
        }
    }
}

impl MemoryTx {
    fn ticket_exists(&self, id: TicketId) -> bool {
        if self.state.lock().unwrap().tickets.contains_key(&id.as_i64()) {
            return true;
        }
        self.staged
            .iter()
            .any(|w| matches!(w, StagedWrite::InsertTicket(t) if t.id == id))
    }
}

#[async_trait]
impl TicketTx for MemoryTx {
    async fn lock_ticket(&mut self, id: TicketId) -> Result<(), DomainError> {
        if !self.locks.lock().unwrap().insert(id.as_i64()) {
            return Err(DomainError::new(
                ErrorCode::AutomationConflict,
                format!("Ticket is locked by a concurrent automation run: {}", id),
            ));
        }
        self.held.push(id.as_i64());
        Ok(())
    }

    async fn has_negotiation(&mut self, ticket_id: TicketId) -> Result<bool, DomainError> {
        let committed = self
            .state
            .lock()
            .unwrap()
            .negotiations
            .iter()
            .any(|n| n.ticket_id == ticket_id);
        Ok(committed
            || self
                .staged
                .iter()
                .any(|w| matches!(w, StagedWrite::Negotiation(n) if n.ticket_id == ticket_id)))
    }

    async fn insert_ticket(
        &mut self,
        ticket: &NewTicket,
    ) -> Result<(TicketId, TicketNumber), DomainError> {
        // Row id and sequence are allocated immediately, like DB sequences.
        let (id, number) = {
            let mut state = self.state.lock().unwrap();
            state.next_row_id += 1;
            let id = TicketId::new(state.next_row_id);
            let sequence = state.sequences.entry(ticket.kind.prefix()).or_insert(0);
            *sequence += 1;
            (id, TicketNumber::new(ticket.kind, *sequence))
        };

        self.staged.push(StagedWrite::InsertTicket(Ticket {
            id,
            number,
            subject: ticket.subject.clone(),
            body: ticket.body.clone(),
            status: ticket.status,
            severity: None,
            priority: ticket.priority,
            company: ticket.company.clone(),
            assignees: ticket.assignees.clone(),
            created_by: ticket.created_by.clone(),
            created_at: Utc::now(),
        }));
        Ok((id, number))
    }

    async fn insert_draft_if_absent(
        &mut self,
        ticket_id: TicketId,
        draft: &Draft,
    ) -> Result<bool, DomainError> {
        let committed = self
            .state
            .lock()
            .unwrap()
            .drafts
            .contains_key(&ticket_id.as_i64());
        let staged = self
            .staged
            .iter()
            .any(|w| matches!(w, StagedWrite::InsertDraft(id, _) if *id == ticket_id.as_i64()));
        if committed || staged {
            return Ok(false);
        }
        self.staged
            .push(StagedWrite::InsertDraft(ticket_id.as_i64(), draft.clone()));
        Ok(true)
    }

    async fn set_triage_outcome(
        &mut self,
        id: TicketId,
        severity: Severity,
        status: TicketStatus,
    ) -> Result<(), DomainError> {
        if !self.ticket_exists(id) {
            return Err(DomainError::new(
                ErrorCode::TicketNotFound,
                format!("Ticket not found: {}", id),
            ));
        }
        self.staged
            .push(StagedWrite::SetTriage(id.as_i64(), severity, status));
        Ok(())
    }

    async fn set_status(&mut self, id: TicketId, status: TicketStatus) -> Result<(), DomainError> {
        if !self.ticket_exists(id) {
            return Err(DomainError::new(
                ErrorCode::TicketNotFound,
                format!("Ticket not found: {}", id),
            ));
        }
        self.staged.push(StagedWrite::SetStatus(id.as_i64(), status));
        Ok(())
    }

    async fn append_negotiation(
        &mut self,
        ticket_id: TicketId,
        phase: &str,
        transcript: &[TranscriptEntry],
    ) -> Result<(), DomainError> {
        if self.fail == Some(FailPoint::NegotiationFor(ticket_id)) {
            return Err(DomainError::new(
                ErrorCode::DatabaseError,
                "Simulated negotiation insert failure",
            ));
        }
        self.staged.push(StagedWrite::Negotiation(Negotiation {
            ticket_id,
            phase: phase.to_string(),
            transcript: transcript.to_vec(),
            created_at: Utc::now(),
        }));
        Ok(())
    }

    async fn append_link(
        &mut self,
        ticket_id: TicketId,
        duplicate_of: TicketId,
        confidence: f64,
    ) -> Result<(), DomainError> {
        self.staged.push(StagedWrite::Link(TicketLink {
            ticket_id,
            duplicate_of,
            confidence,
            created_at: Utc::now(),
        }));
        Ok(())
    }

    async fn append_update(
        &mut self,
        ticket_id: TicketId,
        author: &str,
        message: &str,
    ) -> Result<(), DomainError> {
        if matches!(self.fail, Some(FailPoint::UpdateByAuthor(a)) if a == author) {
            return Err(DomainError::new(
                ErrorCode::DatabaseError,
                "Simulated update insert failure",
            ));
        }
        self.staged.push(StagedWrite::Update(TicketUpdate {
            ticket_id,
            author: author.to_string(),
            message: message.to_string(),
            created_at: Utc::now(),
        }));
        Ok(())
    }

    async fn commit(mut self: Box<Self>) -> Result<(), DomainError> {
        let staged = std::mem::take(&mut self.staged);
        let mut state = self.state.lock().unwrap();
        for write in staged {
            match write {
                StagedWrite::InsertTicket(ticket) => {
                    state.tickets.insert(ticket.id.as_i64(), ticket);
                }
                StagedWrite::InsertDraft(id, draft) => {
                    state.drafts.insert(id, draft);
                }
                StagedWrite::SetTriage(id, severity, status) => {
                    if let Some(ticket) = state.tickets.get_mut(&id) {
                        ticket.severity = Some(severity);
                        ticket.status = status;
                    }
                }
                StagedWrite::SetStatus(id, status) => {
                    if let Some(ticket) = state.tickets.get_mut(&id) {
                        ticket.status = status;
                    }
                }
                StagedWrite::Negotiation(negotiation) => state.negotiations.push(negotiation),
                StagedWrite::Link(link) => state.links.push(link),
                StagedWrite::Update(update) => state.updates.push(update),
            }
        }
        Ok(())
    }
}
