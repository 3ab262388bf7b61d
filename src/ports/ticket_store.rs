//! Ticket persistence port with transactional scoping.
//!
//! One automation invocation performs all its writes through a single
//! [`TicketTx`] unit of work: either every persisted effect (draft,
//! severity/status, negotiation, link, updates) commits, or none does.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, Severity, TicketId, TicketStatus};
use crate::domain::ticket::{Draft, NewTicket, Ticket, TicketNumber, TranscriptEntry};

/// Read side and transaction factory for ticket persistence.
#[async_trait]
pub trait TicketStore: Send + Sync {
    /// All tickets currently in the `open` status, oldest first.
    async fn find_open_tickets(&self) -> Result<Vec<Ticket>, DomainError>;

    /// The ticket's draft, if one has been persisted.
    async fn find_draft(&self, ticket_id: TicketId) -> Result<Option<Draft>, DomainError>;

    /// Whether any negotiation record exists for the ticket.
    ///
    /// Advisory pre-check used by the batch runner to skip cheaply. The
    /// authoritative guard against double-running is
    /// [`TicketTx::has_negotiation`], re-checked under the ticket lock.
    async fn has_negotiation(&self, ticket_id: TicketId) -> Result<bool, DomainError>;

    /// Opens a unit of work spanning one automation invocation.
    async fn begin(&self) -> Result<Box<dyn TicketTx>, DomainError>;
}

/// Unit of work for one automation invocation.
///
/// Dropping an uncommitted unit of work discards every staged write.
#[async_trait]
pub trait TicketTx: Send {
    /// Takes a transaction-scoped lock on the ticket, released on commit
    /// or rollback. Fails fast instead of blocking, so a run that lost the
    /// race never waits behind the winner.
    ///
    /// # Errors
    ///
    /// - `AutomationConflict` if a concurrent invocation holds the lock
    async fn lock_ticket(&mut self, id: TicketId) -> Result<(), DomainError>;

    /// Whether any negotiation record exists, as seen from inside this unit
    /// of work. Re-checked after [`TicketTx::lock_ticket`] so an invocation
    /// that raced a committed run fails before writing anything.
    async fn has_negotiation(&mut self, ticket_id: TicketId) -> Result<bool, DomainError>;

    /// Inserts a ticket, allocating the next number for its prefix from a
    /// serialized per-prefix counter.
    async fn insert_ticket(
        &mut self,
        ticket: &NewTicket,
    ) -> Result<(TicketId, TicketNumber), DomainError>;

    /// Persists the draft unless one already exists (first write wins).
    /// Returns whether the draft was written.
    async fn insert_draft_if_absent(
        &mut self,
        ticket_id: TicketId,
        draft: &Draft,
    ) -> Result<bool, DomainError>;

    /// Projects a debate verdict onto the ticket row.
    ///
    /// # Errors
    ///
    /// - `TicketNotFound` if the ticket row is gone
    async fn set_triage_outcome(
        &mut self,
        id: TicketId,
        severity: Severity,
        status: TicketStatus,
    ) -> Result<(), DomainError>;

    /// Updates the ticket's lifecycle status.
    ///
    /// # Errors
    ///
    /// - `TicketNotFound` if the ticket row is gone
    async fn set_status(&mut self, id: TicketId, status: TicketStatus) -> Result<(), DomainError>;

    /// Appends a negotiation record with the run's transcript.
    async fn append_negotiation(
        &mut self,
        ticket_id: TicketId,
        phase: &str,
        transcript: &[TranscriptEntry],
    ) -> Result<(), DomainError>;

    /// Appends a duplicate-candidate link.
    async fn append_link(
        &mut self,
        ticket_id: TicketId,
        duplicate_of: TicketId,
        confidence: f64,
    ) -> Result<(), DomainError>;

    /// Appends a human-visible audit-log entry.
    async fn append_update(
        &mut self,
        ticket_id: TicketId,
        author: &str,
        message: &str,
    ) -> Result<(), DomainError>;

    /// Commits every write of this invocation as one atomic unit.
    async fn commit(self: Box<Self>) -> Result<(), DomainError>;
}
