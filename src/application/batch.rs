//! Batch runner: automates every eligible open ticket in one pass.

use std::sync::Arc;

use crate::domain::foundation::{DomainError, ErrorCode};
use crate::ports::TicketStore;

use super::automation::AutomationEngine;

/// Actor label recorded on updates written by batch-triggered runs.
const BATCH_ACTOR: &str = "Automation Runner";

/// Counts for one batch pass.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BatchOutcome {
    pub processed: u32,
    pub skipped: u32,
}

/// Iterates open tickets and invokes the automation engine once per ticket.
pub struct BatchRunner {
    store: Arc<dyn TicketStore>,
    engine: AutomationEngine,
}

impl BatchRunner {
    pub fn new(store: Arc<dyn TicketStore>, engine: AutomationEngine) -> Self {
        Self { store, engine }
    }

    /// Runs one sequential batch pass over all open tickets.
    ///
    /// Tickets that already have a negotiation record are skipped (the
    /// idempotency guard), as are tickets claimed by a concurrent run in
    /// the gap after that check. Any other failure rolls back that ticket's
    /// transaction, is logged, counts as neither processed nor skipped, and
    /// never aborts the rest of the batch.
    pub async fn run(&self) -> Result<BatchOutcome, DomainError> {
        let open_tickets = self.store.find_open_tickets().await?;

        let mut outcome = BatchOutcome::default();
        for ticket in open_tickets {
            if self.store.has_negotiation(ticket.id).await? {
                outcome.skipped += 1;
                continue;
            }

            let draft = self.store.find_draft(ticket.id).await?;
            match self.engine.run_automation(&ticket, draft, BATCH_ACTOR).await {
                Ok(_) => outcome.processed += 1,
                Err(err) if err.code == ErrorCode::AutomationConflict => {
                    outcome.skipped += 1;
                    tracing::debug!(ticket_id = %ticket.id, "ticket claimed by a concurrent automation run");
                }
                Err(err) => {
                    tracing::error!(ticket_id = %ticket.id, error = %err, "batch automation failed for ticket");
                }
            }
        }

        tracing::info!(
            processed = outcome.processed,
            skipped = outcome.skipped,
            "batch automation pass finished"
        );
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::testing::{FailPoint, MemoryTicketStore};
    use crate::domain::foundation::{Severity, TicketStatus};
    use crate::domain::triage::DraftBuilder;
    use crate::ports::TicketTx;

    fn runner(store: &Arc<MemoryTicketStore>) -> BatchRunner {
        let engine = AutomationEngine::new(store.clone(), DraftBuilder::heuristic_only());
        BatchRunner::new(store.clone(), engine)
    }

    #[tokio::test]
    async fn empty_store_processes_nothing() {
        let store = Arc::new(MemoryTicketStore::new());
        let outcome = runner(&store).run().await.unwrap();
        assert_eq!(outcome, BatchOutcome { processed: 0, skipped: 0 });
    }

    #[tokio::test]
    async fn skips_tickets_that_already_have_a_negotiation() {
        let store = Arc::new(MemoryTicketStore::new());
        let automated = store.seed_ticket("Old", "already automated", TicketStatus::Open);
        store.seed_negotiation(automated.id);
        let fresh = store.seed_ticket("New", "fresh report", TicketStatus::Open);

        let outcome = runner(&store).run().await.unwrap();

        assert_eq!(outcome, BatchOutcome { processed: 1, skipped: 1 });
        assert_eq!(store.ticket(automated.id).unwrap().status, TicketStatus::Open);
        assert_eq!(
            store.ticket(fresh.id).unwrap().status,
            TicketStatus::PendingInfo
        );
    }

    #[tokio::test]
    async fn a_rerun_skips_every_ticket_it_just_processed() {
        let store = Arc::new(MemoryTicketStore::new());
        store.seed_ticket("A", "first", TicketStatus::Open);

        let first = runner(&store).run().await.unwrap();
        assert_eq!(first, BatchOutcome { processed: 1, skipped: 0 });

        // Processed tickets left `open` would be skipped; this one halted in
        // pending_info so it simply is no longer eligible.
        let second = runner(&store).run().await.unwrap();
        assert_eq!(second, BatchOutcome { processed: 0, skipped: 0 });
    }

    #[tokio::test]
    async fn guard_skips_open_ticket_with_prior_negotiation_on_rerun() {
        let store = Arc::new(MemoryTicketStore::new());
        let ticket = store.seed_ticket("A", "first", TicketStatus::Open);
        store.seed_negotiation(ticket.id);

        let outcome = runner(&store).run().await.unwrap();
        assert_eq!(outcome, BatchOutcome { processed: 0, skipped: 1 });
        // The skipped ticket gained no second negotiation.
        assert_eq!(store.negotiations_for(ticket.id).len(), 1);
    }

    #[tokio::test]
    async fn ticket_locked_by_concurrent_run_counts_as_skipped() {
        let store = Arc::new(MemoryTicketStore::new());
        let contended = store.seed_ticket("Contended", "outage", TicketStatus::Open);
        let free = store.seed_ticket("Free", "fresh report", TicketStatus::Open);

        let mut holder = store.begin().await.unwrap();
        holder.lock_ticket(contended.id).await.unwrap();

        let outcome = runner(&store).run().await.unwrap();

        assert_eq!(outcome, BatchOutcome { processed: 1, skipped: 1 });
        assert_eq!(
            store.ticket(contended.id).unwrap().status,
            TicketStatus::Open
        );
        assert_eq!(
            store.ticket(free.id).unwrap().status,
            TicketStatus::PendingInfo
        );
        drop(holder);
    }

    #[tokio::test]
    async fn one_failing_ticket_does_not_abort_the_batch() {
        let store = Arc::new(MemoryTicketStore::new());
        let failing = store.seed_ticket("Bad", "will fail", TicketStatus::Open);
        let healthy = store.seed_ticket("Good", "will pass", TicketStatus::Open);
        store.fail_on(FailPoint::NegotiationFor(failing.id));

        let outcome = runner(&store).run().await.unwrap();

        // The failure counts as neither processed nor skipped.
        assert_eq!(outcome, BatchOutcome { processed: 1, skipped: 0 });
        assert_eq!(store.ticket(failing.id).unwrap().status, TicketStatus::Open);
        assert!(store.negotiations_for(failing.id).is_empty());
        assert_eq!(
            store.ticket(healthy.id).unwrap().status,
            TicketStatus::PendingInfo
        );
    }

    #[tokio::test]
    async fn uses_the_existing_draft_for_debate() {
        let store = Arc::new(MemoryTicketStore::new());
        let ticket = store.seed_ticket("Vague subject", "nothing recognizable", TicketStatus::Open);
        store.seed_draft(ticket.id, "payment gateway rejects cards");

        runner(&store).run().await.unwrap();

        // Severity came from the draft's problem text, not the ticket body.
        assert_eq!(store.ticket(ticket.id).unwrap().severity, Some(Severity::S2));
    }

    #[tokio::test]
    async fn non_open_tickets_are_not_eligible() {
        let store = Arc::new(MemoryTicketStore::new());
        store.seed_ticket("Halted", "waiting", TicketStatus::PendingInfo);
        store.seed_ticket("Done", "finished", TicketStatus::Resolved);

        let outcome = runner(&store).run().await.unwrap();
        assert_eq!(outcome, BatchOutcome { processed: 0, skipped: 0 });
    }
}
