//! The orchestration controller: runs the staged pipeline for one ticket.
//!
//! Stages per invocation: intake (if no draft yet), debate, escalation
//! policy, then either a human-approval halt or the resolution stage. All
//! writes of one invocation go through a single [`TicketTx`] and commit or
//! roll back as a unit.

use std::sync::Arc;

use crate::domain::foundation::{DomainError, ErrorCode, TicketId, TicketStatus};
use crate::domain::ticket::{Draft, Ticket};
use crate::domain::triage::{apply_escalation, debate, propose_resolution, DraftBuilder};
use crate::ports::{TicketStore, TicketTx};

/// Author label for escalation notices.
const POLICY_AUTHOR: &str = "Policy Engine";

/// Author label for resolution narratives.
const RESOLUTION_AUTHOR: &str = "Resolution Agent";

/// Author label for approval-gate entries.
const APPROVAL_AUTHOR: &str = "Approval Gate";

/// Result of one automation invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct AutomationOutcome {
    pub status: TicketStatus,
    pub resolution: Option<String>,
}

/// Runs the automation pipeline for single tickets.
#[derive(Clone)]
pub struct AutomationEngine {
    store: Arc<dyn TicketStore>,
    drafts: DraftBuilder,
}

impl AutomationEngine {
    pub fn new(store: Arc<dyn TicketStore>, drafts: DraftBuilder) -> Self {
        Self { store, drafts }
    }

    /// Builds a draft for raw report text. Never fails; extraction problems
    /// fall back to the keyword heuristics inside the builder.
    pub async fn build_draft(&self, raw_text: &str) -> Draft {
        self.drafts.build_draft(raw_text).await
    }

    /// Runs automation for one ticket, optionally with its existing draft.
    ///
    /// The invocation either halts in `pending_info` awaiting approval or
    /// resolves the ticket; every persisted effect commits atomically.
    /// A ticket that is locked by a concurrent run, or that already has a
    /// negotiation record, is rejected with `AutomationConflict` before
    /// anything is written.
    pub async fn run_automation(
        &self,
        ticket: &Ticket,
        draft: Option<Draft>,
        actor: &str,
    ) -> Result<AutomationOutcome, DomainError> {
        let mut tx = self.store.begin().await?;
        let outcome = self
            .automate_in_tx(
                tx.as_mut(),
                ticket.id,
                &ticket.subject,
                ticket.intake_text(),
                draft,
                actor,
            )
            .await?;
        tx.commit().await?;

        tracing::info!(
            ticket_id = %ticket.id,
            status = %outcome.status,
            "automation run committed"
        );
        Ok(outcome)
    }

    /// Pipeline body, shared with the create-ticket flow which already holds
    /// a transaction of its own.
    pub(crate) async fn automate_in_tx(
        &self,
        tx: &mut dyn TicketTx,
        ticket_id: TicketId,
        subject: &str,
        intake_text: &str,
        draft: Option<Draft>,
        actor: &str,
    ) -> Result<AutomationOutcome, DomainError> {
        tx.lock_ticket(ticket_id).await?;

        // The lock only excludes runs that are still in flight; a run that
        // committed before we locked left a negotiation record behind, so
        // re-check under the lock before writing anything.
        if tx.has_negotiation(ticket_id).await? {
            return Err(DomainError::new(
                ErrorCode::AutomationConflict,
                format!("Ticket already has an automation run: {}", ticket_id),
            ));
        }

        let draft = match draft {
            Some(draft) => draft,
            None => {
                let draft = self.drafts.build_draft(intake_text).await;
                tx.insert_draft_if_absent(ticket_id, &draft).await?;
                draft
            }
        };

        let verdict = debate(subject, Some(&draft));
        let status_after_debate = if verdict.requires_human {
            TicketStatus::PendingInfo
        } else {
            TicketStatus::InProgress
        };

        tx.set_triage_outcome(ticket_id, verdict.severity, status_after_debate)
            .await?;
        tx.append_negotiation(ticket_id, "triage", &verdict.transcript)
            .await?;

        if let Some(duplicate_of) = verdict.duplicate_of {
            tx.append_link(ticket_id, duplicate_of, verdict.duplicate_confidence)
                .await?;
        }

        let escalation = apply_escalation(verdict.sla_risk);
        if escalation.escalate {
            tx.append_update(ticket_id, POLICY_AUTHOR, &escalation.message)
                .await?;
        }

        if verdict.requires_human {
            tx.append_update(ticket_id, actor, "Approval required to continue automation.")
                .await?;
            return Ok(AutomationOutcome {
                status: TicketStatus::PendingInfo,
                resolution: None,
            });
        }

        let resolution = propose_resolution(subject, Some(&draft));
        tx.set_status(ticket_id, TicketStatus::Resolved).await?;
        tx.append_update(ticket_id, RESOLUTION_AUTHOR, &resolution)
            .await?;

        Ok(AutomationOutcome {
            status: TicketStatus::Resolved,
            resolution: Some(resolution),
        })
    }

    /// Resumes a halted ticket after human approval.
    ///
    /// Records who approved, moves the ticket through `in_progress` and runs
    /// the resolution stage, all in one transaction.
    pub async fn approve_and_resume(
        &self,
        ticket: &Ticket,
        draft: Option<&Draft>,
        approver: &str,
    ) -> Result<String, DomainError> {
        if !ticket.status.can_transition_to(TicketStatus::InProgress) {
            return Err(DomainError::new(
                ErrorCode::InvalidStateTransition,
                format!("Cannot resume automation from status {}", ticket.status),
            )
            .with_detail("ticket_id", ticket.id.to_string()));
        }

        let mut tx = self.store.begin().await?;
        tx.lock_ticket(ticket.id).await?;

        tx.set_status(ticket.id, TicketStatus::InProgress).await?;
        tx.append_update(
            ticket.id,
            APPROVAL_AUTHOR,
            &format!("Approved by {}. Resuming automation.", approver),
        )
        .await?;

        let resolution = propose_resolution(&ticket.subject, draft);
        tx.set_status(ticket.id, TicketStatus::Resolved).await?;
        tx.append_update(ticket.id, RESOLUTION_AUTHOR, &resolution)
            .await?;

        tx.commit().await?;

        tracing::info!(ticket_id = %ticket.id, approver, "approved ticket resolved");
        Ok(resolution)
    }
}
