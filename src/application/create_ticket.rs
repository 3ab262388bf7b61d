//! Ticket creation: drafts the report, fills in automatic fields and runs
//! the first automation pass, all inside the creating transaction.

use std::sync::Arc;

use crate::domain::foundation::{DomainError, Priority, TicketId, TicketStatus, ValidationError};
use crate::domain::ticket::{Draft, NewTicket, TicketKind, TicketNumber};
use crate::domain::triage::heuristics::{infer_assignees, infer_priority};
use crate::ports::TicketStore;

use super::automation::{AutomationEngine, AutomationOutcome};

/// Maximum length of a title derived from the drafted problem summary.
const DERIVED_TITLE_CHARS: usize = 90;

/// Actor label recorded on the approval-request update of the create flow.
const CREATE_ACTOR: &str = "Approval Gate";

/// Command to create and immediately automate a ticket.
///
/// `priority` and `assignees` left as `None` mean "Automatic": they are
/// inferred from the draft. An `assignees` list containing "Automatic" is
/// treated the same way.
#[derive(Debug, Clone)]
pub struct CreateTicketCommand {
    pub raw_text: String,
    pub title: Option<String>,
    pub priority: Option<Priority>,
    pub company: Option<String>,
    pub assignees: Option<Vec<String>>,
    pub kind: TicketKind,
    pub created_by: String,
}

/// Result of successful ticket creation.
#[derive(Debug, Clone)]
pub struct CreateTicketResult {
    pub ticket_id: TicketId,
    pub number: TicketNumber,
    pub draft: Draft,
    pub outcome: AutomationOutcome,
}

/// Handler for creating tickets.
pub struct CreateTicketHandler {
    store: Arc<dyn TicketStore>,
    engine: AutomationEngine,
}

impl CreateTicketHandler {
    pub fn new(store: Arc<dyn TicketStore>, engine: AutomationEngine) -> Self {
        Self { store, engine }
    }

    pub async fn handle(&self, cmd: CreateTicketCommand) -> Result<CreateTicketResult, DomainError> {
        if cmd.raw_text.trim().is_empty() {
            return Err(ValidationError::empty_field("raw_text").into());
        }

        let draft = self.engine.build_draft(&cmd.raw_text).await;

        let priority = cmd.priority.unwrap_or_else(|| infer_priority(&draft));
        let assignees = match cmd.assignees {
            Some(list) if !list.iter().any(|a| a == "Automatic") => list,
            _ => infer_assignees(&draft),
        };
        let title = resolve_title(cmd.title.as_deref(), &draft.problem);

        let mut tx = self.store.begin().await?;
        let (ticket_id, number) = tx
            .insert_ticket(&NewTicket {
                kind: cmd.kind,
                subject: title.clone(),
                body: cmd.raw_text.clone(),
                status: TicketStatus::Open,
                priority,
                company: cmd.company.clone(),
                assignees,
                created_by: cmd.created_by.clone(),
            })
            .await?;
        tx.insert_draft_if_absent(ticket_id, &draft).await?;

        let outcome = self
            .engine
            .automate_in_tx(
                tx.as_mut(),
                ticket_id,
                &title,
                &cmd.raw_text,
                Some(draft.clone()),
                CREATE_ACTOR,
            )
            .await?;
        tx.commit().await?;

        tracing::info!(
            ticket_id = %ticket_id,
            number = %number,
            status = %outcome.status,
            "ticket created and automated"
        );

        Ok(CreateTicketResult {
            ticket_id,
            number,
            draft,
            outcome,
        })
    }
}

fn resolve_title(title: Option<&str>, problem: &str) -> String {
    match title.map(str::trim) {
        Some(t) if !t.is_empty() => t.to_string(),
        _ if !problem.is_empty() => problem.chars().take(DERIVED_TITLE_CHARS).collect(),
        _ => "New incident".to_string(),
    }
}
