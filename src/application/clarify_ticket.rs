//! Clarification handler: asks the reporter for missing information.

use std::sync::Arc;

use crate::domain::foundation::{DomainError, ErrorCode, TicketId};
use crate::domain::triage::clarify;
use crate::ports::TicketStore;

/// Author label for clarification questions.
const CLARIFIER_AUTHOR: &str = "Clarifier Agent";

/// Handler that derives clarification questions from a ticket's draft and
/// logs them as a single audit entry.
pub struct ClarifyTicketHandler {
    store: Arc<dyn TicketStore>,
}

impl ClarifyTicketHandler {
    pub fn new(store: Arc<dyn TicketStore>) -> Self {
        Self { store }
    }

    /// Returns the questions for the ticket's draft.
    ///
    /// # Errors
    ///
    /// - `DraftNotFound` if the ticket has no persisted draft
    pub async fn handle(&self, ticket_id: TicketId) -> Result<Vec<String>, DomainError> {
        let draft = self.store.find_draft(ticket_id).await?.ok_or_else(|| {
            DomainError::new(
                ErrorCode::DraftNotFound,
                format!("Ticket draft not found: {}", ticket_id),
            )
        })?;

        let questions = clarify(&draft);

        let mut tx = self.store.begin().await?;
        tx.append_update(ticket_id, CLARIFIER_AUTHOR, &questions.join(" | "))
            .await?;
        tx.commit().await?;

        Ok(questions)
    }
}
