//! Application layer: command handlers orchestrating the triage stages
//! against the persistence port.

mod automation;
mod batch;
mod clarify_ticket;
mod create_ticket;

#[cfg(test)]
pub(crate) mod testing;

pub use automation::{AutomationEngine, AutomationOutcome};
pub use batch::{BatchOutcome, BatchRunner};
pub use clarify_ticket::ClarifyTicketHandler;
pub use create_ticket::{CreateTicketCommand, CreateTicketHandler, CreateTicketResult};
