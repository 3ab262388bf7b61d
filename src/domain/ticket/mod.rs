//! Ticket aggregate and its persisted record types.

mod draft;
mod number;
mod records;
mod ticket;

pub use draft::{Draft, DraftConfidence, DraftEvidence};
pub use number::{TicketKind, TicketNumber};
pub use records::{Negotiation, TicketLink, TicketUpdate, TranscriptEntry};
pub use ticket::{NewTicket, Ticket};
