//! Shared domain primitives.

mod errors;
mod ids;
mod status;

pub use errors::{DomainError, ErrorCode, ValidationError};
pub use ids::TicketId;
pub use status::{Priority, Severity, Team, TicketStatus};
