//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (ids, statuses, errors)
//! - `ticket` - Ticket, draft and append-only record types
//! - `triage` - Pure triage stages (intake, clarify, debate, policy, resolution)

pub mod foundation;
pub mod ticket;
pub mod triage;
