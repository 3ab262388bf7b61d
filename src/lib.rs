//! Triage Desk - Automated support ticket triage engine.
//!
//! Turns raw free-text support reports into structured drafts, runs a staged
//! multi-agent assessment (duplicate detection, severity and SLA scoring,
//! routing, consensus), applies an escalation policy and either halts for
//! human approval or produces a resolution proposal, keeping a ticket's
//! status, audit trail and linkage records consistent throughout.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
