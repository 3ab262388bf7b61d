//! Pure triage stages.
//!
//! Every function in this module is deterministic and side-effect free; the
//! application layer owns persistence of their outputs.
//!
//! - `heuristics` - keyword classifiers (environment, impact, severity, routing)
//! - `intake` - draft builder with the optional text-extraction capability
//! - `clarify` - missing-information questions for a draft
//! - `debate` - the staged multi-agent assessment producing a verdict
//! - `escalation` - SLA-risk escalation policy
//! - `resolution` - resolution narrative builder

pub mod clarify;
pub mod debate;
pub mod escalation;
pub mod heuristics;
pub mod intake;
pub mod resolution;

pub use clarify::clarify;
pub use debate::{debate, Verdict};
pub use escalation::{apply_escalation, Escalation};
pub use intake::DraftBuilder;
pub use resolution::propose_resolution;
