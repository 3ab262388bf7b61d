//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between the
//! domain and the outside world. Adapters implement these ports.
//!
//! - `TicketStore` / `TicketTx` - transactional ticket persistence
//! - `TextExtractor` - optional text-extraction capability for intake

mod text_extractor;
mod ticket_store;

pub use text_extractor::{
    ExtractedConfidence, ExtractedEvidence, ExtractedFields, ExtractorError, TextExtractor,
};
pub use ticket_store::{TicketStore, TicketTx};
