//! Human-facing ticket numbers ("INC-42", "TSK-7").

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::foundation::ValidationError;

/// Kind of ticket, which selects the number prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TicketKind {
    Incident,
    Task,
}

impl TicketKind {
    /// Prefix used in the human-facing number.
    pub fn prefix(&self) -> &'static str {
        match self {
            TicketKind::Incident => "INC",
            TicketKind::Task => "TSK",
        }
    }
}

/// Human-facing sequential ticket number, e.g. `INC-42`.
///
/// Sequencing is per prefix and allocated by the store inside the creating
/// transaction; the domain type only formats and parses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TicketNumber {
    kind: TicketKind,
    sequence: i64,
}

impl TicketNumber {
    pub fn new(kind: TicketKind, sequence: i64) -> Self {
        Self { kind, sequence }
    }

    pub fn kind(&self) -> TicketKind {
        self.kind
    }

    pub fn sequence(&self) -> i64 {
        self.sequence
    }
}

impl fmt::Display for TicketNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.kind.prefix(), self.sequence)
    }
}

impl FromStr for TicketNumber {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (prefix, digits) = s.split_once('-').ok_or_else(|| {
            ValidationError::invalid_format("ticket_number", format!("Missing '-' in {}", s))
        })?;
        let kind = match prefix.to_ascii_uppercase().as_str() {
            "INC" => TicketKind::Incident,
            "TSK" => TicketKind::Task,
            other => {
                return Err(ValidationError::invalid_format(
                    "ticket_number",
                    format!("Unknown prefix: {}", other),
                ))
            }
        };
        let sequence: i64 = digits.parse().map_err(|_| {
            ValidationError::invalid_format("ticket_number", format!("Invalid sequence: {}", digits))
        })?;
        Ok(Self { kind, sequence })
    }
}
