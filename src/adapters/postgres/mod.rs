//! PostgreSQL adapters.

mod ticket_store;

pub use ticket_store::PostgresTicketStore;
