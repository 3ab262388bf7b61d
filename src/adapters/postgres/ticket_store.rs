//! PostgreSQL implementation of the ticket store.
//!
//! Expected schema (migrations are managed outside this crate):
//!
//! ```sql
//! CREATE TABLE tickets (
//!     id          BIGSERIAL PRIMARY KEY,
//!     number      TEXT NOT NULL UNIQUE,
//!     subject     TEXT NOT NULL,
//!     body        TEXT NOT NULL,
//!     status      TEXT NOT NULL,
//!     severity    TEXT,
//!     priority    TEXT NOT NULL,
//!     company     TEXT,
//!     assignees   JSONB NOT NULL DEFAULT '[]',
//!     created_by  TEXT NOT NULL,
//!     created_at  TIMESTAMPTZ NOT NULL DEFAULT now()
//! );
//! CREATE TABLE ticket_sequences (
//!     prefix      TEXT PRIMARY KEY,
//!     last_value  BIGINT NOT NULL
//! );
//! CREATE TABLE ticket_drafts (
//!     ticket_id    BIGINT PRIMARY KEY REFERENCES tickets(id),
//!     problem      TEXT NOT NULL,
//!     environment  TEXT NOT NULL,
//!     reproduction TEXT NOT NULL,
//!     impact       TEXT NOT NULL,
//!     user_intent  TEXT NOT NULL,
//!     confidence   JSONB NOT NULL,
//!     evidence     JSONB NOT NULL,
//!     created_at   TIMESTAMPTZ NOT NULL DEFAULT now()
//! );
//! CREATE TABLE negotiations (
//!     id          BIGSERIAL PRIMARY KEY,
//!     ticket_id   BIGINT NOT NULL REFERENCES tickets(id),
//!     phase       TEXT NOT NULL,
//!     transcript  JSONB NOT NULL,
//!     created_at  TIMESTAMPTZ NOT NULL DEFAULT now()
//! );
//! CREATE TABLE ticket_links (
//!     id                     BIGSERIAL PRIMARY KEY,
//!     ticket_id              BIGINT NOT NULL REFERENCES tickets(id),
//!     duplicate_of_ticket_id BIGINT NOT NULL,
//!     confidence             DOUBLE PRECISION NOT NULL,
//!     created_at             TIMESTAMPTZ NOT NULL DEFAULT now()
//! );
//! CREATE TABLE ticket_updates (
//!     id          BIGSERIAL PRIMARY KEY,
//!     ticket_id   BIGINT NOT NULL REFERENCES tickets(id),
//!     author      TEXT NOT NULL,
//!     message     TEXT NOT NULL,
//!     created_at  TIMESTAMPTZ NOT NULL DEFAULT now()
//! );
//! ```

use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::types::Json;
use sqlx::{PgPool, Postgres, Row, Transaction};

use crate::domain::foundation::{
    DomainError, ErrorCode, Priority, Severity, TicketId, TicketStatus,
};
use crate::domain::ticket::{
    Draft, DraftConfidence, DraftEvidence, NewTicket, Ticket, TicketNumber, TranscriptEntry,
};
use crate::ports::{TicketStore, TicketTx};

/// PostgreSQL implementation of [`TicketStore`].
#[derive(Clone)]
pub struct PostgresTicketStore {
    pool: PgPool,
}

impl PostgresTicketStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn db_err(context: &'static str) -> impl FnOnce(sqlx::Error) -> DomainError {
    move |e| DomainError::new(ErrorCode::DatabaseError, format!("{}: {}", context, e))
}

const TICKET_COLUMNS: &str = "id, number, subject, body, status, severity, priority, company, \
                              assignees, created_by, created_at";

#[async_trait]
impl TicketStore for PostgresTicketStore {
    async fn find_open_tickets(&self) -> Result<Vec<Ticket>, DomainError> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM tickets WHERE status = $1 ORDER BY created_at ASC",
            TICKET_COLUMNS
        ))
        .bind(TicketStatus::Open.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(db_err("Failed to fetch open tickets"))?;

        rows.into_iter().map(row_to_ticket).collect()
    }

    async fn find_draft(&self, ticket_id: TicketId) -> Result<Option<Draft>, DomainError> {
        let row = sqlx::query(
            "SELECT problem, environment, reproduction, impact, user_intent, confidence, evidence \
             FROM ticket_drafts WHERE ticket_id = $1",
        )
        .bind(ticket_id.as_i64())
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err("Failed to fetch draft"))?;

        row.map(row_to_draft).transpose()
    }

    async fn has_negotiation(&self, ticket_id: TicketId) -> Result<bool, DomainError> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM negotiations WHERE ticket_id = $1)")
                .bind(ticket_id.as_i64())
                .fetch_one(&self.pool)
                .await
                .map_err(db_err("Failed to check negotiations"))?;

        Ok(exists)
    }

    async fn begin(&self) -> Result<Box<dyn TicketTx>, DomainError> {
        let tx = self
            .pool
            .begin()
            .await
            .map_err(db_err("Failed to open transaction"))?;
        Ok(Box::new(PostgresTicketTx { tx }))
    }
}

struct PostgresTicketTx {
    tx: Transaction<'static, Postgres>,
}

#[async_trait]
impl TicketTx for PostgresTicketTx {
    async fn lock_ticket(&mut self, id: TicketId) -> Result<(), DomainError> {
        // Transaction-scoped advisory lock, released automatically on
        // commit or rollback. The try variant fails fast: a loser of the
        // race reports a conflict instead of queueing behind the winner
        // and re-running automation after it commits.
        let acquired: bool = sqlx::query_scalar("SELECT pg_try_advisory_xact_lock($1)")
            .bind(id.as_i64())
            .fetch_one(&mut *self.tx)
            .await
            .map_err(db_err("Failed to lock ticket"))?;

        if !acquired {
            return Err(DomainError::new(
                ErrorCode::AutomationConflict,
                format!("Ticket is locked by a concurrent automation run: {}", id),
            ));
        }
        Ok(())
    }

    async fn has_negotiation(&mut self, ticket_id: TicketId) -> Result<bool, DomainError> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM negotiations WHERE ticket_id = $1)")
                .bind(ticket_id.as_i64())
                .fetch_one(&mut *self.tx)
                .await
                .map_err(db_err("Failed to check negotiations"))?;

        Ok(exists)
    }

    async fn insert_ticket(
        &mut self,
        ticket: &NewTicket,
    ) -> Result<(TicketId, TicketNumber), DomainError> {
        // Per-prefix counter row; the upsert serializes concurrent
        // allocations instead of recomputing MAX() per insert.
        let sequence: i64 = sqlx::query_scalar(
            "INSERT INTO ticket_sequences (prefix, last_value) VALUES ($1, 1) \
             ON CONFLICT (prefix) DO UPDATE SET last_value = ticket_sequences.last_value + 1 \
             RETURNING last_value",
        )
        .bind(ticket.kind.prefix())
        .fetch_one(&mut *self.tx)
        .await
        .map_err(db_err("Failed to allocate ticket number"))?;

        let number = TicketNumber::new(ticket.kind, sequence);

        let id: i64 = sqlx::query_scalar(
            "INSERT INTO tickets (number, subject, body, status, priority, company, assignees, created_by) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) RETURNING id",
        )
        .bind(number.to_string())
        .bind(&ticket.subject)
        .bind(&ticket.body)
        .bind(ticket.status.as_str())
        .bind(ticket.priority.as_str())
        .bind(&ticket.company)
        .bind(Json(&ticket.assignees))
        .bind(&ticket.created_by)
        .fetch_one(&mut *self.tx)
        .await
        .map_err(db_err("Failed to insert ticket"))?;

        Ok((TicketId::new(id), number))
    }

    async fn insert_draft_if_absent(
        &mut self,
        ticket_id: TicketId,
        draft: &Draft,
    ) -> Result<bool, DomainError> {
        let result = sqlx::query(
            "INSERT INTO ticket_drafts \
             (ticket_id, problem, environment, reproduction, impact, user_intent, confidence, evidence) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
             ON CONFLICT (ticket_id) DO NOTHING",
        )
        .bind(ticket_id.as_i64())
        .bind(&draft.problem)
        .bind(&draft.environment)
        .bind(&draft.reproduction)
        .bind(&draft.impact)
        .bind(&draft.user_intent)
        .bind(Json(&draft.confidence))
        .bind(Json(&draft.evidence))
        .execute(&mut *self.tx)
        .await
        .map_err(db_err("Failed to insert draft"))?;

        Ok(result.rows_affected() > 0)
    }

    async fn set_triage_outcome(
        &mut self,
        id: TicketId,
        severity: Severity,
        status: TicketStatus,
    ) -> Result<(), DomainError> {
        let result = sqlx::query("UPDATE tickets SET severity = $2, status = $3 WHERE id = $1")
            .bind(id.as_i64())
            .bind(severity.as_str())
            .bind(status.as_str())
            .execute(&mut *self.tx)
            .await
            .map_err(db_err("Failed to update triage outcome"))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::new(
                ErrorCode::TicketNotFound,
                format!("Ticket not found: {}", id),
            ));
        }
        Ok(())
    }

    async fn set_status(&mut self, id: TicketId, status: TicketStatus) -> Result<(), DomainError> {
        let result = sqlx::query("UPDATE tickets SET status = $2 WHERE id = $1")
            .bind(id.as_i64())
            .bind(status.as_str())
            .execute(&mut *self.tx)
            .await
            .map_err(db_err("Failed to update status"))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::new(
                ErrorCode::TicketNotFound,
                format!("Ticket not found: {}", id),
            ));
        }
        Ok(())
    }

    async fn append_negotiation(
        &mut self,
        ticket_id: TicketId,
        phase: &str,
        transcript: &[TranscriptEntry],
    ) -> Result<(), DomainError> {
        sqlx::query("INSERT INTO negotiations (ticket_id, phase, transcript) VALUES ($1, $2, $3)")
            .bind(ticket_id.as_i64())
            .bind(phase)
            .bind(Json(transcript))
            .execute(&mut *self.tx)
            .await
            .map_err(db_err("Failed to insert negotiation"))?;
        Ok(())
    }

    async fn append_link(
        &mut self,
        ticket_id: TicketId,
        duplicate_of: TicketId,
        confidence: f64,
    ) -> Result<(), DomainError> {
        sqlx::query(
            "INSERT INTO ticket_links (ticket_id, duplicate_of_ticket_id, confidence) \
             VALUES ($1, $2, $3)",
        )
        .bind(ticket_id.as_i64())
        .bind(duplicate_of.as_i64())
        .bind(confidence)
        .execute(&mut *self.tx)
        .await
        .map_err(db_err("Failed to insert ticket link"))?;
        Ok(())
    }

    async fn append_update(
        &mut self,
        ticket_id: TicketId,
        author: &str,
        message: &str,
    ) -> Result<(), DomainError> {
        sqlx::query("INSERT INTO ticket_updates (ticket_id, author, message) VALUES ($1, $2, $3)")
            .bind(ticket_id.as_i64())
            .bind(author)
            .bind(message)
            .execute(&mut *self.tx)
            .await
            .map_err(db_err("Failed to insert ticket update"))?;
        Ok(())
    }

    async fn commit(self: Box<Self>) -> Result<(), DomainError> {
        self.tx
            .commit()
            .await
            .map_err(db_err("Failed to commit transaction"))
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Row mapping
// ════════════════════════════════════════════════════════════════════════════

fn row_to_ticket(row: PgRow) -> Result<Ticket, DomainError> {
    let id: i64 = row.try_get("id").map_err(db_err("Failed to get id"))?;
    let number: String = row
        .try_get("number")
        .map_err(db_err("Failed to get number"))?;
    let status: String = row
        .try_get("status")
        .map_err(db_err("Failed to get status"))?;
    let severity: Option<String> = row
        .try_get("severity")
        .map_err(db_err("Failed to get severity"))?;
    let priority: String = row
        .try_get("priority")
        .map_err(db_err("Failed to get priority"))?;
    let assignees: Json<Vec<String>> = row
        .try_get("assignees")
        .map_err(db_err("Failed to get assignees"))?;

    Ok(Ticket {
        id: TicketId::new(id),
        number: number.parse()?,
        subject: row
            .try_get("subject")
            .map_err(db_err("Failed to get subject"))?,
        body: row.try_get("body").map_err(db_err("Failed to get body"))?,
        status: TicketStatus::parse(&status)?,
        severity: severity.as_deref().map(Severity::parse).transpose()?,
        priority: Priority::parse(&priority)?,
        company: row
            .try_get("company")
            .map_err(db_err("Failed to get company"))?,
        assignees: assignees.0,
        created_by: row
            .try_get("created_by")
            .map_err(db_err("Failed to get created_by"))?,
        created_at: row
            .try_get("created_at")
            .map_err(db_err("Failed to get created_at"))?,
    })
}

fn row_to_draft(row: PgRow) -> Result<Draft, DomainError> {
    let confidence: Json<DraftConfidence> = row
        .try_get("confidence")
        .map_err(db_err("Failed to get confidence"))?;
    let evidence: Json<DraftEvidence> = row
        .try_get("evidence")
        .map_err(db_err("Failed to get evidence"))?;

    Ok(Draft {
        problem: row
            .try_get("problem")
            .map_err(db_err("Failed to get problem"))?,
        environment: row
            .try_get("environment")
            .map_err(db_err("Failed to get environment"))?,
        reproduction: row
            .try_get("reproduction")
            .map_err(db_err("Failed to get reproduction"))?,
        impact: row
            .try_get("impact")
            .map_err(db_err("Failed to get impact"))?,
        user_intent: row
            .try_get("user_intent")
            .map_err(db_err("Failed to get user_intent"))?,
        confidence: confidence.0,
        evidence: evidence.0,
    })
}
