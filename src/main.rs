//! Batch automation runner.
//!
//! Connects to PostgreSQL, wires the automation engine against the
//! Postgres-backed store, runs one sweep over open tickets, and exits.
//! Scheduling repeated sweeps is left to cron or the platform supervisor.

use std::process::ExitCode;
use std::sync::Arc;

use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use triage_desk::adapters::ai::OpenAiExtractor;
use triage_desk::adapters::postgres::PostgresTicketStore;
use triage_desk::application::{AutomationEngine, BatchRunner};
use triage_desk::config::AppConfig;
use triage_desk::domain::triage::DraftBuilder;

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "triage_desk=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = match AppConfig::load() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "Failed to load configuration");
            return ExitCode::FAILURE;
        }
    };
    if let Err(e) = config.validate() {
        tracing::error!(error = %e, "Invalid configuration");
        return ExitCode::FAILURE;
    }

    let pool = match PgPoolOptions::new()
        .min_connections(config.database.min_connections)
        .max_connections(config.database.max_connections)
        .acquire_timeout(config.database.acquire_timeout())
        .connect(&config.database.url)
        .await
    {
        Ok(pool) => pool,
        Err(e) => {
            tracing::error!(error = %e, "Failed to connect to database");
            return ExitCode::FAILURE;
        }
    };

    let store = Arc::new(PostgresTicketStore::new(pool));

    let drafts = match OpenAiExtractor::from_config(&config.extractor) {
        Some(extractor) => {
            tracing::info!(model = %config.extractor.model, "Draft extractor enabled");
            DraftBuilder::with_extractor(Arc::new(extractor))
        }
        None => {
            tracing::info!("No extractor configured, running on heuristics only");
            DraftBuilder::heuristic_only()
        }
    };

    let engine = AutomationEngine::new(store.clone(), drafts);
    let runner = BatchRunner::new(store, engine);

    match runner.run().await {
        Ok(outcome) => {
            tracing::info!(
                processed = outcome.processed,
                skipped = outcome.skipped,
                "Batch automation sweep complete"
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(error = %e, "Batch automation sweep failed");
            ExitCode::FAILURE
        }
    }
}
