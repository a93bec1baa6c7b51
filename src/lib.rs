#![allow(clippy::doc_markdown)] // Allow technical terms like PostgreSQL, SQLx in docs
#![allow(clippy::missing_errors_doc)] // Allow public functions without # Errors sections
#![allow(clippy::must_use_candidate)] // Allow methods without must_use when context is clear

//! # Outbox Core
//!
//! Embedded transactional outbox relay for Postgres-backed multi-tenant
//! services: domain-change events for tracked business records are appended
//! to a durable log in the same transaction as the mutation they audit,
//! then relayed at-least-once to a message broker by explicitly triggered
//! flush cycles.
//!
//! ## Architecture
//!
//! A flush cycle is one relational transaction: acquire a named row lock
//! (`SELECT ... FOR UPDATE`), fetch a bounded batch of pending events,
//! dispatch them to the broker concurrently, delete exactly the subset
//! whose publish was acknowledged, commit. Concurrent flushes - from any
//! number of process instances - serialize on the lock row; the append
//! path never contends with it.
//!
//! ## Key Guarantees
//!
//! - **Atomic append**: a business mutation and its audit event commit or
//!   roll back together; neither is ever partially persisted
//! - **No lost events**: a row is deleted only after its publish was
//!   acknowledged; store failures roll the whole cycle back
//! - **At-least-once delivery**: duplicates are possible after a failed
//!   cycle, silent loss is not
//! - **Per-entity ordering**: the partition key is the audited entity's own
//!   id; no ordering is guaranteed across entities
//! - **Leak-free locking**: lock release is implicit in transaction end on
//!   every exit path, including crashes
//!
//! ## Module Organization
//!
//! - [`models`] - outbox event log and lock-row data layer
//! - [`events`] - entity snapshots, codec table, producer-side writer
//! - [`messaging`] - broker producer seam and pgmq-backed client
//! - [`orchestration`] - dispatch fan-out and the flush state machine
//! - [`database`] - tenant pool registry and connection lifecycle
//! - [`web`] - HTTP trigger surface
//! - [`config`] - environment-driven configuration
//! - [`error`] - structured error handling
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use outbox_core::events::{AuditAction, EntityType, OutboxWriter};
//! use outbox_core::messaging::PgmqProducerFactory;
//! use outbox_core::orchestration::{FlushOrchestrator, TopicContext};
//! use sqlx::PgPool;
//! use std::sync::Arc;
//!
//! # async fn example(pool: PgPool) -> Result<(), Box<dyn std::error::Error>> {
//! // Producer side: append an audit event inside a business transaction.
//! let writer = OutboxWriter::default();
//! let mut tx = pool.begin().await?;
//! // ... the business mutation itself runs on `tx` here ...
//! writer
//!     .append(
//!         &mut *tx,
//!         EntityType::Order,
//!         AuditAction::Create,
//!         "user-42",
//!         &serde_json::json!({"id": uuid::Uuid::new_v4(), "order_number": "ORD-1", "status": "open"}),
//!     )
//!     .await?;
//! tx.commit().await?;
//!
//! // Relay side: one flush cycle.
//! let factory = Arc::new(PgmqProducerFactory::new(pool.clone()));
//! let context = TopicContext {
//!     environment_id: "dev".into(),
//!     namespace: "audit".into(),
//!     tenant_id: "acme".into(),
//! };
//! let orchestrator = FlushOrchestrator::new(pool, factory, context);
//! let outcome = orchestrator.process_pending_events().await?;
//! println!("processed {} events", outcome.processed);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod database;
pub mod error;
pub mod events;
pub mod logging;
pub mod messaging;
pub mod models;
pub mod orchestration;
pub mod web;

pub use config::OutboxConfig;
pub use error::{OutboxError, Result};
pub use orchestration::{FlushOrchestrator, FlushOutcome};

/// Run pending schema migrations against a pool
pub async fn run_migrations(pool: &sqlx::PgPool) -> Result<()> {
    sqlx::migrate!("./migrations")
        .run(pool)
        .await
        .map_err(|e| OutboxError::database("run migrations", sqlx::Error::Migrate(Box::new(e))))
}
