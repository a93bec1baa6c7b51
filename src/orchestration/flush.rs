//! # Flush Orchestrator
//!
//! One flush cycle is one relational transaction walking
//! `Locking → Fetching → Dispatching → Pruning`. The transaction
//! both holds the serializing row lock and scopes the prune, so the cycle
//! either commits having deleted exactly the confirmed-delivered subset,
//! or rolls back having deleted nothing.
//!
//! A store-level failure in any of the `Locking`/`Fetching`/`Pruning`
//! phases aborts the whole cycle; events whose publish already succeeded
//! stay in the store and may be published again next flush. That is the
//! at-least-once trade: a duplicate is acceptable, a lost event is not.
//!
//! The orchestrator is trigger-agnostic: an HTTP handler, an external
//! scheduler, and a test harness all call [`FlushOrchestrator::process_pending_events`]
//! the same way.

use crate::error::{OutboxError, Result};
use crate::messaging::producer::ProducerFactory;
use crate::models::{OutboxEvent, TableLock};
use crate::orchestration::dispatcher::{DispatchStatus, EventDispatcher, TopicContext};
use sqlx::PgPool;
use std::sync::Arc;
use tracing::{debug, info, instrument};
use uuid::Uuid;

/// Store phases of a flush cycle. A relational failure in any of them
/// aborts the whole transaction; the dispatch phase in between absorbs
/// per-event failures and can never abort the cycle, so it carries no
/// variant here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlushPhase {
    Locking,
    Fetching,
    Pruning,
}

impl std::fmt::Display for FlushPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            FlushPhase::Locking => "locking",
            FlushPhase::Fetching => "fetching",
            FlushPhase::Pruning => "pruning",
        };
        f.write_str(name)
    }
}

/// Configuration for flush behavior
#[derive(Debug, Clone)]
pub struct FlushConfig {
    /// Lock row name serializing concurrent flushes
    pub lock_name: String,
    /// Upper bound on events fetched per cycle
    pub batch_size: i64,
}

impl Default for FlushConfig {
    fn default() -> Self {
        Self {
            lock_name: "audit_outbox".to_string(),
            batch_size: 2000,
        }
    }
}

/// Result of a completed flush cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlushOutcome {
    /// Events fetched in this cycle
    pub fetched: usize,
    /// Events confirmed delivered and pruned; `processed < fetched` is not
    /// an error condition
    pub processed: usize,
}

impl FlushOutcome {
    pub fn empty() -> Self {
        Self {
            fetched: 0,
            processed: 0,
        }
    }
}

/// Orchestrates the atomic lock → fetch → dispatch → prune cycle
pub struct FlushOrchestrator {
    pool: PgPool,
    producer_factory: Arc<dyn ProducerFactory>,
    topic_context: TopicContext,
    config: FlushConfig,
}

impl FlushOrchestrator {
    pub fn new(
        pool: PgPool,
        producer_factory: Arc<dyn ProducerFactory>,
        topic_context: TopicContext,
    ) -> Self {
        Self {
            pool,
            producer_factory,
            topic_context,
            config: FlushConfig::default(),
        }
    }

    pub fn with_config(
        pool: PgPool,
        producer_factory: Arc<dyn ProducerFactory>,
        topic_context: TopicContext,
        config: FlushConfig,
    ) -> Self {
        Self {
            pool,
            producer_factory,
            topic_context,
            config,
        }
    }

    /// Run exactly one flush cycle and return the processed count.
    ///
    /// Idempotent: with nothing pending this commits immediately and
    /// returns zero. The producer handle is created per cycle and released
    /// on every exit path, success or failure.
    #[instrument(skip(self), fields(lock_name = %self.config.lock_name, tenant_id = %self.topic_context.tenant_id))]
    pub async fn process_pending_events(&self) -> Result<FlushOutcome> {
        let producer = self
            .producer_factory
            .create()
            .await
            .map_err(|e| OutboxError::producer(e.to_string()))?;

        let result = self.run_cycle(producer.as_ref()).await;

        // Release the producer on success and failure alike.
        producer.close().await;

        match &result {
            Ok(outcome) => info!(
                fetched = outcome.fetched,
                processed = outcome.processed,
                "✅ Flush cycle complete"
            ),
            Err(error) => info!(error = %error, "Flush cycle aborted; nothing pruned"),
        }

        result
    }

    async fn run_cycle(&self, producer: &dyn crate::messaging::AuditProducer) -> Result<FlushOutcome> {
        // Locking: the row lock is held by this transaction until commit or
        // rollback; concurrent flushes block here.
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| OutboxError::store(FlushPhase::Locking, e))?;

        let rows_found = TableLock::acquire(&mut *tx, &self.config.lock_name)
            .await
            .map_err(|e| OutboxError::store(FlushPhase::Locking, e))?;

        if rows_found == 0 {
            return Err(OutboxError::LockRowMissing {
                lock_name: self.config.lock_name.clone(),
            });
        }

        // Fetching
        let events = OutboxEvent::fetch_pending(&mut *tx, self.config.batch_size)
            .await
            .map_err(|e| OutboxError::store(FlushPhase::Fetching, e))?;

        if events.is_empty() {
            // Still commits, releasing the lock.
            tx.commit()
                .await
                .map_err(|e| OutboxError::store(FlushPhase::Fetching, e))?;
            return Ok(FlushOutcome::empty());
        }

        debug!(batch = events.len(), "Dispatching fetched batch");

        // Dispatching: concurrent fan-out; per-event failures are absorbed
        // into the outcomes and never abort the cycle.
        let dispatcher = EventDispatcher::new(producer, &self.topic_context);
        let outcomes = dispatcher.dispatch_batch(&events).await;

        let delivered: Vec<Uuid> = outcomes
            .iter()
            .filter(|o| o.status == DispatchStatus::Delivered)
            .map(|o| o.event_id)
            .collect();

        // Pruning: delete exactly the confirmed-delivered subset in the
        // same transaction that holds the lock.
        OutboxEvent::delete_batch(&mut *tx, &delivered)
            .await
            .map_err(|e| OutboxError::store(FlushPhase::Pruning, e))?;

        tx.commit()
            .await
            .map_err(|e| OutboxError::store(FlushPhase::Pruning, e))?;

        Ok(FlushOutcome {
            fetched: events.len(),
            processed: delivered.len(),
        })
    }
}
