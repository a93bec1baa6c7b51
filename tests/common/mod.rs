//! Shared test support: an inspectable mock producer with failure
//! injection, and helpers for appending audit events.

// Not every integration test file uses every helper.
#![allow(dead_code)]

use async_trait::async_trait;
use outbox_core::events::envelope::AuditEnvelope;
use outbox_core::events::{AuditAction, EntityType, OutboxWriter};
use outbox_core::messaging::{AuditProducer, ProducerError, ProducerFactory};
use outbox_core::models::OutboxEvent;
use outbox_core::orchestration::TopicContext;
use serde_json::json;
use sqlx::PgPool;
use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use uuid::Uuid;

/// One acknowledged send, as seen by the mock broker
#[derive(Debug, Clone)]
pub struct SentMessage {
    pub topic: String,
    pub key: String,
    pub event_id: Uuid,
}

/// Shared log inspected by tests after flush cycles complete
#[derive(Default)]
pub struct ProducerLog {
    sent: Mutex<Vec<SentMessage>>,
    failing_keys: Mutex<HashSet<String>>,
    creates: AtomicUsize,
    closes: AtomicUsize,
}

impl ProducerLog {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Force every publish with this partition key to fail
    pub fn fail_key(&self, key: impl Into<String>) {
        self.failing_keys.lock().unwrap().insert(key.into());
    }

    pub fn sent(&self) -> Vec<SentMessage> {
        self.sent.lock().unwrap().clone()
    }

    pub fn sent_event_ids(&self) -> Vec<Uuid> {
        self.sent().iter().map(|m| m.event_id).collect()
    }

    pub fn creates(&self) -> usize {
        self.creates.load(Ordering::SeqCst)
    }

    pub fn closes(&self) -> usize {
        self.closes.load(Ordering::SeqCst)
    }
}

/// Mock broker producer recording sends into a shared log
pub struct MockProducer {
    log: Arc<ProducerLog>,
    send_delay: Duration,
}

#[async_trait]
impl AuditProducer for MockProducer {
    async fn send(
        &self,
        topic: &str,
        key: &str,
        envelope: &AuditEnvelope,
    ) -> Result<(), ProducerError> {
        if !self.send_delay.is_zero() {
            tokio::time::sleep(self.send_delay).await;
        }

        if self.log.failing_keys.lock().unwrap().contains(key) {
            return Err(ProducerError::publish(topic, "forced failure"));
        }

        self.log.sent.lock().unwrap().push(SentMessage {
            topic: topic.to_string(),
            key: key.to_string(),
            event_id: envelope.event_id,
        });
        Ok(())
    }

    async fn close(&self) {
        self.log.closes.fetch_add(1, Ordering::SeqCst);
    }
}

/// Factory handing out mock producers bound to one shared log
pub struct MockProducerFactory {
    log: Arc<ProducerLog>,
    send_delay: Duration,
}

impl MockProducerFactory {
    pub fn new(log: Arc<ProducerLog>) -> Self {
        Self {
            log,
            send_delay: Duration::ZERO,
        }
    }

    /// Delay every send; used to widen the window in concurrency tests
    pub fn with_send_delay(log: Arc<ProducerLog>, send_delay: Duration) -> Self {
        Self { log, send_delay }
    }
}

#[async_trait]
impl ProducerFactory for MockProducerFactory {
    async fn create(&self) -> Result<Box<dyn AuditProducer>, ProducerError> {
        self.log.creates.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(MockProducer {
            log: self.log.clone(),
            send_delay: self.send_delay,
        }))
    }
}

/// Topic context used across the test suite
pub fn test_topic_context() -> TopicContext {
    TopicContext {
        environment_id: "dev".to_string(),
        namespace: "audit".to_string(),
        tenant_id: "test-tenant".to_string(),
    }
}

pub fn order_snapshot(id: Uuid) -> serde_json::Value {
    json!({
        "id": id,
        "order_number": format!("ORD-{}", &id.to_string()[..8]),
        "status": "open",
    })
}

pub fn order_line_snapshot(id: Uuid) -> serde_json::Value {
    json!({
        "id": id,
        "order_id": Uuid::new_v4(),
        "product_code": "SKU-100",
        "quantity": 2,
        "status": "picked",
    })
}

pub fn piece_snapshot(id: Uuid) -> serde_json::Value {
    json!({
        "id": id,
        "order_line_id": Uuid::new_v4(),
        "barcode": format!("PC-{}", &id.to_string()[..8]),
        "status": "claimed",
    })
}

/// Append one audit event in its own committed transaction; returns the
/// stored event and the entity id used as partition key.
pub async fn append_event(
    pool: &PgPool,
    entity_type: EntityType,
    action: AuditAction,
) -> (OutboxEvent, Uuid) {
    let entity_id = Uuid::new_v4();
    let snapshot = match entity_type {
        EntityType::Order => order_snapshot(entity_id),
        EntityType::OrderLine => order_line_snapshot(entity_id),
        EntityType::Piece => piece_snapshot(entity_id),
    };

    let writer = OutboxWriter::default();
    let mut tx = pool.begin().await.expect("begin");
    let event = writer
        .append(&mut *tx, entity_type, action, "user-42", &snapshot)
        .await
        .expect("append");
    tx.commit().await.expect("commit");

    (event, entity_id)
}

/// Insert a raw row directly, bypassing the writer; used for poison events
pub async fn insert_raw_event(
    pool: &PgPool,
    entity_type: &str,
    payload: serde_json::Value,
) -> Uuid {
    let event_id = Uuid::new_v4();
    sqlx::query("INSERT INTO outbox_event_log (event_id, entity_type, action, payload) VALUES ($1, $2, $3, $4)")
        .bind(event_id)
        .bind(entity_type)
        .bind("Edit")
        .bind(payload)
        .execute(pool)
        .await
        .expect("insert raw event");
    event_id
}

/// Pending row count in the store
pub async fn pending_count(pool: &PgPool) -> i64 {
    let mut conn = pool.acquire().await.expect("acquire");
    OutboxEvent::count_pending(&mut *conn)
        .await
        .expect("count pending")
}
