//! # PostgreSQL Message Queue Producer (pgmq-rs)
//!
//! Concrete [`AuditProducer`] backed by the pgmq-rs crate. Topic names map
//! to pgmq queue names (dots and dashes become underscores), the partition
//! key travels inside a [`KeyedAuditMessage`], and queues are created
//! lazily on first send.

use crate::events::envelope::AuditEnvelope;
use crate::messaging::producer::{
    AuditProducer, KeyedAuditMessage, ProducerError, ProducerFactory,
};
use async_trait::async_trait;
use dashmap::DashSet;
use pgmq::PGMQueue;
use tracing::{debug, info};

/// pgmq-rs based audit producer
pub struct PgmqProducer {
    pgmq: PGMQueue,
    ensured_queues: DashSet<String>,
}

impl PgmqProducer {
    /// Create a producer using an existing connection pool (BYOP - Bring
    /// Your Own Pool)
    pub async fn new_with_pool(pool: sqlx::PgPool) -> Self {
        debug!("🚀 Creating pgmq audit producer with shared connection pool");

        let pgmq = PGMQueue::new_with_pool(pool).await;

        Self {
            pgmq,
            ensured_queues: DashSet::new(),
        }
    }

    /// pgmq queue names allow only alphanumerics and underscores
    fn queue_name(topic: &str) -> String {
        topic
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
            .collect()
    }

    async fn ensure_queue(&self, queue_name: &str) -> Result<(), ProducerError> {
        if self.ensured_queues.contains(queue_name) {
            return Ok(());
        }

        self.pgmq
            .create(queue_name)
            .await
            .map_err(|e| ProducerError::connection(format!("create queue {queue_name}: {e}")))?;

        self.ensured_queues.insert(queue_name.to_string());
        debug!(queue = %queue_name, "✅ Queue ensured");
        Ok(())
    }
}

#[async_trait]
impl AuditProducer for PgmqProducer {
    async fn send(
        &self,
        topic: &str,
        key: &str,
        envelope: &AuditEnvelope,
    ) -> Result<(), ProducerError> {
        let queue_name = Self::queue_name(topic);
        self.ensure_queue(&queue_name).await?;

        let message = KeyedAuditMessage {
            key: key.to_string(),
            envelope: envelope.clone(),
        };
        let serialized = serde_json::to_value(&message)?;

        let message_id = self
            .pgmq
            .send(&queue_name, &serialized)
            .await
            .map_err(|e| ProducerError::publish(topic, e.to_string()))?;

        debug!(
            topic = %topic,
            key = %key,
            message_id = message_id,
            "📤 Audit envelope published"
        );
        Ok(())
    }

    async fn close(&self) {
        // The pool is owned by the tenant registry; nothing to release here
        // beyond dropping this handle.
        debug!("pgmq audit producer closed");
    }
}

/// Factory creating one [`PgmqProducer`] per flush cycle
pub struct PgmqProducerFactory {
    pool: sqlx::PgPool,
}

impl PgmqProducerFactory {
    pub fn new(pool: sqlx::PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProducerFactory for PgmqProducerFactory {
    async fn create(&self) -> Result<Box<dyn AuditProducer>, ProducerError> {
        info!("🚀 Creating pgmq producer for flush cycle");
        let producer = PgmqProducer::new_with_pool(self.pool.clone()).await;
        Ok(Box::new(producer))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn topic_maps_to_a_legal_queue_name() {
        assert_eq!(
            PgmqProducer::queue_name("prd-eu1.audit.acme.piece-events"),
            "prd_eu1_audit_acme_piece_events"
        );
    }
}
