//! # Event Dispatcher
//!
//! Fans a fetched batch out to the broker concurrently and joins all
//! per-event outcomes. One event's failure - undecodable payload, unknown
//! tag, rejected publish - never blocks or fails the others; it only shows
//! up in that event's outcome.

use crate::events::codec::decode_event;
use crate::messaging::producer::{audit_topic, AuditProducer};
use crate::models::OutboxEvent;
use futures::future::join_all;
use tracing::{debug, warn};
use uuid::Uuid;

/// Topic-name inputs shared by every event in a flush
#[derive(Debug, Clone)]
pub struct TopicContext {
    pub environment_id: String,
    pub namespace: String,
    pub tenant_id: String,
}

impl TopicContext {
    pub fn topic(&self, suffix: &str) -> String {
        audit_topic(&self.environment_id, &self.namespace, &self.tenant_id, suffix)
    }
}

/// Terminal state of one event's dispatch attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchStatus {
    /// Broker acknowledged the publish; the row may be pruned
    Delivered,
    /// Unknown tag or malformed payload; row stays for the next flush
    DecodeFailed,
    /// Broker rejected or timed out; row stays for the next flush
    PublishFailed,
}

/// Per-event outcome joined by the orchestrator
#[derive(Debug, Clone)]
pub struct DispatchOutcome {
    pub event_id: Uuid,
    pub status: DispatchStatus,
}

/// Dispatches one fetched batch against a per-flush producer handle
pub struct EventDispatcher<'a> {
    producer: &'a dyn AuditProducer,
    context: &'a TopicContext,
}

impl<'a> EventDispatcher<'a> {
    pub fn new(producer: &'a dyn AuditProducer, context: &'a TopicContext) -> Self {
        Self { producer, context }
    }

    /// Dispatch all events concurrently and join their outcomes
    pub async fn dispatch_batch(&self, events: &[OutboxEvent]) -> Vec<DispatchOutcome> {
        join_all(events.iter().map(|event| self.dispatch_one(event))).await
    }

    async fn dispatch_one(&self, event: &OutboxEvent) -> DispatchOutcome {
        let decoded = match decode_event(event) {
            Ok(decoded) => decoded,
            Err(error) => {
                warn!(
                    event_id = %event.event_id,
                    entity_type = %event.entity_type,
                    error = %error,
                    "⚠️ Skipping undecodable outbox event; row left in place"
                );
                return DispatchOutcome {
                    event_id: event.event_id,
                    status: DispatchStatus::DecodeFailed,
                };
            }
        };

        let topic = self.context.topic(decoded.topic_suffix);
        let key = decoded.partition_key();

        match self.producer.send(&topic, &key, &decoded.envelope()).await {
            Ok(()) => {
                debug!(
                    event_id = %event.event_id,
                    topic = %topic,
                    key = %key,
                    "✅ Event dispatched"
                );
                DispatchOutcome {
                    event_id: event.event_id,
                    status: DispatchStatus::Delivered,
                }
            }
            Err(error) => {
                warn!(
                    event_id = %event.event_id,
                    topic = %topic,
                    error = %error,
                    "⚠️ Publish failed; row left in place for retry"
                );
                DispatchOutcome {
                    event_id: event.event_id,
                    status: DispatchStatus::PublishFailed,
                }
            }
        }
    }
}
