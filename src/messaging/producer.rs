//! # Producer Seam
//!
//! Traits for the broker-producer collaborator: an async send-with-ack and
//! an explicit close. The orchestrator creates one producer per flush via
//! [`ProducerFactory`] and releases it on every exit path, so a leaked
//! producer handle is a testable regression rather than a silent one.

use crate::events::envelope::AuditEnvelope;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors surfaced by producer implementations
#[derive(Error, Debug)]
pub enum ProducerError {
    #[error("Failed to connect producer: {message}")]
    Connection { message: String },

    #[error("Publish to {topic} failed: {message}")]
    Publish { topic: String, message: String },

    #[error("Message serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ProducerError {
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    pub fn publish(topic: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Publish {
            topic: topic.into(),
            message: message.into(),
        }
    }
}

/// Deterministic topic name: environment id, namespace, tenant id, and the
/// event-type-specific suffix
pub fn audit_topic(environment_id: &str, namespace: &str, tenant_id: &str, suffix: &str) -> String {
    format!("{environment_id}.{namespace}.{tenant_id}.{suffix}")
}

/// Wire shape for brokers without native partition keys: the key travels
/// with the envelope
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyedAuditMessage {
    pub key: String,
    pub envelope: AuditEnvelope,
}

/// Async send-with-acknowledgment broker producer
#[async_trait]
pub trait AuditProducer: Send + Sync {
    /// Publish one envelope and await the broker's acknowledgment.
    ///
    /// `key` is the partition key (the audited entity's own id), so all
    /// events about the same entity stay ordered at the broker.
    async fn send(
        &self,
        topic: &str,
        key: &str,
        envelope: &AuditEnvelope,
    ) -> Result<(), ProducerError>;

    /// Release the producer handle; called on every flush exit path
    async fn close(&self);
}

/// Creates one producer per flush cycle
#[async_trait]
pub trait ProducerFactory: Send + Sync {
    async fn create(&self) -> Result<Box<dyn AuditProducer>, ProducerError>;
}
