//! # Messaging Layer
//!
//! Broker seam for the relay. The orchestrator only knows the
//! [`AuditProducer`]/[`ProducerFactory`] traits; the concrete pgmq-backed
//! client lives behind them so the trigger surface, tests, and alternative
//! brokers can swap implementations freely.

pub mod pgmq_producer;
pub mod producer;

pub use pgmq_producer::{PgmqProducer, PgmqProducerFactory};
pub use producer::{audit_topic, AuditProducer, KeyedAuditMessage, ProducerError, ProducerFactory};
