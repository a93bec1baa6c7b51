//! # Outbox Data Layer
//!
//! Models for the two persisted tables of the relay:
//!
//! - [`outbox_event`] - append-only durable log of pending audit events
//! - [`table_lock`] - singleton lock rows serializing concurrent flushes
//!
//! All operations execute against a caller-supplied connection or
//! transaction; no model ever opens or commits a transaction itself.

pub mod outbox_event;
pub mod table_lock;

pub use outbox_event::{NewOutboxEvent, OutboxEvent};
pub use table_lock::TableLock;
