//! # Audit Event System
//!
//! Typed representation of audited entities and the codec that turns stored
//! outbox rows back into outbound messages.
//!
//! - [`envelope`] - entity type tags, typed snapshots, stored payload and
//!   outbound envelope shapes
//! - [`codec`] - static handler table mapping an entity type tag to its
//!   decoder, partition-key builder and topic suffix
//! - [`writer`] - producer-side append of audit events inside the business
//!   mutation's transaction

pub mod codec;
pub mod envelope;
pub mod writer;

pub use codec::{decode_event, DecodeError, DecodedEvent, EventHandler};
pub use envelope::{
    AuditAction, AuditEnvelope, AuditRecord, EntitySnapshot, EntityType, OrderLineSnapshot,
    OrderSnapshot, PieceSnapshot,
};
pub use writer::OutboxWriter;
