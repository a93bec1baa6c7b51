//! # Event Codec
//!
//! Static handler table resolving an entity type tag to its payload decoder
//! and topic suffix. Adding a new audited entity type means adding one
//! table entry, not editing dispatch branching.
//!
//! Decode failures are values, not panics: the dispatcher logs them, skips
//! the event, and leaves the row in the store for the next flush.

use crate::events::envelope::{
    AuditEnvelope, AuditRecord, EntitySnapshot, EntityType, OrderLineSnapshot, OrderSnapshot,
    PieceSnapshot,
};
use crate::models::OutboxEvent;
use thiserror::Error;

/// Per-entity-type codec entry
pub struct EventHandler {
    pub entity_type: EntityType,
    /// Event-type-specific topic suffix (last segment of the topic name)
    pub topic_suffix: &'static str,
    /// Decoder from the stored snapshot value to the typed snapshot
    pub decode: fn(&serde_json::Value) -> Result<EntitySnapshot, serde_json::Error>,
}

fn decode_order(value: &serde_json::Value) -> Result<EntitySnapshot, serde_json::Error> {
    serde_json::from_value::<OrderSnapshot>(value.clone()).map(EntitySnapshot::Order)
}

fn decode_order_line(value: &serde_json::Value) -> Result<EntitySnapshot, serde_json::Error> {
    serde_json::from_value::<OrderLineSnapshot>(value.clone()).map(EntitySnapshot::OrderLine)
}

fn decode_piece(value: &serde_json::Value) -> Result<EntitySnapshot, serde_json::Error> {
    serde_json::from_value::<PieceSnapshot>(value.clone()).map(EntitySnapshot::Piece)
}

/// The closed handler table over all audited entity types
static HANDLERS: &[EventHandler] = &[
    EventHandler {
        entity_type: EntityType::Order,
        topic_suffix: "order-events",
        decode: decode_order,
    },
    EventHandler {
        entity_type: EntityType::OrderLine,
        topic_suffix: "order-line-events",
        decode: decode_order_line,
    },
    EventHandler {
        entity_type: EntityType::Piece,
        topic_suffix: "piece-events",
        decode: decode_piece,
    },
];

/// Look up the handler for a stored entity type tag
pub fn handler_for(tag: &str) -> Option<&'static EventHandler> {
    let entity_type = EntityType::parse(tag)?;
    HANDLERS.iter().find(|h| h.entity_type == entity_type)
}

/// Why a stored event could not be decoded
#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("Unknown entity type tag: {tag}")]
    UnknownEntityType { tag: String },

    #[error("Malformed payload for {entity_type}: {source}")]
    MalformedPayload {
        entity_type: String,
        #[source]
        source: serde_json::Error,
    },
}

/// A stored event decoded into its typed, publishable form
#[derive(Debug)]
pub struct DecodedEvent {
    pub event_id: uuid::Uuid,
    pub entity_type: EntityType,
    pub action: String,
    pub record: AuditRecord,
    pub snapshot: EntitySnapshot,
    pub topic_suffix: &'static str,
}

impl DecodedEvent {
    /// Broker partition key: the audited entity's own id
    pub fn partition_key(&self) -> String {
        self.snapshot.entity_id().to_string()
    }

    /// Build the outbound audit envelope
    pub fn envelope(&self) -> AuditEnvelope {
        AuditEnvelope {
            event_id: self.event_id,
            action: self.action.clone(),
            entity_id: self.partition_key(),
            occurred_at: self.record.occurred_at,
            user_id: self.record.user_id.clone(),
            entity: self.record.entity.clone(),
        }
    }
}

/// Decode a stored outbox event via the handler table
pub fn decode_event(event: &OutboxEvent) -> Result<DecodedEvent, DecodeError> {
    let handler = handler_for(&event.entity_type).ok_or_else(|| DecodeError::UnknownEntityType {
        tag: event.entity_type.clone(),
    })?;

    let record: AuditRecord =
        serde_json::from_value(event.payload.clone()).map_err(|source| {
            DecodeError::MalformedPayload {
                entity_type: event.entity_type.clone(),
                source,
            }
        })?;

    let snapshot = (handler.decode)(&record.entity).map_err(|source| {
        DecodeError::MalformedPayload {
            entity_type: event.entity_type.clone(),
            source,
        }
    })?;

    Ok(DecodedEvent {
        event_id: event.event_id,
        entity_type: handler.entity_type,
        action: event.action.clone(),
        record,
        snapshot,
        topic_suffix: handler.topic_suffix,
    })
}
