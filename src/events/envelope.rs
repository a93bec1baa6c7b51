//! # Audit Envelope Types
//!
//! The closed set of audited entity types, their typed snapshots, the
//! payload shape stored in the outbox row, and the envelope published to
//! the broker.
//!
//! The stored payload carries everything the dispatcher needs to build the
//! outbound envelope without consulting the business tables again: the
//! append-time timestamp, the acting user, and the stripped entity
//! snapshot.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Closed set of entity types tracked by the audit outbox
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityType {
    Order,
    OrderLine,
    Piece,
}

impl EntityType {
    /// Tag string stored in the `entity_type` column
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityType::Order => "Order",
            EntityType::OrderLine => "OrderLine",
            EntityType::Piece => "Piece",
        }
    }

    /// Parse a stored tag; `None` for unrecognized tags (never a panic -
    /// unknown tags are a per-event skip, not a batch failure)
    pub fn parse(tag: &str) -> Option<Self> {
        match tag {
            "Order" => Some(EntityType::Order),
            "OrderLine" => Some(EntityType::OrderLine),
            "Piece" => Some(EntityType::Piece),
            _ => None,
        }
    }
}

impl std::fmt::Display for EntityType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Action performed on the audited entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AuditAction {
    Create,
    Edit,
    Delete,
}

impl AuditAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuditAction::Create => "Create",
            AuditAction::Edit => "Edit",
            AuditAction::Delete => "Delete",
        }
    }
}

impl std::fmt::Display for AuditAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Snapshot of an order at mutation time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderSnapshot {
    pub id: Uuid,
    pub order_number: String,
    pub status: String,
    #[serde(default)]
    pub customer_ref: Option<String>,
}

/// Snapshot of an order line at mutation time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderLineSnapshot {
    pub id: Uuid,
    pub order_id: Uuid,
    pub product_code: String,
    pub quantity: i32,
    pub status: String,
}

/// Snapshot of a piece at mutation time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PieceSnapshot {
    pub id: Uuid,
    pub order_line_id: Uuid,
    pub barcode: String,
    pub status: String,
}

/// Decoded snapshot, tagged by entity type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EntitySnapshot {
    Order(OrderSnapshot),
    OrderLine(OrderLineSnapshot),
    Piece(PieceSnapshot),
}

impl EntitySnapshot {
    /// The audited entity's own id; used as the broker partition key so all
    /// events about one entity land on the same partition
    pub fn entity_id(&self) -> Uuid {
        match self {
            EntitySnapshot::Order(s) => s.id,
            EntitySnapshot::OrderLine(s) => s.id,
            EntitySnapshot::Piece(s) => s.id,
        }
    }
}

/// Payload stored in the outbox row, captured at append time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditRecord {
    pub occurred_at: DateTime<Utc>,
    pub user_id: String,
    /// Canonical stripped snapshot of the entity, decoded per `entity_type`
    pub entity: serde_json::Value,
}

/// Outbound message value published to the broker
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditEnvelope {
    pub event_id: Uuid,
    pub action: String,
    pub entity_id: String,
    pub occurred_at: DateTime<Utc>,
    pub user_id: String,
    pub entity: serde_json::Value,
}
