//! # Outbox Writer
//!
//! Producer-side append, invoked from business mutation code paths. The
//! writer never starts or ends a transaction: it inserts one row on the
//! caller's transaction so the mutation and its audit record commit or
//! roll back as an atomic pair.
//!
//! Snapshots are stripped of caller-declared volatile fields (change
//! tracking metadata and the like) before serialization, so downstream
//! snapshot comparisons are free of noise.

use crate::error::{OutboxError, Result};
use crate::events::envelope::{AuditAction, AuditRecord, EntityType};
use crate::models::{NewOutboxEvent, OutboxEvent};
use chrono::Utc;
use sqlx::PgConnection;
use tracing::debug;

/// Appends audit events inside the caller's business transaction
#[derive(Debug, Clone)]
pub struct OutboxWriter {
    volatile_fields: Vec<String>,
}

impl OutboxWriter {
    /// Create a writer with a caller-supplied volatile-field stripping rule.
    ///
    /// The named top-level fields are removed from every snapshot before it
    /// is serialized into the outbox row.
    pub fn new<I, S>(volatile_fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            volatile_fields: volatile_fields.into_iter().map(Into::into).collect(),
        }
    }

    /// Append one audit event on the caller's transaction.
    ///
    /// Failure propagates so the enclosing business transaction rolls back
    /// atomically with the audit record.
    pub async fn append(
        &self,
        conn: &mut PgConnection,
        entity_type: EntityType,
        action: AuditAction,
        user_id: &str,
        snapshot: &serde_json::Value,
    ) -> Result<OutboxEvent> {
        let record = AuditRecord {
            occurred_at: Utc::now(),
            user_id: user_id.to_string(),
            entity: self.strip(snapshot),
        };

        let new_event = NewOutboxEvent {
            entity_type: entity_type.as_str().to_string(),
            action: action.as_str().to_string(),
            payload: serde_json::to_value(&record)?,
        };

        let event = OutboxEvent::append(conn, new_event)
            .await
            .map_err(|e| OutboxError::database("append outbox event", e))?;

        debug!(
            event_id = %event.event_id,
            entity_type = %entity_type,
            action = %action,
            "📥 Audit event appended"
        );

        Ok(event)
    }

    fn strip(&self, snapshot: &serde_json::Value) -> serde_json::Value {
        let mut stripped = snapshot.clone();
        if let Some(object) = stripped.as_object_mut() {
            for field in &self.volatile_fields {
                object.remove(field);
            }
        }
        stripped
    }
}

impl Default for OutboxWriter {
    fn default() -> Self {
        // Change-tracking metadata the audit snapshot must not carry.
        Self::new(["updated_at", "lock_version", "change_metadata"])
    }
}
