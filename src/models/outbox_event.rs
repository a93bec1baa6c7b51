//! # Outbox Event Log
//!
//! Maps to the `outbox_event_log` table: the durable log of audit events
//! awaiting dispatch. Rows are append-only until deleted - never updated in
//! place - and a row is deleted only after its dispatch outcome was
//! confirmed successful.
//!
//! Every operation runs on a caller-supplied connection so the append path
//! can participate in the business mutation's transaction and the flush
//! path can keep fetch and delete inside the lock-holding transaction.

use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgConnection};
use uuid::Uuid;

/// A pending audit event as stored in `outbox_event_log`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct OutboxEvent {
    pub event_id: Uuid,
    pub entity_type: String,
    pub action: String,
    pub payload: serde_json::Value,
}

/// New outbox event for creation; `event_id` is generated at append time
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewOutboxEvent {
    pub entity_type: String,
    pub action: String,
    pub payload: serde_json::Value,
}

impl OutboxEvent {
    /// Append one event inside the caller's transaction.
    ///
    /// Assigns a fresh event id. An insert failure propagates to the caller
    /// so the enclosing business transaction rolls back atomically with the
    /// mutation it audits.
    pub async fn append(
        conn: &mut PgConnection,
        new_event: NewOutboxEvent,
    ) -> sqlx::Result<OutboxEvent> {
        let event = sqlx::query_as::<_, OutboxEvent>(
            r#"
            INSERT INTO outbox_event_log (event_id, entity_type, action, payload)
            VALUES ($1, $2, $3, $4)
            RETURNING event_id, entity_type, action, payload
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&new_event.entity_type)
        .bind(&new_event.action)
        .bind(&new_event.payload)
        .fetch_one(&mut *conn)
        .await?;

        Ok(event)
    }

    /// Fetch up to `limit` pending events.
    ///
    /// No ordering is imposed across entity types; per-entity ordering is
    /// preserved downstream by partition key, and consumers must not rely
    /// on insertion order across different entities.
    pub async fn fetch_pending(
        conn: &mut PgConnection,
        limit: i64,
    ) -> sqlx::Result<Vec<OutboxEvent>> {
        let events = sqlx::query_as::<_, OutboxEvent>(
            r#"
            SELECT event_id, entity_type, action, payload
            FROM outbox_event_log
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(&mut *conn)
        .await?;

        Ok(events)
    }

    /// Delete exactly the given event ids; returns the number of rows removed
    pub async fn delete_batch(conn: &mut PgConnection, ids: &[Uuid]) -> sqlx::Result<u64> {
        if ids.is_empty() {
            return Ok(0);
        }

        let result = sqlx::query(
            r#"
            DELETE FROM outbox_event_log
            WHERE event_id = ANY($1)
            "#,
        )
        .bind(ids)
        .execute(&mut *conn)
        .await?;

        Ok(result.rows_affected())
    }

    /// Count pending events; used by tests and monitoring surfaces
    pub async fn count_pending(conn: &mut PgConnection) -> sqlx::Result<i64> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM outbox_event_log")
            .fetch_one(&mut *conn)
            .await?;

        Ok(count.0)
    }
}
