//! Outbox store model tests using SQLx native testing.

mod common;

use common::{append_event, order_snapshot, pending_count};
use outbox_core::events::{AuditAction, EntityType, OutboxWriter};
use outbox_core::models::{NewOutboxEvent, OutboxEvent};
use serde_json::json;
use sqlx::PgPool;
use uuid::Uuid;

#[sqlx::test]
async fn append_assigns_a_fresh_id_and_persists_the_row(pool: PgPool) -> sqlx::Result<()> {
    let mut tx = pool.begin().await?;
    let event = OutboxEvent::append(
        &mut *tx,
        NewOutboxEvent {
            entity_type: "Order".to_string(),
            action: "Create".to_string(),
            payload: json!({"occurred_at": "2026-08-25T08:00:00Z", "user_id": "u1", "entity": {}}),
        },
    )
    .await?;
    tx.commit().await?;

    assert_eq!(event.entity_type, "Order");
    assert_eq!(event.action, "Create");
    assert_eq!(pending_count(&pool).await, 1);

    let stored = sqlx::query_as::<_, OutboxEvent>(
        "SELECT event_id, entity_type, action, payload FROM outbox_event_log WHERE event_id = $1",
    )
    .bind(event.event_id)
    .fetch_one(&pool)
    .await?;
    assert_eq!(stored, event);

    Ok(())
}

#[sqlx::test]
async fn rolled_back_business_transaction_discards_the_audit_row(pool: PgPool) -> sqlx::Result<()> {
    let writer = OutboxWriter::default();

    let mut tx = pool.begin().await?;
    writer
        .append(
            &mut *tx,
            EntityType::Order,
            AuditAction::Create,
            "user-42",
            &order_snapshot(Uuid::new_v4()),
        )
        .await
        .expect("append");
    tx.rollback().await?;

    // The mutation and its audit record are an atomic pair.
    assert_eq!(pending_count(&pool).await, 0);
    Ok(())
}

#[sqlx::test]
async fn writer_strips_volatile_fields_from_the_stored_snapshot(pool: PgPool) -> sqlx::Result<()> {
    let writer = OutboxWriter::default();
    let entity_id = Uuid::new_v4();
    let mut snapshot = order_snapshot(entity_id);
    snapshot["updated_at"] = json!("2026-08-25T08:00:00Z");
    snapshot["lock_version"] = json!(3);

    let mut tx = pool.begin().await?;
    let event = writer
        .append(&mut *tx, EntityType::Order, AuditAction::Edit, "user-7", &snapshot)
        .await
        .expect("append");
    tx.commit().await?;

    let entity = &event.payload["entity"];
    assert_eq!(entity["id"], json!(entity_id));
    assert!(entity.get("updated_at").is_none());
    assert!(entity.get("lock_version").is_none());
    assert_eq!(event.payload["user_id"], json!("user-7"));
    Ok(())
}

#[sqlx::test]
async fn fetch_pending_respects_the_limit(pool: PgPool) -> sqlx::Result<()> {
    for _ in 0..5 {
        append_event(&pool, EntityType::Piece, AuditAction::Edit).await;
    }

    let mut conn = pool.acquire().await?;
    let batch = OutboxEvent::fetch_pending(&mut *conn, 3).await?;
    assert_eq!(batch.len(), 3);

    let all = OutboxEvent::fetch_pending(&mut *conn, 100).await?;
    assert_eq!(all.len(), 5);
    Ok(())
}

#[sqlx::test]
async fn delete_batch_removes_only_the_given_ids(pool: PgPool) -> sqlx::Result<()> {
    let (kept, _) = append_event(&pool, EntityType::Order, AuditAction::Create).await;
    let (deleted_a, _) = append_event(&pool, EntityType::OrderLine, AuditAction::Edit).await;
    let (deleted_b, _) = append_event(&pool, EntityType::Piece, AuditAction::Edit).await;

    let mut conn = pool.acquire().await?;
    let removed =
        OutboxEvent::delete_batch(&mut *conn, &[deleted_a.event_id, deleted_b.event_id]).await?;
    assert_eq!(removed, 2);

    let remaining: Vec<Uuid> = sqlx::query_scalar("SELECT event_id FROM outbox_event_log")
        .fetch_all(&pool)
        .await?;
    assert_eq!(remaining, vec![kept.event_id]);
    Ok(())
}

#[sqlx::test]
async fn delete_batch_with_no_ids_is_a_no_op(pool: PgPool) -> sqlx::Result<()> {
    append_event(&pool, EntityType::Order, AuditAction::Create).await;

    let mut conn = pool.acquire().await?;
    let removed = OutboxEvent::delete_batch(&mut *conn, &[]).await?;
    assert_eq!(removed, 0);
    assert_eq!(pending_count(&pool).await, 1);
    Ok(())
}
