//! Lock coordinator tests: acquisition semantics and flush exclusivity.

mod common;

use common::{append_event, pending_count, test_topic_context, MockProducerFactory, ProducerLog};
use outbox_core::events::{AuditAction, EntityType};
use outbox_core::models::TableLock;
use outbox_core::orchestration::FlushOrchestrator;
use sqlx::PgPool;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

#[sqlx::test]
async fn acquire_finds_the_seeded_lock_row(pool: PgPool) -> sqlx::Result<()> {
    let mut tx = pool.begin().await?;
    let rows = TableLock::acquire(&mut *tx, "audit_outbox").await?;
    assert_eq!(rows, 1);
    tx.commit().await?;
    Ok(())
}

#[sqlx::test]
async fn acquire_reports_zero_for_an_unseeded_lock_name(pool: PgPool) -> sqlx::Result<()> {
    let mut tx = pool.begin().await?;
    let rows = TableLock::acquire(&mut *tx, "nonexistent_lock").await?;
    assert_eq!(rows, 0);
    tx.rollback().await?;
    Ok(())
}

#[sqlx::test]
async fn ensure_seeded_is_idempotent(pool: PgPool) -> sqlx::Result<()> {
    TableLock::ensure_seeded(&pool, "secondary_lock").await?;
    TableLock::ensure_seeded(&pool, "secondary_lock").await?;

    let count: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM outbox_table_lock WHERE lock_name = $1")
            .bind("secondary_lock")
            .fetch_one(&pool)
            .await?;
    assert_eq!(count, 1);
    Ok(())
}

#[sqlx::test]
async fn lock_is_released_by_rollback_as_well_as_commit(pool: PgPool) -> sqlx::Result<()> {
    let mut first = pool.begin().await?;
    TableLock::acquire(&mut *first, "audit_outbox").await?;
    first.rollback().await?;

    // A second transaction can take the lock immediately afterwards.
    let mut second = pool.begin().await?;
    let rows = TableLock::acquire(&mut *second, "audit_outbox").await?;
    assert_eq!(rows, 1);
    second.commit().await?;
    Ok(())
}

#[sqlx::test]
async fn concurrent_flushes_never_double_publish(pool: PgPool) {
    let total: usize = 4;
    for _ in 0..total {
        append_event(&pool, EntityType::Order, AuditAction::Edit).await;
    }

    // One shared broker log; slow sends widen the race window so the second
    // flush would overlap the first if the lock failed to serialize them.
    let log = ProducerLog::new();
    let make_relay = || {
        FlushOrchestrator::new(
            pool.clone(),
            Arc::new(MockProducerFactory::with_send_delay(
                log.clone(),
                Duration::from_millis(50),
            )),
            test_topic_context(),
        )
    };
    let relay_a = make_relay();
    let relay_b = make_relay();

    let (outcome_a, outcome_b) =
        tokio::join!(relay_a.process_pending_events(), relay_b.process_pending_events());
    let outcome_a = outcome_a.expect("flush a");
    let outcome_b = outcome_b.expect("flush b");

    // Whichever flush won the lock processed the whole batch; the other saw
    // an empty store after blocking at the lock step.
    assert_eq!(outcome_a.processed + outcome_b.processed, total);

    let ids = log.sent_event_ids();
    let unique: HashSet<Uuid> = ids.iter().copied().collect();
    assert_eq!(ids.len(), total, "no event may be published twice");
    assert_eq!(unique.len(), total);
    assert_eq!(pending_count(&pool).await, 0);
}
