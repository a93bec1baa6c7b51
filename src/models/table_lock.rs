//! # Outbox Table Lock
//!
//! Maps to the `outbox_table_lock` table: long-lived singleton rows, one per
//! logical lock name, acting as semaphores. The "holder" of a lock is
//! whichever transaction currently has its row locked via `FOR UPDATE`.
//!
//! There is deliberately no `release` operation. Release is implicit and
//! unconditional at transaction end: commit, rollback, and a dropped client
//! connection all free the row, so a crashed holder can never leak the lock.

use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgConnection, PgPool};

/// Singleton lock row, pre-seeded by migrations and never deleted
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct TableLock {
    pub lock_name: String,
    pub db_lock: String,
}

impl TableLock {
    /// Acquire the named lock inside the caller's active transaction.
    ///
    /// Blocks until any other transaction holding the row commits or rolls
    /// back, then returns the number of matching rows. Zero rows means the
    /// lock row was never seeded; callers must treat that as fatal rather
    /// than proceed unserialized.
    pub async fn acquire(conn: &mut PgConnection, lock_name: &str) -> sqlx::Result<u64> {
        let rows = sqlx::query_as::<_, TableLock>(
            r#"
            SELECT lock_name, db_lock
            FROM outbox_table_lock
            WHERE lock_name = $1
            FOR UPDATE
            "#,
        )
        .bind(lock_name)
        .fetch_all(&mut *conn)
        .await?;

        Ok(rows.len() as u64)
    }

    /// Insert the lock row if it does not exist yet.
    ///
    /// Bootstrap helper for tenants provisioned outside the migration path;
    /// idempotent.
    pub async fn ensure_seeded(pool: &PgPool, lock_name: &str) -> sqlx::Result<()> {
        sqlx::query(
            r#"
            INSERT INTO outbox_table_lock (lock_name, db_lock)
            VALUES ($1, 'unlocked')
            ON CONFLICT (lock_name) DO NOTHING
            "#,
        )
        .bind(lock_name)
        .execute(pool)
        .await?;

        Ok(())
    }
}
