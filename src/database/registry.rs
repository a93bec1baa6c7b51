//! # Tenant Pool Registry
//!
//! Process-wide registry of relational connection pools, one per tenant.
//! Pools are created lazily on first use, pinned to the tenant's schema via
//! `search_path`, retained for the life of the process, and released
//! together by an explicit [`TenantPoolRegistry::shutdown`] hook.
//!
//! This replaces ad hoc global singletons: the registry owns the lifecycle
//! and every consumer goes through [`TenantPoolRegistry::pool_for`].

use crate::config::OutboxConfig;
use crate::error::{OutboxError, Result};
use dashmap::DashMap;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::PgPool;
use std::str::FromStr;
use tracing::{debug, info};

/// Tenant-keyed registry of lazily created connection pools
pub struct TenantPoolRegistry {
    pools: DashMap<String, PgPool>,
    config: OutboxConfig,
}

impl TenantPoolRegistry {
    pub fn new(config: OutboxConfig) -> Self {
        Self {
            pools: DashMap::new(),
            config,
        }
    }

    /// Get the pool for a tenant, creating it on first use
    pub async fn pool_for(&self, tenant_id: &str) -> Result<PgPool> {
        if let Some(pool) = self.pools.get(tenant_id) {
            return Ok(pool.clone());
        }

        let pool = self.connect(tenant_id).await?;

        // Two callers may race to create the same pool; the loser's pool is
        // closed and the first registered one wins. The entry guard must be
        // dropped before any await.
        let winner = match self.pools.entry(tenant_id.to_string()) {
            dashmap::mapref::entry::Entry::Occupied(existing) => Some(existing.get().clone()),
            dashmap::mapref::entry::Entry::Vacant(slot) => {
                info!(tenant_id = %tenant_id, "✅ Tenant pool created");
                slot.insert(pool.clone());
                None
            }
        };

        if let Some(winner) = winner {
            pool.close().await;
            return Ok(winner);
        }
        Ok(pool)
    }

    async fn connect(&self, tenant_id: &str) -> Result<PgPool> {
        let schema = self.config.tenant_schema(tenant_id);
        debug!(tenant_id = %tenant_id, schema = %schema, "Creating tenant pool");

        let options = PgConnectOptions::from_str(&self.config.database.url)
            .map_err(|e| OutboxError::database("parse database url", e))?
            .options([("search_path", schema.as_str())]);

        PgPoolOptions::new()
            .max_connections(self.config.database.max_connections)
            .connect_with(options)
            .await
            .map_err(|e| OutboxError::database(format!("connect tenant {tenant_id}"), e))
    }

    /// Number of live tenant pools
    pub fn pool_count(&self) -> usize {
        self.pools.len()
    }

    /// Close every held pool; the registry is empty afterwards
    pub async fn shutdown(&self) {
        let tenants: Vec<String> = self.pools.iter().map(|e| e.key().clone()).collect();
        for tenant_id in tenants {
            if let Some((_, pool)) = self.pools.remove(&tenant_id) {
                pool.close().await;
                debug!(tenant_id = %tenant_id, "Tenant pool closed");
            }
        }
        info!("✅ Tenant pool registry shut down");
    }
}
