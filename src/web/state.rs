//! # Web Application State
//!
//! Shared state for the trigger surface: the tenant pool registry and the
//! relay configuration. Orchestrators are built per request because each
//! request carries its own tenant context.

use crate::config::OutboxConfig;
use crate::database::TenantPoolRegistry;
use crate::messaging::PgmqProducerFactory;
use crate::orchestration::{FlushConfig, FlushOrchestrator, TopicContext};
use crate::web::response_types::ApiError;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    registry: Arc<TenantPoolRegistry>,
    config: Arc<OutboxConfig>,
}

impl AppState {
    pub fn new(config: OutboxConfig) -> Self {
        Self {
            registry: Arc::new(TenantPoolRegistry::new(config.clone())),
            config: Arc::new(config),
        }
    }

    pub fn registry(&self) -> &Arc<TenantPoolRegistry> {
        &self.registry
    }

    pub fn config(&self) -> &OutboxConfig {
        &self.config
    }

    /// Build a flush orchestrator bound to one tenant's pool and topics
    pub async fn orchestrator_for(&self, tenant_id: &str) -> Result<FlushOrchestrator, ApiError> {
        let pool = self
            .registry
            .pool_for(tenant_id)
            .await
            .map_err(ApiError::from)?;

        let topic_context = TopicContext {
            environment_id: self.config.environment_id.clone(),
            namespace: self.config.topic_namespace.clone(),
            tenant_id: tenant_id.to_string(),
        };

        let flush_config = FlushConfig {
            lock_name: self.config.lock_name.clone(),
            batch_size: self.config.batch_size,
        };

        let factory = Arc::new(PgmqProducerFactory::new(pool.clone()));

        Ok(FlushOrchestrator::with_config(
            pool,
            factory,
            topic_context,
            flush_config,
        ))
    }
}
