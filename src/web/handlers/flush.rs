//! # Flush Trigger Handler
//!
//! `POST /v1/outbox/flush` runs exactly one flush cycle for the caller's
//! tenant and responds with the count of events fully processed. The
//! request carries no body; repeated calls with nothing pending return 0
//! and are side-effect-free.

use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;
use serde::Serialize;
use tracing::debug;

use crate::web::response_types::ApiError;
use crate::web::state::AppState;

/// Response for a completed flush cycle
#[derive(Serialize)]
pub struct FlushResponse {
    pub processed: usize,
}

/// Run one flush cycle for the tenant named in `X-Tenant-Id`
pub async fn process_pending_events(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<FlushResponse>, ApiError> {
    let tenant_id = headers
        .get("X-Tenant-Id")
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
        .ok_or(ApiError::MissingTenant)?;

    debug!(tenant_id = %tenant_id, "Flush triggered");

    let orchestrator = state.orchestrator_for(tenant_id).await?;
    let outcome = orchestrator.process_pending_events().await?;

    Ok(Json(FlushResponse {
        processed: outcome.processed,
    }))
}
