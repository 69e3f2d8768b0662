//! System/health API handlers.
//!
//! # Key invariants and assumptions
//! - Health checks are fast and side-effect free.
//! - System info is derived from in-memory state.
use crate::api::error::{ApiError, api_unavailable};
use crate::api::types::{HealthStatus, SystemInfo};
use crate::app::{AppState, SERVICE_NAME};
use axum::Json;
use axum::extract::State;

#[utoipa::path(
    get,
    path = "/v1/system/info",
    tag = "system",
    responses(
        (status = 200, description = "Service identity and storage durability", body = SystemInfo)
    )
)]
pub(crate) async fn system_info(State(state): State<AppState>) -> Json<SystemInfo> {
    let storage = state.permissions.storage();
    Json(SystemInfo {
        service: SERVICE_NAME.to_string(),
        api_version: state.api_version.clone(),
        storage_backend: storage.backend_name().to_string(),
        durable_storage: storage.is_durable(),
    })
}

#[utoipa::path(
    get,
    path = "/v1/system/health",
    tag = "system",
    responses(
        (status = 200, description = "Console health", body = HealthStatus),
        (status = 503, description = "Storage unavailable", body = crate::api::types::ErrorResponse)
    )
)]
/// Probe the storage backing the permission matrix.
pub(crate) async fn system_health(
    State(state): State<AppState>,
) -> Result<Json<HealthStatus>, ApiError> {
    if let Err(err) = state.permissions.storage().health_check().await {
        tracing::error!(error = %err, "storage health check failed");
        return Err(api_unavailable("storage_unavailable", "storage unavailable"));
    }
    Ok(Json(HealthStatus {
        status: "ok".to_string(),
    }))
}
