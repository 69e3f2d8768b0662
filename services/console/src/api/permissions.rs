//! Permission matrix editor API handlers.
//!
//! # Purpose
//! Backs the security screen: read the role/module catalog and the effective
//! matrix, toggle single grants, revert cells, reset to defaults, and re-read
//! the persisted overrides.
//!
//! # Security considerations
//! - Read endpoints and reload require `admin` on the security module.
//! - Mutations delegate authorization to [`sendero_authz::PermissionStore`],
//!   which rejects the protected role before looking at the caller. Checking
//!   the caller here first would turn `protected_role` into `permission_denied`.
use crate::api::actor::Actor;
use crate::api::error::{ApiError, api_permission_denied};
use crate::api::types::{
    CatalogResponse, ClearCellResponse, GrantCellResponse, GrantCountResponse,
    GrantUpdateRequest, MatrixCell, MatrixResponse, MatrixRow, ModuleSummary, RoleSummary,
    kind_names,
};
use crate::app::AppState;
use axum::Json;
use axum::extract::{Path, State};
use sendero_authz::{MatrixSnapshot, PermissionKind, SECURITY_MODULE};

fn require_security_admin(actor: &Actor) -> Result<(), ApiError> {
    if actor.permissions.can_admin(SECURITY_MODULE) {
        Ok(())
    } else {
        Err(api_permission_denied())
    }
}

fn matrix_cell(snapshot: &MatrixSnapshot, role: &str, module: &str) -> MatrixCell {
    MatrixCell {
        module: module.to_string(),
        kinds: kind_names(snapshot.effective_grants(role, module).unwrap_or_default()),
        overridden: snapshot.is_overridden(role, module),
    }
}

fn matrix_response(snapshot: &MatrixSnapshot) -> MatrixResponse {
    let rows = snapshot
        .registry()
        .iter()
        .map(|role| {
            let role_id = role.id.as_str();
            MatrixRow {
                role: role_id.to_string(),
                is_protected: role.is_protected,
                grant_count: snapshot.grant_count(role_id),
                cells: snapshot
                    .catalog()
                    .iter()
                    .map(|module| matrix_cell(snapshot, role_id, module.id.as_str()))
                    .collect(),
            }
        })
        .collect();
    MatrixResponse { rows }
}

#[utoipa::path(
    get,
    path = "/v1/permissions/catalog",
    tag = "permissions",
    responses(
        (status = 200, description = "Roles, modules and permission kinds", body = CatalogResponse),
        (status = 403, description = "Actor lacks admin on the security module", body = crate::api::types::ErrorResponse)
    )
)]
pub(crate) async fn catalog(actor: Actor) -> Result<Json<CatalogResponse>, ApiError> {
    require_security_admin(&actor)?;
    let snapshot = actor.permissions.snapshot();
    Ok(Json(CatalogResponse {
        roles: snapshot.registry().iter().map(RoleSummary::from).collect(),
        modules: snapshot.catalog().iter().map(ModuleSummary::from).collect(),
        kinds: PermissionKind::ALL
            .iter()
            .map(|kind| kind.to_string())
            .collect(),
    }))
}

#[utoipa::path(
    get,
    path = "/v1/permissions/matrix",
    tag = "permissions",
    responses(
        (status = 200, description = "Effective matrix with override flags", body = MatrixResponse),
        (status = 403, description = "Actor lacks admin on the security module", body = crate::api::types::ErrorResponse)
    )
)]
pub(crate) async fn matrix(actor: Actor) -> Result<Json<MatrixResponse>, ApiError> {
    require_security_admin(&actor)?;
    Ok(Json(matrix_response(actor.permissions.snapshot())))
}

#[utoipa::path(
    put,
    path = "/v1/permissions/roles/{role}/modules/{module}/kinds/{kind}",
    tag = "permissions",
    params(
        ("role" = String, Path, description = "Role id"),
        ("module" = String, Path, description = "Module id"),
        ("kind" = String, Path, description = "read, write or admin")
    ),
    request_body = GrantUpdateRequest,
    responses(
        (status = 200, description = "Grant updated", body = GrantCellResponse),
        (status = 400, description = "Invalid permission kind", body = crate::api::types::ErrorResponse),
        (status = 403, description = "Actor lacks admin on the security module", body = crate::api::types::ErrorResponse),
        (status = 404, description = "Unknown role or module", body = crate::api::types::ErrorResponse),
        (status = 409, description = "Role is protected", body = crate::api::types::ErrorResponse),
        (status = 503, description = "Change could not be saved", body = crate::api::types::ErrorResponse)
    )
)]
pub(crate) async fn set_grant(
    State(state): State<AppState>,
    actor: Actor,
    Path((role, module, kind)): Path<(String, String, String)>,
    Json(body): Json<GrantUpdateRequest>,
) -> Result<Json<GrantCellResponse>, ApiError> {
    let kind: PermissionKind = kind.parse()?;
    state
        .permissions
        .set_grant(actor.role(), &role, &module, kind, body.enabled)
        .await?;
    let snapshot = state.permissions.snapshot();
    Ok(Json(GrantCellResponse {
        cell: matrix_cell(&snapshot, &role, &module),
        role,
    }))
}

#[utoipa::path(
    delete,
    path = "/v1/permissions/roles/{role}/modules/{module}",
    tag = "permissions",
    params(
        ("role" = String, Path, description = "Role id"),
        ("module" = String, Path, description = "Module id")
    ),
    responses(
        (status = 200, description = "Cell reverted to its default", body = ClearCellResponse),
        (status = 403, description = "Actor lacks admin on the security module", body = crate::api::types::ErrorResponse),
        (status = 404, description = "Unknown role or module", body = crate::api::types::ErrorResponse),
        (status = 409, description = "Role is protected", body = crate::api::types::ErrorResponse),
        (status = 503, description = "Change could not be saved", body = crate::api::types::ErrorResponse)
    )
)]
pub(crate) async fn clear_cell(
    State(state): State<AppState>,
    actor: Actor,
    Path((role, module)): Path<(String, String)>,
) -> Result<Json<ClearCellResponse>, ApiError> {
    let cleared = state
        .permissions
        .clear_cell(actor.role(), &role, &module)
        .await?;
    let snapshot = state.permissions.snapshot();
    Ok(Json(ClearCellResponse {
        cleared,
        cell: matrix_cell(&snapshot, &role, &module),
        role,
    }))
}

#[utoipa::path(
    post,
    path = "/v1/permissions/reset",
    tag = "permissions",
    responses(
        (status = 200, description = "Matrix reset to defaults", body = MatrixResponse),
        (status = 403, description = "Actor lacks admin on the security module", body = crate::api::types::ErrorResponse),
        (status = 503, description = "Change could not be saved", body = crate::api::types::ErrorResponse)
    )
)]
pub(crate) async fn reset(
    State(state): State<AppState>,
    actor: Actor,
) -> Result<Json<MatrixResponse>, ApiError> {
    state.permissions.reset_to_defaults(actor.role()).await?;
    Ok(Json(matrix_response(&state.permissions.snapshot())))
}

#[utoipa::path(
    post,
    path = "/v1/permissions/reload",
    tag = "permissions",
    responses(
        (status = 200, description = "Matrix re-read from storage", body = MatrixResponse),
        (status = 403, description = "Actor lacks admin on the security module", body = crate::api::types::ErrorResponse)
    )
)]
/// Picks up overrides written to storage by another process.
pub(crate) async fn reload(
    State(state): State<AppState>,
    actor: Actor,
) -> Result<Json<MatrixResponse>, ApiError> {
    require_security_admin(&actor)?;
    state.permissions.reload().await;
    Ok(Json(matrix_response(&state.permissions.snapshot())))
}

#[utoipa::path(
    get,
    path = "/v1/permissions/roles/{role}/grant-count",
    tag = "permissions",
    params(
        ("role" = String, Path, description = "Role id")
    ),
    responses(
        (status = 200, description = "Total granted kinds for the role; 0 for unknown roles", body = GrantCountResponse),
        (status = 403, description = "Actor lacks admin on the security module", body = crate::api::types::ErrorResponse)
    )
)]
pub(crate) async fn grant_count(
    actor: Actor,
    Path(role): Path<String>,
) -> Result<Json<GrantCountResponse>, ApiError> {
    require_security_admin(&actor)?;
    let grant_count = actor.permissions.snapshot().grant_count(&role);
    Ok(Json(GrantCountResponse { role, grant_count }))
}
