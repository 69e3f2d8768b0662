//! OpenAPI schema aggregation for the console API.
use crate::api::{
    navigation, pages, permissions, system,
    types::{
        Breadcrumb, CatalogResponse, ClearCellResponse, ErrorResponse, GrantCellResponse,
        GrantCountResponse, GrantUpdateRequest, HealthStatus, MatrixCell, MatrixResponse,
        MatrixRow, ModuleSummary, NavigationItem, NavigationResponse, PageResponse, RoleSummary,
        SystemInfo,
    },
};
use axum::Json;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "sendero-console",
        version = "v1",
        description = "Sendero park-administration console API"
    ),
    paths(
        system::system_info,
        system::system_health,
        navigation::navigation,
        pages::render_page,
        permissions::catalog,
        permissions::matrix,
        permissions::set_grant,
        permissions::clear_cell,
        permissions::reset,
        permissions::reload,
        permissions::grant_count
    ),
    components(schemas(
        SystemInfo,
        HealthStatus,
        ErrorResponse,
        NavigationItem,
        NavigationResponse,
        Breadcrumb,
        PageResponse,
        RoleSummary,
        ModuleSummary,
        CatalogResponse,
        MatrixCell,
        MatrixRow,
        MatrixResponse,
        GrantUpdateRequest,
        GrantCellResponse,
        ClearCellResponse,
        GrantCountResponse
    )),
    tags(
        (name = "system", description = "System and discovery endpoints"),
        (name = "navigation", description = "Permission-filtered navigation and guarded pages"),
        (name = "permissions", description = "Permission matrix editor")
    )
)]
pub struct ApiDoc;

pub(crate) async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_lists_every_console_path() {
        let doc = ApiDoc::openapi();
        let paths: Vec<&str> = doc.paths.paths.keys().map(String::as_str).collect();
        for expected in [
            "/v1/system/info",
            "/v1/system/health",
            "/v1/navigation",
            "/v1/pages/{route}",
            "/v1/permissions/catalog",
            "/v1/permissions/matrix",
            "/v1/permissions/roles/{role}/modules/{module}/kinds/{kind}",
            "/v1/permissions/roles/{role}/modules/{module}",
            "/v1/permissions/reset",
            "/v1/permissions/reload",
            "/v1/permissions/roles/{role}/grant-count",
        ] {
            assert!(paths.contains(&expected), "missing {expected}");
        }
    }
}
