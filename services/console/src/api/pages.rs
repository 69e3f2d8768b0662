//! Page descriptors behind the route guard.
use crate::api::guard::GuardedPage;
use crate::api::types::PageResponse;
use axum::{Extension, Json};

#[utoipa::path(
    get,
    path = "/v1/pages/{route}",
    tag = "navigation",
    params(
        ("route" = String, Path, description = "Menu route without the leading slash"),
        ("x-sendero-role" = String, Header, description = "Role of the signed-in user")
    ),
    responses(
        (status = 200, description = "Page descriptor with breadcrumbs", body = PageResponse),
        (status = 401, description = "Missing actor role", body = crate::api::types::ErrorResponse),
        (status = 403, description = "Actor lacks the page permission", body = crate::api::types::ErrorResponse),
        (status = 404, description = "No page at this route", body = crate::api::types::ErrorResponse)
    )
)]
pub(crate) async fn render_page(
    Extension(GuardedPage(page)): Extension<GuardedPage>,
) -> Json<PageResponse> {
    Json(page)
}
