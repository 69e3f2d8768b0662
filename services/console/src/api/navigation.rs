//! Navigation renderer boundary.
//!
//! Serves the sidebar already pruned for the requesting actor; the frontend
//! renders the response verbatim.
use crate::api::actor::Actor;
use crate::api::types::{NavigationItem, NavigationResponse};
use crate::app::AppState;
use axum::Json;
use axum::extract::State;
use sendero_authz::{filter_tree, visible_routes};

#[utoipa::path(
    get,
    path = "/v1/navigation",
    tag = "navigation",
    params(
        ("x-sendero-role" = String, Header, description = "Role of the signed-in user")
    ),
    responses(
        (status = 200, description = "Navigation tree visible to the actor", body = NavigationResponse),
        (status = 401, description = "Missing actor role", body = crate::api::types::ErrorResponse)
    )
)]
pub(crate) async fn navigation(
    State(state): State<AppState>,
    actor: Actor,
) -> Json<NavigationResponse> {
    let visible = filter_tree(&state.menu, actor.permissions.snapshot(), actor.role());
    Json(NavigationResponse {
        role: actor.role().to_string(),
        items: visible.iter().map(NavigationItem::from).collect(),
        routes: visible_routes(&visible)
            .into_iter()
            .map(str::to_string)
            .collect(),
    })
}
