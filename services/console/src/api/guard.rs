//! Route guard for console pages.
//!
//! # Purpose
//! Runs in front of every page handler. It resolves the requested route in the
//! navigation tree, checks the page's required permission for the actor, and
//! either forwards the request with the resolved page attached or answers with
//! the standardized denial. Denied requests never reach the page handler.
//!
//! # Key invariants and assumptions
//! - The guard is the only place pages consult permissions, and it asks only
//!   the resolver.
//! - The decision uses the page's own required permission; ancestors grant
//!   nothing.
use crate::api::actor::Actor;
use crate::api::error::{ApiError, api_not_found, api_permission_denied};
use crate::api::types::{Breadcrumb, PageResponse};
use crate::app::AppState;
use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;
use sendero_authz::{MenuNode, find_route};

pub const PAGES_PREFIX: &str = "/v1/pages";

/// Page resolved and authorized by [`route_guard`], handed to the page handler
/// through request extensions.
#[derive(Debug, Clone)]
pub struct GuardedPage(pub PageResponse);

/// Map a request path under [`PAGES_PREFIX`] onto a menu route.
pub fn page_route(path: &str) -> Option<String> {
    let rest = path.strip_prefix(PAGES_PREFIX)?;
    let trimmed = rest.trim_end_matches('/');
    if trimmed.is_empty() || !trimmed.starts_with('/') {
        return None;
    }
    Some(trimmed.to_string())
}

/// Decide whether `actor` may open the page routed at `route`.
///
/// # Errors
/// - 404 `not_found` if no menu node has this route.
/// - 403 `permission_denied` if the page's required permission does not hold.
pub fn authorize_page(
    menu: &[MenuNode],
    actor: &Actor,
    route: &str,
) -> Result<PageResponse, ApiError> {
    let Some(trail) = find_route(menu, route) else {
        metrics::counter!("sendero_guard_decisions_total", "decision" => "not_found").increment(1);
        return Err(api_not_found("page not found"));
    };
    let Some(page) = trail.last() else {
        return Err(api_not_found("page not found"));
    };
    let module = page.required.module.as_str();
    let kind = page.required.kind;
    if !actor.permissions.has_permission(module, kind) {
        metrics::counter!("sendero_guard_decisions_total", "decision" => "deny").increment(1);
        tracing::info!(role = actor.role(), route, module, %kind, "page access denied");
        return Err(api_permission_denied());
    }
    metrics::counter!("sendero_guard_decisions_total", "decision" => "allow").increment(1);
    tracing::debug!(role = actor.role(), route, module, %kind, "page access granted");
    Ok(PageResponse {
        id: page.id.clone(),
        label: page.label.clone(),
        route: page.route.clone(),
        module: module.to_string(),
        kind: kind.to_string(),
        breadcrumbs: trail.iter().copied().map(Breadcrumb::from).collect(),
    })
}

pub(crate) async fn route_guard(
    State(state): State<AppState>,
    actor: Actor,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let route =
        page_route(request.uri().path()).ok_or_else(|| api_not_found("page not found"))?;
    let page = authorize_page(&state.menu, &actor, &route)?;
    request.extensions_mut().insert(GuardedPage(page));
    Ok(next.run(request).await)
}
