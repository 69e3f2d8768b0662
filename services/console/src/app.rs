//! Console HTTP application wiring.
//!
//! # Purpose
//! Builds the Axum router, configures middleware, and defines the shared
//! application state injected into handlers.
//!
//! # Notes
//! `build_state` keeps wiring testable and minimizes `main` setup logic.
use crate::api;
use crate::config::{ConsoleConfig, StorageBackend};
use anyhow::Context;
use axum::Router;
use axum::middleware;
use sendero_authz::{MenuNode, PermissionStore, builtin, validate_tree};
use sendero_storage::{FileStore, KeyValueStore, MemoryStore};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

pub const SERVICE_NAME: &str = "sendero-console";

#[derive(Clone)]
pub struct AppState {
    pub api_version: String,
    pub permissions: Arc<PermissionStore>,
    pub menu: Arc<Vec<MenuNode>>,
}

pub async fn build_state(config: &ConsoleConfig) -> anyhow::Result<AppState> {
    sendero_storage::validate_key(&config.matrix_key).with_context(|| "SENDERO_MATRIX_KEY")?;
    let storage: Arc<dyn KeyValueStore> = match config.storage {
        StorageBackend::Memory => Arc::new(MemoryStore::new()),
        StorageBackend::File => Arc::new(FileStore::new(&config.data_dir)),
    };
    storage
        .health_check()
        .await
        .with_context(|| format!("{} storage unavailable", storage.backend_name()))?;
    if !storage.is_durable() {
        tracing::warn!(
            backend = storage.backend_name(),
            "permission overrides will not survive a restart"
        );
    }

    let registry = Arc::new(builtin::role_registry().context("role registry")?);
    let catalog = Arc::new(builtin::module_catalog().context("module catalog")?);
    let defaults =
        Arc::new(builtin::default_matrix(&registry, &catalog).context("default matrix")?);

    let menu = config.load_menu()?;
    for anomaly in validate_tree(&menu, &catalog) {
        tracing::warn!(%anomaly, "menu tree anomaly");
    }

    let permissions = PermissionStore::load(
        storage,
        config.matrix_key.clone(),
        registry,
        catalog,
        defaults,
    )
    .await;

    Ok(AppState {
        api_version: "v1".to_string(),
        permissions: Arc::new(permissions),
        menu: Arc::new(menu),
    })
}

pub fn build_router(state: AppState) -> Router {
    let trace_layer =
        TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
            let role = request
                .headers()
                .get(api::actor::ROLE_HEADER)
                .and_then(|value| value.to_str().ok())
                .unwrap_or("-")
                .to_string();
            tracing::info_span!(
                "http.request",
                method = %request.method(),
                uri = %request.uri(),
                version = ?request.version(),
                role = %role
            )
        });

    let pages = Router::new()
        .route(
            "/v1/pages/*route",
            axum::routing::get(api::pages::render_page),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            api::guard::route_guard,
        ));

    Router::new()
        .route(
            "/v1/system/info",
            axum::routing::get(api::system::system_info),
        )
        .route(
            "/v1/system/health",
            axum::routing::get(api::system::system_health),
        )
        .route(
            "/v1/navigation",
            axum::routing::get(api::navigation::navigation),
        )
        .route(
            "/v1/permissions/catalog",
            axum::routing::get(api::permissions::catalog),
        )
        .route(
            "/v1/permissions/matrix",
            axum::routing::get(api::permissions::matrix),
        )
        .route(
            "/v1/permissions/roles/:role/modules/:module/kinds/:kind",
            axum::routing::put(api::permissions::set_grant),
        )
        .route(
            "/v1/permissions/roles/:role/modules/:module",
            axum::routing::delete(api::permissions::clear_cell),
        )
        .route(
            "/v1/permissions/roles/:role/grant-count",
            axum::routing::get(api::permissions::grant_count),
        )
        .route(
            "/v1/permissions/reset",
            axum::routing::post(api::permissions::reset),
        )
        .route(
            "/v1/permissions/reload",
            axum::routing::post(api::permissions::reload),
        )
        .route(
            "/v1/openapi.json",
            axum::routing::get(api::openapi::openapi_json),
        )
        .merge(pages)
        .layer(trace_layer)
        .with_state(state)
}
