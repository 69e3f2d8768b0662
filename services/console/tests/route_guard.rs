mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use common::{memory_app, read_json};
use http_helpers::{empty_request_as, get_as, json_request_as};
use sendero_authz::builtin::roles;
use tower::ServiceExt;

#[tokio::test]
async fn allowed_page_returns_descriptor_and_breadcrumbs() {
    let app = memory_app().await;
    let response = app
        .oneshot(get_as(
            "/v1/pages/actividades/calendario",
            roles::COORDINADOR_ACTIVIDADES,
        ))
        .await
        .expect("page");
    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    assert_eq!(body["id"], "actividades.calendario");
    assert_eq!(body["module"], "Actividades");
    assert_eq!(body["kind"], "read");
    let crumbs: Vec<&str> = body["breadcrumbs"]
        .as_array()
        .expect("breadcrumbs")
        .iter()
        .map(|crumb| crumb["route"].as_str().expect("route"))
        .collect();
    assert_eq!(crumbs, vec!["/actividades", "/actividades/calendario"]);
}

#[tokio::test]
async fn denied_page_returns_standard_denial() {
    let app = memory_app().await;
    let response = app
        .oneshot(get_as("/v1/pages/finanzas", roles::COORDINADOR_ACTIVIDADES))
        .await
        .expect("page");
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let body = read_json(response).await;
    assert_eq!(body["code"], "permission_denied");
    assert_eq!(body["message"], "you lack permission");
}

#[tokio::test]
async fn security_screen_requires_security_admin() {
    let app = memory_app().await;
    let response = app
        .clone()
        .oneshot(get_as("/v1/pages/admin/permisos", roles::ADMIN_PARQUE))
        .await
        .expect("page");
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = app
        .oneshot(get_as("/v1/pages/admin/permisos", roles::SUPER_ADMIN))
        .await
        .expect("page");
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn unknown_page_and_missing_actor() {
    let app = memory_app().await;
    let response = app
        .clone()
        .oneshot(get_as("/v1/pages/no-such-page", roles::SUPER_ADMIN))
        .await
        .expect("page");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let request = Request::builder()
        .uri("/v1/pages/dashboard")
        .body(Body::empty())
        .expect("request");
    let response = app.oneshot(request).await.expect("page");
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn guard_follows_matrix_edits() {
    let app = memory_app().await;
    let uri = "/v1/pages/finanzas/ingresos";

    let response = app
        .clone()
        .oneshot(get_as(uri, roles::COORDINADOR_ACTIVIDADES))
        .await
        .expect("page");
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = app
        .clone()
        .oneshot(json_request_as(
            "PUT",
            "/v1/permissions/roles/coordinador-actividades/modules/Finanzas/kinds/read",
            roles::SUPER_ADMIN,
            serde_json::json!({"enabled": true}),
        ))
        .await
        .expect("grant");
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .clone()
        .oneshot(get_as(uri, roles::COORDINADOR_ACTIVIDADES))
        .await
        .expect("page");
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .clone()
        .oneshot(empty_request_as(
            "DELETE",
            "/v1/permissions/roles/coordinador-actividades/modules/Finanzas",
            roles::SUPER_ADMIN,
        ))
        .await
        .expect("clear");
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .oneshot(get_as(uri, roles::COORDINADOR_ACTIVIDADES))
        .await
        .expect("page");
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}
