//! Request actor extraction.
//!
//! The upstream authentication layer resolves the signed-in user and forwards
//! their role in the `x-sendero-role` header. This extractor binds that role to
//! the current matrix snapshot so every check within one request agrees.
use crate::api::error::{ApiError, api_unauthorized};
use crate::app::AppState;
use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use sendero_authz::{ActorPermissions, RoleId};

pub const ROLE_HEADER: &str = "x-sendero-role";

#[derive(Debug, Clone)]
pub struct Actor {
    pub permissions: ActorPermissions,
}

impl Actor {
    pub fn role(&self) -> &str {
        self.permissions.role().as_str()
    }
}

#[async_trait]
impl FromRequestParts<AppState> for Actor {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let role = parts
            .headers
            .get(ROLE_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .ok_or_else(|| api_unauthorized("missing actor role"))?;
        // Unknown roles are accepted here and denied by the resolver.
        let snapshot = state.permissions.snapshot();
        if !snapshot.registry().contains(role) {
            tracing::warn!(role, "request from unknown actor role");
        }
        Ok(Self {
            permissions: ActorPermissions::new(RoleId::new(role), snapshot),
        })
    }
}
