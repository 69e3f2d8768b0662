//! API error types and helpers.
//!
//! # Purpose and responsibility
//! Centralizes HTTP error response construction so every console endpoint
//! returns the same error shape, and maps authorization failures onto stable
//! codes the frontend can branch on.
//!
//! # Key invariants and assumptions
//! - Error responses include a stable `code` and a human-readable `message`.
//! - The three user-visible failures of the matrix editor stay distinct:
//!   `protected_role` (409), `permission_denied` (403) and
//!   `persistence_error` (503).
//!
//! # Security considerations
//! - Storage failures are logged server-side; clients only see a retry hint.
use crate::api::types::ErrorResponse;
use axum::Json;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use sendero_authz::AuthzError;

pub const PROTECTED_ROLE_MESSAGE: &str = "this role cannot be edited";
pub const PERMISSION_DENIED_MESSAGE: &str = "you lack permission";
pub const PERSISTENCE_MESSAGE: &str = "a save error occurred, please retry";

/// Structured API error returned by handlers.
///
/// # Invariants
/// - `status` must match the semantics of `body.code`.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub body: ErrorResponse,
}

impl ApiError {
    fn new(status: StatusCode, code: &str, message: &str) -> Self {
        Self {
            status,
            body: ErrorResponse {
                code: code.to_string(),
                message: message.to_string(),
                request_id: None,
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        (self.status, Json(self.body)).into_response()
    }
}

pub fn api_not_found(message: &str) -> ApiError {
    ApiError::new(StatusCode::NOT_FOUND, "not_found", message)
}

pub fn api_conflict(code: &str, message: &str) -> ApiError {
    ApiError::new(StatusCode::CONFLICT, code, message)
}

/// Build a 401 Unauthorized error for requests without an actor identity.
pub fn api_unauthorized(message: &str) -> ApiError {
    ApiError::new(StatusCode::UNAUTHORIZED, "unauthorized", message)
}

/// Build the standardized 403 denial used by the route guard and the matrix
/// editor.
pub fn api_permission_denied() -> ApiError {
    ApiError::new(
        StatusCode::FORBIDDEN,
        "permission_denied",
        PERMISSION_DENIED_MESSAGE,
    )
}

pub fn api_validation_error(message: &str) -> ApiError {
    ApiError::new(StatusCode::BAD_REQUEST, "validation_error", message)
}

pub fn api_unavailable(code: &str, message: &str) -> ApiError {
    ApiError::new(StatusCode::SERVICE_UNAVAILABLE, code, message)
}

pub fn api_internal_message(message: &str) -> ApiError {
    ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, "internal", message)
}

impl From<AuthzError> for ApiError {
    fn from(err: AuthzError) -> Self {
        match &err {
            AuthzError::ProtectedRole(_) => api_conflict("protected_role", PROTECTED_ROLE_MESSAGE),
            AuthzError::Unauthorized(_) => api_permission_denied(),
            AuthzError::UnknownRole(_) | AuthzError::UnknownModule(_) => {
                api_not_found(&err.to_string())
            }
            AuthzError::InvalidKind(_) => api_validation_error(&err.to_string()),
            AuthzError::Persistence(_) => {
                tracing::error!(error = %err, "permission matrix persistence failed");
                api_unavailable("persistence_error", PERSISTENCE_MESSAGE)
            }
            AuthzError::InvalidCatalog(_)
            | AuthzError::MalformedData(_)
            | AuthzError::Serialization(_) => {
                tracing::error!(error = %err, "permission subsystem error");
                api_internal_message("permission subsystem error")
            }
        }
    }
}
