//! HTTP API request/response types.
//!
//! # Purpose
//! Defines payload shapes for the console REST API and OpenAPI schema
//! generation. Domain types from `sendero_authz` are converted at this
//! boundary so the wire format stays independent of the library layout.
use sendero_authz::{GrantSet, MenuNode, ModuleInfo, Role};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct SystemInfo {
    pub service: String,
    pub api_version: String,
    pub storage_backend: String,
    pub durable_storage: bool,
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct HealthStatus {
    pub status: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
    pub request_id: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone, PartialEq, Eq)]
pub struct NavigationItem {
    pub id: String,
    pub label: String,
    pub route: String,
    pub icon: Option<String>,
    pub module: String,
    pub kind: String,
    pub children: Vec<NavigationItem>,
}

impl From<&MenuNode> for NavigationItem {
    fn from(node: &MenuNode) -> Self {
        Self {
            id: node.id.clone(),
            label: node.label.clone(),
            route: node.route.clone(),
            icon: node.icon.clone(),
            module: node.required.module.to_string(),
            kind: node.required.kind.to_string(),
            children: node.children.iter().map(NavigationItem::from).collect(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct NavigationResponse {
    pub role: String,
    pub items: Vec<NavigationItem>,
    /// Every route in `items`, pre-order.
    pub routes: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct Breadcrumb {
    pub id: String,
    pub label: String,
    pub route: String,
}

impl From<&MenuNode> for Breadcrumb {
    fn from(node: &MenuNode) -> Self {
        Self {
            id: node.id.clone(),
            label: node.label.clone(),
            route: node.route.clone(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct PageResponse {
    pub id: String,
    pub label: String,
    pub route: String,
    pub module: String,
    pub kind: String,
    pub breadcrumbs: Vec<Breadcrumb>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct RoleSummary {
    pub id: String,
    pub display_name: String,
    pub level: u32,
    pub is_protected: bool,
}

impl From<&Role> for RoleSummary {
    fn from(role: &Role) -> Self {
        Self {
            id: role.id.to_string(),
            display_name: role.display_name.clone(),
            level: role.level,
            is_protected: role.is_protected,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct ModuleSummary {
    pub id: String,
    pub display_name: String,
}

impl From<&ModuleInfo> for ModuleSummary {
    fn from(module: &ModuleInfo) -> Self {
        Self {
            id: module.id.to_string(),
            display_name: module.display_name.clone(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct CatalogResponse {
    pub roles: Vec<RoleSummary>,
    pub modules: Vec<ModuleSummary>,
    pub kinds: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone, PartialEq, Eq)]
pub struct MatrixCell {
    pub module: String,
    pub kinds: Vec<String>,
    /// Whether the value comes from an operator override.
    pub overridden: bool,
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct MatrixRow {
    pub role: String,
    pub is_protected: bool,
    pub grant_count: usize,
    pub cells: Vec<MatrixCell>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct MatrixResponse {
    pub rows: Vec<MatrixRow>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct GrantUpdateRequest {
    pub enabled: bool,
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct GrantCellResponse {
    pub role: String,
    pub cell: MatrixCell,
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct ClearCellResponse {
    pub role: String,
    /// False when the cell already inherited its default.
    pub cleared: bool,
    pub cell: MatrixCell,
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct GrantCountResponse {
    pub role: String,
    pub grant_count: usize,
}

pub(crate) fn kind_names(grants: GrantSet) -> Vec<String> {
    grants.iter().map(|kind| kind.to_string()).collect()
}
