//! Sendero role-based access control shared by the console service.
//!
//! # Purpose
//! Centralizes the role registry, the module catalog, the layered permission
//! matrix (compiled defaults plus persisted overrides), permission resolution,
//! and permission-driven filtering of the navigation tree.
//!
//! # How it fits
//! The console service loads a [`PermissionStore`] at startup, resolves every
//! navigation and route-guard decision against its current [`MatrixSnapshot`],
//! and routes matrix edits through the store so they are authorized, persisted
//! and published atomically.
//!
//! # Key invariants
//! - Exactly one role is protected; its grants always come from the defaults.
//! - A touched override cell fully replaces the default cell.
//! - Unknown roles and modules resolve to "denied".
//! - Editing the matrix requires `admin` on the [`SECURITY_MODULE`].
//!
//! # Examples
//! ```rust
//! use sendero_authz::{PermissionKind, builtin, filter_tree};
//!
//! let snapshot = builtin::default_snapshot().expect("snapshot");
//! assert!(snapshot.has_permission("tesorero", "Finanzas", PermissionKind::Write));
//! let menu = filter_tree(&builtin::menu_tree(), &snapshot, "consulta");
//! assert!(menu.iter().all(|node| node.id != "finanzas"));
//! ```
//!
//! # Common pitfalls
//! - Checking several permissions in one request against different snapshots
//!   can yield inconsistent answers; take one snapshot per request.

pub mod builtin;
mod catalog;
mod errors;
mod kind;
mod matrix;
mod menu;
mod resolver;
mod store;
mod types;

pub use catalog::{ModuleCatalog, ModuleInfo, Role, RoleRegistry, SECURITY_MODULE};
pub use errors::{AuthzError, AuthzResult};
pub use kind::{GrantSet, PermissionKind};
pub use matrix::{DefaultMatrix, OverrideMatrix};
pub use menu::{
    MenuAnomaly, MenuNode, RequiredPermission, filter_tree, find_route, validate_tree,
    visible_routes,
};
pub use resolver::{ActorPermissions, MatrixSnapshot, dominates, has_permission};
pub use store::{DEFAULT_MATRIX_KEY, PermissionStore};
pub use types::{ModuleId, RoleId};
