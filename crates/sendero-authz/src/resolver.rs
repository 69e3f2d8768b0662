//! Permission resolution over an immutable matrix snapshot.
//!
//! # Purpose
//! Answers "does role R hold kind K on module M" by combining the override
//! layer over the default layer. Navigation, route guards and the matrix
//! editor all resolve through this module so they can never disagree.
//!
//! # Key invariants
//! - Resolution is a pure function of (snapshot, role, module, kind).
//! - Unknown roles and modules resolve to `false` (fail closed) and are logged.
//! - The protected role always resolves from the defaults.
//!
//! # Examples
//! ```rust
//! use sendero_authz::{PermissionKind, builtin};
//!
//! let snapshot = builtin::default_snapshot().expect("snapshot");
//! assert!(snapshot.has_permission("coordinador-actividades", "Actividades", PermissionKind::Write));
//! assert!(!snapshot.has_permission("coordinador-actividades", "Finanzas", PermissionKind::Read));
//! assert!(!snapshot.has_permission("coordinador-actividades", "NonExistentModule", PermissionKind::Read));
//! ```
use crate::{
    DefaultMatrix, GrantSet, ModuleCatalog, OverrideMatrix, PermissionKind, RoleId, RoleRegistry,
    SECURITY_MODULE,
};
use std::sync::Arc;

/// Immutable view of registry, catalog, defaults and overrides at one instant.
#[derive(Debug, Clone)]
pub struct MatrixSnapshot {
    registry: Arc<RoleRegistry>,
    catalog: Arc<ModuleCatalog>,
    defaults: Arc<DefaultMatrix>,
    overrides: OverrideMatrix,
}

impl MatrixSnapshot {
    pub fn new(
        registry: Arc<RoleRegistry>,
        catalog: Arc<ModuleCatalog>,
        defaults: Arc<DefaultMatrix>,
        overrides: OverrideMatrix,
    ) -> Self {
        Self {
            registry,
            catalog,
            defaults,
            overrides,
        }
    }

    pub fn registry(&self) -> &RoleRegistry {
        &self.registry
    }

    pub fn catalog(&self) -> &ModuleCatalog {
        &self.catalog
    }

    pub fn defaults(&self) -> &DefaultMatrix {
        &self.defaults
    }

    pub fn overrides(&self) -> &OverrideMatrix {
        &self.overrides
    }

    pub(crate) fn with_overrides(&self, overrides: OverrideMatrix) -> Self {
        Self {
            registry: Arc::clone(&self.registry),
            catalog: Arc::clone(&self.catalog),
            defaults: Arc::clone(&self.defaults),
            overrides,
        }
    }

    /// Effective grants for one cell, or `None` if the role or module is unknown.
    pub fn effective_grants(&self, role: &str, module: &str) -> Option<GrantSet> {
        if !self.registry.contains(role) || !self.catalog.contains(module) {
            return None;
        }
        if self.registry.is_protected(role) {
            return Some(self.defaults.get(role, module));
        }
        Some(
            self.overrides
                .get(role, module)
                .unwrap_or_else(|| self.defaults.get(role, module)),
        )
    }

    pub fn has_permission(&self, role: &str, module: &str, kind: PermissionKind) -> bool {
        has_permission(self, role, module, kind)
    }

    /// Whether the cell's effective value comes from the override layer.
    pub fn is_overridden(&self, role: &str, module: &str) -> bool {
        !self.registry.is_protected(role) && self.overrides.get(role, module).is_some()
    }

    /// Total granted kinds across every module for `role`; 0 for unknown roles.
    pub fn grant_count(&self, role: &str) -> usize {
        self.catalog
            .iter()
            .filter_map(|module| self.effective_grants(role, module.id.as_str()))
            .map(GrantSet::len)
            .sum()
    }

    /// Whether `role` may edit the permission matrix.
    pub fn can_edit_permissions(&self, role: &str) -> bool {
        self.has_permission(role, SECURITY_MODULE, PermissionKind::Admin)
    }
}

/// Resolve one grant. Unknown roles and modules are denied.
pub fn has_permission(
    snapshot: &MatrixSnapshot,
    role: &str,
    module: &str,
    kind: PermissionKind,
) -> bool {
    match snapshot.effective_grants(role, module) {
        Some(grants) => grants.contains(kind),
        None => {
            if !snapshot.registry().contains(role) {
                tracing::debug!(role, module, %kind, "permission check for unknown role denied");
            } else {
                tracing::warn!(role, module, %kind, "permission check for unknown module denied");
            }
            false
        }
    }
}

/// Whether `a`'s effective grants cover `b`'s on every (module, kind).
/// Unknown roles dominate nothing and are dominated by everything.
pub fn dominates(snapshot: &MatrixSnapshot, a: &str, b: &str) -> bool {
    if !snapshot.registry().contains(b) {
        return true;
    }
    if !snapshot.registry().contains(a) {
        return false;
    }
    snapshot.catalog().iter().all(|module| {
        let id = module.id.as_str();
        let ga = snapshot.effective_grants(a, id).unwrap_or_default();
        let gb = snapshot.effective_grants(b, id).unwrap_or_default();
        ga.is_superset(gb)
    })
}

/// Permission checks bound to one actor's role.
#[derive(Debug, Clone)]
pub struct ActorPermissions {
    role: RoleId,
    snapshot: Arc<MatrixSnapshot>,
}

impl ActorPermissions {
    pub fn new(role: RoleId, snapshot: Arc<MatrixSnapshot>) -> Self {
        Self { role, snapshot }
    }

    pub fn role(&self) -> &RoleId {
        &self.role
    }

    pub fn snapshot(&self) -> &MatrixSnapshot {
        &self.snapshot
    }

    pub fn has_permission(&self, module: &str, kind: PermissionKind) -> bool {
        has_permission(&self.snapshot, self.role.as_str(), module, kind)
    }

    pub fn can_read(&self, module: &str) -> bool {
        self.has_permission(module, PermissionKind::Read)
    }

    pub fn can_write(&self, module: &str) -> bool {
        self.has_permission(module, PermissionKind::Write)
    }

    pub fn can_admin(&self, module: &str) -> bool {
        self.has_permission(module, PermissionKind::Admin)
    }
}
