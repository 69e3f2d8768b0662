//! Role registry and module catalog.
//!
//! # Purpose
//! Static catalogs that define the row (role) and column (module) axes of the
//! permission matrix. Both are built once at start-up and never mutated.
//!
//! # Key invariants
//! - Role and module ids are unique.
//! - Exactly one role is protected.
//! - Iteration order is declaration order, which the matrix editor relies on
//!   for a stable layout.
use crate::{AuthzError, AuthzResult, ModuleId, RoleId};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Module id of the permission subsystem itself. Editing the matrix requires
/// `admin` on this module.
pub const SECURITY_MODULE: &str = "Seguridad";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    pub id: RoleId,
    pub display_name: String,
    /// Higher means more authority.
    pub level: u32,
    pub is_protected: bool,
}

impl Role {
    pub fn new(id: impl Into<String>, display_name: impl Into<String>, level: u32) -> Self {
        Self {
            id: RoleId::new(id),
            display_name: display_name.into(),
            level,
            is_protected: false,
        }
    }

    pub fn protected(mut self) -> Self {
        self.is_protected = true;
        self
    }
}

#[derive(Debug, Clone)]
pub struct RoleRegistry {
    roles: Vec<Role>,
    protected_idx: usize,
}

impl RoleRegistry {
    /// Build a registry, rejecting duplicate ids and anything other than
    /// exactly one protected role.
    pub fn new(roles: Vec<Role>) -> AuthzResult<Self> {
        let mut seen = HashSet::new();
        for role in &roles {
            if role.id.as_str().is_empty() {
                return Err(AuthzError::InvalidCatalog("empty role id".to_string()));
            }
            if !seen.insert(role.id.as_str()) {
                return Err(AuthzError::InvalidCatalog(format!(
                    "duplicate role id {}",
                    role.id
                )));
            }
        }
        let protected: Vec<usize> = roles
            .iter()
            .enumerate()
            .filter(|(_, role)| role.is_protected)
            .map(|(idx, _)| idx)
            .collect();
        let [protected_idx] = protected.as_slice() else {
            return Err(AuthzError::InvalidCatalog(format!(
                "expected exactly one protected role, found {}",
                protected.len()
            )));
        };
        let protected_idx = *protected_idx;
        Ok(Self {
            roles,
            protected_idx,
        })
    }

    pub fn get(&self, id: &str) -> Option<&Role> {
        self.roles.iter().find(|role| role.id.as_str() == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    pub fn protected_role(&self) -> &Role {
        &self.roles[self.protected_idx]
    }

    pub fn is_protected(&self, id: &str) -> bool {
        self.protected_role().id.as_str() == id
    }

    pub fn iter(&self) -> impl Iterator<Item = &Role> {
        self.roles.iter()
    }

    pub fn len(&self) -> usize {
        self.roles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.roles.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleInfo {
    pub id: ModuleId,
    pub display_name: String,
}

impl ModuleInfo {
    pub fn new(id: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            id: ModuleId::new(id),
            display_name: display_name.into(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ModuleCatalog {
    modules: Vec<ModuleInfo>,
}

impl ModuleCatalog {
    pub fn new(modules: Vec<ModuleInfo>) -> AuthzResult<Self> {
        let mut seen = HashSet::new();
        for module in &modules {
            if module.id.as_str().is_empty() {
                return Err(AuthzError::InvalidCatalog("empty module id".to_string()));
            }
            if !seen.insert(module.id.as_str()) {
                return Err(AuthzError::InvalidCatalog(format!(
                    "duplicate module id {}",
                    module.id
                )));
            }
        }
        Ok(Self { modules })
    }

    pub fn get(&self, id: &str) -> Option<&ModuleInfo> {
        self.modules.iter().find(|module| module.id.as_str() == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ModuleInfo> {
        self.modules.iter()
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }
}
