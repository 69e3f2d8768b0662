//! Strongly typed identifiers for roles and modules.
//!
//! # Key invariants
//! - Display and `as_str` return the original value.
//! - Both wrappers borrow as `str`, so maps keyed by them accept `&str` lookups.
//!
//! # Common pitfalls
//! - Constructing an id does not check it against the registry or catalog;
//!   that validation happens at the store and resolver boundaries.
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;

/// Role identifier wrapper (a stable slug such as `coordinador-actividades`).
///
/// # Example
/// ```rust
/// use sendero_authz::RoleId;
///
/// let role = RoleId::new("super-admin");
/// assert_eq!(role.as_str(), "super-admin");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoleId(String);

impl RoleId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for RoleId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for RoleId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for RoleId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Module identifier wrapper (a capability area such as `Actividades`).
///
/// # Example
/// ```rust
/// use sendero_authz::ModuleId;
///
/// let module = ModuleId::new("Finanzas");
/// assert_eq!(module.to_string(), "Finanzas");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ModuleId(String);

impl ModuleId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ModuleId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for ModuleId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ModuleId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}
