//! Permission kinds and per-cell grant sets.
//!
//! # Key invariants
//! - Kinds are independent: holding `admin` says nothing about `read` or `write`.
//! - A [`GrantSet`] serializes as an array of kind strings in canonical order
//!   (`read`, `write`, `admin`), so persisted documents are stable.
use crate::AuthzError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PermissionKind {
    Read,
    Write,
    Admin,
}

impl PermissionKind {
    pub const ALL: [PermissionKind; 3] = [
        PermissionKind::Read,
        PermissionKind::Write,
        PermissionKind::Admin,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            PermissionKind::Read => "read",
            PermissionKind::Write => "write",
            PermissionKind::Admin => "admin",
        }
    }

    fn bit(self) -> u8 {
        match self {
            PermissionKind::Read => 0b001,
            PermissionKind::Write => 0b010,
            PermissionKind::Admin => 0b100,
        }
    }
}

impl std::fmt::Display for PermissionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for PermissionKind {
    type Err = AuthzError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "read" => Ok(PermissionKind::Read),
            "write" => Ok(PermissionKind::Write),
            "admin" => Ok(PermissionKind::Admin),
            _ => Err(AuthzError::InvalidKind(value.to_string())),
        }
    }
}

/// The set of kinds granted on one (role, module) cell.
///
/// # Example
/// ```rust
/// use sendero_authz::{GrantSet, PermissionKind};
///
/// let grants = GrantSet::of(&[PermissionKind::Read, PermissionKind::Write]);
/// assert!(grants.contains(PermissionKind::Write));
/// assert!(!grants.contains(PermissionKind::Admin));
/// assert_eq!(grants.len(), 2);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct GrantSet(u8);

impl GrantSet {
    pub const EMPTY: GrantSet = GrantSet(0);
    pub const ALL: GrantSet = GrantSet(0b111);

    pub fn of(kinds: &[PermissionKind]) -> Self {
        kinds.iter().copied().collect()
    }

    pub fn contains(self, kind: PermissionKind) -> bool {
        self.0 & kind.bit() != 0
    }

    pub fn insert(&mut self, kind: PermissionKind) {
        self.0 |= kind.bit();
    }

    pub fn remove(&mut self, kind: PermissionKind) {
        self.0 &= !kind.bit();
    }

    /// Return a copy with `kind` set to `enabled`.
    pub fn with(mut self, kind: PermissionKind, enabled: bool) -> Self {
        if enabled {
            self.insert(kind);
        } else {
            self.remove(kind);
        }
        self
    }

    pub fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn is_superset(self, other: GrantSet) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn iter(self) -> impl Iterator<Item = PermissionKind> {
        PermissionKind::ALL
            .into_iter()
            .filter(move |kind| self.contains(*kind))
    }
}

impl FromIterator<PermissionKind> for GrantSet {
    fn from_iter<I: IntoIterator<Item = PermissionKind>>(iter: I) -> Self {
        let mut set = GrantSet::EMPTY;
        for kind in iter {
            set.insert(kind);
        }
        set
    }
}

impl Serialize for GrantSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.iter())
    }
}

impl<'de> Deserialize<'de> for GrantSet {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let kinds = Vec::<PermissionKind>::deserialize(deserializer)?;
        Ok(kinds.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_string_roundtrip() {
        for kind in PermissionKind::ALL {
            let as_str = kind.as_str();
            assert_eq!(as_str.parse::<PermissionKind>().ok(), Some(kind));
            assert_eq!(kind.to_string(), as_str);
        }
    }

    #[test]
    fn kind_from_str_invalid() {
        let err = "delete".parse::<PermissionKind>().expect_err("unknown kind");
        assert!(matches!(err, AuthzError::InvalidKind(_)));
    }

    #[test]
    fn kinds_are_independent() {
        let admin_only = GrantSet::of(&[PermissionKind::Admin]);
        assert!(admin_only.contains(PermissionKind::Admin));
        assert!(!admin_only.contains(PermissionKind::Read));
        assert!(!admin_only.contains(PermissionKind::Write));
    }

    #[test]
    fn insert_remove_and_with() {
        let mut set = GrantSet::EMPTY;
        assert!(set.is_empty());
        set.insert(PermissionKind::Read);
        set.insert(PermissionKind::Read);
        assert_eq!(set.len(), 1);
        let set = set.with(PermissionKind::Write, true);
        assert_eq!(set.len(), 2);
        let set = set.with(PermissionKind::Read, false);
        assert_eq!(set, GrantSet::of(&[PermissionKind::Write]));
    }

    #[test]
    fn superset_check() {
        let all = GrantSet::ALL;
        let read = GrantSet::of(&[PermissionKind::Read]);
        assert!(all.is_superset(read));
        assert!(read.is_superset(GrantSet::EMPTY));
        assert!(!read.is_superset(all));
    }

    #[test]
    fn grant_set_serializes_in_canonical_order() {
        let set = GrantSet::of(&[PermissionKind::Admin, PermissionKind::Read]);
        let json = serde_json::to_string(&set).expect("serialize");
        assert_eq!(json, r#"["read","admin"]"#);

        let parsed: GrantSet =
            serde_json::from_str(r#"["write","write","read"]"#).expect("deserialize");
        assert_eq!(
            parsed,
            GrantSet::of(&[PermissionKind::Read, PermissionKind::Write])
        );
        assert!(serde_json::from_str::<GrantSet>(r#"["execute"]"#).is_err());
    }
}
