//! Default and override permission matrices.
//!
//! # Purpose
//! The default matrix is the compiled, reviewable baseline. The override
//! matrix is the operator-editable layer persisted as a single JSON document:
//!
//! ```json
//! { "coordinador-actividades": { "Finanzas": ["read"] } }
//! ```
//!
//! # Key invariants
//! - A cell present in the override matrix fully replaces the default cell.
//! - The protected role never appears in an override matrix; documents that
//!   contain it are rejected by [`OverrideMatrix::from_json`].
//! - Every role and module key is validated against the registry and catalog.
//!
//! # Common pitfalls
//! - Writing a cell with only the kind being toggled drops the other default
//!   kinds of that cell. The store seeds untouched cells from the default
//!   before toggling.
use crate::{AuthzError, AuthzResult, GrantSet, ModuleCatalog, ModuleId, RoleId, RoleRegistry};
use std::collections::BTreeMap;

type Cells = BTreeMap<RoleId, BTreeMap<ModuleId, GrantSet>>;

fn cell(cells: &Cells, role: &str, module: &str) -> Option<GrantSet> {
    cells.get(role).and_then(|row| row.get(module)).copied()
}

/// Compiled baseline grants. Cells never listed are empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DefaultMatrix {
    cells: Cells,
}

impl DefaultMatrix {
    /// Build the baseline from `(role, module, grants)` entries, validating
    /// every id. Repeated entries for the same cell are unioned.
    pub fn new<'a>(
        registry: &RoleRegistry,
        catalog: &ModuleCatalog,
        entries: impl IntoIterator<Item = (&'a str, &'a str, GrantSet)>,
    ) -> AuthzResult<Self> {
        let mut cells = Cells::new();
        for (role, module, grants) in entries {
            if !registry.contains(role) {
                return Err(AuthzError::UnknownRole(role.to_string()));
            }
            if !catalog.contains(module) {
                return Err(AuthzError::UnknownModule(module.to_string()));
            }
            let slot = cells
                .entry(RoleId::new(role))
                .or_default()
                .entry(ModuleId::new(module))
                .or_default();
            for kind in grants.iter() {
                slot.insert(kind);
            }
        }
        Ok(Self { cells })
    }

    pub fn get(&self, role: &str, module: &str) -> GrantSet {
        cell(&self.cells, role, module).unwrap_or_default()
    }
}

/// Operator-editable grants layered over the defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OverrideMatrix {
    cells: Cells,
}

impl OverrideMatrix {
    pub fn new() -> Self {
        Self::default()
    }

    /// The override for a cell, or `None` if the cell was never written.
    pub fn get(&self, role: &str, module: &str) -> Option<GrantSet> {
        cell(&self.cells, role, module)
    }

    pub fn set(&mut self, role: RoleId, module: ModuleId, grants: GrantSet) {
        self.cells.entry(role).or_default().insert(module, grants);
    }

    /// Revert one cell to "inherit default". Returns whether the cell existed.
    pub fn clear_cell(&mut self, role: &str, module: &str) -> bool {
        let Some(row) = self.cells.get_mut(role) else {
            return false;
        };
        let removed = row.remove(module).is_some();
        if row.is_empty() {
            self.cells.remove(role);
        }
        removed
    }

    pub fn clear(&mut self) {
        self.cells.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Number of touched cells across all roles.
    pub fn cell_count(&self) -> usize {
        self.cells.values().map(BTreeMap::len).sum()
    }

    pub fn contains_role(&self, role: &str) -> bool {
        self.cells.contains_key(role)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&RoleId, &ModuleId, GrantSet)> {
        self.cells.iter().flat_map(|(role, row)| {
            row.iter()
                .map(move |(module, grants)| (role, module, *grants))
        })
    }

    /// Encode as the persisted JSON document.
    pub fn to_json(&self) -> AuthzResult<Vec<u8>> {
        Ok(serde_json::to_vec_pretty(&self.cells)?)
    }

    /// Decode and validate a persisted JSON document.
    ///
    /// # Errors
    /// - [`AuthzError::MalformedData`] if the document does not parse, names an
    ///   unknown role, module or kind, or contains the protected role.
    pub fn from_json(
        data: &[u8],
        registry: &RoleRegistry,
        catalog: &ModuleCatalog,
    ) -> AuthzResult<Self> {
        let cells: Cells = serde_json::from_slice(data)
            .map_err(|err| AuthzError::MalformedData(format!("unparsable document: {err}")))?;
        for (role, row) in &cells {
            if !registry.contains(role.as_str()) {
                return Err(AuthzError::MalformedData(format!("unknown role {role}")));
            }
            if registry.is_protected(role.as_str()) {
                return Err(AuthzError::MalformedData(format!(
                    "protected role {role} cannot carry overrides"
                )));
            }
            for module in row.keys() {
                if !catalog.contains(module.as_str()) {
                    return Err(AuthzError::MalformedData(format!(
                        "unknown module {module} for role {role}"
                    )));
                }
            }
        }
        let mut matrix = Self { cells };
        matrix.cells.retain(|_, row| !row.is_empty());
        Ok(matrix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ModuleInfo, PermissionKind, Role};

    fn fixtures() -> (RoleRegistry, ModuleCatalog) {
        let registry = RoleRegistry::new(vec![
            Role::new("root", "Root", 100).protected(),
            Role::new("editor", "Editor", 50),
        ])
        .expect("registry");
        let catalog = ModuleCatalog::new(vec![
            ModuleInfo::new("Parques", "Parques"),
            ModuleInfo::new("Finanzas", "Finanzas"),
        ])
        .expect("catalog");
        (registry, catalog)
    }

    #[test]
    fn default_matrix_validates_ids_and_unions_entries() {
        let (registry, catalog) = fixtures();
        let defaults = DefaultMatrix::new(
            &registry,
            &catalog,
            [
                ("editor", "Parques", GrantSet::of(&[PermissionKind::Read])),
                ("editor", "Parques", GrantSet::of(&[PermissionKind::Write])),
            ],
        )
        .expect("defaults");
        assert_eq!(
            defaults.get("editor", "Parques"),
            GrantSet::of(&[PermissionKind::Read, PermissionKind::Write])
        );
        assert_eq!(defaults.get("editor", "Finanzas"), GrantSet::EMPTY);

        let err = DefaultMatrix::new(&registry, &catalog, [("ghost", "Parques", GrantSet::ALL)])
            .expect_err("unknown role");
        assert!(matches!(err, AuthzError::UnknownRole(_)));
        let err = DefaultMatrix::new(&registry, &catalog, [("editor", "Nope", GrantSet::ALL)])
            .expect_err("unknown module");
        assert!(matches!(err, AuthzError::UnknownModule(_)));
    }

    #[test]
    fn clear_cell_prunes_empty_rows() {
        let mut overrides = OverrideMatrix::new();
        overrides.set(
            RoleId::new("editor"),
            ModuleId::new("Parques"),
            GrantSet::EMPTY,
        );
        assert_eq!(overrides.get("editor", "Parques"), Some(GrantSet::EMPTY));
        assert_eq!(overrides.cell_count(), 1);
        assert!(overrides.clear_cell("editor", "Parques"));
        assert!(!overrides.clear_cell("editor", "Parques"));
        assert!(!overrides.contains_role("editor"));
        assert!(overrides.is_empty());
    }

    #[test]
    fn json_document_round_trip() {
        let (registry, catalog) = fixtures();
        let mut overrides = OverrideMatrix::new();
        overrides.set(
            RoleId::new("editor"),
            ModuleId::new("Finanzas"),
            GrantSet::of(&[PermissionKind::Read]),
        );
        let data = overrides.to_json().expect("encode");
        let value: serde_json::Value = serde_json::from_slice(&data).expect("json");
        assert_eq!(value, serde_json::json!({"editor": {"Finanzas": ["read"]}}));

        let decoded = OverrideMatrix::from_json(&data, &registry, &catalog).expect("decode");
        assert_eq!(decoded, overrides);
    }

    #[test]
    fn json_document_rejects_invalid_content() {
        let (registry, catalog) = fixtures();
        let cases: [&[u8]; 5] = [
            b"not json",
            br#"{"ghost": {"Parques": ["read"]}}"#,
            br#"{"editor": {"Nope": ["read"]}}"#,
            br#"{"editor": {"Parques": ["delete"]}}"#,
            br#"{"root": {"Parques": []}}"#,
        ];
        for case in cases {
            let err = OverrideMatrix::from_json(case, &registry, &catalog)
                .expect_err("invalid document");
            assert!(matches!(err, AuthzError::MalformedData(_)));
        }
    }

    #[test]
    fn empty_rows_are_dropped_on_load() {
        let (registry, catalog) = fixtures();
        let decoded = OverrideMatrix::from_json(br#"{"editor": {}}"#, &registry, &catalog)
            .expect("decode");
        assert!(decoded.is_empty());
    }
}
