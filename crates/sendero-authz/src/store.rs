//! Permission matrix store.
//!
//! # Purpose
//! Owns the current [`MatrixSnapshot`], persists the override layer through a
//! [`KeyValueStore`], and enforces the editing rules.
//!
//! # Durability and consistency
//! - One writer at a time: mutations serialize on an async mutex held across
//!   the storage write.
//! - A new snapshot is published only after the storage write succeeds, so a
//!   failed write leaves the previous snapshot in place (rollback) and no
//!   reader ever observes unpersisted state.
//! - Readers clone an `Arc` of the snapshot and never block on I/O.
//! - The backing store is last-write-wins. Running several editing processes
//!   against one store needs versioned or compare-and-swap writes.
//!
//! # Security considerations
//! - The protected role can never be written.
//! - Every mutation requires `admin` on the security module, evaluated against
//!   the current snapshot.
use crate::{
    AuthzError, AuthzResult, DefaultMatrix, MatrixSnapshot, ModuleCatalog, ModuleId,
    OverrideMatrix, PermissionKind, RoleId, RoleRegistry,
};
use bytes::Bytes;
use parking_lot::RwLock;
use sendero_storage::KeyValueStore;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Well-known storage key of the persisted override document.
pub const DEFAULT_MATRIX_KEY: &str = "sendero.permission-matrix";

pub struct PermissionStore {
    storage: Arc<dyn KeyValueStore>,
    key: String,
    current: RwLock<Arc<MatrixSnapshot>>,
    writer: Mutex<()>,
}

impl std::fmt::Debug for PermissionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PermissionStore")
            .field("backend", &self.storage.backend_name())
            .field("key", &self.key)
            .finish_non_exhaustive()
    }
}

impl PermissionStore {
    /// Load the effective matrix: defaults plus any valid persisted overrides.
    ///
    /// Missing, unreadable or invalid persisted data falls back to an empty
    /// override layer with a warning; this never fails.
    pub async fn load(
        storage: Arc<dyn KeyValueStore>,
        key: impl Into<String>,
        registry: Arc<RoleRegistry>,
        catalog: Arc<ModuleCatalog>,
        defaults: Arc<DefaultMatrix>,
    ) -> Self {
        let key = key.into();
        let overrides = read_overrides(storage.as_ref(), &key, &registry, &catalog).await;
        record_override_cells(&overrides);
        let snapshot = MatrixSnapshot::new(registry, catalog, defaults, overrides);
        tracing::info!(
            backend = storage.backend_name(),
            key = %key,
            overridden_cells = snapshot.overrides().cell_count(),
            "permission matrix loaded"
        );
        Self {
            storage,
            key,
            current: RwLock::new(Arc::new(snapshot)),
            writer: Mutex::new(()),
        }
    }

    /// Re-read persisted overrides and publish the result.
    pub async fn reload(&self) {
        let _guard = self.writer.lock().await;
        let current = self.snapshot();
        let overrides = read_overrides(
            self.storage.as_ref(),
            &self.key,
            current.registry(),
            current.catalog(),
        )
        .await;
        self.publish(current.with_overrides(overrides));
    }

    /// The current snapshot. Hold on to it for the duration of one request so
    /// every check in that request agrees.
    pub fn snapshot(&self) -> Arc<MatrixSnapshot> {
        Arc::clone(&self.current.read())
    }

    pub fn storage_key(&self) -> &str {
        &self.key
    }

    pub fn storage(&self) -> &Arc<dyn KeyValueStore> {
        &self.storage
    }

    pub fn has_permission(&self, role: &str, module: &str, kind: PermissionKind) -> bool {
        self.snapshot().has_permission(role, module, kind)
    }

    pub fn grant_count(&self, role: &str) -> usize {
        self.snapshot().grant_count(role)
    }

    /// Grant or revoke one kind on one cell for `role`.
    ///
    /// An untouched cell is first seeded with its default set, so toggling one
    /// kind keeps the other default kinds of that cell.
    ///
    /// # Errors
    /// - [`AuthzError::UnknownRole`] if `role` is not registered.
    /// - [`AuthzError::ProtectedRole`] if `role` is the protected role.
    /// - [`AuthzError::Unauthorized`] if `caller` lacks admin on the security module.
    /// - [`AuthzError::UnknownModule`] if `module` is not in the catalog.
    /// - [`AuthzError::Persistence`] if the write fails; nothing changes.
    pub async fn set_grant(
        &self,
        caller: &str,
        role: &str,
        module: &str,
        kind: PermissionKind,
        enabled: bool,
    ) -> AuthzResult<()> {
        let _guard = self.writer.lock().await;
        let current = self.snapshot();
        authorize_cell_edit(&current, caller, role, module)?;

        let seeded = current
            .overrides()
            .get(role, module)
            .unwrap_or_else(|| current.defaults().get(role, module));
        let mut overrides = current.overrides().clone();
        overrides.set(
            RoleId::new(role),
            ModuleId::new(module),
            seeded.with(kind, enabled),
        );

        self.commit(&current, overrides, "set_grant").await?;
        tracing::info!(caller, role, module, %kind, enabled, "permission grant updated");
        Ok(())
    }

    /// Revert one cell of `role` to "inherit default". Returns whether the
    /// cell had been overridden.
    pub async fn clear_cell(&self, caller: &str, role: &str, module: &str) -> AuthzResult<bool> {
        let _guard = self.writer.lock().await;
        let current = self.snapshot();
        authorize_cell_edit(&current, caller, role, module)?;

        let mut overrides = current.overrides().clone();
        if !overrides.clear_cell(role, module) {
            return Ok(false);
        }
        self.commit(&current, overrides, "clear_cell").await?;
        tracing::info!(caller, role, module, "permission cell reset to default");
        Ok(true)
    }

    /// Drop every override and persist an empty layer. Idempotent.
    pub async fn reset_to_defaults(&self, caller: &str) -> AuthzResult<()> {
        let _guard = self.writer.lock().await;
        let current = self.snapshot();
        authorize_editor(&current, caller)?;
        self.commit(&current, OverrideMatrix::new(), "reset").await?;
        tracing::info!(caller, "permission matrix reset to defaults");
        Ok(())
    }

    async fn commit(
        &self,
        current: &MatrixSnapshot,
        overrides: OverrideMatrix,
        op: &'static str,
    ) -> AuthzResult<()> {
        let encoded = overrides.to_json()?;
        if let Err(err) = self.storage.put(&self.key, Bytes::from(encoded)).await {
            metrics::counter!("sendero_permission_writes_total", "op" => op, "outcome" => "error")
                .increment(1);
            tracing::error!(error = %err, op, "failed to persist permission matrix; change rolled back");
            return Err(err.into());
        }
        metrics::counter!("sendero_permission_writes_total", "op" => op, "outcome" => "ok")
            .increment(1);
        record_override_cells(&overrides);
        self.publish(current.with_overrides(overrides));
        Ok(())
    }

    fn publish(&self, snapshot: MatrixSnapshot) {
        *self.current.write() = Arc::new(snapshot);
    }
}

fn authorize_editor(snapshot: &MatrixSnapshot, caller: &str) -> AuthzResult<()> {
    if snapshot.can_edit_permissions(caller) {
        Ok(())
    } else {
        Err(AuthzError::Unauthorized(caller.to_string()))
    }
}

fn authorize_cell_edit(
    snapshot: &MatrixSnapshot,
    caller: &str,
    role: &str,
    module: &str,
) -> AuthzResult<()> {
    if !snapshot.registry().contains(role) {
        return Err(AuthzError::UnknownRole(role.to_string()));
    }
    // Checked before the caller so the protected role is always reported as such.
    if snapshot.registry().is_protected(role) {
        return Err(AuthzError::ProtectedRole(role.to_string()));
    }
    authorize_editor(snapshot, caller)?;
    if !snapshot.catalog().contains(module) {
        return Err(AuthzError::UnknownModule(module.to_string()));
    }
    Ok(())
}

async fn read_overrides(
    storage: &dyn KeyValueStore,
    key: &str,
    registry: &RoleRegistry,
    catalog: &ModuleCatalog,
) -> OverrideMatrix {
    let data = match storage.get(key).await {
        Ok(Some(data)) => data,
        Ok(None) => return OverrideMatrix::new(),
        Err(err) => {
            tracing::warn!(error = %err, key, "permission overrides unreadable; using defaults");
            return OverrideMatrix::new();
        }
    };
    match OverrideMatrix::from_json(&data, registry, catalog) {
        Ok(overrides) => overrides,
        Err(err) => {
            tracing::warn!(error = %err, key, "permission overrides rejected; using defaults");
            OverrideMatrix::new()
        }
    }
}

fn record_override_cells(overrides: &OverrideMatrix) {
    metrics::gauge!("sendero_override_cells").set(overrides.cell_count() as f64);
}
