#![allow(dead_code)]

use async_trait::async_trait;
use bytes::Bytes;
use console::app::{AppState, build_router};
use sendero_authz::{DEFAULT_MATRIX_KEY, PermissionStore, builtin};
use sendero_storage::{KeyValueStore, MemoryStore, StorageError};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

pub type TestApp = axum::routing::RouterIntoService<axum::body::Body, ()>;

pub async fn read_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    serde_json::from_slice(&bytes).expect("json")
}

pub async fn state_with_storage(storage: Arc<dyn KeyValueStore>) -> AppState {
    let registry = Arc::new(builtin::role_registry().expect("registry"));
    let catalog = Arc::new(builtin::module_catalog().expect("catalog"));
    let defaults = Arc::new(builtin::default_matrix(&registry, &catalog).expect("defaults"));
    let permissions =
        PermissionStore::load(storage, DEFAULT_MATRIX_KEY, registry, catalog, defaults).await;
    AppState {
        api_version: "v1".to_string(),
        permissions: Arc::new(permissions),
        menu: Arc::new(builtin::menu_tree()),
    }
}

pub async fn app_with_storage(storage: Arc<dyn KeyValueStore>) -> TestApp {
    build_router(state_with_storage(storage).await).into_service()
}

pub async fn memory_app() -> TestApp {
    app_with_storage(Arc::new(MemoryStore::new())).await
}

/// Memory store whose writes and health checks can be switched to fail.
#[derive(Default)]
pub struct FlakyStore {
    pub inner: MemoryStore,
    pub failing: AtomicBool,
}

impl FlakyStore {
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    fn check(&self) -> sendero_storage::Result<()> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(StorageError::Io(std::io::Error::other("disk full")));
        }
        Ok(())
    }
}

#[async_trait]
impl KeyValueStore for FlakyStore {
    async fn get(&self, key: &str) -> sendero_storage::Result<Option<Bytes>> {
        self.inner.get(key).await
    }

    async fn put(&self, key: &str, value: Bytes) -> sendero_storage::Result<()> {
        self.check()?;
        self.inner.put(key, value).await
    }

    async fn delete(&self, key: &str) -> sendero_storage::Result<()> {
        self.check()?;
        self.inner.delete(key).await
    }

    async fn health_check(&self) -> sendero_storage::Result<()> {
        self.check()
    }

    fn is_durable(&self) -> bool {
        false
    }

    fn backend_name(&self) -> &'static str {
        "flaky"
    }
}
