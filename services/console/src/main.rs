//! Sendero console HTTP service entry point.
//!
//! # Purpose
//! Wires configuration, storage, the permission matrix store and the HTTP
//! router, then serves the console API and the metrics endpoint.
use console::app::{SERVICE_NAME, build_router, build_state};
use console::config::ConsoleConfig;
use console::observability;
use sendero_authz::PermissionStore;
use std::future::Future;
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ConsoleConfig::from_env_or_yaml()?;
    run_with_shutdown(config, async {
        let _ = tokio::signal::ctrl_c().await;
    })
    .await
}

async fn run_with_shutdown<F>(config: ConsoleConfig, shutdown: F) -> anyhow::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let metrics_handle = observability::init_observability(SERVICE_NAME)?;
    let state = build_state(&config).await?;
    let metrics_task = tokio::spawn(observability::serve_metrics(
        metrics_handle,
        config.metrics_bind,
    ));

    #[cfg(unix)]
    let reload_task = tokio::spawn(reload_on_hangup(Arc::clone(&state.permissions)));

    let app = build_router(state);
    let addr = config.bind_addr;
    tracing::info!(%addr, storage = ?config.storage, "console listening");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tokio::pin!(shutdown);
    tokio::select! {
        result = axum::serve(listener, app.into_make_service()) => {
            result?;
        }
        _ = &mut shutdown => {}
    }

    metrics_task.abort();
    let _ = metrics_task.await;
    #[cfg(unix)]
    {
        reload_task.abort();
        let _ = reload_task.await;
    }
    Ok(())
}

// SIGHUP re-reads overrides written by another instance or an operator.
#[cfg(unix)]
async fn reload_on_hangup(permissions: Arc<PermissionStore>) {
    use tokio::signal::unix::{SignalKind, signal};

    let mut hangups = match signal(SignalKind::hangup()) {
        Ok(stream) => stream,
        Err(err) => {
            tracing::warn!(error = %err, "SIGHUP reload disabled");
            return;
        }
    };
    while hangups.recv().await.is_some() {
        permissions.reload().await;
        tracing::info!(
            key = permissions.storage_key(),
            "permission overrides reloaded"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use console::config::StorageBackend;
    use sendero_authz::DEFAULT_MATRIX_KEY;
    use serial_test::serial;

    fn config(storage: StorageBackend, data_dir: &std::path::Path) -> ConsoleConfig {
        ConsoleConfig {
            bind_addr: "127.0.0.1:0".parse().expect("bind"),
            metrics_bind: "127.0.0.1:0".parse().expect("metrics"),
            storage,
            data_dir: data_dir.to_path_buf(),
            matrix_key: DEFAULT_MATRIX_KEY.to_string(),
            menu_path: None,
        }
    }

    #[tokio::test]
    #[serial]
    async fn run_with_shutdown_starts_and_stops_with_memory_storage() {
        let dir = tempfile::tempdir().expect("tempdir");
        run_with_shutdown(config(StorageBackend::Memory, dir.path()), async {
            tokio::time::sleep(std::time::Duration::from_millis(100)).await;
        })
        .await
        .expect("run should stop cleanly");
    }

    #[tokio::test]
    #[serial]
    async fn run_with_shutdown_starts_and_stops_with_file_storage() {
        let dir = tempfile::tempdir().expect("tempdir");
        run_with_shutdown(config(StorageBackend::File, dir.path()), async {
            tokio::time::sleep(std::time::Duration::from_millis(100)).await;
        })
        .await
        .expect("run should stop cleanly");
    }
}
