use anyhow::{Context, Result, bail};
use sendero_authz::{DEFAULT_MATRIX_KEY, MenuNode, builtin};
use serde::Deserialize;
use std::fs;
use std::net::SocketAddr;
use std::path::PathBuf;

pub const DEFAULT_BIND: &str = "0.0.0.0:8443";
pub const DEFAULT_METRICS_BIND: &str = "0.0.0.0:8080";
pub const DEFAULT_DATA_DIR: &str = "./data";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageBackend {
    Memory,
    File,
}

impl std::str::FromStr for StorageBackend {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "memory" => Ok(StorageBackend::Memory),
            "file" => Ok(StorageBackend::File),
            other => bail!("unknown storage backend {other:?} (expected memory or file)"),
        }
    }
}

// Console configuration sourced from environment variables.
#[derive(Debug, Clone)]
pub struct ConsoleConfig {
    pub bind_addr: SocketAddr,
    pub metrics_bind: SocketAddr,
    pub storage: StorageBackend,
    pub data_dir: PathBuf,
    pub matrix_key: String,
    /// YAML menu tree; the built-in sidebar is used when unset.
    pub menu_path: Option<PathBuf>,
}

#[derive(Debug, Deserialize)]
struct ConsoleConfigOverride {
    bind_addr: Option<String>,
    metrics_bind: Option<String>,
    storage: Option<StorageBackend>,
    data_dir: Option<PathBuf>,
    matrix_key: Option<String>,
    menu_path: Option<PathBuf>,
}

impl ConsoleConfig {
    pub fn from_env() -> Result<Self> {
        let bind_addr = std::env::var("SENDERO_BIND")
            .unwrap_or_else(|_| DEFAULT_BIND.to_string())
            .parse()
            .with_context(|| "parse SENDERO_BIND")?;
        let metrics_bind = std::env::var("SENDERO_METRICS_BIND")
            .unwrap_or_else(|_| DEFAULT_METRICS_BIND.to_string())
            .parse()
            .with_context(|| "parse SENDERO_METRICS_BIND")?;
        let storage = std::env::var("SENDERO_STORAGE")
            .unwrap_or_else(|_| "file".to_string())
            .parse()
            .with_context(|| "parse SENDERO_STORAGE")?;
        let data_dir = std::env::var("SENDERO_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_DATA_DIR));
        let matrix_key =
            std::env::var("SENDERO_MATRIX_KEY").unwrap_or_else(|_| DEFAULT_MATRIX_KEY.to_string());
        let menu_path = std::env::var("SENDERO_MENU_PATH").ok().map(PathBuf::from);
        Ok(Self {
            bind_addr,
            metrics_bind,
            storage,
            data_dir,
            matrix_key,
            menu_path,
        })
    }

    pub fn from_env_or_yaml() -> Result<Self> {
        let mut config = Self::from_env()?;
        if let Ok(path) = std::env::var("SENDERO_CONFIG") {
            let contents = fs::read_to_string(&path)
                .with_context(|| format!("read SENDERO_CONFIG: {path}"))?;
            config.apply_yaml(&contents)?;
        }
        Ok(config)
    }

    fn apply_yaml(&mut self, contents: &str) -> Result<()> {
        let override_cfg: ConsoleConfigOverride =
            serde_yaml::from_str(contents).with_context(|| "parse console config yaml")?;
        if let Some(value) = override_cfg.bind_addr {
            self.bind_addr = value.parse().with_context(|| "parse bind_addr")?;
        }
        if let Some(value) = override_cfg.metrics_bind {
            self.metrics_bind = value.parse().with_context(|| "parse metrics_bind")?;
        }
        if let Some(value) = override_cfg.storage {
            self.storage = value;
        }
        if let Some(value) = override_cfg.data_dir {
            self.data_dir = value;
        }
        if let Some(value) = override_cfg.matrix_key {
            self.matrix_key = value;
        }
        if let Some(value) = override_cfg.menu_path {
            self.menu_path = Some(value);
        }
        Ok(())
    }

    /// The navigation tree served by this instance.
    pub fn load_menu(&self) -> Result<Vec<MenuNode>> {
        let Some(path) = &self.menu_path else {
            return Ok(builtin::menu_tree());
        };
        let contents = fs::read_to_string(path)
            .with_context(|| format!("read menu tree: {}", path.display()))?;
        serde_yaml::from_str(&contents)
            .with_context(|| format!("parse menu tree: {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::io::Write;

    const VARS: [&str; 7] = [
        "SENDERO_BIND",
        "SENDERO_METRICS_BIND",
        "SENDERO_STORAGE",
        "SENDERO_DATA_DIR",
        "SENDERO_MATRIX_KEY",
        "SENDERO_MENU_PATH",
        "SENDERO_CONFIG",
    ];

    struct EnvGuard {
        saved: Vec<(&'static str, Option<String>)>,
    }

    impl EnvGuard {
        fn clean() -> Self {
            let saved = VARS
                .iter()
                .map(|key| (*key, std::env::var(key).ok()))
                .collect();
            for key in VARS {
                unsafe {
                    std::env::remove_var(key);
                }
            }
            Self { saved }
        }

        fn set(&self, key: &'static str, value: &str) {
            unsafe {
                std::env::set_var(key, value);
            }
        }
    }

    impl Drop for EnvGuard {
        fn drop(&mut self) {
            for (key, prev) in &self.saved {
                match prev {
                    Some(value) => unsafe {
                        std::env::set_var(key, value);
                    },
                    None => unsafe {
                        std::env::remove_var(key);
                    },
                }
            }
        }
    }

    #[test]
    #[serial]
    fn defaults_without_env() {
        let _env = EnvGuard::clean();
        let config = ConsoleConfig::from_env().expect("config");
        assert_eq!(config.bind_addr, DEFAULT_BIND.parse().expect("addr"));
        assert_eq!(config.metrics_bind, DEFAULT_METRICS_BIND.parse().expect("addr"));
        assert_eq!(config.storage, StorageBackend::File);
        assert_eq!(config.data_dir, PathBuf::from(DEFAULT_DATA_DIR));
        assert_eq!(config.matrix_key, DEFAULT_MATRIX_KEY);
        assert!(config.menu_path.is_none());
    }

    #[test]
    #[serial]
    fn env_values_are_parsed() {
        let env = EnvGuard::clean();
        env.set("SENDERO_BIND", "127.0.0.1:9000");
        env.set("SENDERO_STORAGE", "File");
        env.set("SENDERO_DATA_DIR", "/var/lib/sendero");
        env.set("SENDERO_MATRIX_KEY", "matrix-v2");
        let config = ConsoleConfig::from_env().expect("config");
        assert_eq!(config.bind_addr, "127.0.0.1:9000".parse().expect("addr"));
        assert_eq!(config.storage, StorageBackend::File);
        assert_eq!(config.data_dir, PathBuf::from("/var/lib/sendero"));
        assert_eq!(config.matrix_key, "matrix-v2");
    }

    #[test]
    #[serial]
    fn invalid_env_values_are_rejected() {
        let env = EnvGuard::clean();
        env.set("SENDERO_STORAGE", "postgres");
        let err = ConsoleConfig::from_env().expect_err("bad backend");
        assert!(format!("{err:#}").contains("SENDERO_STORAGE"));

        env.set("SENDERO_STORAGE", "memory");
        env.set("SENDERO_BIND", "not-an-addr");
        let err = ConsoleConfig::from_env().expect_err("bad bind");
        assert!(format!("{err:#}").contains("SENDERO_BIND"));
    }

    #[test]
    #[serial]
    fn yaml_file_overrides_env() {
        let env = EnvGuard::clean();
        let mut file = tempfile::NamedTempFile::new().expect("tempfile");
        writeln!(
            file,
            "bind_addr: 127.0.0.1:7000\nstorage: file\ndata_dir: /srv/sendero\nmenu_path: /etc/sendero/menu.yaml"
        )
        .expect("write");
        env.set("SENDERO_STORAGE", "memory");
        env.set("SENDERO_CONFIG", file.path().to_str().expect("utf8 path"));

        let config = ConsoleConfig::from_env_or_yaml().expect("config");
        assert_eq!(config.bind_addr, "127.0.0.1:7000".parse().expect("addr"));
        assert_eq!(config.storage, StorageBackend::File);
        assert_eq!(config.data_dir, PathBuf::from("/srv/sendero"));
        assert_eq!(
            config.menu_path,
            Some(PathBuf::from("/etc/sendero/menu.yaml"))
        );
        assert_eq!(config.matrix_key, DEFAULT_MATRIX_KEY);
    }

    #[test]
    #[serial]
    fn missing_yaml_file_is_an_error() {
        let env = EnvGuard::clean();
        env.set("SENDERO_CONFIG", "/nonexistent/sendero.yaml");
        let err = ConsoleConfig::from_env_or_yaml().expect_err("missing file");
        assert!(format!("{err:#}").contains("SENDERO_CONFIG"));
    }

    #[test]
    #[serial]
    fn menu_defaults_to_builtin_tree() {
        let _env = EnvGuard::clean();
        let config = ConsoleConfig::from_env().expect("config");
        assert_eq!(config.load_menu().expect("menu"), builtin::menu_tree());
    }

    #[test]
    #[serial]
    fn menu_loads_from_yaml() {
        let env = EnvGuard::clean();
        let mut file = tempfile::NamedTempFile::new().expect("tempfile");
        write!(
            file,
            r#"
- id: reportes
  label: Reportes
  route: /reportes
  required: {{ module: Reportes, kind: read }}
  children:
    - id: reportes.exportar
      label: Exportar
      route: /reportes/exportar
      required: {{ module: Reportes, kind: write }}
"#
        )
        .expect("write");
        env.set("SENDERO_MENU_PATH", file.path().to_str().expect("utf8 path"));
        let config = ConsoleConfig::from_env().expect("config");
        let menu = config.load_menu().expect("menu");
        assert_eq!(menu.len(), 1);
        assert_eq!(menu[0].children[0].route, "/reportes/exportar");
    }
}
