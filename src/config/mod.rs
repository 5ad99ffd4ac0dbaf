//! Layered configuration.
//!
//! Precedence, highest first:
//!
//! 1. CLI flags
//! 2. Environment (`TASKBOARD_PORT`, `TASKBOARD_SERVER_URL`, ...)
//! 3. Project file: `./taskboard.yaml`, or the file named by `--config`
//! 4. User file: `~/.config/taskboard/config.yaml`
//! 5. Built-in defaults
//!
//! Each source becomes a flat [`ConfigLayer`]; layers are merged and the
//! result is resolved into typed [`Settings`].

use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::error::{Result, TaskError};
use crate::logging::LogFormat;
use crate::model::DEFAULT_PAGE_SIZE;
use crate::storage::StorageKind;

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 5080;
pub const DEFAULT_DB_FILENAME: &str = "taskboard.db";
pub const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:5080";
pub const PROJECT_CONFIG_FILENAME: &str = "taskboard.yaml";

const ENV_PREFIX: &str = "TASKBOARD_";

/// Every key the resolver understands.
pub const KNOWN_KEYS: &[&str] = &[
    "host",
    "port",
    "storage",
    "db",
    "server-url",
    "page-size",
    "log-format",
];

/// One source of configuration: normalized key to raw value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigLayer {
    pub values: BTreeMap<String, String>,
}

impl ConfigLayer {
    /// Set a key, normalizing its spelling (`page_size` and `PAGE-SIZE`
    /// both become `page-size`).
    pub fn set(&mut self, key: &str, value: impl Into<String>) {
        self.values.insert(normalize_key(key), value.into());
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(&normalize_key(key)).map(String::as_str)
    }

    /// Overlay `other`; its keys replace ours.
    pub fn merge_from(&mut self, other: &Self) {
        for (key, value) in &other.values {
            self.values.insert(key.clone(), value.clone());
        }
    }

    /// Fold `layers` left to right, so later layers win.
    #[must_use]
    pub fn merge_layers(layers: &[Self]) -> Self {
        let mut merged = Self::default();
        for layer in layers {
            merged.merge_from(layer);
        }
        merged
    }

    /// Read a YAML mapping of scalar keys. A missing file is an empty layer.
    ///
    /// # Errors
    ///
    /// Fails when the file exists but is unreadable or not YAML.
    pub fn from_yaml(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        debug!(path = %path.display(), "Loading config file");
        let contents = fs::read_to_string(path)?;
        Self::from_yaml_str(&contents)
    }

    /// Build a layer from YAML text. Only top-level scalars are read.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not valid YAML or not a mapping.
    pub fn from_yaml_str(contents: &str) -> Result<Self> {
        let value: serde_yaml::Value = serde_yaml::from_str(contents)?;
        let mut layer = Self::default();
        match value {
            serde_yaml::Value::Null => {}
            serde_yaml::Value::Mapping(map) => {
                for (key, value) in map {
                    let Some(key) = key.as_str() else {
                        continue;
                    };
                    if let Some(value) = yaml_scalar_to_string(&value) {
                        layer.set(key, value);
                    }
                }
            }
            _ => {
                return Err(TaskError::Config(
                    "config file must be a mapping of key: value".to_string(),
                ));
            }
        }
        Ok(layer)
    }

    /// Build a layer from the process environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_vars(env::vars())
    }

    /// Build a layer from `TASKBOARD_*` pairs; other names are ignored.
    #[must_use]
    pub fn from_vars<I>(vars: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut layer = Self::default();
        for (name, value) in vars {
            if let Some(key) = name.strip_prefix(ENV_PREFIX) {
                layer.set(key, value);
            }
        }
        layer
    }
}

/// Values given on the command line.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub storage: Option<String>,
    pub db: Option<PathBuf>,
    pub server_url: Option<String>,
    pub page_size: Option<u32>,
    pub log_format: Option<String>,
}

impl CliOverrides {
    #[must_use]
    pub fn as_layer(&self) -> ConfigLayer {
        let mut layer = ConfigLayer::default();
        if let Some(host) = &self.host {
            layer.set("host", host.clone());
        }
        if let Some(port) = self.port {
            layer.set("port", port.to_string());
        }
        if let Some(storage) = &self.storage {
            layer.set("storage", storage.clone());
        }
        if let Some(db) = &self.db {
            layer.set("db", db.to_string_lossy());
        }
        if let Some(url) = &self.server_url {
            layer.set("server-url", url.clone());
        }
        if let Some(size) = self.page_size {
            layer.set("page-size", size.to_string());
        }
        if let Some(format) = &self.log_format {
            layer.set("log-format", format.clone());
        }
        layer
    }
}

/// Built-in defaults, the bottom layer.
#[must_use]
pub fn default_config_layer() -> ConfigLayer {
    let mut layer = ConfigLayer::default();
    layer.set("host", DEFAULT_HOST);
    layer.set("port", DEFAULT_PORT.to_string());
    layer.set("storage", StorageKind::Memory.as_str());
    layer.set("db", DEFAULT_DB_FILENAME);
    layer.set("server-url", DEFAULT_SERVER_URL);
    layer.set("page-size", DEFAULT_PAGE_SIZE.to_string());
    layer
}

/// Load user config (`~/.config/taskboard/config.yaml`).
///
/// # Errors
///
/// Fails when the file exists but is unreadable or not YAML.
pub fn load_user_config() -> Result<ConfigLayer> {
    let Ok(home) = env::var("HOME") else {
        return Ok(ConfigLayer::default());
    };
    let path = Path::new(&home)
        .join(".config")
        .join("taskboard")
        .join("config.yaml");
    ConfigLayer::from_yaml(&path)
}

/// Load project config: `explicit` if given (it must exist), otherwise
/// `./taskboard.yaml` when present.
///
/// # Errors
///
/// Returns an error if an explicit file is missing, or any file cannot be
/// read or parsed.
pub fn load_project_config(explicit: Option<&Path>) -> Result<ConfigLayer> {
    match explicit {
        Some(path) if !path.exists() => Err(TaskError::Config(format!(
            "config file not found: {}",
            path.display()
        ))),
        Some(path) => ConfigLayer::from_yaml(path),
        None => ConfigLayer::from_yaml(Path::new(PROJECT_CONFIG_FILENAME)),
    }
}

/// Load and merge every layer.
///
/// # Errors
///
/// Fails when any config file is unreadable or not YAML.
pub fn load_config(config_path: Option<&Path>, cli: &CliOverrides) -> Result<ConfigLayer> {
    Ok(ConfigLayer::merge_layers(&[
        default_config_layer(),
        load_user_config()?,
        load_project_config(config_path)?,
        ConfigLayer::from_env(),
        cli.as_layer(),
    ]))
}

/// Fully resolved, typed configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub host: String,
    pub port: u16,
    pub storage: StorageKind,
    pub db_path: PathBuf,
    pub server_url: String,
    pub page_size: u32,
    pub log_format: Option<LogFormat>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            storage: StorageKind::Memory,
            db_path: PathBuf::from(DEFAULT_DB_FILENAME),
            server_url: DEFAULT_SERVER_URL.to_string(),
            page_size: DEFAULT_PAGE_SIZE,
            log_format: None,
        }
    }
}

impl Settings {
    /// Resolve a merged layer. Absent keys take their defaults.
    ///
    /// # Errors
    ///
    /// Returns a `Config` error naming the first invalid value.
    pub fn from_layer(layer: &ConfigLayer) -> Result<Self> {
        for key in layer.values.keys() {
            if !KNOWN_KEYS.contains(&key.as_str()) {
                warn!(key, "Ignoring unknown config key");
            }
        }

        let defaults = Self::default();
        let port = match non_empty(layer, "port") {
            None => defaults.port,
            Some(raw) => raw
                .parse::<u16>()
                .map_err(|_| invalid("port", raw, "expected a number from 0 to 65535"))?,
        };
        let page_size = match non_empty(layer, "page-size") {
            None => defaults.page_size,
            Some(raw) => match raw.parse::<u32>() {
                Ok(size) if size >= 1 => size,
                _ => return Err(invalid("page-size", raw, "expected a positive number")),
            },
        };

        Ok(Self {
            host: non_empty(layer, "host").map_or(defaults.host, str::to_string),
            port,
            storage: non_empty(layer, "storage")
                .map(str::parse::<StorageKind>)
                .transpose()?
                .unwrap_or(defaults.storage),
            db_path: non_empty(layer, "db").map_or(defaults.db_path, PathBuf::from),
            server_url: non_empty(layer, "server-url")
                .map_or(defaults.server_url, str::to_string),
            page_size,
            log_format: non_empty(layer, "log-format")
                .map(str::parse::<LogFormat>)
                .transpose()?,
        })
    }

    /// `host:port` for binding the server.
    #[must_use]
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn non_empty<'a>(layer: &'a ConfigLayer, key: &str) -> Option<&'a str> {
    layer.get(key).map(str::trim).filter(|v| !v.is_empty())
}

fn invalid(key: &str, value: &str, expected: &str) -> TaskError {
    TaskError::Config(format!("invalid {key} '{value}': {expected}"))
}

fn normalize_key(key: &str) -> String {
    key.trim().to_lowercase().replace('_', "-")
}

fn yaml_scalar_to_string(value: &serde_yaml::Value) -> Option<String> {
    match value {
        serde_yaml::Value::Bool(v) => Some(v.to_string()),
        serde_yaml::Value::Number(n) => Some(n.to_string()),
        serde_yaml::Value::String(s) => Some(s.clone()),
        serde_yaml::Value::Null
        | serde_yaml::Value::Sequence(_)
        | serde_yaml::Value::Mapping(_) => None,
        serde_yaml::Value::Tagged(tagged) => yaml_scalar_to_string(&tagged.value),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn layer(pairs: &[(&str, &str)]) -> ConfigLayer {
        let mut layer = ConfigLayer::default();
        for (key, value) in pairs {
            layer.set(key, *value);
        }
        layer
    }

    #[test]
    fn defaults_resolve() {
        let settings = Settings::from_layer(&default_config_layer()).unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.bind_address(), "127.0.0.1:5080");
    }

    #[test]
    fn precedence_full_chain() {
        let user = layer(&[("port", "6000"), ("host", "0.0.0.0")]);
        let project = layer(&[("port", "7000"), ("storage", "sqlite")]);
        let env_layer = ConfigLayer::from_vars([
            ("TASKBOARD_PORT".to_string(), "8000".to_string()),
            ("TASKBOARD_PAGE_SIZE".to_string(), "25".to_string()),
            ("HOME".to_string(), "/nowhere".to_string()),
        ]);
        let cli = CliOverrides {
            port: Some(9000),
            ..CliOverrides::default()
        }
        .as_layer();

        let merged =
            ConfigLayer::merge_layers(&[default_config_layer(), user, project, env_layer, cli]);
        let settings = Settings::from_layer(&merged).unwrap();
        assert_eq!(settings.port, 9000);
        assert_eq!(settings.host, "0.0.0.0");
        assert_eq!(settings.storage, StorageKind::Sqlite);
        assert_eq!(settings.page_size, 25);
    }

    #[test]
    fn env_keys_are_normalized() {
        let env_layer = ConfigLayer::from_vars([(
            "TASKBOARD_SERVER_URL".to_string(),
            "http://tasks.local".to_string(),
        )]);
        assert_eq!(env_layer.get("server-url"), Some("http://tasks.local"));
        assert_eq!(env_layer.get("server_url"), Some("http://tasks.local"));
    }

    #[test]
    fn invalid_values_are_config_errors() {
        for (key, value) in [
            ("port", "99999"),
            ("page-size", "0"),
            ("storage", "redis"),
            ("log-format", "xml"),
        ] {
            let err = Settings::from_layer(&layer(&[(key, value)])).unwrap_err();
            assert!(matches!(err, TaskError::Config(_)), "{key}={value}: {err}");
        }
    }

    #[test]
    fn yaml_layer_reads_scalars() {
        let parsed = ConfigLayer::from_yaml_str("port: 5081\nlog_format: json\nstorage: sqlite\n")
            .unwrap();
        let settings = Settings::from_layer(&parsed).unwrap();
        assert_eq!(settings.port, 5081);
        assert_eq!(settings.log_format, Some(LogFormat::Json));
        assert!(ConfigLayer::from_yaml_str("- just\n- a list\n").is_err());
        assert_eq!(ConfigLayer::from_yaml_str("").unwrap(), ConfigLayer::default());
    }

    #[test]
    fn project_config_from_explicit_path() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("custom.yaml");
        fs::write(&path, "db: /tmp/tasks.db\n").unwrap();

        let loaded = load_project_config(Some(&path)).unwrap();
        assert_eq!(loaded.get("db"), Some("/tmp/tasks.db"));

        let missing = temp.path().join("missing.yaml");
        assert!(matches!(
            load_project_config(Some(&missing)),
            Err(TaskError::Config(_))
        ));
    }
}
