//! Layered settings resolution
//!
//! Sources are merged lowest to highest priority:
//!
//! 1. Built-in defaults (the schema's `Default` impls)
//! 2. `<config_dir>/settings.yaml`
//! 3. `<config_dir>/settings_<environment>.yaml`
//! 4. Caller-supplied overrides
//! 5. Process environment variables, applied last through figment's
//!    `Env` provider with the `__` nested delimiter
//!
//! The file tiers and caller overrides merge by successive top-level-key
//! replacement ("last write per exact key wins"), while the environment
//! tier overrides individual nested fields. The two strategies are
//! deliberately not unified; collapsing them into one deep merge would
//! change which values win.

use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use figment::providers::{Env, Serialized};
use figment::Figment;
use serde_json::{Map, Value};
use tracing::debug;

use super::error::ConfigError;
use super::schema::Settings;

/// Process variable selecting which environment-specific file to load.
pub const ENVIRONMENT_VAR: &str = "ENVIRONMENT";

/// Default project-relative directory searched for settings files.
pub const DEFAULT_CONFIG_DIR: &str = "config";

const BASE_FILE: &str = "settings.yaml";

/// Top-level field names recognized in the environment tier, plus the
/// sub-document prefixes usable with the `__` delimiter. Everything else
/// in the process environment is ignored.
const KNOWN_ENV_KEYS: &[&str] = &[
    "app_name",
    "version",
    "environment",
    "debug",
    "log_level",
    "log_file",
    "log_rotation",
    "log_max_size",
    "log_backup_count",
    "data_dir",
    "cache_dir",
    "temp_dir",
    "enable_metrics",
    "enable_profiling",
    "enable_caching",
    "db",
    "database",
    "redis",
    "api",
];

/// Produces validated [`Settings`] documents by merging the five source
/// tiers. Stateless between calls; each [`Resolver::resolve`] is one epoch.
#[derive(Debug, Clone)]
pub struct Resolver {
    config_dir: PathBuf,
    overrides: Map<String, Value>,
}

impl Default for Resolver {
    fn default() -> Self {
        Self::new()
    }
}

impl Resolver {
    pub fn new() -> Self {
        Self {
            config_dir: PathBuf::from(DEFAULT_CONFIG_DIR),
            overrides: Map::new(),
        }
    }

    pub fn with_config_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config_dir = dir.into();
        self
    }

    /// Add a caller-supplied override. Highest priority below the
    /// environment tier; replaces the whole top-level key.
    pub fn override_value(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.overrides.insert(key.into(), value.into());
        self
    }

    /// Perform a full resolution: merge, extract, validate, and create
    /// the required directories. All-or-nothing; no partially merged
    /// document ever escapes.
    pub fn resolve(&self) -> Result<Settings, ConfigError> {
        let mut merged = Map::new();

        let base = self.config_dir.join(BASE_FILE);
        merged.extend(load_yaml_mapping(&base)?);

        let env_name = env::var(ENVIRONMENT_VAR)
            .unwrap_or_else(|_| "development".to_string())
            .to_lowercase();
        let env_file = self.config_dir.join(format!("settings_{env_name}.yaml"));
        merged.extend(load_yaml_mapping(&env_file)?);

        merged.extend(self.overrides.clone());
        debug!(keys = merged.len(), environment = %env_name, "merged file and override tiers");

        let settings: Settings = Figment::new()
            .merge(Serialized::defaults(Value::Object(merged)))
            .merge(env_overrides())
            .extract()?;

        settings.validate()?;
        settings.ensure_directories()?;
        Ok(settings)
    }
}

/// The environment tier. Variable names are matched case-insensitively
/// against known field names; `PREFIX__FIELD` targets one field of a
/// sub-document (`DB` is accepted as an alias for `database`).
fn env_overrides() -> Env {
    Env::raw()
        .map(|key| {
            let key = key.as_str().to_ascii_lowercase();
            match key.strip_prefix("db__") {
                Some(rest) => format!("database__{rest}").into(),
                None => key.into(),
            }
        })
        .filter(|key| {
            let key = key.as_str();
            let head = key.split("__").next().unwrap_or(key);
            KNOWN_ENV_KEYS.iter().any(|known| head.eq_ignore_ascii_case(known))
        })
        .split("__")
}

/// Load one file tier as a top-level mapping. A missing file contributes
/// nothing; a present but unparsable file is an error.
fn load_yaml_mapping(path: &Path) -> Result<Map<String, Value>, ConfigError> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Map::new()),
        Err(source) => {
            return Err(ConfigError::Read {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    let value: Value = serde_yaml::from_str(&content).map_err(|source| ConfigError::Malformed {
        path: path.to_path_buf(),
        source,
    })?;

    match value {
        Value::Null => Ok(Map::new()),
        Value::Object(map) => {
            debug!(path = %path.display(), keys = map.len(), "loaded config file");
            Ok(map)
        }
        _ => Err(ConfigError::NotAMapping {
            path: path.to_path_buf(),
        }),
    }
}
