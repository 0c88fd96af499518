//! Typed settings schema
//!
//! `Settings` is the resolved, validated configuration snapshot. It is
//! immutable for the lifetime of an epoch except for the open-ended
//! custom-settings mapping. Construction has one filesystem side effect:
//! the data/cache/temp directories (and the log file's parent, if any)
//! are created if absent.

use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use super::error::ConfigError;

/// The disallowed default secret key. Explicitly configuring this literal
/// fails validation; leaving the key unset does not.
pub const PLACEHOLDER_SECRET_KEY: &str = "your-secret-key-here";

/// Database URL returned by [`Settings::database_url`] in the testing
/// environment, regardless of what was configured.
pub const TESTING_DATABASE_URL: &str = "sqlite:///./test.db";

const MIN_SECRET_KEY_LEN: usize = 32;

/// Application environment tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Development,
    Staging,
    Production,
    Testing,
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Development => "development",
            Environment::Staging => "staging",
            Environment::Production => "production",
            Environment::Testing => "testing",
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Environment {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "development" => Ok(Environment::Development),
            "staging" => Ok(Environment::Staging),
            "production" => Ok(Environment::Production),
            "testing" => Ok(Environment::Testing),
            other => Err(ConfigError::validation(
                "environment",
                format!("unknown environment '{other}' (expected development, staging, production, or testing)"),
            )),
        }
    }
}

impl<'de> Deserialize<'de> for Environment {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Logging verbosity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Debug,
    Info,
    Warning,
    Error,
    Critical,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warning => "warning",
            LogLevel::Error => "error",
            LogLevel::Critical => "critical",
        }
    }

    /// Map to the nearest `tracing` level. `tracing` has no CRITICAL, so
    /// critical collapses to ERROR.
    pub fn as_tracing_level(&self) -> tracing::Level {
        match self {
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Warning => tracing::Level::WARN,
            LogLevel::Error | LogLevel::Critical => tracing::Level::ERROR,
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LogLevel {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warning" => Ok(LogLevel::Warning),
            "error" => Ok(LogLevel::Error),
            "critical" => Ok(LogLevel::Critical),
            other => Err(ConfigError::validation(
                "log_level",
                format!("unknown log level '{other}' (expected debug, info, warning, error, or critical)"),
            )),
        }
    }
}

impl<'de> Deserialize<'de> for LogLevel {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Database sub-document.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub url: String,
    pub pool_size: u32,
    pub max_overflow: u32,
    pub echo: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite:///./app.db".to_string(),
            pool_size: 5,
            max_overflow: 10,
            echo: false,
        }
    }
}

impl DatabaseConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.pool_size == 0 {
            return Err(ConfigError::validation("database.pool_size", "must be at least 1"));
        }
        Ok(())
    }
}

/// Redis sub-document.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RedisConfig {
    pub url: String,
    pub max_connections: u32,
    pub socket_timeout: f64,
}

impl Default for RedisConfig {
    fn default() -> Self {
        Self {
            url: "redis://localhost:6379/0".to_string(),
            max_connections: 20,
            socket_timeout: 5.0,
        }
    }
}

impl RedisConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_connections == 0 {
            return Err(ConfigError::validation("redis.max_connections", "must be at least 1"));
        }
        if self.socket_timeout <= 0.0 {
            return Err(ConfigError::validation("redis.socket_timeout", "must be greater than zero"));
        }
        Ok(())
    }
}

/// API server sub-document.
///
/// `secret_key` is `None` until some source provides one; the constraint
/// checks only run against explicitly-provided values, so a document with
/// an untouched default still resolves. The accessor papers over the
/// difference by returning the placeholder.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub host: String,
    pub port: u16,
    pub debug: bool,
    pub reload: bool,
    pub workers: u32,
    #[serde(serialize_with = "serialize_secret_key")]
    pub secret_key: Option<String>,
    pub allowed_hosts: Vec<String>,
    pub cors_origins: Vec<String>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 8000,
            debug: false,
            reload: false,
            workers: 1,
            secret_key: None,
            allowed_hosts: vec!["*".to_string()],
            cors_origins: Vec::new(),
        }
    }
}

impl ApiConfig {
    /// The effective secret key: the configured value, or the placeholder
    /// when nothing was provided.
    pub fn secret_key(&self) -> &str {
        self.secret_key.as_deref().unwrap_or(PLACEHOLDER_SECRET_KEY)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(key) = self.secret_key.as_deref() {
            if key == PLACEHOLDER_SECRET_KEY {
                return Err(ConfigError::validation(
                    "api.secret_key",
                    "the placeholder secret key must be replaced with a real one",
                ));
            }
            if key.len() < MIN_SECRET_KEY_LEN {
                return Err(ConfigError::validation(
                    "api.secret_key",
                    format!("must be at least {MIN_SECRET_KEY_LEN} characters long"),
                ));
            }
        }
        if self.port == 0 {
            return Err(ConfigError::validation("api.port", "must be between 1 and 65535"));
        }
        if self.workers == 0 {
            return Err(ConfigError::validation("api.workers", "must be at least 1"));
        }
        Ok(())
    }
}

fn serialize_secret_key<S: Serializer>(key: &Option<String>, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(key.as_deref().unwrap_or(PLACEHOLDER_SECRET_KEY))
}

/// The resolved configuration snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // Application identity
    pub app_name: String,
    pub version: String,
    pub environment: Environment,
    pub debug: bool,

    // Logging
    pub log_level: LogLevel,
    pub log_file: Option<PathBuf>,
    pub log_rotation: bool,
    pub log_max_size: String,
    pub log_backup_count: u32,

    // Directories (guaranteed to exist after resolution)
    pub data_dir: PathBuf,
    pub cache_dir: PathBuf,
    pub temp_dir: PathBuf,

    // Feature flags
    pub enable_metrics: bool,
    pub enable_profiling: bool,
    pub enable_caching: bool,

    // Sub-documents
    pub database: DatabaseConfig,
    pub redis: RedisConfig,
    pub api: ApiConfig,

    /// Open-ended settings, mutable at runtime.
    pub custom_settings: BTreeMap<String, Value>,

    /// Unknown top-level keys from any source are retained, not rejected.
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            app_name: "Rust Template".to_string(),
            version: "0.1.0".to_string(),
            environment: Environment::Development,
            debug: false,
            log_level: LogLevel::Info,
            log_file: None,
            log_rotation: true,
            log_max_size: "10MB".to_string(),
            log_backup_count: 5,
            data_dir: PathBuf::from("data"),
            cache_dir: PathBuf::from("cache"),
            temp_dir: PathBuf::from("tmp"),
            enable_metrics: false,
            enable_profiling: false,
            enable_caching: true,
            database: DatabaseConfig::default(),
            redis: RedisConfig::default(),
            api: ApiConfig::default(),
            custom_settings: BTreeMap::new(),
            extra: BTreeMap::new(),
        }
    }
}

impl Settings {
    pub fn is_development(&self) -> bool {
        self.environment == Environment::Development
    }

    pub fn is_production(&self) -> bool {
        self.environment == Environment::Production
    }

    pub fn is_testing(&self) -> bool {
        self.environment == Environment::Testing
    }

    /// The database URL, with the testing override applied at read time.
    pub fn database_url(&self) -> &str {
        if self.is_testing() {
            TESTING_DATABASE_URL
        } else {
            &self.database.url
        }
    }

    pub fn custom(&self, key: &str) -> Option<&Value> {
        self.custom_settings.get(key)
    }

    pub fn custom_or(&self, key: &str, default: Value) -> Value {
        self.custom(key).cloned().unwrap_or(default)
    }

    pub fn set_custom(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.custom_settings.insert(key.into(), value.into());
    }

    /// Serialize the whole document to a generic JSON mapping.
    pub fn to_map(&self) -> Result<Value, ConfigError> {
        Ok(serde_json::to_value(self)?)
    }

    /// Run the cross-field constraint checks that the schema types cannot
    /// express on their own.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.database.validate()?;
        self.redis.validate()?;
        self.api.validate()?;
        Ok(())
    }

    /// Create the data/cache/temp directories and the log file's parent.
    /// Idempotent; called once per resolution.
    pub fn ensure_directories(&self) -> Result<(), ConfigError> {
        let mut dirs: Vec<&Path> = vec![&self.data_dir, &self.cache_dir, &self.temp_dir];
        if let Some(parent) = self.log_file.as_deref().and_then(Path::parent) {
            if !parent.as_os_str().is_empty() {
                dirs.push(parent);
            }
        }
        for dir in dirs {
            fs::create_dir_all(dir).map_err(|source| ConfigError::CreateDir {
                path: dir.to_path_buf(),
                source,
            })?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.app_name, "Rust Template");
        assert_eq!(settings.version, "0.1.0");
        assert_eq!(settings.environment, Environment::Development);
        assert!(!settings.debug);
        assert_eq!(settings.log_level, LogLevel::Info);
        assert_eq!(settings.data_dir, PathBuf::from("data"));
        assert!(settings.enable_caching);
    }

    #[test]
    fn test_sub_document_defaults() {
        let db = DatabaseConfig::default();
        assert_eq!(db.url, "sqlite:///./app.db");
        assert_eq!(db.pool_size, 5);
        assert_eq!(db.max_overflow, 10);
        assert!(!db.echo);

        let redis = RedisConfig::default();
        assert_eq!(redis.url, "redis://localhost:6379/0");
        assert_eq!(redis.max_connections, 20);
        assert_eq!(redis.socket_timeout, 5.0);

        let api = ApiConfig::default();
        assert_eq!(api.host, "localhost");
        assert_eq!(api.port, 8000);
        assert_eq!(api.workers, 1);
        assert_eq!(api.allowed_hosts, vec!["*".to_string()]);
        assert!(api.cors_origins.is_empty());
    }

    #[test]
    fn test_environment_predicates() {
        let mut settings = Settings::default();
        assert!(settings.is_development());
        assert!(!settings.is_production());
        assert!(!settings.is_testing());

        settings.environment = Environment::Production;
        assert!(!settings.is_development());
        assert!(settings.is_production());

        settings.environment = Environment::Testing;
        assert!(settings.is_testing());
    }

    #[test]
    fn test_environment_parses_case_insensitively() {
        assert_eq!("PRODUCTION".parse::<Environment>().unwrap(), Environment::Production);
        assert_eq!("Staging".parse::<Environment>().unwrap(), Environment::Staging);
        assert!("qa".parse::<Environment>().is_err());
    }

    #[test]
    fn test_log_level_parses_case_insensitively() {
        assert_eq!("WARNING".parse::<LogLevel>().unwrap(), LogLevel::Warning);
        assert_eq!("critical".parse::<LogLevel>().unwrap(), LogLevel::Critical);
        assert!("trace".parse::<LogLevel>().is_err());
    }

    #[test]
    fn test_database_url_testing_override() {
        let mut settings = Settings::default();
        settings.database.url = "postgresql://real/db".to_string();
        assert_eq!(settings.database_url(), "postgresql://real/db");

        settings.environment = Environment::Testing;
        assert_eq!(settings.database_url(), TESTING_DATABASE_URL);
    }

    #[test]
    fn test_custom_settings() {
        let mut settings = Settings::default();
        settings.set_custom("batch_size", 250);
        assert_eq!(settings.custom("batch_size"), Some(&Value::from(250)));
        assert_eq!(
            settings.custom_or("missing", Value::from("fallback")),
            Value::from("fallback")
        );
    }

    #[test]
    fn test_secret_key_unset_is_allowed() {
        let api = ApiConfig::default();
        assert!(api.validate().is_ok());
        assert_eq!(api.secret_key(), PLACEHOLDER_SECRET_KEY);
    }

    #[test]
    fn test_secret_key_placeholder_rejected() {
        let api = ApiConfig {
            secret_key: Some(PLACEHOLDER_SECRET_KEY.to_string()),
            ..ApiConfig::default()
        };
        let err = api.validate().unwrap_err();
        assert!(err.to_string().contains("api.secret_key"));
        assert!(err.to_string().contains("placeholder"));
    }

    #[test]
    fn test_secret_key_too_short_rejected() {
        let api = ApiConfig {
            secret_key: Some("short".to_string()),
            ..ApiConfig::default()
        };
        let err = api.validate().unwrap_err();
        assert!(err.to_string().contains("api.secret_key"));
        assert!(err.to_string().contains("32"));
    }

    #[test]
    fn test_secret_key_valid_accepted() {
        let api = ApiConfig {
            secret_key: Some("a".repeat(32)),
            ..ApiConfig::default()
        };
        assert!(api.validate().is_ok());
        assert_eq!(api.secret_key().len(), 32);
    }

    #[test]
    fn test_port_zero_rejected() {
        let api = ApiConfig { port: 0, ..ApiConfig::default() };
        let err = api.validate().unwrap_err();
        assert!(err.to_string().contains("api.port"));
    }

    #[test]
    fn test_workers_zero_rejected() {
        let api = ApiConfig { workers: 0, ..ApiConfig::default() };
        assert!(api.validate().unwrap_err().to_string().contains("api.workers"));
    }

    #[test]
    fn test_pool_size_zero_rejected() {
        let db = DatabaseConfig { pool_size: 0, ..DatabaseConfig::default() };
        assert!(db.validate().unwrap_err().to_string().contains("database.pool_size"));
    }

    #[test]
    fn test_socket_timeout_zero_rejected() {
        let redis = RedisConfig { socket_timeout: 0.0, ..RedisConfig::default() };
        assert!(redis.validate().unwrap_err().to_string().contains("redis.socket_timeout"));
    }

    #[test]
    fn test_to_map_round_trip() {
        let mut settings = Settings::default();
        settings.set_custom("batch_size", 42);
        let map = settings.to_map().expect("serialize");

        assert_eq!(map["app_name"], Value::from("Rust Template"));
        assert_eq!(map["environment"], Value::from("development"));
        assert_eq!(map["log_level"], Value::from("info"));
        assert_eq!(map["database"]["pool_size"], Value::from(5));
        assert_eq!(map["api"]["port"], Value::from(8000));
        // The unset secret key serializes as the effective placeholder.
        assert_eq!(map["api"]["secret_key"], Value::from(PLACEHOLDER_SECRET_KEY));
        assert_eq!(map["custom_settings"]["batch_size"], Value::from(42));
    }

    #[test]
    fn test_unknown_keys_survive_serialization() {
        let mut settings = Settings::default();
        settings.extra.insert("deploy_region".to_string(), Value::from("eu-west-1"));
        let map = settings.to_map().expect("serialize");
        assert_eq!(map["deploy_region"], Value::from("eu-west-1"));
    }
}
