//! Layered configuration resolution
//!
//! Settings are merged from built-in defaults, two optional YAML files
//! (base and environment-specific), caller-supplied overrides, and process
//! environment variables, in that priority order. The resolved document is
//! validated once, cached in a [`SettingsStore`], and replaced wholesale
//! on reload.

pub mod error;
pub mod resolver;
pub mod schema;
pub mod store;

pub use error::ConfigError;
pub use resolver::{Resolver, DEFAULT_CONFIG_DIR, ENVIRONMENT_VAR};
pub use schema::{
    ApiConfig, DatabaseConfig, Environment, LogLevel, RedisConfig, Settings,
    PLACEHOLDER_SECRET_KEY, TESTING_DATABASE_URL,
};
pub use store::SettingsStore;
