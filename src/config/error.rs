//! Error taxonomy for configuration resolution

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors produced while resolving, validating, or materializing settings.
///
/// A missing config file is not an error (it contributes nothing); a file
/// that exists but fails to parse is.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A config file exists but could not be read.
    #[error("failed to read config file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A config file exists but is not valid YAML.
    #[error("malformed config file {}: {source}", path.display())]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// A config file parsed, but its top level is not a mapping.
    #[error("config file {} must contain a top-level mapping", path.display())]
    NotAMapping { path: PathBuf },

    /// The merged sources could not be deserialized into the settings schema.
    #[error("invalid configuration: {0}")]
    Extract(#[from] figment::Error),

    /// A merged value violates a field constraint.
    #[error("invalid value for {field}: {constraint}")]
    Validation {
        field: &'static str,
        constraint: String,
    },

    /// A required directory could not be created.
    #[error("failed to create directory {}: {source}", path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The resolved document could not be serialized to a generic mapping.
    #[error("failed to serialize settings: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl ConfigError {
    pub(crate) fn validation(field: &'static str, constraint: impl Into<String>) -> Self {
        ConfigError::Validation {
            field,
            constraint: constraint.into(),
        }
    }
}
