//! Tracing subscriber setup driven by resolved settings
//!
//! Console output goes to stderr. When a log file is configured, a second
//! plain-text layer appends to it; the rotation knobs in the settings
//! document are carried for operators but no size-based rotation happens
//! in-process.

use std::fs::OpenOptions;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::Level;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::{LogLevel, Settings};

/// Initialize the global subscriber.
///
/// Level precedence: `RUST_LOG` in the environment always wins; otherwise
/// `--verbose` forces DEBUG, then an explicit CLI level, then the
/// configured `log_level`.
pub fn init(settings: &Settings, level_override: Option<LogLevel>, verbose: bool) -> Result<()> {
    let level = if verbose {
        Level::DEBUG
    } else {
        level_override.unwrap_or(settings.log_level).as_tracing_level()
    };
    let filter = EnvFilter::from_default_env().add_directive(level.into());

    let file_layer = match settings.log_file.as_deref() {
        Some(path) => {
            if let Some(parent) = path.parent() {
                if !parent.as_os_str().is_empty() {
                    std::fs::create_dir_all(parent).with_context(|| {
                        format!("failed to create log directory {}", parent.display())
                    })?;
                }
            }
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("failed to open log file {}", path.display()))?;
            Some(fmt::layer().with_ansi(false).with_writer(Arc::new(file)))
        }
        None => None,
    };

    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(file_layer)
        .with(filter)
        .try_init();

    Ok(())
}
