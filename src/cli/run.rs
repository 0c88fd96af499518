//! Run command: example task exercising settings, feature flags, and logging

use anyhow::Result;
use clap::Args;
use serde_json::json;
use tracing::{debug, info};

use crate::config::{Environment, LogLevel, SettingsStore};

#[derive(Args)]
pub struct RunArgs {
    /// Override the configured log level (debug, info, warning, error, critical)
    #[arg(short = 'l', long, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Select the environment (development, staging, production, testing)
    #[arg(short = 'e', long = "env", value_name = "ENV")]
    pub environment: Option<Environment>,
}

pub fn run(store: &SettingsStore, _args: RunArgs) -> Result<()> {
    let settings = store.current()?;

    info!("starting example task");
    info!("application: {} v{}", settings.app_name, settings.version);
    info!("environment: {}", settings.environment);
    info!("debug mode: {}", settings.debug);

    if settings.enable_metrics {
        info!("metrics collection is enabled");
    }
    if settings.enable_profiling {
        info!("profiling is enabled");
    }

    let batch_size = store.get_custom("batch_size", json!(100))?;
    info!("processing with batch size: {}", batch_size);

    for item in 1..=3 {
        debug!("processing item {}", item);
    }

    info!("example task completed successfully");
    println!(
        "Example task completed ({} v{}, environment: {})",
        settings.app_name, settings.version, settings.environment
    );
    Ok(())
}
