//! Info command: human-readable summary of the resolved settings

use anyhow::Result;
use console::style;

use crate::config::SettingsStore;

pub fn run(store: &SettingsStore) -> Result<()> {
    let settings = store.current()?;

    println!("{}", style("Application").cyan().bold());
    println!("  Name: {}", settings.app_name);
    println!("  Version: {}", settings.version);
    println!("  Environment: {}", settings.environment);
    println!("  Debug: {}", settings.debug);

    println!("{}", style("Logging").cyan().bold());
    println!("  Level: {}", settings.log_level);
    match &settings.log_file {
        Some(path) => println!("  File: {}", path.display()),
        None => println!("  File: (console only)"),
    }

    println!("{}", style("Directories").cyan().bold());
    println!("  Data: {}", settings.data_dir.display());
    println!("  Cache: {}", settings.cache_dir.display());
    println!("  Temp: {}", settings.temp_dir.display());

    println!("{}", style("Feature flags").cyan().bold());
    println!("  Metrics: {}", settings.enable_metrics);
    println!("  Profiling: {}", settings.enable_profiling);
    println!("  Caching: {}", settings.enable_caching);

    println!("{}", style("Database").cyan().bold());
    println!("  URL: {}", settings.database_url());
    println!("  Pool size: {}", settings.database.pool_size);

    Ok(())
}
