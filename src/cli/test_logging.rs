//! Test-logging command: emit a message at every level to verify the
//! subscriber setup

use anyhow::Result;
use console::style;
use tracing::{debug, error, info, warn};

pub fn run() -> Result<()> {
    println!("{}", style("Testing logging at different levels:").cyan().bold());

    debug!("This is a DEBUG message");
    info!("This is an INFO message");
    warn!("This is a WARNING message");
    error!("This is an ERROR message");
    error!(severity = "critical", "This is a CRITICAL message");

    // Structured fields survive into both the console and file layers.
    info!(user_id = "12345", action = "login", "user action");

    println!(
        "{}",
        style("Logging test completed. Check console and log files.").green()
    );
    Ok(())
}
