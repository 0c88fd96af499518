//! Config command: dump the full resolved configuration

use anyhow::Result;
use clap::{Args, ValueEnum};

use crate::config::SettingsStore;

#[derive(Args)]
pub struct ConfigArgs {
    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Yaml)]
    pub format: OutputFormat,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    Yaml,
    Json,
}

pub fn run(store: &SettingsStore, args: ConfigArgs) -> Result<()> {
    let settings = store.current()?;
    let map = settings.to_map()?;

    match args.format {
        OutputFormat::Yaml => print!("{}", serde_yaml::to_string(&map)?),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&map)?),
    }
    Ok(())
}
