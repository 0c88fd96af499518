//! Command-line interface for cli-template
//!
//! Provides `run`, `info`, `config`, `init`, `test-logging`, and
//! `completions` subcommands on top of a single injected settings store.

use std::path::PathBuf;

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;

use crate::config::{Resolver, SettingsStore, ENVIRONMENT_VAR};

mod info;
mod init;
mod run;
mod show;
mod test_logging;

/// A Rust CLI starter template with layered configuration and logging
#[derive(Parser)]
#[command(name = "cli-template")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Directory holding settings.yaml and settings_<env>.yaml
    #[arg(short = 'c', long, global = true, value_name = "DIR")]
    config_dir: Option<PathBuf>,

    /// Enable verbose logging (sets log level to DEBUG)
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the example task
    Run(run::RunArgs),

    /// Display application information
    Info,

    /// Display the full resolved configuration
    Config(show::ConfigArgs),

    /// Initialize a new project from this template
    Init(init::InitArgs),

    /// Emit log messages at every level to verify the logging setup
    TestLogging,

    /// Generate shell completion scripts
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    // `run --env` must be in the environment before the first resolution
    // reads it, both for file selection and for the environment field.
    let mut level_override = None;
    if let Commands::Run(args) = &cli.command {
        level_override = args.log_level;
        if let Some(env) = &args.environment {
            std::env::set_var(ENVIRONMENT_VAR, env.as_str());
        }
    }

    if let Commands::Completions { shell } = &cli.command {
        let mut cmd = Cli::command();
        clap_complete::generate(*shell, &mut cmd, "cli-template", &mut std::io::stdout());
        return Ok(());
    }

    let mut resolver = Resolver::new();
    if let Some(dir) = &cli.config_dir {
        resolver = resolver.with_config_dir(dir);
    }
    let store = SettingsStore::new(resolver);

    let settings = store.current()?;
    crate::logging::init(&settings, level_override, cli.verbose)?;

    match cli.command {
        Commands::Run(args) => run::run(&store, args),
        Commands::Info => info::run(&store),
        Commands::Config(args) => show::run(&store, args),
        Commands::Init(args) => init::run(args),
        Commands::TestLogging => test_logging::run(),
        Commands::Completions { .. } => Ok(()),
    }
}
