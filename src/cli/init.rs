//! Init command: scaffold a new project directory from the template layout

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use console::style;

#[derive(Args)]
pub struct InitArgs {
    /// Project name
    #[arg(value_name = "NAME")]
    pub name: String,

    /// Target directory (defaults to the current directory)
    #[arg(short = 'd', long = "dir", value_name = "DIR")]
    pub directory: Option<PathBuf>,
}

const PROJECT_SUBDIRS: &[&str] = &["src", "tests", "config", "data", "logs"];

pub fn run(args: InitArgs) -> Result<()> {
    let parent = match args.directory {
        Some(dir) => dir,
        None => std::env::current_dir().context("failed to determine current directory")?,
    };
    let project_path = parent.join(&args.name);

    if project_path.exists() {
        anyhow::bail!("directory {} already exists", project_path.display());
    }

    for sub in PROJECT_SUBDIRS {
        fs::create_dir_all(project_path.join(sub))
            .with_context(|| format!("failed to create {}", project_path.join(sub).display()))?;
    }

    let starter = format!(
        "app_name: \"{}\"\nenvironment: development\ndebug: false\nlog_level: info\n",
        args.name
    );
    let settings_path = project_path.join("config/settings.yaml");
    fs::write(&settings_path, starter)
        .with_context(|| format!("failed to write {}", settings_path.display()))?;

    println!(
        "{}",
        style(format!(
            "Project '{}' created successfully at {}",
            args.name,
            project_path.display()
        ))
        .green()
    );
    Ok(())
}
