//! cli-template binary entry point

use anyhow::Result;

fn main() -> Result<()> {
    cli_template::cli::run()
}
