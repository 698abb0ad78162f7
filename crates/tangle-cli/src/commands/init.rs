//! Init command - initializes tangle configuration in a project

use anyhow::Result;
use clap::Args;
use colored::Colorize;
use std::fs;
use std::path::Path;

use tangle_core::config::CONFIG_FILENAME;

const DEFAULT_CONFIG: &str = r#"# tangle configuration file
# See https://github.com/tangle-tools/tangle for documentation

# File extensions considered candidates for analysis
# extensions = ["cs"]

# Path patterns for generated code and build metadata; matching files
# are skipped
# exclude = ["TemporaryGeneratedFile", "AssemblyInfo"]

[graph]
# Announce every return point during debug walks of the dependency graph
# show_backtracking = true
"#;

#[derive(Args, Debug)]
pub struct InitArgs {
    /// Force overwrite existing configuration
    #[arg(short, long)]
    pub force: bool,
}

impl InitArgs {
    pub fn run(&self) -> Result<()> {
        let config_path = Path::new(CONFIG_FILENAME);

        if config_path.exists() && !self.force {
            anyhow::bail!(
                "Config file '{}' already exists. Use --force to overwrite.",
                CONFIG_FILENAME
            );
        }

        fs::write(config_path, DEFAULT_CONFIG)?;
        println!(
            "{} Created {} configuration file",
            "✓".green().bold(),
            CONFIG_FILENAME.cyan()
        );
        Ok(())
    }
}
