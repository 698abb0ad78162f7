//! CLI subcommands

pub mod check;
pub mod init;

use clap::Subcommand;

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Analyze sources and report dependencies and strong components
    Check(check::CheckArgs),
    /// Create a default tangle.toml configuration file
    Init(init::InitArgs),
}
