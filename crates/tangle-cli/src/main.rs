//! tangle CLI - command-line interface for the tangle dependency analyzer
//!
//! Discovers source files, runs the two-pass type and dependency analysis,
//! and reports scope metrics, the dependency graph, and its strongly
//! connected components.

mod commands;
mod output;

use clap::Parser;
use commands::Commands;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "tangle",
    author,
    version,
    about = "Type-based dependency and strong-component analyzer",
    long_about = "tangle statically analyzes C#-style sources: it discovers type\n\
                  declarations, infers file-to-file dependencies from declarations\n\
                  and inheritance, and reports the strongly connected components\n\
                  of the dependency graph. Cycles of mutual dependency are the\n\
                  key diagnostic."
)]
pub struct Cli {
    /// Log analysis progress to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Check(args) => args.run(),
        Commands::Init(args) => args.run(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_parses_check_command() {
        let cli = Cli::try_parse_from(["tangle", "check", "./src"]).unwrap();
        match cli.command {
            Commands::Check(args) => {
                assert_eq!(args.path.to_str().unwrap(), "./src");
            }
            _ => panic!("Expected Check command"),
        }
    }

    #[test]
    fn cli_parses_check_with_format() {
        let cli = Cli::try_parse_from(["tangle", "check", ".", "--format", "json"]).unwrap();
        match cli.command {
            Commands::Check(args) => {
                assert_eq!(args.format, "json");
            }
            _ => panic!("Expected Check command"),
        }
    }

    #[test]
    fn cli_parses_check_with_backtracking() {
        let cli = Cli::try_parse_from(["tangle", "check", ".", "--show-backtracking"]).unwrap();
        match cli.command {
            Commands::Check(args) => {
                assert!(args.show_backtracking);
            }
            _ => panic!("Expected Check command"),
        }
    }

    #[test]
    fn cli_parses_init_command() {
        let cli = Cli::try_parse_from(["tangle", "init"]).unwrap();
        assert!(matches!(cli.command, Commands::Init(_)));
    }

    #[test]
    fn cli_parses_init_with_force() {
        let cli = Cli::try_parse_from(["tangle", "init", "--force"]).unwrap();
        match cli.command {
            Commands::Init(args) => {
                assert!(args.force);
            }
            _ => panic!("Expected Init command"),
        }
    }

    #[test]
    fn cli_parses_global_verbose_flag() {
        let cli = Cli::try_parse_from(["tangle", "check", ".", "--verbose"]).unwrap();
        assert!(cli.verbose);
    }

    #[test]
    fn cli_help_contains_commands() {
        let mut cmd = Cli::command();
        let help = cmd.render_help().to_string();
        assert!(help.contains("check"));
        assert!(help.contains("init"));
    }

    #[test]
    fn check_help_shows_options() {
        let mut cmd = Cli::command();
        let check_cmd = cmd
            .get_subcommands_mut()
            .find(|c| c.get_name() == "check")
            .unwrap();
        let help = check_cmd.render_help().to_string();
        assert!(help.contains("PATH"));
        assert!(help.contains("--format"));
    }
}
