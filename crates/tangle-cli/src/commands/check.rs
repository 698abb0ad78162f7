//! Check command - runs the dependency analysis over a file or directory

use anyhow::Result;
use clap::Args;
use colored::Colorize;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use tangle_core::analysis::Analyzer;
use tangle_core::config::{Config, load_config_or_default_with_warnings};

use crate::output::json::JsonFormatter;
use crate::output::pretty::PrettyFormatter;

#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Path to file or directory to analyze
    #[arg(value_name = "PATH")]
    pub path: PathBuf,

    /// Output format for the report (pretty, json)
    #[arg(short, long, default_value = "pretty")]
    pub format: String,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Announce every return point during the debug graph walk
    #[arg(long)]
    pub show_backtracking: bool,
}

impl CheckArgs {
    pub fn run(&self) -> Result<()> {
        self.configure_colors();

        let config_result = load_config_or_default_with_warnings(&self.path);
        for warning in &config_result.warnings {
            eprintln!("{} {}", "warning:".yellow().bold(), warning);
        }
        let mut config = config_result.config;
        if self.show_backtracking {
            config.graph.show_backtracking = true;
        }

        let files = discover_files(&self.path, &config)?;
        if files.is_empty() {
            println!("No candidate files found under {}", self.path.display());
            return Ok(());
        }

        let analyzer = Analyzer::with_config(&config);
        let report = analyzer.run(&files);

        match self.format.as_str() {
            "json" => println!("{}", JsonFormatter::new().format(&report)?),
            "pretty" => print!("{}", PrettyFormatter::new().format(&report)),
            other => anyhow::bail!("Invalid format '{}'. Valid values: pretty, json", other),
        }

        Ok(())
    }

    fn configure_colors(&self) {
        let no_color_env = std::env::var("NO_COLOR").is_ok();
        if self.no_color || no_color_env {
            colored::control::set_override(false);
        }
    }
}

/// Collects candidate files under `path`: configured extensions only,
/// hidden directories and build output skipped, sorted for a stable
/// analysis order.
fn discover_files(path: &Path, config: &Config) -> Result<Vec<PathBuf>> {
    if !path.exists() {
        anyhow::bail!("Path does not exist: {}", path.display());
    }

    if path.is_file() {
        if is_candidate(path, config) {
            return Ok(vec![path.to_path_buf()]);
        }
        return Ok(vec![]);
    }

    let mut files: Vec<PathBuf> = WalkDir::new(path)
        .into_iter()
        .filter_entry(|e| !is_hidden(e))
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter(|e| is_candidate(e.path(), config))
        .map(|e| e.path().to_path_buf())
        .collect();
    files.sort();

    Ok(files)
}

fn is_candidate(path: &Path, config: &Config) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| config.extensions.iter().any(|e| e == ext))
        .unwrap_or(false)
}

fn is_hidden(entry: &walkdir::DirEntry) -> bool {
    if entry.depth() == 0 {
        return false;
    }
    entry
        .file_name()
        .to_str()
        .map(|name| name.starts_with('.') || name == "bin" || name == "obj")
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn discover_files_finds_single_source_file() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("test.cs");
        fs::write(&file_path, "class T {}").unwrap();

        let files = discover_files(&file_path, &Config::default()).unwrap();
        assert_eq!(files, [file_path]);
    }

    #[test]
    fn discover_files_filters_by_extension() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("keep.cs"), "").unwrap();
        fs::write(dir.path().join("skip.txt"), "").unwrap();

        let files = discover_files(dir.path(), &Config::default()).unwrap();
        assert_eq!(files.len(), 1);
        assert!(files[0].ends_with("keep.cs"));
    }

    #[test]
    fn discover_files_skips_hidden_and_build_dirs() {
        let dir = tempdir().unwrap();
        for sub in [".git", "bin", "obj"] {
            let subdir = dir.path().join(sub);
            fs::create_dir_all(&subdir).unwrap();
            fs::write(subdir.join("buried.cs"), "").unwrap();
        }
        fs::write(dir.path().join("visible.cs"), "").unwrap();

        let files = discover_files(dir.path(), &Config::default()).unwrap();
        assert_eq!(files.len(), 1);
        assert!(files[0].ends_with("visible.cs"));
    }

    #[test]
    fn discover_files_sorts_for_stable_order() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("zeta.cs"), "").unwrap();
        fs::write(dir.path().join("alpha.cs"), "").unwrap();

        let files = discover_files(dir.path(), &Config::default()).unwrap();
        assert!(files[0].ends_with("alpha.cs"));
        assert!(files[1].ends_with("zeta.cs"));
    }

    #[test]
    fn discover_files_missing_path_errors() {
        let err = discover_files(Path::new("/no/such/dir"), &Config::default());
        assert!(err.is_err());
    }

    #[test]
    fn non_candidate_single_file_yields_nothing() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("notes.txt");
        fs::write(&file_path, "").unwrap();

        let files = discover_files(&file_path, &Config::default()).unwrap();
        assert!(files.is_empty());
    }

    #[test]
    fn custom_extensions_widen_discovery() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("script.csx"), "").unwrap();

        let config = Config {
            extensions: vec!["csx".to_string()],
            ..Config::default()
        };
        let files = discover_files(dir.path(), &config).unwrap();
        assert_eq!(files.len(), 1);
    }
}
