//! Configuration loading and parsing
//!
//! Provides functionality to load and parse `tangle.toml` configuration
//! files.

use serde::Deserialize;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

pub const CONFIG_FILENAME: &str = "tangle.toml";

const KNOWN_TOP_LEVEL_KEYS: &[&str] = &["extensions", "exclude", "graph"];
const KNOWN_GRAPH_KEYS: &[&str] = &["show_backtracking"];

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Invalid TOML in '{path}': {message}")]
    ParseError { path: PathBuf, message: String },
}

#[derive(Debug, Clone, Default)]
pub struct ConfigResult {
    pub config: Config,
    pub warnings: Vec<String>,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// File extensions considered candidates for analysis.
    pub extensions: Vec<String>,
    /// Path patterns naming generated code or build metadata; matching
    /// files are skipped by policy.
    pub exclude: Vec<String>,
    pub graph: GraphConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            extensions: vec!["cs".to_string()],
            exclude: vec![
                "TemporaryGeneratedFile".to_string(),
                "AssemblyInfo".to_string(),
            ],
            graph: GraphConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct GraphConfig {
    /// Announce every return point during debug walks of the dependency
    /// graph.
    pub show_backtracking: bool,
}

pub fn find_config_file(start_dir: &Path) -> Option<PathBuf> {
    let mut current = start_dir.to_path_buf();
    loop {
        let config_path = current.join(CONFIG_FILENAME);
        if config_path.exists() {
            return Some(config_path);
        }
        if !current.pop() {
            return None;
        }
    }
}

pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
        path: path.to_path_buf(),
        source: e,
    })?;

    toml::from_str(&content).map_err(|e| ConfigError::ParseError {
        path: path.to_path_buf(),
        message: e.message().to_string(),
    })
}

pub fn load_config_with_warnings(path: &Path) -> Result<ConfigResult, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
        path: path.to_path_buf(),
        source: e,
    })?;

    let config: Config = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
        path: path.to_path_buf(),
        message: e.message().to_string(),
    })?;

    let warnings = detect_unknown_keys(&content);

    Ok(ConfigResult { config, warnings })
}

fn detect_unknown_keys(content: &str) -> Vec<String> {
    let mut warnings = Vec::new();

    let table: toml::Table = match content.parse() {
        Ok(t) => t,
        Err(_) => return warnings,
    };

    let known_top: HashSet<&str> = KNOWN_TOP_LEVEL_KEYS.iter().copied().collect();
    for key in table.keys() {
        if !known_top.contains(key.as_str()) {
            warnings.push(format!("Unknown config option: '{}'", key));
        }
    }

    if let Some(toml::Value::Table(graph)) = table.get("graph") {
        let known_graph: HashSet<&str> = KNOWN_GRAPH_KEYS.iter().copied().collect();
        for key in graph.keys() {
            if !known_graph.contains(key.as_str()) {
                warnings.push(format!("Unknown config option in [graph]: '{}'", key));
            }
        }
    }

    warnings
}

pub fn load_config_or_default(start_dir: &Path) -> Config {
    find_config_file(start_dir)
        .and_then(|path| load_config(&path).ok())
        .unwrap_or_default()
}

pub fn load_config_or_default_with_warnings(start_dir: &Path) -> ConfigResult {
    match find_config_file(start_dir) {
        Some(path) => load_config_with_warnings(&path).unwrap_or_default(),
        None => ConfigResult::default(),
    }
}
