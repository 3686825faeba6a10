//! Configuration module for the documentation generator.
//!
//! This module provides a layered configuration system that supports:
//! - Default values
//! - TOML configuration file
//! - Environment variable overrides
//! - CLI argument overrides (applied by the command handlers)
//!
//! # Environment Variables
//!
//! Environment variables must be prefixed with `REGDOC_` and use double
//! underscores to separate nested levels:
//! - `REGDOC_OUTPUT_DIR=docs` sets `output_dir`
//! - `REGDOC_OUTPUT__CPP_STUB=true` sets `output.cpp_stub`
//! - `REGDOC_INDEX__PLUGIN_NAMESPACE=Extensions` sets `index.plugin_namespace`

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::indexing::IndexOptions;

/// Directory holding the settings file, searched upwards from the cwd.
pub const CONFIG_DIR: &str = ".regdoc";
pub const CONFIG_FILE: &str = "settings.toml";
const ENV_PREFIX: &str = "REGDOC_";

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Settings {
    /// Version of the configuration schema
    #[serde(default = "default_version")]
    pub version: u32,

    /// Directory all output files are written to
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Only errors are logged; the run summary is not printed
    #[serde(default)]
    pub silent: bool,

    /// Which output formats to generate
    #[serde(default)]
    pub output: OutputConfig,

    /// Grouping and indexing behavior
    #[serde(default)]
    pub index: IndexOptions,

    #[serde(default)]
    pub html: HtmlConfig,

    #[serde(default)]
    pub cpp: CppConfig,

    #[serde(default)]
    pub completion: CompletionConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct OutputConfig {
    /// Browsable HTML pages
    #[serde(default = "default_true")]
    pub html: bool,

    /// C++ stubs for an external documentation extractor
    #[serde(default)]
    pub cpp_stub: bool,

    /// Editor completion list
    #[serde(default)]
    pub completion_list: bool,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct HtmlConfig {
    /// Title shown on every page
    #[serde(default = "default_html_title")]
    pub title: String,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct CppConfig {
    /// Outermost namespace of every stub file
    #[serde(default = "default_root_namespace")]
    pub root_namespace: String,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct CompletionConfig {
    /// File name inside the output directory
    #[serde(default = "default_completion_file")]
    pub file_name: String,

    /// First line of the list, identifies the format version
    #[serde(default = "default_completion_header")]
    pub header: String,
}

/// Logging configuration.
///
/// Controls log levels globally and per-module. `RUST_LOG` takes precedence.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LoggingConfig {
    /// Default level for all modules: error, warn, info, debug, trace
    #[serde(default = "default_log_level")]
    pub default: String,

    /// Per-module overrides, e.g. `regdoc::render = "debug"`
    #[serde(default)]
    pub modules: HashMap<String, String>,
}

// Default value functions
fn default_version() -> u32 {
    1
}
fn default_output_dir() -> PathBuf {
    PathBuf::from("regdoc-out")
}
fn default_true() -> bool {
    true
}
fn default_html_title() -> String {
    "Registry Documentation".to_string()
}
fn default_root_namespace() -> String {
    "regbridge".to_string()
}
fn default_completion_file() -> String {
    "completion_list.txt".to_string()
}
fn default_completion_header() -> String {
    "REGDOC COMPLETER VERSION 1".to_string()
}
fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            version: default_version(),
            output_dir: default_output_dir(),
            silent: false,
            output: OutputConfig::default(),
            index: IndexOptions::default(),
            html: HtmlConfig::default(),
            cpp: CppConfig::default(),
            completion: CompletionConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            html: true,
            cpp_stub: false,
            completion_list: false,
        }
    }
}

impl Default for HtmlConfig {
    fn default() -> Self {
        Self {
            title: default_html_title(),
        }
    }
}

impl Default for CppConfig {
    fn default() -> Self {
        Self {
            root_namespace: default_root_namespace(),
        }
    }
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            file_name: default_completion_file(),
            header: default_completion_header(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            default: default_log_level(),
            modules: HashMap::new(),
        }
    }
}

impl LoggingConfig {
    /// Copy with the default level raised to `error`, per-module overrides dropped.
    pub fn silenced(&self) -> Self {
        Self {
            default: "error".to_string(),
            modules: HashMap::new(),
        }
    }
}

/// `REGDOC_` variables, `__` separating nested keys.
fn env_provider() -> Env {
    Env::prefixed(ENV_PREFIX).map(|key| key.as_str().to_lowercase().replace("__", ".").into())
}

impl Settings {
    /// Load configuration from all sources
    pub fn load() -> Result<Self, Box<figment::Error>> {
        // Try to find the workspace config by looking for .regdoc directory
        let config_path = Self::find_workspace_config()
            .unwrap_or_else(|| Path::new(CONFIG_DIR).join(CONFIG_FILE));
        Self::load_from(config_path)
    }

    /// Load configuration from a specific file. A missing file yields defaults
    /// plus environment overrides.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, Box<figment::Error>> {
        Figment::new()
            .merge(Serialized::defaults(Settings::default()))
            .merge(Toml::file(path.as_ref()))
            .merge(env_provider())
            .extract()
            .map_err(Box::new)
    }

    /// Find the settings file by looking for a .regdoc directory,
    /// from the current directory up to the filesystem root.
    fn find_workspace_config() -> Option<PathBuf> {
        let current = std::env::current_dir().ok()?;

        for ancestor in current.ancestors() {
            let config_dir = ancestor.join(CONFIG_DIR);
            if config_dir.is_dir() {
                return Some(config_dir.join(CONFIG_FILE));
            }
        }

        None
    }

    /// Save current configuration to file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), Box<dyn std::error::Error>> {
        let parent = path.as_ref().parent().ok_or("Invalid path")?;
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }

        let toml_string = toml::to_string_pretty(self)?;
        std::fs::write(path, toml_string)?;

        Ok(())
    }

    /// Create a default settings file under `root`.
    pub fn init_config_file(
        root: impl AsRef<Path>,
        force: bool,
    ) -> Result<PathBuf, Box<dyn std::error::Error>> {
        let config_path = root.as_ref().join(CONFIG_DIR).join(CONFIG_FILE);

        if !force && config_path.exists() {
            return Err("Configuration file already exists. Use --force to overwrite".into());
        }

        Settings::default().save(&config_path)?;
        Ok(config_path)
    }
}
