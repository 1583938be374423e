//! Runtime configuration.
//!
//! Everything the pipeline, server and client need is carried in an explicit
//! [`Config`] built once at startup: defaults, overlaid by an optional YAML
//! file, overlaid by the environment.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Environment variable overriding [`Config::api_base`].
pub const API_ENV_VAR: &str = "AI_REVIEWER_API";

/// Config file names searched in the current directory.
pub const DEFAULT_CONFIG_NAMES: &[&str] = &["codesage.yaml", ".codesage.yaml"];

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_yaml::Error,
    },
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Top-level configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// Base URL of the analysis backend used by `submit`.
    pub api_base: String,
    /// Listen address for `serve`.
    pub bind: String,
    /// Where the web form stores uploaded files.
    pub upload_dir: PathBuf,
    pub tools: ToolsConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base: "http://127.0.0.1:8000".to_string(),
            bind: "127.0.0.1:8000".to_string(),
            upload_dir: PathBuf::from("uploads"),
            tools: ToolsConfig::default(),
        }
    }
}

/// One external program and its time budget.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct ToolConfig {
    pub program: String,
    pub timeout_secs: u64,
    #[serde(default = "default_true")]
    pub enabled: bool,
}

impl ToolConfig {
    pub fn new(program: &str, timeout_secs: u64) -> Self {
        Self {
            program: program.to_string(),
            timeout_secs,
            enabled: true,
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

fn default_true() -> bool {
    true
}

/// External analyzers, one entry per tool.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ToolsConfig {
    pub pylint: ToolConfig,
    pub eslint: ToolConfig,
    pub javac: ToolConfig,
    pub gxx: ToolConfig,
    pub gcc: ToolConfig,
    pub cppcheck: ToolConfig,
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            pylint: ToolConfig::new("pylint", 15),
            eslint: ToolConfig::new("eslint", 30),
            javac: ToolConfig::new("javac", 10),
            gxx: ToolConfig::new("g++", 10),
            gcc: ToolConfig::new("gcc", 10),
            cppcheck: ToolConfig::new("cppcheck", 60),
        }
    }
}

impl ToolsConfig {
    /// All tools with their config key, for listing.
    pub fn entries(&self) -> [(&'static str, &ToolConfig); 6] {
        [
            ("pylint", &self.pylint),
            ("eslint", &self.eslint),
            ("javac", &self.javac),
            ("gxx", &self.gxx),
            ("gcc", &self.gcc),
            ("cppcheck", &self.cppcheck),
        ]
    }
}

impl Config {
    /// Parse a config from a YAML file.
    pub fn parse_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Config = serde_yaml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(config)
    }

    /// Load the config used at startup.
    ///
    /// Uses `explicit` if given, otherwise the first default config file
    /// found in the current directory, otherwise built-in defaults. The
    /// environment override is applied last.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let config = match explicit {
            Some(path) => Self::parse_file(path)?,
            None => match discover_config() {
                Some(path) => {
                    tracing::debug!("using config {}", path.display());
                    Self::parse_file(path)?
                }
                None => Self::default(),
            },
        };
        let config = config.with_env_override(std::env::var(API_ENV_VAR).ok());
        validate(&config)?;
        Ok(config)
    }

    /// Apply the backend URL override, if any.
    pub fn with_env_override(mut self, api_base: Option<String>) -> Self {
        if let Some(url) = api_base.filter(|u| !u.trim().is_empty()) {
            self.api_base = url.trim().to_string();
        }
        self
    }

    /// Backend endpoints tried in order by the client.
    pub fn analyze_endpoints(&self) -> Vec<String> {
        let base = self.api_base.trim_end_matches('/');
        vec![
            format!("{}/analyze/", base),
            format!("{}/analyze/code", base),
            format!("{}/analyze/code/", base),
        ]
    }
}

fn discover_config() -> Option<PathBuf> {
    DEFAULT_CONFIG_NAMES
        .iter()
        .map(PathBuf::from)
        .find(|p| p.exists())
}

/// Reject configs that cannot work.
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    if !config.api_base.starts_with("http://") && !config.api_base.starts_with("https://") {
        return Err(ConfigError::Invalid(format!(
            "api_base must be an http(s) URL, got {:?}",
            config.api_base
        )));
    }
    for (name, tool) in config.tools.entries() {
        if tool.program.trim().is_empty() {
            return Err(ConfigError::Invalid(format!("tools.{}.program is empty", name)));
        }
        if tool.timeout_secs == 0 {
            return Err(ConfigError::Invalid(format!(
                "tools.{}.timeout_secs must be positive",
                name
            )));
        }
    }
    Ok(())
}
