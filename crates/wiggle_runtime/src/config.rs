//! Runtime Configuration
//!
//! # Configuration Sources (later wins)
//!
//! 1. Built-in defaults
//! 2. Config file: `--config <file>`, else `WIGGLE_CONFIG`, else
//!    `wiggle.toml` in the working directory if present
//! 3. Environment: `WIGGLE_LOG`, `WIGGLE_INDENT`, `WIGGLE_STRICT_VERSION`
//! 4. Command line flags
//!
//! # Example Config File
//!
//! ```toml
//! log_level = "debug"
//!
//! [io]
//! indent = 2
//! reject_newer_versions = true
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use wiggle_io::IoConfig;

/// File looked up in the working directory when no config path is given
pub const DEFAULT_CONFIG_FILE: &str = "wiggle.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Invalid value {value:?} for {name}")]
    InvalidEnv { name: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    /// Default log filter when `RUST_LOG` is unset
    pub log_level: String,
    pub io: IoConfig,
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            io: IoConfig::default(),
            config_path: None,
        }
    }
}

impl RuntimeConfig {
    /// Load defaults, config file and environment
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let env_path = std::env::var_os("WIGGLE_CONFIG").map(PathBuf::from);
        let mut config = match explicit.map(Path::to_path_buf).or(env_path) {
            Some(path) => Self::load_from_file(&path)?,
            None if Path::new(DEFAULT_CONFIG_FILE).is_file() => {
                Self::load_from_file(Path::new(DEFAULT_CONFIG_FILE))?
            }
            None => Self::default(),
        };
        config.apply_env(|name| std::env::var(name).ok())?;
        Ok(config)
    }

    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config: Self = toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.config_path = Some(path.to_path_buf());
        Ok(config)
    }

    /// Apply `WIGGLE_*` overrides read through `var`
    pub fn apply_env(&mut self, var: impl Fn(&str) -> Option<String>) -> Result<(), ConfigError> {
        if let Some(level) = var("WIGGLE_LOG").filter(|v| !v.is_empty()) {
            self.log_level = level;
        }

        if let Some(value) = var("WIGGLE_INDENT") {
            self.io.indent = value.trim().parse().map_err(|_| ConfigError::InvalidEnv {
                name: "WIGGLE_INDENT",
                value: value.clone(),
            })?;
        }

        if let Some(value) = var("WIGGLE_STRICT_VERSION") {
            self.io.reject_newer_versions = match value.trim().to_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => true,
                "0" | "false" | "no" | "off" | "" => false,
                _ => {
                    return Err(ConfigError::InvalidEnv {
                        name: "WIGGLE_STRICT_VERSION",
                        value,
                    })
                }
            };
        }

        Ok(())
    }

    /// Apply command line flags
    pub fn with_overrides(mut self, indent: Option<usize>, strict_version: bool) -> Self {
        if let Some(indent) = indent {
            self.io.indent = indent;
        }
        if strict_version {
            self.io.reject_newer_versions = true;
        }
        self
    }
}
