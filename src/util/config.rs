//! Configuration file support for Narwhal.
//!
//! Narwhal supports two configuration file locations:
//! - Global: `~/.narwhal/config.toml` - User-wide defaults
//! - Project: `.narwhal/config.toml` - Project-specific overrides
//!
//! Project config takes precedence over global config, and the `[compile]`
//! section of `Narwhal.toml` takes precedence over both.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Narwhal configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Compile defaults
    pub compile: CompileDefaults,
}

/// Default compile settings, used when no platform override applies.
///
/// Every field is optional so layers can be merged; unset fields fall
/// through to the next layer and finally to the built-in defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct CompileDefaults {
    /// Maximum parallel compile jobs (0 = unlimited)
    pub max_cores: Option<u32>,

    /// Prepend `libtool` to compatible command lines
    pub libtool: Option<bool>,

    /// Stop on the first compile/link error
    pub fail_on_error: Option<bool>,

    /// Runtime linkage mode (`dynamic` or `static`)
    pub runtime: Option<String>,
}

impl CompileDefaults {
    /// Merge another layer into this one (other takes precedence).
    pub fn merge(&mut self, other: CompileDefaults) {
        if other.max_cores.is_some() {
            self.max_cores = other.max_cores;
        }
        if other.libtool.is_some() {
            self.libtool = other.libtool;
        }
        if other.fail_on_error.is_some() {
            self.fail_on_error = other.fail_on_error;
        }
        if other.runtime.is_some() {
            self.runtime = other.runtime;
        }
    }

    /// Check if any default is set.
    pub fn has_overrides(&self) -> bool {
        self.max_cores.is_some()
            || self.libtool.is_some()
            || self.fail_on_error.is_some()
            || self.runtime.is_some()
    }
}

impl Config {
    /// Load configuration from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;

        toml::from_str(&contents)
            .with_context(|| format!("failed to parse config file: {}", path.display()))
    }

    /// Load configuration with fallback to defaults if file doesn't exist.
    pub fn load_or_default(path: &Path) -> Self {
        if path.exists() {
            Self::load(path).unwrap_or_else(|e| {
                tracing::warn!("Failed to load config from {}: {:#}", path.display(), e);
                Self::default()
            })
        } else {
            Self::default()
        }
    }

    /// Merge another config into this one (other takes precedence).
    pub fn merge(&mut self, other: Config) {
        self.compile.merge(other.compile);
    }
}

/// Load merged configuration from global and project locations.
///
/// Order of precedence (highest to lowest):
/// 1. Project config (.narwhal/config.toml)
/// 2. Global config (~/.narwhal/config.toml)
/// 3. Defaults
pub fn load_config(global_path: Option<&Path>, project_path: &Path) -> Config {
    let mut config = Config::default();

    if let Some(global_path) = global_path {
        config.merge(Config::load_or_default(global_path));
    }

    config.merge(Config::load_or_default(project_path));

    config
}

/// Get the global narwhal config directory (~/.narwhal).
pub fn global_config_dir() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|b| b.home_dir().join(".narwhal"))
}

/// Get the global config path (~/.narwhal/config.toml).
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("config.toml"))
}

/// Get the project config path (.narwhal/config.toml).
pub fn project_config_path(project_root: &Path) -> PathBuf {
    project_root.join(".narwhal").join("config.toml")
}
