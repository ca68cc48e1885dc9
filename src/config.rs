//! Layered configuration for duplicate detection.
//!
//! Sources, lowest to highest precedence:
//! - Default values
//! - TOML configuration file (`.codedup/settings.toml`)
//! - Environment variable overrides
//!
//! # Environment Variables
//!
//! Environment variables must be prefixed with `CODEDUP_` and use double
//! underscores to separate nested levels:
//! - `CODEDUP_GROUPING__THRESHOLD=0.9` sets `grouping.threshold`
//! - `CODEDUP_SEARCH__TOP=25` sets `search.top`
//! - `CODEDUP_DEBUG=true` sets `debug`

use std::path::{Path, PathBuf};

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::duplicates::{GroupingOptions, SearchOptions};

/// Directory marking a workspace root
pub const CONFIG_DIR: &str = ".codedup";

/// Settings file name inside [`CONFIG_DIR`]
pub const SETTINGS_FILE: &str = "settings.toml";

const ENV_PREFIX: &str = "CODEDUP_";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}\nSuggestion: Check settings.toml and CODEDUP_* environment variables")]
    Invalid(#[from] Box<figment::Error>),

    #[error("Failed to serialize settings: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Invalid settings path '{}': it has no parent directory", path.display())]
    InvalidPath { path: PathBuf },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Settings {
    /// Version of the configuration schema
    #[serde(default = "default_version")]
    pub version: u32,

    /// Directory holding the persisted indexes, relative to the workspace root
    #[serde(default = "default_index_path")]
    pub index_path: PathBuf,

    /// Workspace root directory (where `.codedup` is located)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub workspace_root: Option<PathBuf>,

    /// Verbose logging
    #[serde(default)]
    pub debug: bool,

    /// Defaults for duplicate grouping
    #[serde(default)]
    pub grouping: GroupingOptions,

    /// Defaults for location and query searches
    #[serde(default)]
    pub search: SearchOptions,
}

fn default_version() -> u32 {
    1
}
fn default_index_path() -> PathBuf {
    PathBuf::from(CONFIG_DIR).join("index")
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            version: default_version(),
            index_path: default_index_path(),
            workspace_root: None,
            debug: false,
            grouping: GroupingOptions::default(),
            search: SearchOptions::default(),
        }
    }
}

impl Settings {
    /// Loads settings from the nearest workspace config and the environment.
    ///
    /// A missing settings file is not an error; defaults apply.
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::find_workspace_config()
            .unwrap_or_else(|| PathBuf::from(CONFIG_DIR).join(SETTINGS_FILE));

        let mut settings = Self::extract(&config_path)?;
        if settings.workspace_root.is_none() {
            settings.workspace_root = Self::workspace_root();
        }
        Ok(settings)
    }

    /// Loads settings from an explicit TOML file plus the environment.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Self::extract(path.as_ref())
    }

    /// Loads settings from defaults and a TOML file, ignoring `CODEDUP_*`
    /// environment variables.
    pub fn load_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Self::file_figment(path.as_ref())
            .extract()
            .map_err(|e| ConfigError::Invalid(Box::new(e)))
    }

    fn file_figment(config_path: &Path) -> Figment {
        Figment::new()
            .merge(Serialized::defaults(Settings::default()))
            .merge(Toml::file(config_path))
    }

    fn extract(config_path: &Path) -> Result<Self, ConfigError> {
        Self::file_figment(config_path)
            .merge(Env::prefixed(ENV_PREFIX).map(|key| {
                key.as_str()
                    .to_lowercase()
                    .replace("__", ".") // Double underscore becomes dot
                    .into()
            }))
            .extract()
            .map_err(|e| ConfigError::Invalid(Box::new(e)))
    }

    fn find_workspace_config() -> Option<PathBuf> {
        let current = std::env::current_dir().ok()?;
        Self::find_workspace_root_from(&current)
            .map(|root| root.join(CONFIG_DIR).join(SETTINGS_FILE))
    }

    /// Nearest ancestor of the current directory containing `.codedup/`.
    pub fn workspace_root() -> Option<PathBuf> {
        let current = std::env::current_dir().ok()?;
        Self::find_workspace_root_from(&current)
    }

    /// Nearest ancestor of `start` (inclusive) containing `.codedup/`.
    pub fn find_workspace_root_from(start: &Path) -> Option<PathBuf> {
        start
            .ancestors()
            .find(|ancestor| ancestor.join(CONFIG_DIR).is_dir())
            .map(Path::to_path_buf)
    }

    /// Index directory, resolved against the workspace root when relative.
    #[must_use]
    pub fn resolved_index_path(&self) -> PathBuf {
        match &self.workspace_root {
            Some(root) if self.index_path.is_relative() => root.join(&self.index_path),
            _ => self.index_path.clone(),
        }
    }

    /// Writes the settings as pretty TOML, creating the parent directory.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let parent = path.parent().ok_or_else(|| ConfigError::InvalidPath {
            path: path.to_path_buf(),
        })?;
        std::fs::create_dir_all(parent)?;

        let toml_string = toml::to_string_pretty(self)?;
        std::fs::write(path, toml_string)?;

        Ok(())
    }
}
