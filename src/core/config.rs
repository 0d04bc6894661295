//! Configuration management with layered hierarchy

use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::core::resolver::DEFAULT_MAX_DEPTH;
use crate::core::section::SectionLabels;

/// Name of the per-directory config file
pub const LOCAL_CONFIG_FILE: &str = ".bommerge.yaml";

/// Section label overrides; unset entries keep the built-in labels
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LabelOverrides {
    pub subassemblies: Option<String>,
    pub standard_items: Option<String>,
    pub misc_items: Option<String>,
}

/// bommerge configuration with layered hierarchy
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Maximum assembly nesting depth
    pub max_depth: Option<usize>,

    /// Default output format
    pub default_format: Option<String>,

    /// Section label substrings
    pub labels: LabelOverrides,
}

impl Config {
    /// Load configuration from all sources, merging in priority order
    ///
    /// Missing or malformed global and local files are skipped; problems with
    /// an explicitly requested file or the environment are errors.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = Config::default();

        // 1. Built-in defaults (already in Default impl)

        // 2. Global user config (~/.config/bommerge/config.yaml)
        if let Some(global_path) = Self::global_config_path() {
            if let Ok(global) = Self::from_file(&global_path) {
                config.merge(global);
            }
        }

        // 3. Config in the working directory
        if let Ok(local) = Self::from_file(Path::new(LOCAL_CONFIG_FILE)) {
            config.merge(local);
        }

        // 4. File named on the command line
        if let Some(path) = explicit {
            config.merge(Self::from_file(path)?);
        }

        // 5. Environment variables
        config.apply_env(|key| std::env::var(key).ok())?;

        Ok(config)
    }

    /// Parse one config file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_yml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Get the path to the global config file
    fn global_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "bommerge")
            .map(|dirs| dirs.config_dir().join("config.yaml"))
    }

    /// Merge another config into this one (other takes precedence)
    fn merge(&mut self, other: Config) {
        if other.max_depth.is_some() {
            self.max_depth = other.max_depth;
        }
        if other.default_format.is_some() {
            self.default_format = other.default_format;
        }
        if other.labels.subassemblies.is_some() {
            self.labels.subassemblies = other.labels.subassemblies;
        }
        if other.labels.standard_items.is_some() {
            self.labels.standard_items = other.labels.standard_items;
        }
        if other.labels.misc_items.is_some() {
            self.labels.misc_items = other.labels.misc_items;
        }
    }

    fn apply_env(&mut self, var: impl Fn(&str) -> Option<String>) -> Result<(), ConfigError> {
        if let Some(raw) = var("BOMMERGE_MAX_DEPTH") {
            let depth = raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
                key: "BOMMERGE_MAX_DEPTH".to_string(),
                value: raw.clone(),
            })?;
            self.max_depth = Some(depth);
        }
        if let Some(format) = var("BOMMERGE_FORMAT") {
            self.default_format = Some(format);
        }
        Ok(())
    }

    /// Maximum nesting depth, falling back to the built-in limit
    pub fn max_depth(&self) -> usize {
        self.max_depth.unwrap_or(DEFAULT_MAX_DEPTH)
    }

    /// Section labels with overrides applied, lower-cased
    pub fn section_labels(&self) -> SectionLabels {
        let defaults = SectionLabels::default();
        let pick = |value: &Option<String>, default: String| {
            value
                .as_deref()
                .map(|v| v.trim().to_lowercase())
                .filter(|v| !v.is_empty())
                .unwrap_or(default)
        };

        SectionLabels {
            subassemblies: pick(&self.labels.subassemblies, defaults.subassemblies),
            standard_items: pick(&self.labels.standard_items, defaults.standard_items),
            misc_items: pick(&self.labels.misc_items, defaults.misc_items),
        }
    }
}

/// Errors from loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config file {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yml::Error,
    },

    #[error("invalid value {value:?} for {key}")]
    InvalidValue { key: String, value: String },
}
