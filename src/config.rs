//! Run configuration.
//!
//! Settings come from an optional YAML file (`astcorpus.yaml` or
//! `.astcorpus.yaml` in the working directory) with command-line flags
//! layered on top.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::corpus::{CorpusRunner, NodeBounds};
use crate::flatten::Granularity;
use crate::parser::ParseMode;

/// Config file names searched for when none is given.
pub const DEFAULT_CONFIG_NAMES: &[&str] = &["astcorpus.yaml", ".astcorpus.yaml"];

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("cannot read config {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("no input given (pass INPUT or set `input`)")]
    MissingInput,
    #[error("no output given (pass --output or set `output`)")]
    MissingOutput,
    #[error("min_nodes ({min}) must be less than max_nodes ({max})")]
    InvalidBounds { min: usize, max: usize },
    #[error("jobs must be greater than zero")]
    ZeroJobs,
}

/// Settings for a corpus run. Unset fields take their defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct CorpusConfig {
    /// Root directory, single file, or root+glob pattern such as `src/**/*.java`.
    #[serde(default)]
    pub input: Option<String>,
    /// Output stem; `.json`, `.txt` and `_failed.txt` are appended.
    #[serde(default)]
    pub output: Option<PathBuf>,
    /// `fine` (default) or `coarse`.
    #[serde(default)]
    pub granularity: Option<Granularity>,
    /// Smallest accepted table, inclusive (default: 20).
    #[serde(default)]
    pub min_nodes: Option<usize>,
    /// Largest accepted table, exclusive (default: 30000).
    #[serde(default)]
    pub max_nodes: Option<usize>,
    /// Parse each file as a class-body fragment (default: false).
    #[serde(default)]
    pub member_only: Option<bool>,
    /// Worker threads (default: available parallelism).
    #[serde(default)]
    pub jobs: Option<usize>,
    /// Base for the relative paths written to the index (default: ".").
    #[serde(default)]
    pub base_dir: Option<PathBuf>,
}

impl CorpusConfig {
    /// Parse a config from a YAML file.
    pub fn parse_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml(&content)
    }

    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        // An empty file is an empty mapping.
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(content)?)
    }

    /// Find a default config file in `dir`.
    pub fn find_in<P: AsRef<Path>>(dir: P) -> Option<PathBuf> {
        DEFAULT_CONFIG_NAMES
            .iter()
            .map(|name| dir.as_ref().join(name))
            .find(|path| path.is_file())
    }

    /// Layer `overrides` on top of `self`; set fields in `overrides` win.
    pub fn merge(self, overrides: CorpusConfig) -> Self {
        Self {
            input: overrides.input.or(self.input),
            output: overrides.output.or(self.output),
            granularity: overrides.granularity.or(self.granularity),
            min_nodes: overrides.min_nodes.or(self.min_nodes),
            max_nodes: overrides.max_nodes.or(self.max_nodes),
            member_only: overrides.member_only.or(self.member_only),
            jobs: overrides.jobs.or(self.jobs),
            base_dir: overrides.base_dir.or(self.base_dir),
        }
    }

    pub fn granularity(&self) -> Granularity {
        self.granularity.unwrap_or_default()
    }

    pub fn bounds(&self) -> NodeBounds {
        let defaults = NodeBounds::default();
        NodeBounds::new(
            self.min_nodes.unwrap_or(defaults.min),
            self.max_nodes.unwrap_or(defaults.max),
        )
    }

    pub fn parse_mode(&self) -> ParseMode {
        if self.member_only.unwrap_or(false) {
            ParseMode::Member
        } else {
            ParseMode::File
        }
    }

    pub fn base_dir(&self) -> PathBuf {
        self.base_dir.clone().unwrap_or_else(|| PathBuf::from("."))
    }

    /// Check that the config describes a runnable batch.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.input.as_deref().map_or(true, str::is_empty) {
            return Err(ConfigError::MissingInput);
        }
        if self.output.is_none() {
            return Err(ConfigError::MissingOutput);
        }
        let bounds = self.bounds();
        if bounds.min >= bounds.max {
            return Err(ConfigError::InvalidBounds {
                min: bounds.min,
                max: bounds.max,
            });
        }
        if self.jobs == Some(0) {
            return Err(ConfigError::ZeroJobs);
        }
        Ok(())
    }

    /// A runner configured from these settings.
    pub fn runner(&self) -> CorpusRunner {
        CorpusRunner::new(self.base_dir())
            .granularity(self.granularity())
            .bounds(self.bounds())
            .mode(self.parse_mode())
            .jobs(self.jobs)
    }
}
