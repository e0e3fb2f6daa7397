//! Optional YAML configuration.
//!
//! ```yaml
//! input_capacity: 10
//! source_capacity: 20
//! alloc_size: 100
//! rules:
//!   - name: memcpy
//!     severity: MEDIUM
//!     description: memcpy without visible bound check
//!     pattern: '\bmemcpy\s*\('
//! ```

use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::scan::rules::RuleSpec;

pub const DEFAULT_INPUT_CAPACITY: usize = 10;
pub const DEFAULT_SOURCE_CAPACITY: usize = 20;
pub const DEFAULT_ALLOC_SIZE: usize = 100;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GuardConfig {
    #[serde(default = "default_input_capacity")]
    pub input_capacity: usize,

    #[serde(default = "default_source_capacity")]
    pub source_capacity: usize,

    #[serde(default = "default_alloc_size")]
    pub alloc_size: usize,

    /// Extra scanner rules, appended to the built-in set.
    #[serde(default)]
    pub rules: Vec<RuleSpec>,
}

fn default_input_capacity() -> usize {
    DEFAULT_INPUT_CAPACITY
}

fn default_source_capacity() -> usize {
    DEFAULT_SOURCE_CAPACITY
}

fn default_alloc_size() -> usize {
    DEFAULT_ALLOC_SIZE
}

impl Default for GuardConfig {
    fn default() -> Self {
        Self {
            input_capacity: DEFAULT_INPUT_CAPACITY,
            source_capacity: DEFAULT_SOURCE_CAPACITY,
            alloc_size: DEFAULT_ALLOC_SIZE,
            rules: Vec::new(),
        }
    }
}

impl GuardConfig {
    pub fn from_yaml(s: &str, origin: &Path) -> Result<Self, ConfigError> {
        let cfg: GuardConfig = serde_yaml::from_str(s).map_err(|source| ConfigError::Parse {
            path: origin.to_path_buf(),
            source,
        })?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.input_capacity == 0 {
            return Err(ConfigError::Invalid("input_capacity must be at least 1".into()));
        }
        if self.source_capacity == 0 {
            return Err(ConfigError::Invalid(
                "source_capacity must be at least 1".into(),
            ));
        }
        if self.alloc_size == 0 {
            return Err(ConfigError::Invalid("alloc_size must be at least 1".into()));
        }
        for rule in &self.rules {
            rule.compile()
                .map_err(|e| ConfigError::Invalid(format!("rule '{}': {e}", rule.name)))?;
        }
        Ok(())
    }
}

pub fn load_config(path: &Path) -> Result<GuardConfig, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let cfg = GuardConfig::from_yaml(&content, path)?;
    tracing::debug!(
        path = %path.display(),
        input_capacity = cfg.input_capacity,
        source_capacity = cfg.source_capacity,
        extra_rules = cfg.rules.len(),
        "config loaded"
    );
    Ok(cfg)
}
