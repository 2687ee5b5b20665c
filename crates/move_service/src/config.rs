//! Service configuration
//!
//! Values come from an optional TOML file; command-line flags are applied on
//! top by [`crate::cli`]. Every section falls back to its defaults, so an
//! empty file is a valid configuration.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::info;
use ttt_move_core::{TreeConfig, FEATURE_COUNT};
use ttt_move_trainer::{DatasetOptions, ValidationConfig};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Where the training data lives and how to read it
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatasetSection {
    pub path: Option<PathBuf>,
    #[serde(flatten)]
    pub options: DatasetOptions,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    pub dataset: DatasetSection,
    pub validation: ValidationConfig,
    pub tree: TreeConfig,
}

impl ServiceConfig {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        info!("Loading configuration from: {}", path.display());

        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Reject settings the trainer cannot work with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.dataset.options.label_column < FEATURE_COUNT {
            return Err(ConfigError::Invalid(format!(
                "label_column {} overlaps the feature columns 0..{}",
                self.dataset.options.label_column, FEATURE_COUNT
            )));
        }

        if self.tree.min_samples_leaf == 0 {
            return Err(ConfigError::Invalid("min_samples_leaf must be at least 1".into()));
        }

        if self.tree.min_samples_split < 2 {
            return Err(ConfigError::Invalid("min_samples_split must be at least 2".into()));
        }

        if self.tree.max_depth == Some(0) {
            return Err(ConfigError::Invalid("max_depth must be at least 1".into()));
        }

        Ok(())
    }
}
