//! Command-line arguments

use clap::Parser;
use std::path::PathBuf;

use crate::config::{ConfigError, ServiceConfig};

#[derive(Parser, Debug, Default)]
#[command(name = "ttt-move-service")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Trains a move classifier from a game log and serves predictions over stdin/stdout", long_about = None)]
pub struct Cli {
    /// CSV game log (eight feature columns plus the played move)
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// TOML configuration file; flags override its values
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Seed for the fold shuffle
    #[arg(long)]
    pub seed: Option<i64>,

    /// Split folds in file order
    #[arg(long)]
    pub no_shuffle: bool,

    /// First line of the CSV is a header
    #[arg(long)]
    pub has_header: bool,

    /// Zero-based label column
    #[arg(long)]
    pub label_column: Option<usize>,

    /// Maximum tree depth
    #[arg(long)]
    pub max_depth: Option<usize>,

    /// Minimum samples per leaf
    #[arg(long)]
    pub min_samples_leaf: Option<usize>,

    /// Debug logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Config file (or defaults) with flags applied on top, validated.
    pub fn resolve_config(&self) -> Result<ServiceConfig, ConfigError> {
        let mut config = match &self.config {
            Some(path) => ServiceConfig::load_from_file(path)?,
            None => ServiceConfig::default(),
        };

        if let Some(input) = &self.input {
            config.dataset.path = Some(input.clone());
        }
        if self.has_header {
            config.dataset.options.has_header = true;
        }
        if let Some(column) = self.label_column {
            config.dataset.options.label_column = column;
        }
        if let Some(seed) = self.seed {
            config.validation.seed = seed;
        }
        if self.no_shuffle {
            config.validation.shuffle = false;
        }
        if let Some(depth) = self.max_depth {
            config.tree.max_depth = Some(depth);
        }
        if let Some(leaf) = self.min_samples_leaf {
            config.tree.min_samples_leaf = leaf;
        }

        if config.dataset.path.is_none() {
            return Err(ConfigError::Invalid(
                "no dataset path; pass --input or set dataset.path".into(),
            ));
        }

        config.validate()?;
        Ok(config)
    }
}
