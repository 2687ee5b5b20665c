//! Move classifier trainer
//!
//! Loads labeled board snapshots, validates a classifier with two-fold
//! cross-validation and hands back the model that serves requests.

pub mod dataset;
pub mod errors;
pub mod folds;
pub mod trainer;

use std::path::Path;

use ttt_move_core::Classifier;

pub use dataset::{Dataset, DatasetOptions};
pub use errors::{DatasetError, PredictError, TrainerError};
pub use folds::FoldSplit;
pub use trainer::{ClassifierTrainer, CrossValidation, TrainedModel, ValidationConfig, ValidationReport};

/// Load a CSV dataset and cross-validate `classifier` on it.
pub fn train_from_csv<C: Classifier>(
    path: &Path,
    options: &DatasetOptions,
    config: ValidationConfig,
    classifier: C,
) -> Result<CrossValidation<C>, TrainerError> {
    let dataset = Dataset::from_csv(path, options)?;
    ClassifierTrainer::new(config).cross_validate(&dataset, classifier)
}

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
