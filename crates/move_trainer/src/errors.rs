use std::path::PathBuf;

use thiserror::Error;
use ttt_move_core::{ClassifierError, MetricsError, SanitizeError};

/// Errors raised while reading a dataset
#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("failed to read dataset {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("line {line}: expected at least {needed} columns, got {found}")]
    MissingColumn {
        line: usize,
        needed: usize,
        found: usize,
    },

    #[error("line {line}: label {value:?} is not an integer class code")]
    LabelType { line: usize, value: String },
}

/// Errors returned by the cross-validation trainer.
#[derive(Debug, Error)]
pub enum TrainerError {
    #[error("dataset error: {0}")]
    Dataset(#[from] DatasetError),

    #[error("dataset has {features} feature rows but {labels} labels")]
    RaggedDataset { features: usize, labels: usize },

    #[error("need at least 2 rows to split into folds, got {rows}")]
    InsufficientData { rows: usize },

    #[error("row {row}: {source}")]
    Sanitize {
        row: usize,
        #[source]
        source: SanitizeError,
    },

    #[error("classifier error: {0}")]
    Classifier(#[from] ClassifierError),

    #[error("metrics error: {0}")]
    Metrics(#[from] MetricsError),
}

/// Errors from a single prediction against a trained model
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PredictError {
    #[error(transparent)]
    Sanitize(#[from] SanitizeError),

    #[error(transparent)]
    Classifier(#[from] ClassifierError),
}
