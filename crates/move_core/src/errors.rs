use thiserror::Error;

/// Errors returned by a [`crate::Classifier`].
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ClassifierError {
    #[error("classifier has not been fitted")]
    NotFitted,

    #[error("cannot fit on an empty training set")]
    EmptyTrainingSet,

    #[error("feature rows ({features}) and labels ({labels}) differ in length")]
    LengthMismatch { features: usize, labels: usize },

    #[error("expected {expected} features per row, got {found}")]
    FeatureArity { expected: usize, found: usize },

    #[error("expected {expected} predictions, got {found}")]
    PredictionCount { expected: usize, found: usize },

    #[error("invalid tree: {0}")]
    InvalidTree(String),
}
