//! Two-fold cross-validation trainer
//!
//! One classifier instance is fitted on fold A and scored on fold B, then
//! refitted on fold B and scored on fold A. The refitted state is what
//! serves requests afterwards.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use ttt_move_core::{accuracy, sanitize_row, Classifier, ConfusionMatrix};

use crate::dataset::Dataset;
use crate::errors::{PredictError, TrainerError};
use crate::folds::FoldSplit;

/// Fold split parameters
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    pub seed: i64,
    pub shuffle: bool,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            shuffle: true,
        }
    }
}

/// Diagnostics over both validation rounds.
///
/// `actual` is fold B labels followed by fold A labels; `predicted` is the
/// round-one predictions (on B) followed by the round-two predictions (on A),
/// so position `i` of each refers to the same row.
#[derive(Clone, Debug, PartialEq)]
pub struct ValidationReport {
    pub fold_a_len: usize,
    pub fold_b_len: usize,
    pub actual: Vec<i64>,
    pub predicted: Vec<i64>,
    pub accuracy: f64,
    pub confusion: ConfusionMatrix,
}

/// A classifier frozen after training.
///
/// Only shared access is exposed, so nothing can refit it while it serves.
#[derive(Debug)]
pub struct TrainedModel<C> {
    classifier: C,
    training_rows: usize,
}

impl<C: Classifier> TrainedModel<C> {
    pub fn new(classifier: C, training_rows: usize) -> Self {
        Self {
            classifier,
            training_rows,
        }
    }

    /// Sanitize one row of raw tokens and predict its label.
    pub fn predict_row<S: AsRef<str>>(&self, tokens: &[S]) -> Result<i64, PredictError> {
        let features = sanitize_row(tokens)?;
        Ok(self.classifier.predict_one(&features)?)
    }

    pub fn classifier(&self) -> &C {
        &self.classifier
    }

    /// Rows the serving state was fitted on
    pub fn training_rows(&self) -> usize {
        self.training_rows
    }
}

/// Output of [`ClassifierTrainer::cross_validate`]
#[derive(Debug)]
pub struct CrossValidation<C> {
    pub model: TrainedModel<C>,
    pub report: ValidationReport,
}

/// Two-fold cross-validation driver
pub struct ClassifierTrainer {
    config: ValidationConfig,
}

impl ClassifierTrainer {
    pub fn new(config: ValidationConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ValidationConfig {
        &self.config
    }

    pub fn cross_validate<C: Classifier>(
        &self,
        dataset: &Dataset,
        mut classifier: C,
    ) -> Result<CrossValidation<C>, TrainerError> {
        if dataset.features.len() != dataset.labels.len() {
            return Err(TrainerError::RaggedDataset {
                features: dataset.features.len(),
                labels: dataset.labels.len(),
            });
        }

        let split = FoldSplit::new(dataset.len(), self.config.seed, self.config.shuffle)?;
        debug!("Label histogram: {:?}", dataset.label_counts());
        info!(
            "Split {} rows into fold A ({}) and fold B ({}) with seed {}",
            dataset.len(),
            split.fold_a().len(),
            split.fold_b().len(),
            self.config.seed
        );

        let (x_a, y_a) = Self::prepare_fold(dataset, split.fold_a())?;
        let (x_b, y_b) = Self::prepare_fold(dataset, split.fold_b())?;

        info!("Round 1: fit on fold A, predict fold B");
        classifier.fit(&x_a, &y_a)?;
        let prediction1 = classifier.predict(&x_b)?;

        info!("Round 2: refit on fold B, predict fold A");
        classifier.fit(&x_b, &y_b)?;
        let prediction2 = classifier.predict(&x_a)?;

        let actual: Vec<i64> = y_b.iter().chain(&y_a).copied().collect();
        let predicted: Vec<i64> = prediction1.into_iter().chain(prediction2).collect();

        let report = ValidationReport {
            fold_a_len: y_a.len(),
            fold_b_len: y_b.len(),
            accuracy: accuracy(&actual, &predicted)?,
            confusion: ConfusionMatrix::from_labels(&actual, &predicted)?,
            actual,
            predicted,
        };

        info!(
            "Cross-validation accuracy {:.4} over {} rows",
            report.accuracy,
            report.actual.len()
        );
        info!("Serving model fit on fold B ({} rows)", y_b.len());

        Ok(CrossValidation {
            model: TrainedModel::new(classifier, y_b.len()),
            report,
        })
    }

    fn prepare_fold(
        dataset: &Dataset,
        indices: &[usize],
    ) -> Result<(Vec<Vec<i64>>, Vec<i64>), TrainerError> {
        let mut features = Vec::with_capacity(indices.len());
        let mut labels = Vec::with_capacity(indices.len());

        for &row in indices {
            let sanitized = sanitize_row(&dataset.features[row])
                .map_err(|source| TrainerError::Sanitize { row, source })?;
            features.push(sanitized);
            labels.push(dataset.labels[row]);
        }

        Ok((features, labels))
    }
}
