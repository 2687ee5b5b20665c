//! Integration tests for CSV loading and two-fold cross-validation
//!
//! Ensures the split, the serving model and the diagnostics are reproducible.

use std::io::Write;

use tempfile::NamedTempFile;
use ttt_move_core::{DecisionTreeClassifier, LcgRng};
use ttt_move_trainer::{
    train_from_csv, ClassifierTrainer, Dataset, DatasetError, DatasetOptions, TrainerError,
    ValidationConfig,
};

/// Game-log style CSV: eight hex cells and the index of the brightest cell.
fn create_move_log(rows: usize, seed: i64) -> std::io::Result<NamedTempFile> {
    let mut file = NamedTempFile::new()?;
    let mut rng = LcgRng::new(seed);

    for _ in 0..rows {
        let cells: Vec<i64> = (0..8).map(|_| rng.next_range(16)).collect();
        let best = cells
            .iter()
            .enumerate()
            .max_by_key(|(i, v)| (**v, std::cmp::Reverse(*i)))
            .map(|(i, _)| i)
            .unwrap_or_default();

        let tokens: Vec<String> = cells.iter().map(|c| format!("{c:X}")).collect();
        writeln!(file, "{},{}", tokens.join(","), best)?;
    }

    file.flush()?;
    Ok(file)
}

#[test]
fn test_cross_run_determinism() {
    let file = create_move_log(64, 1).unwrap();
    let options = DatasetOptions::default();

    let mut hashes = Vec::new();
    let mut reports = Vec::new();

    for _ in 0..3 {
        let result = train_from_csv(
            file.path(),
            &options,
            ValidationConfig::default(),
            DecisionTreeClassifier::default(),
        )
        .unwrap();

        hashes.push(
            result
                .model
                .classifier()
                .model_hash_hex()
                .unwrap()
                .unwrap(),
        );
        reports.push(result.report);
    }

    for i in 1..hashes.len() {
        assert_eq!(hashes[0], hashes[i], "model hash from run {} should match run 0", i);
        assert_eq!(reports[0], reports[i], "report from run {} should match run 0", i);
    }
}

#[test]
fn test_report_lengths_match_dataset() {
    let file = create_move_log(37, 2).unwrap();
    let dataset = Dataset::from_csv(file.path(), &DatasetOptions::default()).unwrap();

    let result = ClassifierTrainer::new(ValidationConfig::default())
        .cross_validate(&dataset, DecisionTreeClassifier::default())
        .unwrap();
    let report = result.report;

    assert_eq!(report.actual.len(), dataset.len());
    assert_eq!(report.predicted.len(), dataset.len());
    assert_eq!(report.fold_a_len + report.fold_b_len, dataset.len());
    assert_eq!(report.fold_b_len, 19);
    assert_eq!(report.confusion.total(), dataset.len());

    let correct = report
        .actual
        .iter()
        .zip(&report.predicted)
        .filter(|(a, p)| a == p)
        .count();
    assert_eq!(report.accuracy, correct as f64 / dataset.len() as f64);
    assert_eq!(report.confusion.correct(), correct);
}

#[test]
fn test_serving_model_trained_on_fold_b_only() {
    let file = create_move_log(40, 3).unwrap();
    let result = train_from_csv(
        file.path(),
        &DatasetOptions::default(),
        ValidationConfig::default(),
        DecisionTreeClassifier::default(),
    )
    .unwrap();

    assert_eq!(result.model.training_rows(), result.report.fold_b_len);
    let root = result.model.classifier().tree().unwrap().root().unwrap();
    assert_eq!(root.samples as usize, result.report.fold_b_len);
}

#[test]
fn test_different_seeds_change_the_split() {
    let file = create_move_log(50, 4).unwrap();
    let dataset = Dataset::from_csv(file.path(), &DatasetOptions::default()).unwrap();

    let run = |seed| {
        ClassifierTrainer::new(ValidationConfig {
            seed,
            shuffle: true,
        })
        .cross_validate(&dataset, DecisionTreeClassifier::default())
        .unwrap()
        .report
        .actual
    };

    assert_ne!(run(0), run(1));
}

#[test]
fn test_missing_file() {
    let err = train_from_csv(
        std::path::Path::new("/nonexistent/out_log.csv"),
        &DatasetOptions::default(),
        ValidationConfig::default(),
        DecisionTreeClassifier::default(),
    )
    .unwrap_err();

    assert!(matches!(err, TrainerError::Dataset(DatasetError::Io { .. })));
}

#[test]
fn test_label_type_error_is_fatal() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "0,0,0,0,0,0,0,0,1").unwrap();
    writeln!(file, "1,1,1,1,1,1,1,1,left").unwrap();
    file.flush().unwrap();

    let err = train_from_csv(
        file.path(),
        &DatasetOptions::default(),
        ValidationConfig::default(),
        DecisionTreeClassifier::default(),
    )
    .unwrap_err();

    assert!(matches!(
        err,
        TrainerError::Dataset(DatasetError::LabelType { line: 2, .. })
    ));
}
