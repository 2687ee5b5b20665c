//! CSV dataset loading
//!
//! Rows are board snapshots logged by the game client: eight feature tokens
//! (decimal or hex) followed by the move that was played. Tokens are kept
//! raw here; sanitization happens in the trainer so that training and
//! serving share one code path.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use tracing::debug;
use ttt_move_core::FEATURE_COUNT;

use crate::errors::DatasetError;

/// How to read a dataset file
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatasetOptions {
    /// Skip the first non-empty line
    pub has_header: bool,
    /// Zero-based column holding the label
    pub label_column: usize,
}

impl Default for DatasetOptions {
    fn default() -> Self {
        Self {
            has_header: false,
            label_column: FEATURE_COUNT,
        }
    }
}

/// Labeled rows of raw feature tokens
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Dataset {
    pub features: Vec<Vec<String>>,
    pub labels: Vec<i64>,
}

impl Dataset {
    /// Build a dataset from in-memory rows
    pub fn from_rows<I, R, S>(rows: I) -> Self
    where
        I: IntoIterator<Item = (R, i64)>,
        R: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let (features, labels) = rows
            .into_iter()
            .map(|(row, label)| (row.into_iter().map(Into::into).collect(), label))
            .unzip();

        Self { features, labels }
    }

    /// Load dataset from CSV file
    pub fn from_csv<P: AsRef<Path>>(path: P, options: &DatasetOptions) -> Result<Self, DatasetError> {
        let path = path.as_ref();
        let io_err = |source| DatasetError::Io {
            path: path.to_path_buf(),
            source,
        };

        let file = File::open(path).map_err(io_err)?;
        Self::from_reader(BufReader::new(file), options).map_err(|err| match err {
            DatasetError::Io { source, .. } => io_err(source),
            other => other,
        })
    }

    /// Parse CSV text from any buffered reader
    pub fn from_reader<R: BufRead>(reader: R, options: &DatasetOptions) -> Result<Self, DatasetError> {
        let needed = options.label_column.max(FEATURE_COUNT - 1) + 1;
        let mut features = Vec::new();
        let mut labels = Vec::new();
        let mut header_pending = options.has_header;

        for (line_idx, line) in reader.lines().enumerate() {
            let line = line.map_err(|source| DatasetError::Io {
                path: Default::default(),
                source,
            })?;
            let line = line.trim();
            let line_no = line_idx + 1;

            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            if header_pending {
                header_pending = false;
                debug!("skipping header line {}: {}", line_no, line);
                continue;
            }

            let parts: Vec<&str> = line.split(',').map(str::trim).collect();
            if parts.len() < needed {
                return Err(DatasetError::MissingColumn {
                    line: line_no,
                    needed,
                    found: parts.len(),
                });
            }

            let label = parse_label(parts[options.label_column]).ok_or_else(|| {
                DatasetError::LabelType {
                    line: line_no,
                    value: parts[options.label_column].to_string(),
                }
            })?;

            features.push(parts[..FEATURE_COUNT].iter().map(|s| s.to_string()).collect());
            labels.push(label);
        }

        Ok(Self { features, labels })
    }

    /// Get number of samples
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// Check if dataset is empty
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Class histogram
    pub fn label_counts(&self) -> BTreeMap<i64, usize> {
        let mut counts = BTreeMap::new();
        for &label in &self.labels {
            *counts.entry(label).or_insert(0) += 1;
        }
        counts
    }
}

/// Integer labels, also accepting integral floats such as `3.0`
fn parse_label(value: &str) -> Option<i64> {
    if let Ok(label) = value.parse::<i64>() {
        return Some(label);
    }

    let float = value.parse::<f64>().ok()?;
    if float.is_finite() && float.fract() == 0.0 && float.abs() < i64::MAX as f64 {
        Some(float as i64)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn load(text: &str, options: &DatasetOptions) -> Result<Dataset, DatasetError> {
        Dataset::from_reader(Cursor::new(text), options)
    }

    #[test]
    fn test_load_rows() {
        let ds = load(
            "3,A,0,F,1,2,0,4,5\n0,0,0,0,0,0,0,0,1\n",
            &DatasetOptions::default(),
        )
        .unwrap();

        assert_eq!(ds.len(), 2);
        assert_eq!(ds.features[0], vec!["3", "A", "0", "F", "1", "2", "0", "4"]);
        assert_eq!(ds.labels, vec![5, 1]);
    }

    #[test]
    fn test_skips_blank_comment_and_header() {
        let text = "# exported moves\n\nc0,c1,c2,c3,c4,c5,c6,c7,move\n1,1,1,1,1,1,1,1,2\n";
        let options = DatasetOptions {
            has_header: true,
            ..DatasetOptions::default()
        };

        let ds = load(text, &options).unwrap();
        assert_eq!(ds.len(), 1);
        assert_eq!(ds.labels, vec![2]);
    }

    #[test]
    fn test_custom_label_column() {
        // Game client log layout: nine cells then the move
        let options = DatasetOptions {
            label_column: 9,
            ..DatasetOptions::default()
        };

        let ds = load("1,2,3,4,5,6,7,8,9,6\n", &options).unwrap();
        assert_eq!(ds.features[0].len(), FEATURE_COUNT);
        assert_eq!(ds.labels, vec![6]);
    }

    #[test]
    fn test_missing_label_column() {
        let err = load("1,2,3,4,5,6,7,8\n", &DatasetOptions::default()).unwrap_err();
        assert!(matches!(
            err,
            DatasetError::MissingColumn {
                line: 1,
                needed: 9,
                found: 8
            }
        ));
    }

    #[test]
    fn test_label_coercion() {
        assert_eq!(parse_label("4"), Some(4));
        assert_eq!(parse_label("-1"), Some(-1));
        assert_eq!(parse_label("3.0"), Some(3));
        assert_eq!(parse_label("3.5"), None);
        assert_eq!(parse_label("move"), None);
        assert_eq!(parse_label("NaN"), None);
    }

    #[test]
    fn test_bad_label_reports_line() {
        let err = load("1,1,1,1,1,1,1,1,1\n1,1,1,1,1,1,1,1,x\n", &DatasetOptions::default())
            .unwrap_err();
        match err {
            DatasetError::LabelType { line, value } => {
                assert_eq!(line, 2);
                assert_eq!(value, "x");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_label_counts() {
        let ds = Dataset::from_rows(vec![
            (vec!["0"; 8], 1),
            (vec!["1"; 8], 1),
            (vec!["2"; 8], 4),
        ]);
        let counts = ds.label_counts();
        assert_eq!(counts.get(&1), Some(&2));
        assert_eq!(counts.get(&4), Some(&1));
    }
}
