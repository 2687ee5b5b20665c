//! Validation metrics over paired actual/predicted label sequences

use std::fmt;

use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum MetricsError {
    #[error("actual ({actual}) and predicted ({predicted}) label sequences differ in length")]
    LengthMismatch { actual: usize, predicted: usize },

    #[error("cannot score an empty label sequence")]
    Empty,
}

fn check_paired(actual: &[i64], predicted: &[i64]) -> Result<(), MetricsError> {
    if actual.len() != predicted.len() {
        return Err(MetricsError::LengthMismatch {
            actual: actual.len(),
            predicted: predicted.len(),
        });
    }
    if actual.is_empty() {
        return Err(MetricsError::Empty);
    }
    Ok(())
}

/// Fraction of positions where `actual[i] == predicted[i]`
pub fn accuracy(actual: &[i64], predicted: &[i64]) -> Result<f64, MetricsError> {
    check_paired(actual, predicted)?;

    let correct = actual
        .iter()
        .zip(predicted)
        .filter(|(a, p)| a == p)
        .count();

    Ok(correct as f64 / actual.len() as f64)
}

/// Counts of (actual class, predicted class) pairs.
///
/// Rows are actual classes, columns predicted classes, both ordered by the
/// sorted union of labels seen in either sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfusionMatrix {
    labels: Vec<i64>,
    counts: Vec<Vec<usize>>,
}

impl ConfusionMatrix {
    pub fn from_labels(actual: &[i64], predicted: &[i64]) -> Result<Self, MetricsError> {
        check_paired(actual, predicted)?;

        let mut labels: Vec<i64> = actual.iter().chain(predicted).copied().collect();
        labels.sort_unstable();
        labels.dedup();

        let mut counts = vec![vec![0usize; labels.len()]; labels.len()];
        for (a, p) in actual.iter().zip(predicted) {
            // Both labels are in `labels` by construction
            if let (Ok(row), Ok(col)) = (labels.binary_search(a), labels.binary_search(p)) {
                counts[row][col] += 1;
            }
        }

        Ok(Self { labels, counts })
    }

    pub fn labels(&self) -> &[i64] {
        &self.labels
    }

    pub fn rows(&self) -> &[Vec<usize>] {
        &self.counts
    }

    pub fn count(&self, actual: i64, predicted: i64) -> usize {
        match (
            self.labels.binary_search(&actual),
            self.labels.binary_search(&predicted),
        ) {
            (Ok(row), Ok(col)) => self.counts[row][col],
            _ => 0,
        }
    }

    pub fn total(&self) -> usize {
        self.counts.iter().flatten().sum()
    }

    /// Sum of the diagonal
    pub fn correct(&self) -> usize {
        (0..self.labels.len()).map(|i| self.counts[i][i]).sum()
    }
}

/// numpy-style rendering: `[[2 0]\n [1 1]]`
impl fmt::Display for ConfusionMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.counts.is_empty() {
            return write!(f, "[]");
        }

        let width = self
            .counts
            .iter()
            .flatten()
            .map(|c| c.to_string().len())
            .max()
            .unwrap_or(1);

        for (i, row) in self.counts.iter().enumerate() {
            f.write_str(if i == 0 { "[[" } else { " [" })?;
            for (j, count) in row.iter().enumerate() {
                if j > 0 {
                    f.write_str(" ")?;
                }
                write!(f, "{count:>width$}")?;
            }
            f.write_str("]")?;
            if i + 1 < self.counts.len() {
                f.write_str("\n")?;
            }
        }
        f.write_str("]")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accuracy() {
        assert_eq!(accuracy(&[0, 1, 0, 1], &[0, 1, 1, 1]), Ok(0.75));
        assert_eq!(accuracy(&[3], &[3]), Ok(1.0));
        assert_eq!(accuracy(&[], &[]), Err(MetricsError::Empty));
        assert_eq!(
            accuracy(&[1, 2], &[1]),
            Err(MetricsError::LengthMismatch {
                actual: 2,
                predicted: 1
            })
        );
    }

    #[test]
    fn test_confusion_counts() {
        let cm = ConfusionMatrix::from_labels(&[0, 1, 0, 1], &[0, 0, 0, 1]).unwrap();

        assert_eq!(cm.labels(), &[0, 1]);
        assert_eq!(cm.count(0, 0), 2);
        assert_eq!(cm.count(1, 0), 1);
        assert_eq!(cm.count(1, 1), 1);
        assert_eq!(cm.count(0, 1), 0);
        assert_eq!(cm.count(5, 5), 0);
        assert_eq!(cm.total(), 4);
        assert_eq!(cm.correct(), 3);
    }

    #[test]
    fn test_predicted_only_label_gets_a_column() {
        let cm = ConfusionMatrix::from_labels(&[1, 1], &[1, 4]).unwrap();
        assert_eq!(cm.labels(), &[1, 4]);
        assert_eq!(cm.rows(), &[vec![1usize, 1], vec![0, 0]]);
    }

    #[test]
    fn test_display_numpy_style() {
        let cm = ConfusionMatrix::from_labels(&[0, 1, 0, 1], &[0, 0, 0, 1]).unwrap();
        assert_eq!(cm.to_string(), "[[2 0]\n [1 1]]");

        let wide = ConfusionMatrix::from_labels(&[0; 12], &[0; 12]).unwrap();
        assert_eq!(wide.to_string(), "[[12]]");

        let mut actual = vec![0; 10];
        actual.push(1);
        let predicted = actual.clone();
        let padded = ConfusionMatrix::from_labels(&actual, &predicted).unwrap();
        assert_eq!(padded.to_string(), "[[10  0]\n [ 0  1]]");
    }
}
