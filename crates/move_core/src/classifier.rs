//! Classifier capability and the decision-tree implementation
//!
//! A [`Classifier`] is mutated by `fit` and read by `predict`. Training code
//! may call `fit` any number of times on the same instance; each call
//! discards the previous state.

use tracing::debug;

use crate::cart::{CartBuilder, TreeConfig};
use crate::errors::ClassifierError;
use crate::serde_canon::CanonicalError;
use crate::tree::DecisionTree;

/// Anything that can be fitted on labeled integer rows and then predict labels
pub trait Classifier {
    /// Replace the current state with one fitted on `features`/`labels`.
    fn fit(&mut self, features: &[Vec<i64>], labels: &[i64]) -> Result<(), ClassifierError>;

    /// Predict one label per row.
    fn predict(&self, features: &[Vec<i64>]) -> Result<Vec<i64>, ClassifierError>;

    /// Predict the label of a single row.
    fn predict_one(&self, row: &[i64]) -> Result<i64, ClassifierError> {
        let labels = self.predict(&[row.to_vec()])?;
        match labels.as_slice() {
            [label] => Ok(*label),
            other => Err(ClassifierError::PredictionCount {
                expected: 1,
                found: other.len(),
            }),
        }
    }
}

/// CART classifier with Gini impurity and deterministic tie-breaking
#[derive(Debug, Clone, Default)]
pub struct DecisionTreeClassifier {
    config: TreeConfig,
    tree: Option<DecisionTree>,
}

impl DecisionTreeClassifier {
    pub fn new(config: TreeConfig) -> Self {
        Self { config, tree: None }
    }

    pub fn config(&self) -> &TreeConfig {
        &self.config
    }

    /// The fitted tree, if any
    pub fn tree(&self) -> Option<&DecisionTree> {
        self.tree.as_ref()
    }

    pub fn is_fitted(&self) -> bool {
        self.tree.is_some()
    }

    /// Hash of the fitted tree; `None` before the first fit
    pub fn model_hash_hex(&self) -> Option<Result<String, CanonicalError>> {
        self.tree.as_ref().map(DecisionTree::hash_hex)
    }

    fn check_arity(expected: usize, rows: &[Vec<i64>]) -> Result<(), ClassifierError> {
        match rows.iter().find(|row| row.len() != expected) {
            Some(row) => Err(ClassifierError::FeatureArity {
                expected,
                found: row.len(),
            }),
            None => Ok(()),
        }
    }
}

impl Classifier for DecisionTreeClassifier {
    fn fit(&mut self, features: &[Vec<i64>], labels: &[i64]) -> Result<(), ClassifierError> {
        if features.len() != labels.len() {
            return Err(ClassifierError::LengthMismatch {
                features: features.len(),
                labels: labels.len(),
            });
        }

        let first = features.first().ok_or(ClassifierError::EmptyTrainingSet)?;
        Self::check_arity(first.len(), features)?;

        let tree = CartBuilder::new(features, labels, self.config.clone()).build();
        tree.validate().map_err(ClassifierError::InvalidTree)?;

        debug!(
            samples = features.len(),
            classes = tree.classes.len(),
            nodes = tree.nodes.len(),
            depth = tree.depth(),
            "fitted decision tree"
        );

        self.tree = Some(tree);
        Ok(())
    }

    fn predict(&self, features: &[Vec<i64>]) -> Result<Vec<i64>, ClassifierError> {
        let tree = self.tree.as_ref().ok_or(ClassifierError::NotFitted)?;
        Self::check_arity(tree.feature_count, features)?;

        features
            .iter()
            .map(|row| {
                tree.evaluate(row)
                    .ok_or_else(|| ClassifierError::InvalidTree("traversal fell off the tree".into()))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn xor_like() -> (Vec<Vec<i64>>, Vec<i64>) {
        let features = vec![
            vec![0, 0],
            vec![0, 1],
            vec![1, 0],
            vec![1, 1],
            vec![0, 0],
            vec![1, 1],
        ];
        let labels = vec![0, 1, 1, 0, 0, 0];
        (features, labels)
    }

    #[test]
    fn test_predict_before_fit() {
        let clf = DecisionTreeClassifier::default();
        assert_eq!(clf.predict(&[vec![1]]), Err(ClassifierError::NotFitted));
        assert!(clf.model_hash_hex().is_none());
    }

    #[test]
    fn test_fit_recovers_training_labels() {
        let (features, labels) = xor_like();
        let mut clf = DecisionTreeClassifier::default();
        clf.fit(&features, &labels).unwrap();

        assert_eq!(clf.predict(&features).unwrap(), labels);
        assert_eq!(clf.predict_one(&[0, 1]).unwrap(), 1);
    }

    /// Fitted, but answers with the wrong number of labels
    struct Silent;

    impl Classifier for Silent {
        fn fit(&mut self, _: &[Vec<i64>], _: &[i64]) -> Result<(), ClassifierError> {
            Ok(())
        }

        fn predict(&self, _: &[Vec<i64>]) -> Result<Vec<i64>, ClassifierError> {
            Ok(Vec::new())
        }
    }

    #[test]
    fn test_predict_one_rejects_empty_answer() {
        assert_eq!(
            Silent.predict_one(&[1]),
            Err(ClassifierError::PredictionCount {
                expected: 1,
                found: 0
            })
        );
    }

    #[test]
    fn test_refit_replaces_state() {
        let mut clf = DecisionTreeClassifier::default();
        clf.fit(&[vec![1], vec![2]], &[7, 7]).unwrap();
        assert_eq!(clf.predict_one(&[1]).unwrap(), 7);

        clf.fit(&[vec![1], vec![2]], &[3, 3]).unwrap();
        assert_eq!(clf.predict_one(&[1]).unwrap(), 3);
        assert_eq!(clf.tree().unwrap().classes, vec![3]);
    }

    #[test]
    fn test_shape_errors() {
        let mut clf = DecisionTreeClassifier::default();
        assert_eq!(clf.fit(&[], &[]), Err(ClassifierError::EmptyTrainingSet));
        assert_eq!(
            clf.fit(&[vec![1]], &[1, 2]),
            Err(ClassifierError::LengthMismatch {
                features: 1,
                labels: 2
            })
        );
        assert_eq!(
            clf.fit(&[vec![1, 2], vec![1]], &[1, 2]),
            Err(ClassifierError::FeatureArity {
                expected: 2,
                found: 1
            })
        );

        clf.fit(&[vec![1, 2]], &[1]).unwrap();
        assert_eq!(
            clf.predict(&[vec![1, 2, 3]]),
            Err(ClassifierError::FeatureArity {
                expected: 2,
                found: 3
            })
        );
    }

    #[test]
    fn test_fit_is_deterministic() {
        let (features, labels) = xor_like();
        let mut a = DecisionTreeClassifier::default();
        let mut b = DecisionTreeClassifier::default();
        a.fit(&features, &labels).unwrap();
        b.fit(&features, &labels).unwrap();

        assert_eq!(a.tree(), b.tree());
        assert_eq!(
            a.model_hash_hex().unwrap().unwrap(),
            b.model_hash_hex().unwrap().unwrap()
        );
    }
}
