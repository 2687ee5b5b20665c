//! Decision tree structures for move classification
//!
//! Flat, serializable node array with integer-only traversal.
//! Leaf values are class labels.

use serde::{Deserialize, Serialize};

use crate::serde_canon::{hash_canonical_hex, CanonicalError};

/// A decision tree node (internal or leaf)
///
/// For internal nodes:
/// - `feature_idx >= 0`: index into feature vector
/// - `left` and `right` point to child node indices
/// - `leaf` is `None`
///
/// For leaf nodes:
/// - `feature_idx == -1`
/// - `leaf` contains the predicted class label
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Node {
    /// Node ID (preorder position, not used in traversal)
    pub id: i32,

    /// Left child index (-1 for leaf nodes)
    pub left: i32,

    /// Right child index (-1 for leaf nodes)
    pub right: i32,

    /// Feature index to split on (-1 for leaf nodes)
    pub feature_idx: i32,

    /// Split threshold; `feature <= threshold` goes left
    pub threshold: i64,

    /// Class label for leaf nodes
    pub leaf: Option<i64>,

    /// Training samples that reached this node
    pub samples: u32,
}

impl Node {
    /// Create a new internal (split) node
    pub fn internal(id: i32, feature_idx: i32, threshold: i64, left: i32, right: i32) -> Self {
        Self {
            id,
            left,
            right,
            feature_idx,
            threshold,
            leaf: None,
            samples: 0,
        }
    }

    /// Create a new leaf node
    pub fn leaf(id: i32, label: i64) -> Self {
        Self {
            id,
            left: -1,
            right: -1,
            feature_idx: -1,
            threshold: 0,
            leaf: Some(label),
            samples: 0,
        }
    }

    pub fn with_samples(mut self, samples: usize) -> Self {
        self.samples = u32::try_from(samples).unwrap_or(u32::MAX);
        self
    }

    /// Check if this node is a leaf
    pub fn is_leaf(&self) -> bool {
        self.feature_idx == -1 || self.leaf.is_some()
    }
}

/// A fitted classification tree
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct DecisionTree {
    /// Tree nodes (node 0 is the root)
    pub nodes: Vec<Node>,

    /// Sorted distinct labels seen during fitting
    pub classes: Vec<i64>,

    /// Feature vector length the tree was fitted on
    pub feature_count: usize,
}

impl DecisionTree {
    pub fn new(nodes: Vec<Node>, classes: Vec<i64>, feature_count: usize) -> Self {
        Self {
            nodes,
            classes,
            feature_count,
        }
    }

    /// Walk the tree for one feature vector.
    ///
    /// Returns `None` when the structure is broken (dangling child or feature
    /// index out of range); [`DecisionTree::validate`] rules that out for
    /// trees produced by the builder.
    pub fn evaluate(&self, features: &[i64]) -> Option<i64> {
        let mut idx = 0usize;

        loop {
            let node = self.nodes.get(idx)?;

            if node.is_leaf() {
                return node.leaf;
            }

            let feature_value = *features.get(usize::try_from(node.feature_idx).ok()?)?;

            let next = if feature_value <= node.threshold {
                node.left
            } else {
                node.right
            };
            idx = usize::try_from(next).ok()?;
        }
    }

    /// Get the root node
    pub fn root(&self) -> Option<&Node> {
        self.nodes.first()
    }

    /// Longest root-to-leaf path, counted in edges
    pub fn depth(&self) -> usize {
        let mut deepest = 0;
        let mut stack = vec![(0usize, 0usize)];

        while let Some((idx, depth)) = stack.pop() {
            let Some(node) = self.nodes.get(idx) else {
                continue;
            };
            if node.is_leaf() {
                deepest = deepest.max(depth);
                continue;
            }
            for child in [node.left, node.right] {
                // Children always follow their parent; anything else is a cycle
                match usize::try_from(child) {
                    Ok(child) if child > idx => stack.push((child, depth + 1)),
                    _ => {}
                }
            }
        }

        deepest
    }

    pub fn leaf_count(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_leaf()).count()
    }

    /// Structural check run after every fit.
    ///
    /// Children must sit after their parent in `nodes` (preorder), split
    /// features must exist and every leaf must predict a known class.
    pub fn validate(&self) -> Result<(), String> {
        if self.nodes.is_empty() {
            return Err("tree has no nodes".into());
        }

        let len = self.nodes.len();
        let child_ok = |parent: usize, child: i32| {
            usize::try_from(child).map_or(false, |c| c > parent && c < len)
        };

        for (i, node) in self.nodes.iter().enumerate() {
            if node.is_leaf() {
                let label = node.leaf.ok_or_else(|| format!("leaf {i} carries no label"))?;
                if self.classes.binary_search(&label).is_err() {
                    return Err(format!("leaf {i} predicts unseen class {label}"));
                }
                continue;
            }

            if !child_ok(i, node.left) || !child_ok(i, node.right) {
                return Err(format!(
                    "node {i} has out-of-order children ({}, {})",
                    node.left, node.right
                ));
            }

            let feature_in_range = usize::try_from(node.feature_idx)
                .map_or(false, |f| f < self.feature_count);
            if !feature_in_range {
                return Err(format!("node {i} splits on feature {}", node.feature_idx));
            }
        }

        Ok(())
    }

    /// BLAKE3 hash of the canonical JSON form, as hex
    pub fn hash_hex(&self) -> Result<String, CanonicalError> {
        hash_canonical_hex(self)
    }
}
